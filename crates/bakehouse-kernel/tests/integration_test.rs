use async_trait::async_trait;
use bakehouse_kernel::{drive, KernelError, Region, Step, TagBus, Worker};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Tag {
    Work,
    Reply(u64),
}

/// A worker that drains one queue tag, counts into a shared region, and
/// replies under a requester-specific tag: the full request/reply shape the
/// primitives exist for.
struct Counter {
    id: u32,
    bus: Arc<TagBus<Tag, u64>>,
    total: Arc<Region<u64>>,
}

#[async_trait]
impl Worker for Counter {
    fn role(&self) -> &'static str {
        "counter"
    }

    fn id(&self) -> u32 {
        self.id
    }

    async fn tick(&mut self) -> Result<Step, KernelError> {
        match self.bus.try_take(&Tag::Work) {
            Some(requester) => {
                self.total.with(|n| *n += 1)?;
                let _ = self.bus.publish(Tag::Reply(requester), requester);
                Ok(Step::Continue)
            }
            None if self.bus.is_closed() => Ok(Step::Shutdown),
            None => Ok(Step::Idle(Duration::from_millis(5))),
        }
    }
}

#[tokio::test]
async fn request_reply_round_trip_through_bus_and_region() {
    let bus = Arc::new(TagBus::new("work"));
    let total = Arc::new(Region::new("total", 0u64));

    let worker = Counter {
        id: 0,
        bus: Arc::clone(&bus),
        total: Arc::clone(&total),
    };
    let handle = tokio::spawn(drive(worker));

    for requester in 1..=3u64 {
        bus.publish(Tag::Work, requester).unwrap();
        let reply = bus
            .take_deadline(&Tag::Reply(requester), Duration::from_secs(5))
            .await;
        assert_eq!(reply, Some(requester));
    }
    assert_eq!(total.with(|n| *n).unwrap(), 3);

    bus.close();
    handle.await.unwrap();
}

#[tokio::test]
async fn two_workers_never_double_consume_a_message() {
    let bus: Arc<TagBus<Tag, u64>> = Arc::new(TagBus::new("work"));
    let total = Arc::new(Region::new("total", 0u64));

    let mut handles = Vec::new();
    for id in 0..2 {
        let worker = Counter {
            id,
            bus: Arc::clone(&bus),
            total: Arc::clone(&total),
        };
        handles.push(tokio::spawn(drive(worker)));
    }

    for requester in 0..50u64 {
        bus.publish(Tag::Work, requester).unwrap();
    }
    for requester in 0..50u64 {
        let reply = bus
            .take_deadline(&Tag::Reply(requester), Duration::from_secs(5))
            .await;
        assert!(reply.is_some());
    }
    // Each message was processed exactly once across both workers.
    assert_eq!(total.with(|n| *n).unwrap(), 50);

    bus.close();
    for handle in handles {
        handle.await.unwrap();
    }
}
