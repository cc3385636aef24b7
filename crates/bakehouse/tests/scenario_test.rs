//! Cross-actor scenarios: real workers wired through the real buses and
//! regions, run under paused time so every wait is deterministic.

use bakehouse::actors::{ChefActor, CustomerActor, ManagementActor, SellerActor};
use bakehouse::config::BakeryConfig;
use bakehouse::context::Shared;
use bakehouse::domain::{ChefRole, MaterialTable, Product, RawMaterial};
use bakehouse::messages::{ControlMsg, ControlTag, StoreMsg, StoreTag};
use bakehouse::state::{Inventory, StockLevel};
use bakehouse_kernel::drive;
use std::time::Duration;

fn open(extra: &str) -> Shared {
    let text = format!("RNG_SEED=9\n{extra}");
    Shared::open(BakeryConfig::parse(&text).unwrap())
}

#[tokio::test(start_paused = true)]
async fn profit_target_closes_on_the_next_decision_cycle() {
    let shared = open("PROFIT_THRESHOLD=100\n");
    shared
        .ledger
        .with(|ledger| {
            for _ in 0..40 {
                ledger.record_production(Product::Cake);
            }
            ledger.record_sale(Product::Cake, 10, 10.0);
        })
        .unwrap();

    let summary = tokio::spawn(ManagementActor::new(shared.clone()).run())
        .await
        .unwrap();

    // The very first decision cycle saw the banked profit and closed.
    assert_eq!(summary.decisions, 1);
    assert!(summary.total_profit >= 100.0);
    assert!(!shared.is_active());

    // Termination was broadcast on both buses before they closed.
    assert!(shared.store.is_closed());
    assert!(shared.control.is_closed());
    assert!(matches!(
        shared.store.try_take(&StoreTag::Shutdown),
        Some(StoreMsg::Terminate)
    ));
    assert!(matches!(
        shared.control.try_take(&ControlTag::Shutdown),
        Some(ControlMsg::Terminate)
    ));
}

#[tokio::test(start_paused = true)]
async fn stocked_shelves_send_every_customer_home_happy() {
    let shared = open(
        "CUSTOMER_PATIENCE_MIN_SECONDS=5\nCUSTOMER_PATIENCE_MAX_SECONDS=5\n\
         CUSTOMER_MAX_PURCHASE_ITEMS=3\nCUSTOMER_COMPLAINT_PROBABILITY=1\n",
    );
    // Plenty of everything: every reservation policy passes.
    shared
        .ledger
        .with(|ledger| {
            for product in Product::ALL {
                for _ in 0..100 {
                    ledger.record_production(product);
                }
            }
        })
        .unwrap();

    let seller = tokio::spawn(drive(SellerActor::new(
        0,
        shared.clone(),
        shared.config.rng_for(1),
    )));

    for id in 0..5 {
        CustomerActor::new(id, shared.clone(), shared.config.rng_for(100 + id))
            .run()
            .await;
    }

    let (frustrated, total_sold) = shared
        .ledger
        .with(|ledger| {
            let sold: u32 = Product::ALL.iter().map(|&p| ledger.sold(p)).sum();
            (ledger.frustrated_customers(), sold)
        })
        .unwrap();
    assert_eq!(frustrated, 0);
    assert!(total_sold > 0);

    shared.terminate("test done");
    seller.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn empty_shelves_frustrate_each_customer_exactly_once() {
    let shared = open(
        "CUSTOMER_PATIENCE_MIN_SECONDS=2\nCUSTOMER_PATIENCE_MAX_SECONDS=2\n\
         CUSTOMER_MAX_PURCHASE_ITEMS=3\nCUSTOMER_COMPLAINT_PROBABILITY=0\n",
    );
    // A seller is on duty but has nothing to sell.
    let seller = tokio::spawn(drive(SellerActor::new(
        0,
        shared.clone(),
        shared.config.rng_for(1),
    )));

    for id in 0..4 {
        CustomerActor::new(id, shared.clone(), shared.config.rng_for(200 + id))
            .run()
            .await;
    }

    let (frustrated, missing, sold) = shared
        .ledger
        .with(|ledger| {
            let sold: u32 = Product::ALL.iter().map(|&p| ledger.sold(p)).sum();
            (
                ledger.frustrated_customers(),
                ledger.missing_item_requests(),
                sold,
            )
        })
        .unwrap();
    // One frustration per customer regardless of how many items failed.
    assert_eq!(frustrated, 4);
    assert!(missing >= 4);
    assert_eq!(sold, 0);

    shared.terminate("test done");
    seller.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn rival_chefs_never_overdraw_the_pantry() {
    let shared = open("");
    // Wheat for at most five batches of paste; everything else plentiful.
    shared
        .inventory
        .with(|inventory| {
            *inventory = Inventory::with_levels(MaterialTable::build(|m| StockLevel {
                quantity: if m == RawMaterial::Wheat { 10 } else { 1000 },
                min_threshold: 0,
            }));
        })
        .unwrap();

    let mut chefs = Vec::new();
    for id in 0..4 {
        chefs.push(tokio::spawn(drive(ChefActor::new(
            ChefRole::Paste,
            id,
            shared.clone(),
            shared.config.rng_for(300 + u64::from(id)),
        ))));
    }

    tokio::time::sleep(Duration::from_secs(60)).await;
    shared.terminate("test done");
    for chef in chefs {
        chef.await.unwrap();
    }

    let produced = shared
        .ledger
        .with(|ledger| ledger.produced(Product::Paste))
        .unwrap();
    let wheat_left = shared
        .inventory
        .with(|inventory| inventory.level(RawMaterial::Wheat).quantity)
        .unwrap();
    // Check-then-consume is atomic: the books balance to the grain.
    assert_eq!(produced, 5);
    assert_eq!(wheat_left, 10 - 2 * produced);
}

#[tokio::test(start_paused = true)]
async fn staffing_follows_demand_one_chef_at_a_time() {
    let shared = open("NUM_CAKE_CHEFS=3\n");
    // Sweets sell far ahead of their production share; cake is the
    // smallest oversupplier above the floor.
    shared
        .ledger
        .with(|ledger| {
            for (product, produced, sold) in [
                (Product::Sweet, 40u32, 24u32),
                (Product::Cake, 28, 8),
                (Product::Bread, 32, 8),
            ] {
                for _ in 0..produced {
                    ledger.record_production(product);
                }
                ledger.record_sale(product, sold, 0.0);
            }
        })
        .unwrap();

    let mut management = ManagementActor::new(shared.clone());
    assert_eq!(management.roster().size(ChefRole::Cake), 3);
    assert_eq!(management.roster().size(ChefRole::Sweet), 2);

    let cause = management.decision_pass().unwrap();
    assert_eq!(cause, None);
    // Exactly one worker moved: donor down one, target up one.
    assert_eq!(management.roster().size(ChefRole::Cake), 2);
    assert_eq!(management.roster().size(ChefRole::Sweet), 3);
}

#[tokio::test(start_paused = true)]
async fn restock_notices_reach_management() {
    let shared = open("");
    shared
        .inventory
        .with(|inventory| {
            *inventory = Inventory::with_levels(MaterialTable::build(|_| StockLevel {
                quantity: 0,
                min_threshold: 5,
            }));
        })
        .unwrap();

    let supply = tokio::spawn(drive(bakehouse::actors::SupplyActor::new(
        0,
        shared.clone(),
        shared.config.rng_for(4),
    )));

    tokio::time::sleep(Duration::from_secs(2)).await;
    shared.terminate("test done");
    supply.await.unwrap();

    let mut notices = 0;
    while let Some(ControlMsg::Restock(_)) = shared.control.try_take(&ControlTag::Management) {
        notices += 1;
    }
    assert_eq!(notices, RawMaterial::COUNT);
}
