//! Binary entry point: load the configuration, open the bakery, and print
//! the closing summary. An interrupt drives the same teardown path as a
//! management-decided close.

use bakehouse::{Bakery, BakeryConfig};
use bakehouse_kernel::tracing::setup_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let path = std::env::args().nth(1).unwrap_or_else(|| "bakery.conf".to_string());
    let config = BakeryConfig::from_file(&path)?;
    info!(path, "configuration loaded");

    let bakery = Bakery::open(config);

    let shared = bakery.shared().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received");
            shared.terminate("interrupt");
        }
    });

    let summary = bakery.close().await?;
    println!("{summary}");
    Ok(())
}
