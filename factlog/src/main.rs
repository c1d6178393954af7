#![cfg_attr(test, allow(clippy::disallowed_methods))]
// Forbid unwrap() in production code to prevent panics from corrupt data.
// Test code is allowed to use unwrap() for convenience.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

use factlog::{Database, EngineConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "factlog=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: data_file={}, sync_writes={}",
        config.data_file.display(),
        config.sync_writes
    );

    if let Some(parent) = config.data_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::error!("Failed to create data directory: {e}");
            std::process::exit(1);
        }
    }

    let db = match Database::open(&config).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to open database: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!("Database opened, last transaction: {}", db.last_txn().await);

    // Print the current state of every entity named on the command line
    for id in std::env::args().skip(1) {
        match db.entity(&id).await {
            Ok(attributes) => {
                println!("{id}");
                for (attribute, value) in &attributes {
                    println!("  {attribute}: {value}");
                }
            }
            Err(e) => {
                tracing::error!("Failed to read entity {id}: {e}");
                std::process::exit(1);
            }
        }
    }
}
