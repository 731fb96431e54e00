use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use university_client::config::ConfigStore;
use university_client::contracts::execution::AlloyClient;
use university_client::contracts::{ContractResolver, ContractType};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var("UNIVERSITY_CONFIG").unwrap_or_else(|_| "config.json".to_string());
    info!("Starting university deployer with {}", config_path);

    let store = ConfigStore::new(config_path);
    let config = store.load()?;
    let client = Arc::new(AlloyClient::from_config(&config)?);
    let resolver = ContractResolver::open(client, store)?;

    for contract in ContractType::ALL {
        match resolver.ensure_deployed(contract).await {
            Ok(handle) => info!("{} ready at {:?}", contract, handle.address()),
            Err(e) => {
                error!("Failed to resolve {}: {}", contract, e);
                return Err(e.into());
            }
        }
    }

    println!("{:<12} {:<44} {}", "CONTRACT", "ADDRESS", "CODE");
    let config = resolver.config().await;
    for (contract, deployed) in resolver.verify_all().await {
        println!(
            "{:<12} {:<44} {}",
            contract.name(),
            config.contracts.get(contract),
            if deployed { "ok" } else { "missing" }
        );
    }

    Ok(())
}
