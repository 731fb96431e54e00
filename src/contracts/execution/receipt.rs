use alloy::primitives::TxHash;
use anyhow::Result;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::config::Config;
use crate::contracts::execution::traits::{ChainClient, TxReceipt};

/// How long to poll for a receipt, and how often.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl ReceiptPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: Duration::from_secs(config.receipt_timeout_secs),
            poll_interval: Duration::from_millis(config.receipt_poll_interval_ms),
        }
    }
}

impl Default for ReceiptPolicy {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Polls until the transaction is mined. `Ok(None)` means the timeout elapsed.
pub async fn wait_for_receipt(
    client: &dyn ChainClient,
    tx_hash: TxHash,
    policy: ReceiptPolicy,
) -> Result<Option<TxReceipt>> {
    let deadline = Instant::now() + policy.timeout;

    loop {
        if let Some(receipt) = client.get_receipt(tx_hash).await? {
            debug!("Receipt for {:?} in block {:?}", tx_hash, receipt.block_number);
            return Ok(Some(receipt));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        sleep(policy.poll_interval).await;
    }
}
