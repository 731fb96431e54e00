use alloy::dyn_abi::{DynSolValue, EventExt};
use alloy::json_abi::Event;
use alloy::primitives::Address;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::contracts::execution::{ChainClient, LogEntry, LogQuery};
use crate::contracts::ContractHandle;
use crate::error::UniversityError;

/// An emitted event decoded against the contract ABI.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLog {
    pub indexed: Vec<DynSolValue>,
    pub body: Vec<DynSolValue>,
    pub block_number: Option<u64>,
}

/// Polls one event of one contract and hands every new occurrence to a callback.
pub struct EventWatcher {
    client: Arc<dyn ChainClient>,
    address: Address,
    event: Event,
    poll_interval: Duration,
}

/// Running watcher. Stopping (or dropping) it ends the poll loop.
pub struct WatchHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl WatchHandle {
    /// Signals the loop to exit and waits for it.
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        if let Err(e) = self.task.await {
            error!("Event watcher task ended abnormally: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl EventWatcher {
    pub fn new(
        handle: &ContractHandle,
        event_name: &str,
        poll_interval: Duration,
    ) -> Result<Self, UniversityError> {
        let event = handle
            .abi()
            .event(event_name)
            .and_then(|overloads| overloads.first())
            .cloned()
            .ok_or_else(|| UniversityError::Abi(format!("event not found: {}", event_name)))?;

        Ok(Self {
            client: handle.client().clone(),
            address: handle.address(),
            event,
            poll_interval,
        })
    }

    /// Starts polling from the block after the current head.
    pub async fn spawn<F>(self, callback: F) -> Result<WatchHandle>
    where
        F: Fn(DecodedLog) + Send + Sync + 'static,
    {
        let head = self.client.block_number().await?;
        let (stop_tx, mut stop_rx) = watch::channel(false);

        info!(
            "👀 Watching {} on {:?} from block {} every {:?}",
            self.event.name,
            self.address,
            head + 1,
            self.poll_interval
        );

        let task = tokio::spawn(async move {
            let mut next_block = head + 1;
            let mut ticker = interval(self.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = stop_rx.changed() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = self.poll_once(&mut next_block, &callback).await {
                            warn!("⚠️ Polling {} failed: {}", self.event.name, e);
                        }
                    }
                }
            }

            info!("Stopped watching {} on {:?}", self.event.name, self.address);
        });

        Ok(WatchHandle {
            stop: stop_tx,
            task,
        })
    }

    async fn poll_once<F>(&self, next_block: &mut u64, callback: &F) -> Result<usize>
    where
        F: Fn(DecodedLog),
    {
        let head = self.client.block_number().await?;
        if head + 1 < *next_block {
            warn!(
                "⚠️ Head {} is behind block {} for {}, chain was reset; rewinding",
                head, next_block, self.event.name
            );
            *next_block = head + 1;
        }
        if head < *next_block {
            return Ok(0);
        }

        let mut logs = self
            .client
            .get_logs(LogQuery {
                address: self.address,
                topic0: self.event.selector(),
                from_block: *next_block,
                to_block: head,
            })
            .await?;
        logs.sort_by_key(|log| log.block_number);

        let mut delivered = 0;
        for log in logs {
            match self.decode(&log) {
                Ok(decoded) => {
                    callback(decoded);
                    delivered += 1;
                }
                Err(e) => warn!("⚠️ Skipping undecodable {} log: {}", self.event.name, e),
            }
        }

        debug!("Blocks {}..={}: {} {} event(s)", next_block, head, delivered, self.event.name);
        *next_block = head + 1;
        Ok(delivered)
    }

    fn decode(&self, log: &LogEntry) -> Result<DecodedLog> {
        let decoded = self
            .event
            .decode_log_parts(log.topics.iter().copied(), &log.data)?;
        Ok(DecodedLog {
            indexed: decoded.indexed,
            body: decoded.body,
            block_number: log.block_number,
        })
    }
}
