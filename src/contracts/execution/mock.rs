//! In-memory [`ChainClient`] used by unit tests.

use alloy::primitives::{Address, Bytes, TxHash, B256};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::contracts::execution::traits::{
    ChainClient, LogEntry, LogQuery, TxReceipt, TxRequest,
};

const RUNTIME_CODE: [u8; 4] = [0x60, 0x80, 0x60, 0x40];

#[derive(Debug, Clone)]
pub struct Deployment {
    pub address: Address,
    pub input: Bytes,
}

#[derive(Default)]
pub struct MockChain {
    code: Mutex<HashMap<Address, Bytes>>,
    deployments: Mutex<Vec<Deployment>>,
    sent: Mutex<Vec<TxRequest>>,
    receipts: Mutex<HashMap<TxHash, TxReceipt>>,
    call_responses: Mutex<HashMap<[u8; 4], Bytes>>,
    reverting_selectors: Mutex<HashSet<[u8; 4]>>,
    logs: Mutex<Vec<(Address, LogEntry)>>,
    next_id: AtomicU64,
    block: AtomicU64,
    rpc_requests: AtomicUsize,
    offline: AtomicBool,
    withhold_receipts: AtomicBool,
    revert_deployments: AtomicBool,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every RPC fails until [`MockChain::set_online`].
    pub fn set_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn set_online(&self) {
        self.offline.store(false, Ordering::SeqCst);
    }

    pub fn withhold_receipts(&self) {
        self.withhold_receipts.store(true, Ordering::SeqCst);
    }

    pub fn revert_deployments(&self) {
        self.revert_deployments.store(true, Ordering::SeqCst);
    }

    /// Transactions whose input starts with `selector` get a failed receipt.
    pub fn revert_selector(&self, selector: [u8; 4]) {
        self.reverting_selectors.lock().unwrap().insert(selector);
    }

    pub fn respond(&self, selector: [u8; 4], output: Vec<u8>) {
        self.call_responses
            .lock()
            .unwrap()
            .insert(selector, Bytes::from(output));
    }

    pub fn wipe_code(&self, address: Address) {
        self.code.lock().unwrap().remove(&address);
    }

    pub fn set_block(&self, block: u64) {
        self.block.store(block, Ordering::SeqCst);
    }

    pub fn block_number_now(&self) -> u64 {
        self.block.load(Ordering::SeqCst)
    }

    pub fn push_log(&self, address: Address, entry: LogEntry) {
        self.logs.lock().unwrap().push((address, entry));
    }

    pub fn deployments(&self) -> Vec<Deployment> {
        self.deployments.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<TxRequest> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of RPCs attempted, successful or not.
    pub fn rpc_requests(&self) -> usize {
        self.rpc_requests.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<()> {
        self.rpc_requests.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }
        Ok(())
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

fn selector_of(input: &[u8]) -> Option<[u8; 4]> {
    input.get(..4).and_then(|s| s.try_into().ok())
}

#[async_trait]
impl ChainClient for MockChain {
    async fn get_code(&self, address: Address) -> Result<Bytes> {
        self.enter()?;
        Ok(self
            .code
            .lock()
            .unwrap()
            .get(&address)
            .cloned()
            .unwrap_or_default())
    }

    async fn call(&self, _to: Address, _from: Address, call_data: Bytes) -> Result<Bytes> {
        self.enter()?;
        let selector = selector_of(&call_data)
            .ok_or_else(|| anyhow::anyhow!("call data shorter than a selector"))?;
        self.call_responses
            .lock()
            .unwrap()
            .get(&selector)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("execution reverted"))
    }

    async fn send_transaction(&self, request: TxRequest) -> Result<TxHash> {
        self.enter()?;
        let id = self.next_id();
        let tx_hash = B256::left_padding_from(&id.to_be_bytes());
        let block = self.block.fetch_add(1, Ordering::SeqCst) + 1;

        let (success, contract_address) = match request.to {
            None if self.revert_deployments.load(Ordering::SeqCst) => (false, None),
            None => {
                let address = Address::from_slice(&tx_hash[12..]);
                self.code
                    .lock()
                    .unwrap()
                    .insert(address, Bytes::from_static(&RUNTIME_CODE));
                self.deployments.lock().unwrap().push(Deployment {
                    address,
                    input: request.input.clone(),
                });
                (true, Some(address))
            }
            Some(_) => {
                let reverted = selector_of(&request.input)
                    .map(|s| self.reverting_selectors.lock().unwrap().contains(&s))
                    .unwrap_or(false);
                (!reverted, None)
            }
        };

        self.receipts.lock().unwrap().insert(
            tx_hash,
            TxReceipt {
                tx_hash,
                success,
                block_number: Some(block),
                gas_used: 21_000,
                contract_address,
            },
        );
        self.sent.lock().unwrap().push(request);
        Ok(tx_hash)
    }

    async fn get_receipt(&self, tx_hash: TxHash) -> Result<Option<TxReceipt>> {
        self.enter()?;
        if self.withhold_receipts.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(self.receipts.lock().unwrap().get(&tx_hash).cloned())
    }

    async fn block_number(&self) -> Result<u64> {
        self.enter()?;
        Ok(self.block.load(Ordering::SeqCst))
    }

    async fn get_logs(&self, query: LogQuery) -> Result<Vec<LogEntry>> {
        self.enter()?;
        Ok(self
            .logs
            .lock()
            .unwrap()
            .iter()
            .filter(|(address, entry)| {
                let block = entry.block_number.unwrap_or_default();
                *address == query.address
                    && entry.topics.first() == Some(&query.topic0)
                    && block >= query.from_block
                    && block <= query.to_block
            })
            .map(|(_, entry)| entry.clone())
            .collect())
    }

    fn description(&self) -> &str {
        "MockChain: in-memory chain for tests"
    }
}
