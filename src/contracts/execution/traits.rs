use alloy::primitives::{Address, Bytes, TxHash, B256};
use anyhow::Result;
use async_trait::async_trait;

/// Optional gas overrides; unset fields are filled in by the node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GasParams {
    pub gas_limit: Option<u64>,
    pub gas_price: Option<u128>,
}

/// A transaction ready to be signed and submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRequest {
    pub from: Address,
    /// `None` creates a contract from `input`
    pub to: Option<Address>,
    pub input: Bytes,
    pub gas: GasParams,
}

/// The parts of a mined transaction's receipt this crate looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub success: bool,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub contract_address: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub address: Address,
    pub topic0: B256,
    pub from_block: u64,
    pub to_block: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub topics: Vec<B256>,
    pub data: Bytes,
    pub block_number: Option<u64>,
}

/// Node access needed by the resolver, contract handles and event watcher.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Runtime bytecode stored at `address`; empty when nothing is deployed there
    async fn get_code(&self, address: Address) -> Result<Bytes>;

    /// Perform a static call (read-only) and return the raw output
    async fn call(&self, to: Address, from: Address, call_data: Bytes) -> Result<Bytes>;

    /// Sign and submit a transaction, returning its hash without waiting
    async fn send_transaction(&self, request: TxRequest) -> Result<TxHash>;

    /// Receipt for `tx_hash`, or `None` while it is still pending
    async fn get_receipt(&self, tx_hash: TxHash) -> Result<Option<TxReceipt>>;

    async fn block_number(&self) -> Result<u64>;

    async fn get_logs(&self, query: LogQuery) -> Result<Vec<LogEntry>>;

    /// Get a human-readable description of this client
    fn description(&self) -> &str;
}
