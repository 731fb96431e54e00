use alloy::primitives::TxHash;

use crate::contracts::execution::{GasParams, TxReceipt};

/// Caller knobs for a state-changing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOptions {
    pub gas_limit: Option<u64>,
    pub gas_price: Option<u128>,
    /// Block until the receipt is available and check its status
    pub wait_for_receipt: bool,
}

impl Default for TxOptions {
    fn default() -> Self {
        Self {
            gas_limit: None,
            gas_price: None,
            wait_for_receipt: true,
        }
    }
}

impl TxOptions {
    /// Return as soon as the node accepts the transaction.
    pub fn no_wait() -> Self {
        Self {
            wait_for_receipt: false,
            ..Self::default()
        }
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    pub fn gas(&self) -> GasParams {
        GasParams {
            gas_limit: self.gas_limit,
            gas_price: self.gas_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxOutcome {
    /// Accepted by the node, not yet confirmed
    Submitted(TxHash),
    /// Mined with a successful status
    Confirmed(TxReceipt),
}

impl TxOutcome {
    pub fn receipt(&self) -> Option<&TxReceipt> {
        match self {
            TxOutcome::Submitted(_) => None,
            TxOutcome::Confirmed(receipt) => Some(receipt),
        }
    }
}

/// Which configured account signs a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    Default,
    /// Contract owner, required for privileged operations
    Admin,
}
