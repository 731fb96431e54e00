use std::path::PathBuf;
use thiserror::Error;

use crate::contracts::ContractType;

/// Failures surfaced by the resolver and the university facade.
#[derive(Debug, Error)]
pub enum UniversityError {
    /// Caller input rejected before any network round trip
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("artifact not found: {}", path.display())]
    ArtifactNotFound { path: PathBuf },

    #[error("no deployed address configured for {0}")]
    ConfigMissing(ContractType),

    #[error("deployment of {contract} failed: {reason}")]
    Deployment {
        contract: ContractType,
        reason: String,
    },

    /// The receipt came back with a failed status, or never came back
    #[error("transaction {tx_hash} failed: {reason}")]
    TransactionFailure { tx_hash: String, reason: String },

    #[error("read of {function} failed: {reason}")]
    Read { function: String, reason: String },

    #[error("rpc error: {0}")]
    Rpc(String),

    #[error("abi error: {0}")]
    Abi(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl UniversityError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<config::ConfigError> for UniversityError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for UniversityError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, UniversityError>;
