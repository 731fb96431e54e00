pub mod abi;
pub mod artifacts;
pub mod deployer;
pub mod execution;
pub mod handle;
pub mod types;

// Re-export key types for convenience
pub use artifacts::ArtifactStore;
pub use deployer::ContractResolver;
pub use handle::ContractHandle;
pub use types::ContractType;
