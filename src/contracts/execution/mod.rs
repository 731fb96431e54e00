pub mod traits;
pub mod alloy_client;
pub mod receipt;
#[cfg(test)]
pub mod mock;

pub use traits::*;
pub use alloy_client::AlloyClient;
pub use receipt::{wait_for_receipt, ReceiptPolicy};
