pub mod transaction;
pub mod university;

pub use transaction::*;
pub use university::*;
