pub mod codec;
pub mod definitions;

pub use definitions::{events, functions};
