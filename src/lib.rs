//! Deployer and client facade for the University contract suite.
//!
//! [`contracts::ContractResolver`] deploys Professor, Student, Course,
//! Enrollment and University in dependency order when they are missing and
//! records their addresses in a JSON config file.
//! [`services::UniversityDataSource`] turns entity operations into calls and
//! transactions against the University contract.

pub mod config;
pub mod contracts;
pub mod error;
pub mod models;
pub mod services;

#[cfg(test)]
mod test_support;

pub use crate::config::{Config, ConfigStore};
pub use crate::contracts::{ContractHandle, ContractResolver, ContractType};
pub use crate::error::{Result, UniversityError};
pub use crate::services::UniversityDataSource;
