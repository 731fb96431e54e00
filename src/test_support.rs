//! Fixtures shared by the unit tests: canonical ABIs, scratch config and
//! artifact directories, and a resolver wired to a [`MockChain`].

use alloy::json_abi::JsonAbi;
use alloy::primitives::Bytes;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use crate::config::{Config, ConfigStore};
use crate::contracts::artifacts::ArtifactStore;
use crate::contracts::execution::mock::MockChain;
use crate::contracts::execution::ReceiptPolicy;
use crate::contracts::{ContractResolver, ContractType};
use crate::services::UniversityDataSource;

pub fn abi_json(contract: ContractType) -> &'static str {
    match contract {
        ContractType::Professor => include_str!("../fixtures/abi/Professor.abi"),
        ContractType::Student => include_str!("../fixtures/abi/Student.abi"),
        ContractType::Course => include_str!("../fixtures/abi/Course.abi"),
        ContractType::Enrollment => include_str!("../fixtures/abi/Enrollment.abi"),
        ContractType::University => include_str!("../fixtures/abi/University.abi"),
    }
}

pub fn university_abi() -> JsonAbi {
    serde_json::from_str(abi_json(ContractType::University)).unwrap()
}

/// Distinct creation code per contract so deployments can be told apart.
pub fn bytecode_for(contract: ContractType) -> Bytes {
    let mut code = vec![0x60, 0x80, 0x60, 0x40];
    code.extend_from_slice(contract.name().as_bytes());
    Bytes::from(code)
}

pub fn deployed_order(chain: &MockChain) -> Vec<ContractType> {
    chain
        .deployments()
        .iter()
        .map(|deployment| {
            ContractType::ALL
                .into_iter()
                .find(|c| deployment.input.starts_with(&bytecode_for(*c)))
                .expect("deployment of unknown bytecode")
        })
        .collect()
}

/// Single receipt lookup, no waiting.
pub fn quick_receipts() -> ReceiptPolicy {
    ReceiptPolicy {
        timeout: Duration::ZERO,
        poll_interval: Duration::from_millis(1),
    }
}

pub struct TestEnv {
    dir: TempDir,
    pub chain: Arc<MockChain>,
    pub resolver: Arc<ContractResolver>,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        store
            .save(&Config {
                receipt_timeout_secs: 0,
                receipt_poll_interval_ms: 1,
                ..Config::default()
            })
            .unwrap();

        let artifacts = ArtifactStore::new(dir.path()).unwrap();
        for contract in ContractType::ALL {
            fs::write(artifacts.abi_path(contract), abi_json(contract)).unwrap();
            fs::write(
                artifacts.bin_path(contract),
                format!("0x{}\n", hex::encode(bytecode_for(contract))),
            )
            .unwrap();
        }

        let chain = Arc::new(MockChain::new());
        let resolver = Arc::new(ContractResolver::open(chain.clone(), store).unwrap());

        Self {
            dir,
            chain,
            resolver,
        }
    }

    pub fn store(&self) -> ConfigStore {
        ConfigStore::new(self.dir.path().join("config.json"))
    }

    pub fn artifacts(&self) -> ArtifactStore {
        ArtifactStore::new(self.dir.path()).unwrap()
    }

    /// A second resolver over the same config file and chain.
    pub fn reopen(&self) -> ContractResolver {
        ContractResolver::open(self.chain.clone(), self.store()).unwrap()
    }

    pub fn datasource(&self) -> UniversityDataSource {
        UniversityDataSource::new(self.resolver.clone())
    }
}
