use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::contracts::ContractType;
use crate::error::{Result, UniversityError};

pub const DEFAULT_NODE_URL: &str = "http://127.0.0.1:8545";
/// First funded account of a local anvil/hardhat node.
pub const DEFAULT_DEPLOYER_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn default_receipt_timeout_secs() -> u64 {
    120
}

fn default_receipt_poll_interval_ms() -> u64 {
    500
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub node_url: String,
    pub deployer_private_key: String,
    pub deployer_address: String,
    pub contracts: ContractAddresses,
    /// Key of the account used for ordinary writes. Empty means the deployer.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sender_private_key: String,
    #[serde(default = "default_receipt_timeout_secs")]
    pub receipt_timeout_secs: u64,
    #[serde(default = "default_receipt_poll_interval_ms")]
    pub receipt_poll_interval_ms: u64,
}

/// Deployed address per contract, empty string when undeployed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractAddresses {
    #[serde(rename = "Professor", alias = "professor", default)]
    pub professor: String,
    #[serde(rename = "Student", alias = "student", default)]
    pub student: String,
    #[serde(rename = "Course", alias = "course", default)]
    pub course: String,
    #[serde(rename = "Enrollment", alias = "enrollment", default)]
    pub enrollment: String,
    #[serde(rename = "University", alias = "university", default)]
    pub university: String,
}

impl ContractAddresses {
    pub fn get(&self, contract: ContractType) -> &str {
        match contract {
            ContractType::Professor => &self.professor,
            ContractType::Student => &self.student,
            ContractType::Course => &self.course,
            ContractType::Enrollment => &self.enrollment,
            ContractType::University => &self.university,
        }
    }

    pub fn set(&mut self, contract: ContractType, address: String) {
        let slot = match contract {
            ContractType::Professor => &mut self.professor,
            ContractType::Student => &mut self.student,
            ContractType::Course => &mut self.course,
            ContractType::Enrollment => &mut self.enrollment,
            ContractType::University => &mut self.university,
        };
        *slot = address;
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node_url: DEFAULT_NODE_URL.to_string(),
            deployer_private_key: DEFAULT_DEPLOYER_KEY.to_string(),
            deployer_address: String::new(),
            contracts: ContractAddresses::default(),
            sender_private_key: String::new(),
            receipt_timeout_secs: default_receipt_timeout_secs(),
            receipt_poll_interval_ms: default_receipt_poll_interval_ms(),
        }
    }
}

impl Config {
    /// Fills `deployer_address` from the private key when only the key is set.
    /// Returns whether the record changed.
    pub fn derive_deployer_address(&mut self) -> Result<bool> {
        if self.deployer_private_key.is_empty() || !self.deployer_address.is_empty() {
            return Ok(false);
        }

        let signer: PrivateKeySigner = self
            .deployer_private_key
            .parse()
            .map_err(|e| UniversityError::Config(format!("invalid deployer private key: {}", e)))?;
        self.deployer_address = signer.address().to_checksum(None);
        Ok(true)
    }

    /// Address behind `sender_private_key`, if one is configured.
    pub fn sender_address(&self) -> Result<Option<Address>> {
        let key = self.sender_private_key.trim();
        if key.is_empty() {
            return Ok(None);
        }

        let signer: PrivateKeySigner = key
            .parse()
            .map_err(|e| UniversityError::Config(format!("invalid sender private key: {}", e)))?;
        Ok(Some(signer.address()))
    }
}

/// JSON file backing the [`Config`] record.
///
/// Every save rewrites the whole file, so callers must hand in the complete
/// record they previously loaded.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the config file; artifact directories live beside it.
    pub fn root(&self) -> PathBuf {
        self.path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            tracing::info!("No config at {}, writing defaults", self.path.display());
            self.save(&Config::default())?;
        }

        let settings = config::Config::builder()
            .add_source(
                config::File::from(self.path.as_path())
                    .format(config::FileFormat::Json)
                    .required(true),
            )
            .build()?;
        let mut config: Config = settings.try_deserialize()?;

        if config.derive_deployer_address()? {
            tracing::info!("Derived deployer address {}", config.deployer_address);
            self.save(&config)?;
        }

        tracing::debug!("Configuration loaded from {}", self.path.display());
        tracing::debug!("  Node: {}", config.node_url);
        tracing::debug!("  Deployer: {}", config.deployer_address);

        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let root = self.root();
        if !root.as_os_str().is_empty() {
            fs::create_dir_all(&root)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
