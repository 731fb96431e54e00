use alloy::json_abi::JsonAbi;
use alloy::primitives::Bytes;
use std::fs;
use std::path::{Path, PathBuf};

use crate::contracts::ContractType;
use crate::error::{Result, UniversityError};

pub const ABI_DIR: &str = "abi";
pub const BIN_DIR: &str = "bin";

/// Compiled contract artifacts laid out as `abi/<Name>.abi` and `bin/<Name>.bin`.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    abi_dir: PathBuf,
    bin_dir: PathBuf,
}

impl ArtifactStore {
    /// Opens the artifact directories under `root`, creating them if missing.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let abi_dir = root.join(ABI_DIR);
        let bin_dir = root.join(BIN_DIR);
        fs::create_dir_all(&abi_dir)?;
        fs::create_dir_all(&bin_dir)?;
        Ok(Self { abi_dir, bin_dir })
    }

    pub fn abi_path(&self, contract: ContractType) -> PathBuf {
        self.abi_dir.join(contract.abi_filename())
    }

    pub fn bin_path(&self, contract: ContractType) -> PathBuf {
        self.bin_dir.join(contract.bin_filename())
    }

    pub fn load_abi(&self, contract: ContractType) -> Result<JsonAbi> {
        let path = self.abi_path(contract);
        let raw = read_artifact(&path)?;
        serde_json::from_str(&raw).map_err(|e| {
            UniversityError::Abi(format!("invalid ABI in {}: {}", path.display(), e))
        })
    }

    pub fn load_bytecode(&self, contract: ContractType) -> Result<Bytes> {
        let path = self.bin_path(contract);
        let raw = read_artifact(&path)?;
        let trimmed = raw.trim();
        let hex_str = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let code = hex::decode(hex_str).map_err(|e| {
            UniversityError::Abi(format!("invalid bytecode in {}: {}", path.display(), e))
        })?;
        if code.is_empty() {
            return Err(UniversityError::Abi(format!("empty bytecode in {}", path.display())));
        }
        Ok(Bytes::from(code))
    }

    /// ABI and creation bytecode for `contract`; fails if either file is missing.
    pub fn load(&self, contract: ContractType) -> Result<(JsonAbi, Bytes)> {
        let abi = self.load_abi(contract)?;
        let bytecode = self.load_bytecode(contract)?;
        Ok((abi, bytecode))
    }
}

fn read_artifact(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(UniversityError::ArtifactNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        ArtifactStore::new(dir.path()).unwrap();
        assert!(dir.path().join(ABI_DIR).is_dir());
        assert!(dir.path().join(BIN_DIR).is_dir());
    }

    #[test]
    fn test_missing_bytecode_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();
        fs::write(store.abi_path(ContractType::Student), "[]").unwrap();

        let err = store.load(ContractType::Student).unwrap_err();
        match err {
            UniversityError::ArtifactNotFound { path } => {
                assert_eq!(path, store.bin_path(ContractType::Student));
            }
            other => panic!("expected ArtifactNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_trims_prefix_and_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();
        fs::write(store.abi_path(ContractType::Professor), "[]").unwrap();
        fs::write(store.bin_path(ContractType::Professor), "0x6080604052\n").unwrap();

        let (abi, code) = store.load(ContractType::Professor).unwrap();
        assert!(abi.constructor.is_none());
        assert_eq!(code.as_ref(), &[0x60, 0x80, 0x60, 0x40, 0x52]);
    }

    #[test]
    fn test_malformed_bytecode_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();
        fs::write(store.bin_path(ContractType::Course), "zz").unwrap();

        assert!(matches!(
            store.load_bytecode(ContractType::Course),
            Err(UniversityError::Abi(_))
        ));
    }
}
