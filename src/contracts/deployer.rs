use alloy::dyn_abi::{DynSolValue, JsonAbiExt};
use alloy::primitives::{Address, Bytes};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::{Config, ConfigStore};
use crate::contracts::abi::codec;
use crate::contracts::artifacts::ArtifactStore;
use crate::contracts::execution::{
    wait_for_receipt, ChainClient, GasParams, ReceiptPolicy, TxRequest,
};
use crate::contracts::handle::ContractHandle;
use crate::contracts::ContractType;
use crate::error::{Result, UniversityError};

type ResolveFuture<'a> = Pin<Box<dyn Future<Output = Result<ContractHandle>> + Send + 'a>>;

/// Finds deployed contracts and deploys missing ones in dependency order.
///
/// Holds the config record for the lifetime of the process; every new
/// deployment is written back to the config file before it is handed out.
pub struct ContractResolver {
    client: Arc<dyn ChainClient>,
    store: ConfigStore,
    artifacts: ArtifactStore,
    config: RwLock<Config>,
    deployer: Address,
    sender: Address,
}

impl ContractResolver {
    pub fn new(
        client: Arc<dyn ChainClient>,
        store: ConfigStore,
        artifacts: ArtifactStore,
        config: Config,
    ) -> Result<Self> {
        let deployer = parse_address(&config.deployer_address).ok_or_else(|| {
            UniversityError::Config(format!(
                "invalid deployer address {:?}",
                config.deployer_address
            ))
        })?;
        let sender = config.sender_address()?.unwrap_or(deployer);

        info!("🏗️ Creating ContractResolver");
        info!("  Client: {}", client.description());
        info!("  Deployer: {:?}", deployer);
        info!("  Sender: {:?}", sender);

        Ok(Self {
            client,
            store,
            artifacts,
            config: RwLock::new(config),
            deployer,
            sender,
        })
    }

    /// Loads the config beside the artifact directories and builds a resolver.
    pub fn open(client: Arc<dyn ChainClient>, store: ConfigStore) -> Result<Self> {
        let config = store.load()?;
        let artifacts = ArtifactStore::new(store.root())?;
        Self::new(client, store, artifacts, config)
    }

    pub fn deployer_address(&self) -> Address {
        self.deployer
    }

    /// Account for ordinary writes: the configured sender, else the deployer.
    pub fn sender_address(&self) -> Address {
        self.sender
    }

    pub fn client(&self) -> &Arc<dyn ChainClient> {
        &self.client
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }

    /// Replaces the in-memory record with the file's current contents.
    pub async fn reload_config(&self) -> Result<()> {
        let fresh = self.store.load()?;
        *self.config.write().await = fresh;
        Ok(())
    }

    async fn receipt_policy(&self) -> ReceiptPolicy {
        ReceiptPolicy::from_config(&*self.config.read().await)
    }

    async fn configured_address(&self, contract: ContractType) -> Option<Address> {
        let config = self.config.read().await;
        parse_address(config.contracts.get(contract))
    }

    async fn has_code(&self, address: Address) -> bool {
        match self.client.get_code(address).await {
            Ok(code) => !code.is_empty(),
            Err(e) => {
                warn!("⚠️ Code probe at {:?} failed, treating as undeployed: {}", address, e);
                false
            }
        }
    }

    /// True when the configured address exists and carries code on-chain.
    pub async fn is_deployed(&self, contract: ContractType) -> bool {
        match self.configured_address(contract).await {
            Some(address) => self.has_code(address).await,
            None => false,
        }
    }

    /// Handle for the configured address without deploying anything.
    pub async fn lookup(&self, contract: ContractType) -> Result<ContractHandle> {
        let address = self
            .configured_address(contract)
            .await
            .ok_or(UniversityError::ConfigMissing(contract))?;
        self.bind(contract, address).await
    }

    async fn bind(&self, contract: ContractType, address: Address) -> Result<ContractHandle> {
        let abi = self.artifacts.load_abi(contract)?;
        let receipts = self.receipt_policy().await;
        Ok(ContractHandle::new(
            contract,
            address,
            abi,
            self.client.clone(),
            receipts,
        ))
    }

    /// Handle for `contract`, deploying it and any missing dependencies first.
    pub fn ensure_deployed(&self, contract: ContractType) -> ResolveFuture<'_> {
        Box::pin(async move {
            if let Some(address) = self.configured_address(contract).await {
                if self.has_code(address).await {
                    return self.bind(contract, address).await;
                }
                warn!("⚠️ {} at {:?} has no code, redeploying", contract, address);
            }

            let mut constructor_args = Vec::with_capacity(contract.dependencies().len());
            for dependency in contract.dependencies() {
                let handle = self.ensure_deployed(*dependency).await?;
                constructor_args.push(codec::address(handle.address()));
            }

            self.deploy(contract, &constructor_args).await
        })
    }

    /// Deploys a fresh instance and records its address in the config file.
    pub async fn deploy(
        &self,
        contract: ContractType,
        constructor_args: &[DynSolValue],
    ) -> Result<ContractHandle> {
        let (abi, bytecode) = self.artifacts.load(contract)?;
        let deployment_failed = |reason: String| UniversityError::Deployment { contract, reason };

        let mut init_code = bytecode.to_vec();
        match &abi.constructor {
            Some(constructor) => {
                if constructor.inputs.len() != constructor_args.len() {
                    return Err(deployment_failed(format!(
                        "constructor takes {} argument(s), got {}",
                        constructor.inputs.len(),
                        constructor_args.len()
                    )));
                }
                let encoded = constructor
                    .abi_encode_input(constructor_args)
                    .map_err(|e| deployment_failed(format!("constructor encoding failed: {}", e)))?;
                init_code.extend_from_slice(&encoded);
            }
            None if !constructor_args.is_empty() => {
                return Err(deployment_failed(format!(
                    "no constructor declared but {} argument(s) given",
                    constructor_args.len()
                )));
            }
            None => {}
        }

        info!("🚀 Deploying {} ({} bytes of init code)", contract, init_code.len());
        let request = TxRequest {
            from: self.deployer,
            to: None,
            input: Bytes::from(init_code),
            gas: GasParams::default(),
        };
        let tx_hash = self
            .client
            .send_transaction(request)
            .await
            .map_err(|e| deployment_failed(format!("submission failed: {}", e)))?;

        let policy = self.receipt_policy().await;
        let receipt = wait_for_receipt(self.client.as_ref(), tx_hash, policy)
            .await
            .map_err(|e| deployment_failed(format!("receipt lookup failed: {}", e)))?
            .ok_or_else(|| deployment_failed(format!("not mined within {:?}", policy.timeout)))?;

        if !receipt.success {
            return Err(deployment_failed(format!("creation tx {:?} reverted", tx_hash)));
        }
        let address = receipt
            .contract_address
            .ok_or_else(|| deployment_failed("receipt has no contract address".to_string()))?;

        info!("✅ {} deployed at {:?}", contract, address);
        self.record_address(contract, address).await?;

        Ok(ContractHandle::new(
            contract,
            address,
            abi,
            self.client.clone(),
            policy,
        ))
    }

    async fn record_address(&self, contract: ContractType, address: Address) -> Result<()> {
        let mut config = self.config.write().await;
        let mut updated = config.clone();
        updated.contracts.set(contract, address.to_checksum(None));
        self.store.save(&updated)?;
        *config = updated;
        Ok(())
    }

    /// Code check for every contract that has a configured address.
    pub async fn verify_all(&self) -> BTreeMap<ContractType, bool> {
        let mut results = BTreeMap::new();
        for contract in ContractType::ALL {
            let configured = {
                let config = self.config.read().await;
                !config.contracts.get(contract).is_empty()
            };
            if configured {
                results.insert(contract, self.is_deployed(contract).await);
            }
        }
        results
    }
}

fn parse_address(raw: &str) -> Option<Address> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Address::from_str(trimmed).ok()
}
