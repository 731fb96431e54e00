use crate::config::Config;
use crate::contracts::execution::traits::{
    ChainClient, LogEntry, LogQuery, TxReceipt, TxRequest,
};
use alloy::{
    network::EthereumWallet,
    primitives::{Address, Bytes, TxHash, TxKind},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::{Filter, TransactionInput, TransactionRequest},
    signers::local::PrivateKeySigner,
};
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, error, info};

/// [`ChainClient`] backed by an alloy HTTP provider with a local wallet.
///
/// The wallet always holds the deployer key; an optional second key signs
/// ordinary writes. Transactions are signed by whichever key matches `from`.
pub struct AlloyClient {
    provider: DynProvider,
    deployer: Address,
    sender: Address,
}

impl AlloyClient {
    pub fn new(node_url: &str, deployer_key: &str, sender_key: Option<&str>) -> Result<Self> {
        info!("🔧 Initializing AlloyClient for {}", node_url);

        let deployer_signer: PrivateKeySigner = deployer_key
            .parse()
            .map_err(|e| anyhow::anyhow!("Failed to parse deployer private key: {}", e))?;
        let deployer = deployer_signer.address();
        let mut wallet = EthereumWallet::from(deployer_signer);

        let mut sender = deployer;
        if let Some(key) = sender_key.filter(|key| !key.is_empty()) {
            let signer: PrivateKeySigner = key
                .parse()
                .map_err(|e| anyhow::anyhow!("Failed to parse sender private key: {}", e))?;
            sender = signer.address();
            wallet.register_signer(signer);
        }

        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(node_url.parse()?)
            .erased();

        info!("✅ AlloyClient initialized");
        info!("  Deployer address: {:?}", deployer);
        info!("  Sender address: {:?}", sender);

        Ok(Self {
            provider,
            deployer,
            sender,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.node_url,
            &config.deployer_private_key,
            Some(config.sender_private_key.as_str()),
        )
    }

    /// Address signing contract creations and privileged calls
    pub fn deployer_address(&self) -> Address {
        self.deployer
    }

    /// Address signing ordinary writes
    pub fn sender_address(&self) -> Address {
        self.sender
    }

    fn build_transaction_request(request: TxRequest) -> TransactionRequest {
        let mut tx_request = TransactionRequest::default()
            .from(request.from)
            .input(TransactionInput::new(request.input));

        tx_request.to = Some(match request.to {
            Some(to) => TxKind::Call(to),
            None => TxKind::Create,
        });
        tx_request.gas = request.gas.gas_limit;
        tx_request.gas_price = request.gas.gas_price;

        tx_request
    }
}

#[async_trait]
impl ChainClient for AlloyClient {
    async fn get_code(&self, address: Address) -> Result<Bytes> {
        let code = self.provider.get_code_at(address).await?;
        debug!("Code at {:?}: {} bytes", address, code.len());
        Ok(code)
    }

    async fn call(&self, to: Address, from: Address, call_data: Bytes) -> Result<Bytes> {
        let call_request = TransactionRequest::default()
            .to(to)
            .from(from)
            .input(TransactionInput::new(call_data));

        let result = self.provider.call(call_request).await.map_err(|e| {
            error!("❌ Static call to {:?} failed: {}", to, e);
            anyhow::anyhow!("Static call failed: {}", e)
        })?;

        debug!("Static call returned {} bytes", result.len());
        Ok(result)
    }

    async fn send_transaction(&self, request: TxRequest) -> Result<TxHash> {
        info!("🚀 Sending transaction from {:?}", request.from);
        match request.to {
            Some(to) => info!("  To: {:?}", to),
            None => info!("  Contract creation"),
        }
        info!("  Input: {} bytes", request.input.len());

        let tx_request = Self::build_transaction_request(request);
        let pending_tx = self.provider.send_transaction(tx_request).await.map_err(|e| {
            error!("❌ Transaction submission failed: {}", e);
            anyhow::anyhow!("Failed to send transaction: {}", e)
        })?;

        let tx_hash = *pending_tx.tx_hash();
        info!("⏳ Transaction sent: {:?}", tx_hash);
        Ok(tx_hash)
    }

    async fn get_receipt(&self, tx_hash: TxHash) -> Result<Option<TxReceipt>> {
        let receipt = self.provider.get_transaction_receipt(tx_hash).await?;
        Ok(receipt.map(|receipt| TxReceipt {
            tx_hash: receipt.transaction_hash,
            success: receipt.status(),
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            contract_address: receipt.contract_address,
        }))
    }

    async fn block_number(&self) -> Result<u64> {
        Ok(self.provider.get_block_number().await?)
    }

    async fn get_logs(&self, query: LogQuery) -> Result<Vec<LogEntry>> {
        let filter = Filter::new()
            .address(query.address)
            .event_signature(query.topic0)
            .from_block(query.from_block)
            .to_block(query.to_block);

        let logs = self.provider.get_logs(&filter).await?;
        Ok(logs
            .into_iter()
            .map(|log| LogEntry {
                topics: log.topics().to_vec(),
                data: log.data().data.clone(),
                block_number: log.block_number,
            })
            .collect())
    }

    fn description(&self) -> &str {
        "AlloyClient: Uses an Alloy HTTP provider with a local signing wallet"
    }
}
