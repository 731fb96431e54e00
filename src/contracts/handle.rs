use alloy::dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy::json_abi::JsonAbi;
use alloy::primitives::{Address, Bytes};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

use crate::contracts::abi::codec::find_function;
use crate::contracts::execution::{wait_for_receipt, ChainClient, ReceiptPolicy, TxRequest};
use crate::contracts::ContractType;
use crate::error::{Result, UniversityError};
use crate::models::{TxOptions, TxOutcome};

/// A deployed contract bound to its ABI.
///
/// The handle does not own any chain state; every method is a round trip to
/// the node through the shared [`ChainClient`].
#[derive(Clone)]
pub struct ContractHandle {
    contract: ContractType,
    address: Address,
    abi: Arc<JsonAbi>,
    client: Arc<dyn ChainClient>,
    receipts: ReceiptPolicy,
}

impl fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractHandle")
            .field("contract", &self.contract)
            .field("address", &self.address)
            .finish()
    }
}

impl ContractHandle {
    pub fn new(
        contract: ContractType,
        address: Address,
        abi: JsonAbi,
        client: Arc<dyn ChainClient>,
        receipts: ReceiptPolicy,
    ) -> Self {
        Self {
            contract,
            address,
            abi: Arc::new(abi),
            client,
            receipts,
        }
    }

    pub fn contract(&self) -> ContractType {
        self.contract
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    pub fn client(&self) -> &Arc<dyn ChainClient> {
        &self.client
    }

    /// Selector-prefixed call data for `name(args...)`.
    fn encode_call(&self, name: &str, args: &[DynSolValue]) -> Result<Bytes> {
        let function = find_function(&self.abi, name, args.len())?;
        let data = function
            .abi_encode_input(args)
            .map_err(|e| UniversityError::Abi(format!("failed to encode {}: {}", name, e)))?;
        Ok(Bytes::from(data))
    }

    /// Read-only call; returns the decoded output tuple in declaration order.
    pub async fn call(
        &self,
        name: &str,
        args: &[DynSolValue],
        from: Address,
    ) -> Result<Vec<DynSolValue>> {
        let function = find_function(&self.abi, name, args.len())?;
        let call_data = self.encode_call(name, args)?;

        let output = self
            .client
            .call(self.address, from, call_data)
            .await
            .map_err(|e| UniversityError::Read {
                function: name.to_string(),
                reason: e.to_string(),
            })?;

        function
            .abi_decode_output(&output)
            .map_err(|e| UniversityError::Read {
                function: name.to_string(),
                reason: format!("undecodable output: {}", e),
            })
    }

    /// State-changing call signed by `from`.
    pub async fn transact(
        &self,
        name: &str,
        args: &[DynSolValue],
        from: Address,
        options: &TxOptions,
    ) -> Result<TxOutcome> {
        let input = self.encode_call(name, args)?;
        let request = TxRequest {
            from,
            to: Some(self.address),
            input,
            gas: options.gas(),
        };

        info!("📝 {}.{} from {:?}", self.contract, name, from);
        let tx_hash = self
            .client
            .send_transaction(request)
            .await
            .map_err(|e| UniversityError::Rpc(format!("{} submission failed: {}", name, e)))?;

        if !options.wait_for_receipt {
            return Ok(TxOutcome::Submitted(tx_hash));
        }

        let receipt = wait_for_receipt(self.client.as_ref(), tx_hash, self.receipts)
            .await
            .map_err(|e| UniversityError::TransactionFailure {
                tx_hash: tx_hash.to_string(),
                reason: format!("receipt lookup failed: {}", e),
            })?
            .ok_or_else(|| UniversityError::TransactionFailure {
                tx_hash: tx_hash.to_string(),
                reason: format!("not mined within {:?}", self.receipts.timeout),
            })?;

        if !receipt.success {
            error!("❌ {}.{} reverted in tx {:?}", self.contract, name, tx_hash);
            return Err(UniversityError::TransactionFailure {
                tx_hash: tx_hash.to_string(),
                reason: "receipt status indicates revert".to_string(),
            });
        }

        info!("✅ {}.{} confirmed in block {:?}", self.contract, name, receipt.block_number);
        Ok(TxOutcome::Confirmed(receipt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::abi::codec::{string, uint};
    use crate::contracts::execution::mock::MockChain;
    use crate::test_support::{quick_receipts, university_abi};

    fn handle(chain: Arc<MockChain>) -> ContractHandle {
        ContractHandle::new(
            ContractType::University,
            Address::repeat_byte(0x42),
            university_abi(),
            chain,
            quick_receipts(),
        )
    }

    #[test]
    fn test_encode_call_uses_declared_selector() {
        let handle = handle(Arc::new(MockChain::new()));
        let data = handle.encode_call("deleteStudent", &[uint(7)]).unwrap();

        let function = &handle.abi().function("deleteStudent").unwrap()[0];
        assert_eq!(&data[..4], function.selector().as_slice());
        assert_eq!(data.len(), 4 + 32);
    }

    #[test]
    fn test_encode_call_rejects_type_mismatch() {
        let handle = handle(Arc::new(MockChain::new()));
        let err = handle.encode_call("deleteStudent", &[string("seven")]).unwrap_err();
        assert!(matches!(err, UniversityError::Abi(_)));
    }

    #[tokio::test]
    async fn test_call_failure_is_read_error() {
        let chain = Arc::new(MockChain::new());
        let handle = handle(chain);

        let err = handle
            .call("getProfessor", &[uint(1)], Address::ZERO)
            .await
            .unwrap_err();
        match err {
            UniversityError::Read { function, .. } => assert_eq!(function, "getProfessor"),
            other => panic!("expected Read, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transact_without_wait_returns_hash() {
        let chain = Arc::new(MockChain::new());
        chain.withhold_receipts();
        let handle = handle(chain.clone());

        let outcome = handle
            .transact("deleteCourse", &[uint(3)], Address::repeat_byte(1), &TxOptions::no_wait())
            .await
            .unwrap();
        assert!(matches!(outcome, TxOutcome::Submitted(_)));
        assert_eq!(chain.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_transact_times_out_as_failure() {
        let chain = Arc::new(MockChain::new());
        chain.withhold_receipts();
        let handle = handle(chain);

        let err = handle
            .transact("deleteCourse", &[uint(3)], Address::repeat_byte(1), &TxOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, UniversityError::TransactionFailure { .. }));
    }
}
