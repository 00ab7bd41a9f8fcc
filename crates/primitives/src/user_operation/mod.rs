//! Basic transaction type for account abstraction (ERC-4337)

mod hash;

use crate::utils::as_checksum_addr;
use ethers::{
    abi::AbiEncode,
    contract::{EthAbiCodec, EthAbiType},
    types::{Address, Bytes, Log, TransactionReceipt, H256, U256, U64},
    utils::keccak256,
};
pub use hash::UserOperationHash;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// User operation (entry point v0.6 layout)
#[derive(
    Default, Clone, Debug, PartialEq, Eq, EthAbiCodec, EthAbiType, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationSigned {
    /// Sender of the user operation
    #[serde(serialize_with = "as_checksum_addr")]
    pub sender: Address,

    /// Nonce (anti replay protection)
    pub nonce: U256,

    /// Init code for the account (needed if account not yet deployed and needs to be created)
    pub init_code: Bytes,

    /// The data that is passed to the sender during the main execution call
    pub call_data: Bytes,

    /// The amount of gas to allocate for the main execution call
    pub call_gas_limit: U256,

    /// The amount of gas to allocate for the verification step
    pub verification_gas_limit: U256,

    /// The amount of gas to pay bundler to compensate for the pre-verification execution and
    /// calldata
    pub pre_verification_gas: U256,

    /// Maximum fee per gas (similar to EIP-1559)
    pub max_fee_per_gas: U256,

    /// Maximum priority fee per gas (similar to EIP-1559)
    pub max_priority_fee_per_gas: U256,

    /// Address of paymaster sponsoring the user operation, followed by extra data to send to the
    /// paymaster (can be empty)
    pub paymaster_and_data: Bytes,

    /// Data passed to the account along with the nonce during the verification step
    pub signature: Bytes,
}

/// User operation without signature (helper for packing user operation)
#[derive(EthAbiCodec, EthAbiType)]
struct UserOperationNoSignature {
    pub sender: Address,
    pub nonce: U256,
    pub init_code: H256,
    pub call_data: H256,
    pub call_gas_limit: U256,
    pub verification_gas_limit: U256,
    pub pre_verification_gas: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    pub paymaster_and_data: H256,
}

impl From<UserOperationSigned> for UserOperationNoSignature {
    fn from(value: UserOperationSigned) -> Self {
        Self {
            sender: value.sender,
            nonce: value.nonce,
            init_code: keccak256(value.init_code.deref()).into(),
            call_data: keccak256(value.call_data.deref()).into(),
            call_gas_limit: value.call_gas_limit,
            verification_gas_limit: value.verification_gas_limit,
            pre_verification_gas: value.pre_verification_gas,
            max_fee_per_gas: value.max_fee_per_gas,
            max_priority_fee_per_gas: value.max_priority_fee_per_gas,
            paymaster_and_data: keccak256(value.paymaster_and_data.deref()).into(),
        }
    }
}

impl UserOperationSigned {
    /// Packs the user operation into bytes
    pub fn pack(&self) -> Bytes {
        self.clone().encode().into()
    }

    /// Packs the user operation without signature to bytes (used for calculating the hash)
    pub fn pack_without_signature(&self) -> Bytes {
        let user_operation_packed = UserOperationNoSignature::from(self.clone());
        user_operation_packed.encode().into()
    }

    /// Calculates the hash of the user operation
    pub fn hash(&self, entry_point: &Address, chain_id: u64) -> UserOperationHash {
        H256::from_slice(
            keccak256(
                [
                    keccak256(self.pack_without_signature().deref()).to_vec(),
                    entry_point.encode(),
                    U256::from(chain_id).encode(),
                ]
                .concat(),
            )
            .as_slice(),
        )
        .into()
    }

    /// Applies the gas limits estimated by a bundler
    pub fn with_gas_estimation(self, estimation: &UserOperationGasEstimation) -> Self {
        self.call_gas_limit(estimation.call_gas_limit)
            .verification_gas_limit(estimation.verification_gas_limit)
            .pre_verification_gas(estimation.pre_verification_gas)
    }

    // Builder pattern helpers

    /// Sets the sender of the user operation
    pub fn sender(mut self, sender: Address) -> Self {
        self.sender = sender;
        self
    }

    /// Sets the nonce of the user operation
    pub fn nonce(mut self, nonce: U256) -> Self {
        self.nonce = nonce;
        self
    }

    /// Sets the init code of the user operation
    pub fn init_code(mut self, init_code: Bytes) -> Self {
        self.init_code = init_code;
        self
    }

    /// Sets the call data of the user operation
    pub fn call_data(mut self, call_data: Bytes) -> Self {
        self.call_data = call_data;
        self
    }

    /// Sets the call gas limit of the user operation
    pub fn call_gas_limit(mut self, call_gas_limit: U256) -> Self {
        self.call_gas_limit = call_gas_limit;
        self
    }

    /// Sets the verification gas limit of the user operation
    pub fn verification_gas_limit(mut self, verification_gas_limit: U256) -> Self {
        self.verification_gas_limit = verification_gas_limit;
        self
    }

    /// Sets the pre-verification gas of the user operation
    pub fn pre_verification_gas(mut self, pre_verification_gas: U256) -> Self {
        self.pre_verification_gas = pre_verification_gas;
        self
    }

    /// Sets the max fee per gas of the user operation
    pub fn max_fee_per_gas(mut self, max_fee_per_gas: U256) -> Self {
        self.max_fee_per_gas = max_fee_per_gas;
        self
    }

    /// Sets the max priority fee per gas of the user operation
    pub fn max_priority_fee_per_gas(mut self, max_priority_fee_per_gas: U256) -> Self {
        self.max_priority_fee_per_gas = max_priority_fee_per_gas;
        self
    }

    /// Sets the signature of the user operation
    pub fn signature(mut self, signature: Bytes) -> Self {
        self.signature = signature;
        self
    }
}

/// Receipt of the user operation (returned from the RPC endpoint eth_getUserOperationReceipt)
///
/// Fields that not every bundler returns are optional.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationReceipt {
    #[serde(rename = "userOpHash")]
    pub user_operation_hash: UserOperationHash,
    #[serde(serialize_with = "as_checksum_addr")]
    pub sender: Address,
    pub nonce: U256,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster: Option<Address>,
    pub actual_gas_cost: U256,
    pub actual_gas_used: U256,
    pub success: bool,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub logs: Vec<Log>,
    #[serde(rename = "receipt")]
    pub tx_receipt: TransactionReceipt,
}

impl UserOperationReceipt {
    /// Hash of the transaction that included the user operation
    pub fn transaction_hash(&self) -> H256 {
        self.tx_receipt.transaction_hash
    }

    /// Number of the block that included the user operation
    pub fn block_number(&self) -> Option<U64> {
        self.tx_receipt.block_number
    }
}

/// Gas estimations for user operation (returned from the RPC endpoint eth_estimateUserOperationGas)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationGasEstimation {
    pub pre_verification_gas: U256,
    pub verification_gas_limit: U256,
    pub call_gas_limit: U256,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_operation_signed_pack_without_signature() {
        let uo = UserOperationSigned {
            sender: "0x9c5754De1443984659E1b3a8d1931D83475ba29C".parse().unwrap(),
            nonce: 1.into(),
            init_code: Bytes::default(),
            call_data: "0xb61d27f60000000000000000000000009c5754de1443984659e1b3a8d1931d83475ba29c00000000000000000000000000000000000000000000000000005af3107a400000000000000000000000000000000000000000000000000000000000000000600000000000000000000000000000000000000000000000000000000000000000".parse().unwrap(),
            call_gas_limit: 33_100.into(),
            verification_gas_limit: 60_624.into(),
            pre_verification_gas: 44_056.into(),
            max_fee_per_gas: 1_695_000_030_u64.into(),
            max_priority_fee_per_gas: 1_695_000_000.into(),
            paymaster_and_data: Bytes::default(),
            signature: "0x37540ca4f91a9f08993ba4ebd4b7473902f69864c98951f9db8cb47b78764c1a13ad46894a96dc0cad68f9207e49b4dbb897f25f47f040cec2a636a8201c1cd71b".parse().unwrap(),
        };
        assert_eq!(uo.pack_without_signature(), "0x0000000000000000000000009c5754de1443984659e1b3a8d1931d83475ba29c0000000000000000000000000000000000000000000000000000000000000001c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470f7def7aeb687d6992b466243b713223689982cefca0f91a1f5c5f60adb532b93000000000000000000000000000000000000000000000000000000000000814c000000000000000000000000000000000000000000000000000000000000ecd0000000000000000000000000000000000000000000000000000000000000ac18000000000000000000000000000000000000000000000000000000006507a5de000000000000000000000000000000000000000000000000000000006507a5c0c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470".parse::<Bytes>().unwrap());
    }

    #[test]
    fn user_operation_signed_hash() {
        let entry_point = "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789".parse().unwrap();

        let uo = UserOperationSigned::default()
            .verification_gas_limit(100_000.into())
            .pre_verification_gas(21_000.into())
            .max_priority_fee_per_gas(1_000_000_000.into());
        assert_eq!(
            uo.hash(&entry_point, 80_001),
            "0x95418c07086df02ff6bc9e8bdc150b380cb761beecc098630440bcec6e862702".parse().unwrap()
        );

        let uo = UserOperationSigned {
            sender: "0x9c5754De1443984659E1b3a8d1931D83475ba29C".parse().unwrap(),
            nonce: U256::zero(),
            init_code: "0x9406cc6185a346906296840746125a0e449764545fbfb9cf000000000000000000000000ce0fefa6f7979c4c9b5373e0f5105b7259092c6d0000000000000000000000000000000000000000000000000000000000000000".parse().unwrap(),
            call_data: "0xb61d27f60000000000000000000000009c5754de1443984659e1b3a8d1931d83475ba29c00000000000000000000000000000000000000000000000000005af3107a400000000000000000000000000000000000000000000000000000000000000000600000000000000000000000000000000000000000000000000000000000000000".parse().unwrap(),
            call_gas_limit: 33_100.into(),
            verification_gas_limit: 361_460.into(),
            pre_verification_gas: 44_980.into(),
            max_fee_per_gas: 1_695_000_030_u64.into(),
            max_priority_fee_per_gas: 1_695_000_000.into(),
            paymaster_and_data: Bytes::default(),
            signature: "0xebfd4657afe1f1c05c1ec65f3f9cc992a3ac083c424454ba61eab93152195e1400d74df01fc9fa53caadcb83a891d478b713016bcc0c64307c1ad3d7ea2e2d921b".parse().unwrap(),
        };
        assert_eq!(
            uo.hash(&entry_point, 80_001),
            "0x7c1b8c9df49a9e09ecef0f0fe6841d895850d29820f9a4b494097764085dcd7e".parse().unwrap()
        );
    }

    #[test]
    fn pack_includes_signature() {
        let uo = UserOperationSigned::default().signature(vec![0xab; 65].into());
        let packed = uo.pack();
        assert!(packed.len() > uo.pack_without_signature().len());
        assert!(packed.windows(65).any(|w| w == [0xab; 65].as_slice()));
    }

    #[test]
    fn gas_estimation_is_applied() {
        let estimation = UserOperationGasEstimation {
            pre_verification_gas: 48_000.into(),
            verification_gas_limit: 90_000.into(),
            call_gas_limit: 30_000.into(),
        };
        let uo = UserOperationSigned::default()
            .max_fee_per_gas(7.into())
            .with_gas_estimation(&estimation);
        assert_eq!(uo.pre_verification_gas, 48_000.into());
        assert_eq!(uo.verification_gas_limit, 90_000.into());
        assert_eq!(uo.call_gas_limit, 30_000.into());
        assert_eq!(uo.max_fee_per_gas, 7.into());
    }

    #[test]
    fn user_operation_serializes_camel_case() {
        let uo = UserOperationSigned::default()
            .sender("0x9c5754de1443984659e1b3a8d1931d83475ba29c".parse().unwrap());
        let value = serde_json::to_value(&uo).unwrap();
        assert_eq!(value["sender"], "0x9c5754De1443984659E1b3a8d1931D83475ba29C");
        assert!(value.get("callGasLimit").is_some());
        assert!(value.get("paymasterAndData").is_some());
    }

    #[test]
    fn receipt_without_optional_fields() {
        let receipt = json!({
            "userOpHash": "0x7c1b8c9df49a9e09ecef0f0fe6841d895850d29820f9a4b494097764085dcd7e",
            "sender": "0x9c5754De1443984659E1b3a8d1931D83475ba29C",
            "nonce": "0x3",
            "actualGasCost": "0x1f4",
            "actualGasUsed": "0x186a0",
            "success": true,
            "receipt": {
                "transactionHash": "0x4f6a2c5d2a1ef36a0a6a8a4a5f0c6b7c0f9b7a3e9d1c2b3a4f5e6d7c8b9a0f1e",
                "transactionIndex": "0x1",
                "blockHash": "0x1b9c51a1a6b5f2c6e6d1d8c8b7a6f5e4d3c2b1a09f8e7d6c5b4a39281706f5e4",
                "blockNumber": "0x1406f40",
                "from": "0x4337001fff419768e088ce247456c1b892888084",
                "to": "0x5ff137d4b0fdcd49dca30c7cf57e578a026d2789",
                "cumulativeGasUsed": "0x5208",
                "gasUsed": "0x5208",
                "logs": [],
                "logsBloom": format!("0x{}", "0".repeat(512)),
                "status": "0x1"
            }
        });

        let receipt: UserOperationReceipt = serde_json::from_value(receipt).unwrap();
        assert!(receipt.success);
        assert!(receipt.paymaster.is_none());
        assert!(receipt.reason.is_empty());
        assert_eq!(receipt.block_number(), Some(U64::from(0x1406f40)));
        assert_eq!(
            receipt.transaction_hash(),
            "0x4f6a2c5d2a1ef36a0a6a8a4a5f0c6b7c0f9b7a3e9d1c2b3a4f5e6d7c8b9a0f1e".parse().unwrap()
        );
    }
}
