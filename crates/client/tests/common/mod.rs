#![allow(dead_code)]

use async_trait::async_trait;
use ethers::types::{Address, TransactionReceipt, H256, U256, U64};
use jsonrpsee::{
    core::RpcResult,
    server::{ServerBuilder, ServerHandle},
    types::ErrorObject,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use uobench_client::BundlerApiServer;
use uobench_primitives::{
    UserOperationGasEstimation, UserOperationHash, UserOperationReceipt, UserOperationSigned,
};

pub const CHAIN_ID: u64 = 8453;
pub const ENTRY_POINT: &str = "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789";
pub const BLOCK_NUMBER: u64 = 21_000_000;

/// JSON-RPC code bundlers use for user operations failing validation
pub const VALIDATION_ERROR_CODE: i32 = -32500;

/// In-process bundler answering `null` receipts for the first `pending_polls` polls
#[derive(Clone)]
pub struct MockBundler {
    pub pending_polls: usize,
    pub reject: bool,
    /// Hash answered to every submission instead of the user operation hash
    pub returned_hash: Option<UserOperationHash>,
    /// Receipts come without the block number of the bundle transaction
    pub missing_block_number: bool,
    pub polls: Arc<AtomicUsize>,
    pub submissions: Arc<AtomicUsize>,
}

impl MockBundler {
    pub fn new(pending_polls: usize) -> Self {
        Self {
            pending_polls,
            reject: false,
            returned_hash: None,
            missing_block_number: false,
            polls: Arc::new(AtomicUsize::new(0)),
            submissions: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn rejecting() -> Self {
        Self { reject: true, ..Self::new(0) }
    }
}

pub fn tx_hash() -> H256 {
    H256::from_low_u64_be(0xabcdef)
}

#[async_trait]
impl BundlerApiServer for MockBundler {
    async fn chain_id(&self) -> RpcResult<U64> {
        Ok(CHAIN_ID.into())
    }

    async fn supported_entry_points(&self) -> RpcResult<Vec<Address>> {
        Ok(vec![ENTRY_POINT.parse().unwrap()])
    }

    async fn send_user_operation(
        &self,
        user_operation: UserOperationSigned,
        entry_point: Address,
    ) -> RpcResult<UserOperationHash> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        if self.reject {
            return Err(ErrorObject::owned(
                VALIDATION_ERROR_CODE,
                "AA21 didn't pay prefund",
                None::<bool>,
            ));
        }
        Ok(self.returned_hash.unwrap_or_else(|| user_operation.hash(&entry_point, CHAIN_ID)))
    }

    async fn estimate_user_operation_gas(
        &self,
        _user_operation: UserOperationSigned,
        _entry_point: Address,
    ) -> RpcResult<UserOperationGasEstimation> {
        Ok(UserOperationGasEstimation {
            pre_verification_gas: 48_000.into(),
            verification_gas_limit: 90_000.into(),
            call_gas_limit: 30_000.into(),
        })
    }

    async fn get_user_operation_receipt(
        &self,
        user_operation_hash: UserOperationHash,
    ) -> RpcResult<Option<UserOperationReceipt>> {
        let polls = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
        if polls <= self.pending_polls {
            return Ok(None);
        }

        Ok(Some(UserOperationReceipt {
            user_operation_hash,
            sender: Address::zero(),
            nonce: U256::zero(),
            paymaster: None,
            actual_gas_cost: 1_000.into(),
            actual_gas_used: 100_000.into(),
            success: true,
            reason: String::new(),
            logs: vec![],
            tx_receipt: TransactionReceipt {
                transaction_hash: tx_hash(),
                block_number: (!self.missing_block_number).then(|| BLOCK_NUMBER.into()),
                ..Default::default()
            },
        }))
    }
}

/// Starts the mock bundler on a random local port and returns its URL
pub async fn start_bundler(bundler: MockBundler) -> eyre::Result<(String, ServerHandle)> {
    let server = ServerBuilder::default().build("127.0.0.1:0").await?;
    let addr = server.local_addr()?;
    let handle = server.start(bundler.into_rpc());
    Ok((format!("http://{addr}"), handle))
}
