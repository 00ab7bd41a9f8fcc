//! JSON-RPC client of an ERC-4337 bundler (`eth` namespace)

use crate::error::BundlerError;
use ethers::types::{Address, U64};
use jsonrpsee::{
    core::RpcResult,
    http_client::{HttpClient, HttpClientBuilder},
    proc_macros::rpc,
};
use std::time::Duration;
use tracing::trace;
use uobench_primitives::{
    UserOperationGasEstimation, UserOperationHash, UserOperationReceipt, UserOperationSigned,
};

/// The ERC-4337 `eth` namespace RPC methods used by the benchmark
#[rpc(client, server, namespace = "eth")]
pub trait BundlerApi {
    /// Retrieve the current [EIP-155](https://eips.ethereum.org/EIPS/eip-155) chain ID.
    #[method(name = "chainId")]
    async fn chain_id(&self) -> RpcResult<U64>;

    /// Get the supported entry points.
    #[method(name = "supportedEntryPoints")]
    async fn supported_entry_points(&self) -> RpcResult<Vec<Address>>;

    /// Send a signed user operation. Returns once the bundler accepted it.
    #[method(name = "sendUserOperation")]
    async fn send_user_operation(
        &self,
        user_operation: UserOperationSigned,
        entry_point: Address,
    ) -> RpcResult<UserOperationHash>;

    /// Estimate the gas limits of a user operation (signed with a dummy signature).
    #[method(name = "estimateUserOperationGas")]
    async fn estimate_user_operation_gas(
        &self,
        user_operation: UserOperationSigned,
        entry_point: Address,
    ) -> RpcResult<UserOperationGasEstimation>;

    /// Retrieve the receipt of a user operation, `None` while it is not included.
    #[method(name = "getUserOperationReceipt")]
    async fn get_user_operation_receipt(
        &self,
        user_operation_hash: UserOperationHash,
    ) -> RpcResult<Option<UserOperationReceipt>>;
}

/// HTTP client of a single bundler endpoint
#[derive(Clone)]
pub struct BundlerClient {
    name: String,
    client: HttpClient,
    poll_interval: Duration,
}

impl BundlerClient {
    pub fn new(
        name: impl Into<String>,
        url: &str,
        poll_interval: Duration,
    ) -> Result<Self, BundlerError> {
        let client = HttpClientBuilder::default().build(url)?;
        Ok(Self { name: name.into(), client, poll_interval })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub async fn chain_id(&self) -> Result<u64, BundlerError> {
        Ok(BundlerApiClient::chain_id(&self.client).await?.as_u64())
    }

    pub async fn supported_entry_points(&self) -> Result<Vec<Address>, BundlerError> {
        Ok(BundlerApiClient::supported_entry_points(&self.client).await?)
    }

    /// Checks that the bundler serves the expected chain and supports the entry point
    pub async fn check(&self, chain_id: u64, entry_point: Address) -> Result<(), BundlerError> {
        let bundler = self.chain_id().await?;
        if bundler != chain_id {
            return Err(BundlerError::ChainMismatch { bundler, expected: chain_id });
        }

        let supported = self.supported_entry_points().await?;
        if !supported.contains(&entry_point) {
            return Err(BundlerError::UnsupportedEntryPoint { entry_point, supported });
        }

        Ok(())
    }

    pub async fn send_user_operation(
        &self,
        uo: &UserOperationSigned,
        entry_point: Address,
    ) -> Result<UserOperationHash, BundlerError> {
        Ok(BundlerApiClient::send_user_operation(&self.client, uo.clone(), entry_point).await?)
    }

    pub async fn estimate_user_operation_gas(
        &self,
        uo: &UserOperationSigned,
        entry_point: Address,
    ) -> Result<UserOperationGasEstimation, BundlerError> {
        Ok(BundlerApiClient::estimate_user_operation_gas(&self.client, uo.clone(), entry_point)
            .await?)
    }

    pub async fn get_user_operation_receipt(
        &self,
        hash: &UserOperationHash,
    ) -> Result<Option<UserOperationReceipt>, BundlerError> {
        Ok(BundlerApiClient::get_user_operation_receipt(&self.client, *hash).await?)
    }

    /// Polls `eth_getUserOperationReceipt` every `poll_interval` until the receipt exists.
    ///
    /// There is no timeout, an operation that is never included keeps this future pending.
    pub async fn wait_for_receipt(
        &self,
        hash: &UserOperationHash,
    ) -> Result<UserOperationReceipt, BundlerError> {
        let mut polls = 0usize;
        loop {
            polls += 1;
            if let Some(receipt) = self.get_user_operation_receipt(hash).await? {
                trace!(bundler = %self.name, %hash, polls, "User operation receipt received");
                return Ok(receipt);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
