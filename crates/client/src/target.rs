//! A bundler endpoint plugged into the latency harness

use crate::{account::SmartAccount, bundler::BundlerClient};
use async_trait::async_trait;
use ethers::{
    prelude::rand::{self, Rng},
    providers::Middleware,
    types::{Bytes, U256},
};
use eyre::WrapErr;
use std::sync::Arc;
use tracing::{debug, warn};
use uobench_harness::{Inclusion, Operation};
use uobench_primitives::{
    constants::benchmark::MAX_TRANSFER_VALUE, provider::block_timestamp_ms, UserOperationHash,
    UserOperationSigned,
};

/// Signed user operation ready to be sent
#[derive(Clone, Debug)]
pub struct PreparedUserOperation {
    pub user_operation: UserOperationSigned,
    pub hash: UserOperationHash,
}

/// Sends self-transfers of a random value from the smart account through one bundler
pub struct BundlerTarget<M: Middleware + 'static> {
    account: Arc<SmartAccount<M>>,
    bundler: BundlerClient,
    max_priority_fee_per_gas: U256,
}

impl<M: Middleware + 'static> BundlerTarget<M> {
    pub fn new(
        account: Arc<SmartAccount<M>>,
        bundler: BundlerClient,
        max_priority_fee_per_gas: U256,
    ) -> Self {
        Self { account, bundler, max_priority_fee_per_gas }
    }

    pub fn bundler(&self) -> &BundlerClient {
        &self.bundler
    }

    /// Fees of the next user operation: the node's max fee estimation with the priority fee
    /// replaced by the configured one
    async fn fees(&self) -> eyre::Result<(U256, U256)> {
        let (max_fee_per_gas, _) = self
            .account
            .eth_client()
            .estimate_eip1559_fees(None)
            .await
            .map_err(|err| eyre::eyre!("failed to estimate fees: {err}"))?;
        Ok(override_priority_fee(max_fee_per_gas, self.max_priority_fee_per_gas))
    }
}

/// Keeps `max_fee_per_gas >= max_priority_fee_per_gas`
fn override_priority_fee(max_fee_per_gas: U256, max_priority_fee_per_gas: U256) -> (U256, U256) {
    (max_fee_per_gas.max(max_priority_fee_per_gas), max_priority_fee_per_gas)
}

#[async_trait]
impl<M: Middleware + 'static> Operation for BundlerTarget<M> {
    type Request = PreparedUserOperation;
    type Handle = UserOperationHash;
    type Confirmation = String;

    async fn prepare(&self, index: usize) -> eyre::Result<PreparedUserOperation> {
        let value = U256::from(rand::thread_rng().gen_range(0..MAX_TRANSFER_VALUE));
        let sender = self.account.address();
        let entry_point = self.account.entry_point();

        let nonce = self.account.nonce().await.wrap_err("failed to fetch nonce")?;
        let init_code = self.account.init_code().await?;
        let (max_fee_per_gas, max_priority_fee_per_gas) = self.fees().await?;

        let uo = UserOperationSigned::default()
            .sender(sender)
            .nonce(nonce)
            .init_code(init_code)
            .call_data(self.account.execute(sender, value, Bytes::default()))
            .max_fee_per_gas(max_fee_per_gas)
            .max_priority_fee_per_gas(max_priority_fee_per_gas)
            .signature(self.account.dummy_signature());

        let estimation = self
            .bundler
            .estimate_user_operation_gas(&uo, entry_point)
            .await
            .wrap_err("failed to estimate user operation gas")?;
        let (hash, user_operation) = self.account.sign(uo.with_gas_estimation(&estimation)).await?;

        debug!(
            bundler = %self.bundler.name(),
            index,
            %hash,
            %nonce,
            %value,
            call_gas_limit = %user_operation.call_gas_limit,
            verification_gas_limit = %user_operation.verification_gas_limit,
            pre_verification_gas = %user_operation.pre_verification_gas,
            %max_fee_per_gas,
            %max_priority_fee_per_gas,
            "User operation prepared"
        );

        Ok(PreparedUserOperation { user_operation, hash })
    }

    async fn submit(&self, request: PreparedUserOperation) -> eyre::Result<UserOperationHash> {
        let hash = self
            .bundler
            .send_user_operation(&request.user_operation, self.account.entry_point())
            .await?;
        if hash != request.hash {
            warn!(
                bundler = %self.bundler.name(),
                expected = %request.hash,
                returned = %hash,
                "Bundler returned an unexpected user operation hash"
            );
        }
        Ok(hash)
    }

    async fn confirm(&self, handle: &UserOperationHash) -> eyre::Result<Inclusion<String>> {
        let receipt = self.bundler.wait_for_receipt(handle).await?;
        if !receipt.success {
            warn!(
                bundler = %self.bundler.name(),
                hash = %handle,
                reason = %receipt.reason,
                "User operation included but reverted"
            );
        }

        let block_number = receipt
            .block_number()
            .ok_or_else(|| eyre::eyre!("receipt of {handle} has no block number"))?;
        let timestamp_ms = block_timestamp_ms(self.account.eth_client().as_ref(), block_number)
            .await?;

        Ok(Inclusion {
            timestamp_ms,
            confirmation: format!("{:?}", receipt.transaction_hash()),
        })
    }
}
