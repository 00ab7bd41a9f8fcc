pub use super::gen::EntryPointAPI;
use crate::error::ContractCallError;
use ethers::{
    providers::Middleware,
    types::{Address, U256},
};
use std::sync::Arc;

/// Nonce key used by the benchmarked accounts
pub const DEFAULT_NONCE_KEY: u64 = 0;

#[derive(Clone)]
pub struct EntryPoint<M: Middleware + 'static> {
    address: Address,
    entry_point_api: EntryPointAPI<M>,
}

impl<M: Middleware + 'static> EntryPoint<M> {
    pub fn new(eth_client: Arc<M>, address: Address) -> Self {
        Self { address, entry_point_api: EntryPointAPI::new(address, eth_client) }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Next nonce of the sender for the given key
    pub async fn get_nonce(&self, sender: &Address, key: U256) -> Result<U256, ContractCallError> {
        let nonce = self.entry_point_api.get_nonce(*sender, key).call().await?;
        Ok(nonce)
    }
}
