//! Biconomy smart account (v2) helpers: counterfactual address, init code, call data and
//! signature layout expected by the ECDSA ownership module.

pub use super::gen::BiconomyAccountFactory;
use super::gen::{
    biconomy_account_factory::DeployCounterFactualAccountCall,
    biconomy_smart_account_api::ExecuteCall, ecdsa_ownership_module::InitForSmartAccountCall,
};
use crate::error::ContractCallError;
use ethers::{
    abi::{self, AbiEncode, Token},
    providers::Middleware,
    types::{Address, Bytes, U256},
};
use std::sync::Arc;

/// Setup data passed to the ECDSA ownership module when the account is deployed
pub fn module_setup_data(owner: Address) -> Bytes {
    InitForSmartAccountCall { eoa_owner: owner }.encode().into()
}

/// Init code deploying the account through the factory
pub fn init_code(factory: Address, module: Address, owner: Address, index: U256) -> Bytes {
    let call = DeployCounterFactualAccountCall {
        module_setup_contract: module,
        module_setup_data: module_setup_data(owner),
        index,
    };
    [factory.as_bytes().to_vec(), call.encode()].concat().into()
}

/// Call data executing a single call from the account
pub fn execute_call_data(dest: Address, value: U256, func: Bytes) -> Bytes {
    ExecuteCall { dest, value, func }.encode().into()
}

/// Wraps the raw ECDSA signature with the address of the validation module
pub fn wrap_signature(signature: Bytes, module: Address) -> Bytes {
    abi::encode(&[Token::Bytes(signature.to_vec()), Token::Address(module)]).into()
}

#[derive(Clone)]
pub struct AccountFactory<M: Middleware + 'static> {
    address: Address,
    factory_api: BiconomyAccountFactory<M>,
}

impl<M: Middleware + 'static> AccountFactory<M> {
    pub fn new(eth_client: Arc<M>, address: Address) -> Self {
        Self { address, factory_api: BiconomyAccountFactory::new(address, eth_client) }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Counterfactual address of the account owned by `owner` (deployed or not)
    pub async fn account_address(
        &self,
        module: Address,
        owner: Address,
        index: U256,
    ) -> Result<Address, ContractCallError> {
        let address = self
            .factory_api
            .get_address_for_counter_factual_account(module, module_setup_data(owner), index)
            .call()
            .await?;
        Ok(address)
    }
}
