//! Biconomy smart account (v2) owned by an ECDSA key

use ethers::{
    providers::Middleware,
    types::{Address, Bytes, U256},
};
use std::{
    str::FromStr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use tracing::{debug, info};
use uobench_contracts::{
    smart_account::{execute_call_data, init_code, wrap_signature},
    AccountFactory, EntryPoint, DEFAULT_NONCE_KEY,
};
use uobench_primitives::{
    constants::{biconomy, entry_point},
    get_address, UserOperationHash, UserOperationSigned, Wallet,
};

/// Addresses and index identifying the smart account
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountConfig {
    pub entry_point: Address,
    pub factory: Address,
    pub ecdsa_module: Address,
    /// Index of the account among the accounts of the owner
    pub index: U256,
    pub chain_id: u64,
}

impl AccountConfig {
    /// Biconomy v2 deployment with the entry point v0.6
    pub fn biconomy(chain_id: u64) -> eyre::Result<Self> {
        Ok(Self {
            entry_point: entry_point::ADDRESS.parse()?,
            factory: biconomy::FACTORY.parse()?,
            ecdsa_module: biconomy::ECDSA_OWNERSHIP_MODULE.parse()?,
            index: U256::zero(),
            chain_id,
        })
    }
}

pub struct SmartAccount<M: Middleware + 'static> {
    eth_client: Arc<M>,
    wallet: Wallet,
    entry_point: EntryPoint<M>,
    factory: AccountFactory<M>,
    config: AccountConfig,
    address: Address,
    dummy_signature: Bytes,
    deployed: AtomicBool,
}

impl<M: Middleware + 'static> SmartAccount<M> {
    /// Derives the counterfactual address of the account owned by the wallet
    pub async fn new(
        eth_client: Arc<M>,
        wallet: Wallet,
        config: AccountConfig,
    ) -> eyre::Result<Self> {
        let entry_point = EntryPoint::new(eth_client.clone(), config.entry_point);
        let factory = AccountFactory::new(eth_client.clone(), config.factory);

        let address =
            factory.account_address(config.ecdsa_module, wallet.address(), config.index).await?;
        let dummy_signature = wrap_signature(
            Bytes::from_str(biconomy::DUMMY_ECDSA_SIGNATURE)?,
            config.ecdsa_module,
        );

        let account = Self {
            eth_client,
            wallet,
            entry_point,
            factory,
            config,
            address,
            dummy_signature,
            deployed: AtomicBool::new(false),
        };
        let deployed = account.is_deployed().await?;

        info!(
            account = ?account.address,
            owner = ?account.owner(),
            index = %account.config.index,
            deployed,
            "Smart account derived"
        );

        Ok(account)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.wallet.address()
    }

    pub fn entry_point(&self) -> Address {
        self.entry_point.address()
    }

    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    pub fn eth_client(&self) -> Arc<M> {
        self.eth_client.clone()
    }

    /// Whether the account contract exists (cached once it does)
    pub async fn is_deployed(&self) -> eyre::Result<bool> {
        if self.deployed.load(Ordering::Relaxed) {
            return Ok(true);
        }

        let code = self
            .eth_client
            .get_code(self.address, None)
            .await
            .map_err(|err| eyre::eyre!("failed to fetch code of {:?}: {err}", self.address))?;
        let deployed = !code.is_empty();
        if deployed {
            self.deployed.store(true, Ordering::Relaxed);
        }
        Ok(deployed)
    }

    /// Next nonce of the account (key 0)
    pub async fn nonce(&self) -> eyre::Result<U256> {
        Ok(self.entry_point.get_nonce(&self.address, DEFAULT_NONCE_KEY.into()).await?)
    }

    /// Init code to attach to the next user operation (empty once the account is deployed)
    pub async fn init_code(&self) -> eyre::Result<Bytes> {
        if self.is_deployed().await? {
            return Ok(Bytes::default());
        }

        let code = init_code(
            self.factory.address(),
            self.config.ecdsa_module,
            self.owner(),
            self.config.index,
        );
        debug!(factory = ?get_address(&code), "Account not deployed yet, attaching init code");
        Ok(code)
    }

    /// Call data executing a single call from the account
    pub fn execute(&self, dest: Address, value: U256, func: Bytes) -> Bytes {
        execute_call_data(dest, value, func)
    }

    /// Signature with the layout of a real one, used for gas estimation
    pub fn dummy_signature(&self) -> Bytes {
        self.dummy_signature.clone()
    }

    /// Signs the user operation with the owner key and wraps the signature for the ECDSA module
    pub async fn sign(
        &self,
        uo: UserOperationSigned,
    ) -> eyre::Result<(UserOperationHash, UserOperationSigned)> {
        let (hash, signature) =
            self.wallet.sign_user_operation(&uo, &self.entry_point(), self.chain_id()).await?;
        Ok((hash, uo.signature(wrap_signature(signature, self.config.ecdsa_module))))
    }
}
