//! A `Wallet` is a wrapper around an ethers wallet owning the benchmarked smart account
use crate::{UserOperationHash, UserOperationSigned};
use ethers::{
    signers::{LocalWallet, Signer},
    types::{Address, Bytes},
};

/// Wrapper around ethers wallet
#[derive(Clone, Debug)]
pub struct Wallet {
    /// Signing key of the wallet (EOA owner of the smart account)
    pub signer: LocalWallet,
}

impl Wallet {
    /// Create a new wallet from the hex encoded private key (with or without `0x` prefix)
    ///
    /// # Arguments
    /// * `key` - The private key
    /// * `chain_id` - The chain id of the blockchain network to be used
    ///
    /// # Returns
    /// * `Self` - A new `Wallet` instance
    pub fn from_private_key(key: &str, chain_id: u64) -> eyre::Result<Self> {
        let key = key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);
        let signer = key
            .parse::<LocalWallet>()
            .map_err(|err| eyre::eyre!("invalid private key: {err}"))?;
        Ok(Self { signer: signer.with_chain_id(chain_id) })
    }

    /// Address of the wallet
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Signs the user operation hash (EIP-191 personal message over the 32 hash bytes)
    ///
    /// # Arguments
    /// * `uo` - The [UserOperationSigned](UserOperationSigned) to be signed
    /// * `ep` - The entry point contract address
    /// * `chain_id` - The chain id of the blockchain network to be used
    ///
    /// # Returns
    /// * `(UserOperationHash, Bytes)` - The hash of the user operation and the raw ECDSA signature
    pub async fn sign_user_operation(
        &self,
        uo: &UserOperationSigned,
        ep: &Address,
        chain_id: u64,
    ) -> eyre::Result<(UserOperationHash, Bytes)> {
        let h = uo.hash(ep, chain_id);
        let sig = self.signer.sign_message(h.0.as_bytes()).await?;
        Ok((h, sig.to_vec().into()))
    }
}
