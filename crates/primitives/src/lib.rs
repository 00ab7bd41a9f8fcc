//! Account abstraction (ERC-4337) primitive types
//!
//! This crate contains the user operation types, hashing and signing helpers and constants used
//! to benchmark ERC-4337 bundlers.

pub mod constants;
pub mod provider;
mod user_operation;
mod utils;
mod wallet;

pub use user_operation::{
    UserOperationGasEstimation, UserOperationHash, UserOperationReceipt, UserOperationSigned,
};
pub use utils::{as_checksum_addr, get_address};
pub use wallet::Wallet;
