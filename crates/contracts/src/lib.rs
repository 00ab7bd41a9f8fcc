//! Smart contract interfaces used to build user operations for the benchmarked accounts

pub mod entry_point;
mod error;
mod gen;
pub mod smart_account;

pub use entry_point::{EntryPoint, DEFAULT_NONCE_KEY};
pub use error::ContractCallError;
pub use smart_account::AccountFactory;
