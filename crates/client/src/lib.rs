//! Clients of the benchmarked ERC-4337 bundlers
//!
//! A [BundlerTarget](BundlerTarget) sends user operations of a Biconomy smart account through one
//! bundler endpoint and implements the harness [Operation](uobench_harness::Operation) trait.

mod account;
mod bundler;
mod endpoints;
mod error;
mod target;

pub use account::{AccountConfig, SmartAccount};
pub use bundler::{BundlerApiClient, BundlerApiServer, BundlerClient};
pub use endpoints::{Bundler, EndpointKeys};
pub use error::BundlerError;
pub use target::{BundlerTarget, PreparedUserOperation};
