use crate::utils::{parse_address, parse_duration, parse_u256, validate_private_key};
use clap::Parser;
use ethers::types::{Address, U256};
use expanded_pathbuf::ExpandedPathBuf;
use std::{path::PathBuf, time::Duration};
use uobench_client::EndpointKeys;
use uobench_primitives::constants::{benchmark, entry_point};

/// Benchmark CLI args shared by all commands
#[derive(Debug, Clone, Parser)]
pub struct BenchArgs {
    /// Ethereum execution client RPC endpoint (HTTP).
    #[clap(long, env = "RPC_URL")]
    pub rpc_url: String,

    /// Private key of the owner of the smart account (hex, optional `0x` prefix).
    #[clap(long, env = "PRIVATE_KEY", hide_env_values = true, value_parser = validate_private_key)]
    pub private_key: String,

    /// Entry point address.
    #[clap(long, env = "ENTRY_POINT", default_value = entry_point::ADDRESS, value_parser = parse_address)]
    pub entry_point: Address,

    /// Number of user operations sent to every bundler.
    #[clap(long, env = "NUM_ITERATIONS", default_value_t = benchmark::ITERATIONS)]
    pub iterations: usize,

    /// Directory where the CSV files are written (created if missing).
    #[clap(long, env = "OUTPUT_DIR", default_value = benchmark::OUTPUT_DIR)]
    pub output_dir: ExpandedPathBuf,

    /// File name of the per user operation results (defaults depend on the command).
    #[clap(long)]
    pub detail_file: Option<String>,

    /// File name of the averaged results (defaults depend on the command).
    #[clap(long)]
    pub summary_file: Option<String>,

    /// Interval between two user operation receipt polls in milliseconds.
    #[clap(long, env = "POLL_INTERVAL", default_value = "1000", value_parser = parse_duration)]
    pub poll_interval: Duration,

    /// Max priority fee per gas of every user operation in wei (0.002 gwei by default).
    #[clap(long, env = "MAX_PRIORITY_FEE_PER_GAS", default_value = "2000000", value_parser = parse_u256)]
    pub max_priority_fee_per_gas: U256,

    /// Index of the smart account among the accounts of the owner.
    #[clap(long, env = "ACCOUNT_INDEX", default_value = "0", value_parser = parse_u256)]
    pub account_index: U256,
}

impl BenchArgs {
    /// Path of the detail CSV
    pub fn detail_path(&self, default: &str) -> PathBuf {
        self.output_dir.0.join(self.detail_file.as_deref().unwrap_or(default))
    }

    /// Path of the summary CSV
    pub fn summary_path(&self, default: &str) -> PathBuf {
        self.output_dir.0.join(self.summary_file.as_deref().unwrap_or(default))
    }
}

/// Credentials of the hosted bundlers
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct BundlerEndpointArgs {
    /// Full Biconomy bundler URL (including the API key).
    #[clap(long, env = "BICONOMY_BUNDLER_URL", hide_env_values = true)]
    pub biconomy_bundler_url: Option<String>,

    /// Alchemy API key.
    #[clap(long, env = "ALCHEMY_API_KEY", hide_env_values = true)]
    pub alchemy_api_key: Option<String>,

    /// Pimlico API key.
    #[clap(long, env = "PIMLICO_API_KEY", hide_env_values = true)]
    pub pimlico_api_key: Option<String>,
}

impl From<BundlerEndpointArgs> for EndpointKeys {
    fn from(args: BundlerEndpointArgs) -> Self {
        Self {
            biconomy_bundler_url: args.biconomy_bundler_url,
            alchemy_api_key: args.alchemy_api_key,
            pimlico_api_key: args.pimlico_api_key,
        }
    }
}
