//! Account abstraction (ERC-4337) and benchmark related constants

/// Entry point smart contract
pub mod entry_point {
    /// Address of the entry point smart contract
    pub const ADDRESS: &str = "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789";
    /// Version of the entry point smart contract
    pub const VERSION: &str = "0.6.0";
}

/// Biconomy smart account (v2) deployment
pub mod biconomy {
    /// Smart account factory
    pub const FACTORY: &str = "0x000000a56Aaca3e9a4C479ea6b6CD0DbcB6634F5";
    /// ECDSA ownership module (validation module of the account)
    pub const ECDSA_OWNERSHIP_MODULE: &str = "0x0000001c5b32F37F5beA87BDD5374eB2aC54eA8e";
    /// Well-formed ECDSA signature used while estimating gas
    pub const DUMMY_ECDSA_SIGNATURE: &str = "0xfffffffffffffffffffffffffffffff0000000000000000000000000000000007aa05f1e6e7b38a5d01dbc7de23c0bfb9d7de93a0f7dab9c64c7d89ef2f34eba1c";
}

/// Bundler endpoints (Base mainnet)
pub mod bundler_endpoints {
    /// Biconomy bundler, followed by the API key
    pub const BICONOMY: &str = "https://bundler.biconomy.io/api/v2/8453/";
    /// Alchemy bundler, followed by the API key
    pub const ALCHEMY: &str = "https://base-mainnet.g.alchemy.com/v2/";
    /// Pimlico bundler, followed by the API key
    pub const PIMLICO: &str = "https://api.pimlico.io/v2/base/rpc?apikey=";
}

/// Benchmark defaults
pub mod benchmark {
    /// Number of user operations per bundler
    pub const ITERATIONS: usize = 100;
    /// Directory where the CSV files are written
    pub const OUTPUT_DIR: &str = "output";
    /// Interval between two `eth_getUserOperationReceipt` polls (in milliseconds)
    pub const RECEIPT_POLL_INTERVAL_MS: u64 = 1_000;
    /// Priority fee of every user operation (0.002 gwei)
    pub const MAX_PRIORITY_FEE_PER_GAS: u64 = 2_000_000;
    /// Upper bound (exclusive) of the random value sent with every user operation (in wei)
    pub const MAX_TRANSFER_VALUE: u64 = 10_000;

    /// Target name of the single bundler (SDK-style) benchmark
    pub const SINGLE_TARGET_LABEL: &str = "biconomySDK";
    pub const SINGLE_DETAIL_FILE: &str = "biconomy_sdk_latency_results.csv";
    pub const SINGLE_SUMMARY_FILE: &str = "biconomy_sdk_average_latency_results.csv";
    pub const COMPARE_DETAIL_FILE: &str = "latency_results.csv";
    pub const COMPARE_SUMMARY_FILE: &str = "average_latency_results.csv";
}
