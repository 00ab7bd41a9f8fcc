use ethers::types::Address;
use jsonrpsee::core::ClientError;
use thiserror::Error;

/// Bundler client errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BundlerError {
    /// The bundler answered with a JSON-RPC error (e.g. the user operation was rejected)
    #[error("bundler returned error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i32,
        /// The error message
        message: String,
    },

    /// The request did not reach the bundler or the response could not be read
    #[error("transport error: {inner}")]
    Transport {
        /// The inner error message
        inner: String,
    },

    /// The bundler does not support the configured entry point
    #[error("entry point {entry_point:?} is not supported (supported: {supported:?})")]
    UnsupportedEntryPoint {
        /// Configured entry point
        entry_point: Address,
        /// Entry points the bundler supports
        supported: Vec<Address>,
    },

    /// The bundler serves another chain than the RPC node
    #[error("bundler is on chain {bundler}, expected chain {expected}")]
    ChainMismatch {
        /// Chain id reported by the bundler
        bundler: u64,
        /// Chain id reported by the RPC node
        expected: u64,
    },
}

impl From<ClientError> for BundlerError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Call(err) => {
                Self::Rpc { code: err.code(), message: err.message().to_string() }
            }
            _ => Self::Transport { inner: err.to_string() },
        }
    }
}
