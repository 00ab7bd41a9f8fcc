use ethers::{
    prelude::ContractError,
    providers::{Middleware, ProviderError},
};
use thiserror::Error;

/// Contract call errors
#[derive(Debug, Error, Clone)]
pub enum ContractCallError {
    /// execution reverted
    #[error("execution reverted: {0}")]
    ExecutionReverted(String),

    /// Provider error
    #[error("provider error: {inner}")]
    Provider {
        /// The inner error message
        inner: String,
    },

    /// ABI error
    #[error("abi error: {inner}")]
    ABI {
        /// The inner error message
        inner: String,
    },

    /// Data decoding error
    #[error("decode error: {inner}")]
    Decode {
        /// The inner error message
        inner: String,
    },

    /// Any other error
    #[error("other error: {inner}")]
    Other {
        /// The inner error message
        inner: String,
    },
}

impl ContractCallError {
    pub fn from_provider_error(err: &ProviderError) -> Self {
        match err {
            ProviderError::JsonRpcClientError(err) => match err.as_error_response() {
                Some(res) => Self::Provider { inner: res.to_string() },
                None => Self::Provider { inner: format!("unknown json-rpc client error: {err:?}") },
            },
            ProviderError::HTTPError(err) => {
                Self::Provider { inner: format!("HTTP error: {err:?}") }
            }
            _ => Self::Provider { inner: format!("unknown provider error: {err:?}") },
        }
    }
}

impl<M: Middleware> From<ContractError<M>> for ContractCallError {
    fn from(err: ContractError<M>) -> Self {
        match err {
            ContractError::DecodingError(e) => Self::Decode { inner: e.to_string() },
            ContractError::AbiError(e) => Self::ABI { inner: e.to_string() },
            ContractError::ProviderError { e } => Self::from_provider_error(&e),
            ContractError::Revert(data) => Self::ExecutionReverted(data.to_string()),
            _ => Self::Other { inner: err.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_keep_their_message() {
        let err = ContractCallError::from_provider_error(&ProviderError::CustomError(
            "latest block not found".into(),
        ));
        match err {
            ContractCallError::Provider { inner } => {
                assert!(inner.contains("latest block not found"))
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
