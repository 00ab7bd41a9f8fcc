//! Utils for creating ethers providers and reading chain data

use ethers::{
    providers::{Http, Middleware, Provider},
    types::{BlockId, Chain, U256, U64},
};
use std::time::Duration;

/// Creates ethers provider with HTTP connection
pub async fn create_http_provider(addr: &str) -> eyre::Result<Provider<Http>> {
    let provider = Provider::<Http>::try_from(addr)?;

    let chain_id = provider.get_chainid().await?;

    Ok(provider.interval(if chain_id == Chain::Dev.into() {
        Duration::from_millis(5u64)
    } else {
        Duration::from_millis(500u64)
    }))
}

/// Timestamp of the block (in milliseconds since the Unix epoch)
pub async fn block_timestamp_ms<M: Middleware + 'static>(
    client: &M,
    block_number: U64,
) -> eyre::Result<i64> {
    let block = client
        .get_block(BlockId::from(block_number))
        .await
        .map_err(|err| eyre::eyre!("failed to fetch block {block_number}: {err}"))?
        .ok_or_else(|| eyre::eyre!("block {block_number} not found"))?;

    timestamp_to_ms(block.timestamp)
}

fn timestamp_to_ms(timestamp: U256) -> eyre::Result<i64> {
    if timestamp > U256::from(i64::MAX / 1000) {
        return Err(eyre::eyre!("block timestamp {timestamp} is out of range"));
    }
    Ok(timestamp.as_u64() as i64 * 1000)
}
