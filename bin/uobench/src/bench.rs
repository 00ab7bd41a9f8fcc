//! Setup of the benchmarked account and targets, and the reporting of a finished run

use crate::cli::args::BenchArgs;
use alloy_chains::Chain;
use ethers::providers::{Http, Middleware, Provider};
use eyre::WrapErr;
use std::{path::Path, sync::Arc};
use tracing::{info, warn};
use uobench_client::{
    AccountConfig, Bundler, BundlerClient, BundlerTarget, EndpointKeys, SmartAccount,
};
use uobench_harness::{
    report::{summary_table, trials_table, write_detail_csv, write_summary_csv, DetailLayout},
    run_targets, Aggregates, HarnessConfig, SystemClock,
};
use uobench_primitives::{provider::create_http_provider, Wallet};

pub type EthClient = Provider<Http>;

/// Connects to the RPC node and derives the smart account of the owner
pub async fn setup_account(args: &BenchArgs) -> eyre::Result<Arc<SmartAccount<EthClient>>> {
    let eth_client = Arc::new(
        create_http_provider(&args.rpc_url)
            .await
            .wrap_err("failed to connect to RPC node")?,
    );
    let chain_id = eth_client.get_chainid().await?.as_u64();
    info!(chain = %Chain::from_id(chain_id), "Connected to RPC node");

    let wallet = Wallet::from_private_key(&args.private_key, chain_id)?;
    let config = AccountConfig {
        entry_point: args.entry_point,
        index: args.account_index,
        ..AccountConfig::biconomy(chain_id)?
    };

    let account = SmartAccount::new(eth_client, wallet, config)
        .await
        .wrap_err("failed to derive smart account")?;
    Ok(Arc::new(account))
}

/// Builds one harness target per bundler, labelled with the given name
pub async fn setup_targets(
    account: &Arc<SmartAccount<EthClient>>,
    bundlers: Vec<(String, Bundler)>,
    keys: &EndpointKeys,
    args: &BenchArgs,
) -> eyre::Result<Vec<(String, BundlerTarget<EthClient>)>> {
    let mut targets = Vec::with_capacity(bundlers.len());
    for (label, bundler) in bundlers {
        let url = bundler.endpoint(keys)?;
        let client = BundlerClient::new(label.clone(), &url, args.poll_interval)
            .wrap_err_with(|| format!("invalid endpoint of bundler {bundler}"))?;

        // an unhealthy bundler still gets benchmarked, its trials record the failures
        if let Err(err) = client.check(account.chain_id(), account.entry_point()).await {
            warn!(bundler = %label, "Bundler check failed: {err}");
        }

        targets.push((
            label,
            BundlerTarget::new(account.clone(), client, args.max_priority_fee_per_gas),
        ));
    }
    Ok(targets)
}

/// Runs the targets one after another, prints the tables and writes both CSV files
pub async fn run_benchmark(
    targets: Vec<(String, BundlerTarget<EthClient>)>,
    config: HarnessConfig,
    layout: DetailLayout,
    detail_path: &Path,
    summary_path: &Path,
) -> eyre::Result<()> {
    let sets = run_targets(targets, &config, &SystemClock).await;
    let aggregates = Aggregates::from_sets(&sets);

    println!("\n{}", trials_table(&sets, layout));
    println!("=== Average Latency Results ===");
    println!("{}", summary_table(&aggregates));

    for set in &sets {
        let failures = set.failures().count();
        if failures > 0 {
            warn!(
                bundler = %set.target,
                failures,
                trials = set.len(),
                "Some user operations failed"
            );
        }
    }

    write_detail_csv(detail_path, &sets, layout)?;
    write_summary_csv(summary_path, &aggregates)?;
    Ok(())
}
