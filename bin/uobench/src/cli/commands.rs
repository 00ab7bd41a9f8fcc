use super::args::{BenchArgs, BundlerEndpointArgs};
use crate::{
    bench::{run_benchmark, setup_account, setup_targets},
    utils::parse_bundler,
};
use clap::Parser;
use std::collections::HashSet;
use tracing::info;
use uobench_client::Bundler;
use uobench_harness::{report::DetailLayout, HarnessConfig, PreparationTiming};
use uobench_primitives::constants::benchmark;

/// Benchmark a single bundler, timing user operation preparation as part of the submission
#[derive(Debug, Parser)]
pub struct SingleCommand {
    /// Common benchmark args
    #[clap(flatten)]
    bench: BenchArgs,

    /// Bundler credentials
    #[clap(flatten)]
    endpoints: BundlerEndpointArgs,

    /// Bundler to benchmark (`biconomy`, `alchemy`, `pimlico` or `name=url`).
    #[clap(long, default_value = "biconomy", value_parser = parse_bundler)]
    bundler: Bundler,

    /// Name of the bundler in the results.
    #[clap(long, default_value = benchmark::SINGLE_TARGET_LABEL)]
    label: String,
}

impl SingleCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        info!(
            bundler = %self.bundler,
            iterations = self.bench.iterations,
            "Starting single bundler benchmark"
        );

        let account = setup_account(&self.bench).await?;
        let targets = setup_targets(
            &account,
            vec![(self.label, self.bundler)],
            &self.endpoints.into(),
            &self.bench,
        )
        .await?;

        run_benchmark(
            targets,
            HarnessConfig {
                iterations: self.bench.iterations,
                preparation: PreparationTiming::Included,
            },
            DetailLayout::SingleTarget,
            &self.bench.detail_path(benchmark::SINGLE_DETAIL_FILE),
            &self.bench.summary_path(benchmark::SINGLE_SUMMARY_FILE),
        )
        .await
    }
}

/// Compare bundlers, sending the same number of user operations through each one in turn
#[derive(Debug, Parser)]
pub struct CompareCommand {
    /// Common benchmark args
    #[clap(flatten)]
    bench: BenchArgs,

    /// Bundler credentials
    #[clap(flatten)]
    endpoints: BundlerEndpointArgs,

    /// Bundlers to compare, in order (`biconomy`, `alchemy`, `pimlico` or `name=url`).
    #[clap(long, value_delimiter = ',', default_value = "biconomy,alchemy,pimlico", value_parser = parse_bundler)]
    bundlers: Vec<Bundler>,
}

impl CompareCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let bundlers = labelled_bundlers(self.bundlers)?;
        info!(
            bundlers = ?bundlers.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>(),
            iterations = self.bench.iterations,
            "Starting bundler comparison"
        );

        let account = setup_account(&self.bench).await?;
        let targets =
            setup_targets(&account, bundlers, &self.endpoints.into(), &self.bench).await?;

        run_benchmark(
            targets,
            HarnessConfig {
                iterations: self.bench.iterations,
                preparation: PreparationTiming::Excluded,
            },
            DetailLayout::MultiTarget,
            &self.bench.detail_path(benchmark::COMPARE_DETAIL_FILE),
            &self.bench.summary_path(benchmark::COMPARE_SUMMARY_FILE),
        )
        .await
    }
}

/// Labels each bundler with its name. Results are keyed by name, so a name may appear only once.
fn labelled_bundlers(bundlers: Vec<Bundler>) -> eyre::Result<Vec<(String, Bundler)>> {
    if bundlers.is_empty() {
        return Err(eyre::eyre!("no bundler to compare"));
    }

    let mut names = HashSet::new();
    bundlers
        .into_iter()
        .map(|bundler| {
            let name = bundler.name().to_string();
            if !names.insert(name.clone()) {
                return Err(eyre::eyre!("bundler {name} is listed more than once"));
            }
            Ok((name, bundler))
        })
        .collect()
}
