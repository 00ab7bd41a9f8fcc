use crate::utils::run_until_ctrl_c;
use clap::{value_parser, Parser, Subcommand};

pub mod args;
pub mod commands;

/// The main uobench CLI interface
#[derive(Debug, Parser)]
#[command(author, version, about = "uobench - ERC-4337 bundler latency benchmarks", long_about = None)]
pub struct Cli {
    /// The command to execute
    #[clap(subcommand)]
    command: Commands,

    /// The verbosity level
    #[clap(long, short, global = true, default_value_t = 2, value_parser = value_parser!(u8).range(..=4))]
    verbosity: u8,
}

impl Cli {
    /// Get the log level based on the verbosity level
    pub fn get_log_level(&self) -> String {
        match self.verbosity {
            0 => "error",
            1 => "warn",
            2 => "info",
            3 => "debug",
            _ => "trace",
        }
        .into()
    }

    /// `RUST_LOG` directives with the uobench crates set to the verbosity level
    fn log_directives(&self, rust_log: Option<String>) -> String {
        let level = self.get_log_level();
        let crates = ["uobench", "uobench_client", "uobench_harness", "uobench_primitives"]
            .iter()
            .map(|name| format!("{name}={level}"))
            .collect::<Vec<_>>()
            .join(",");
        match rust_log {
            Some(val) if !val.is_empty() => format!("{val},{crates}"),
            _ => crates,
        }
    }
}

/// Commands to be executed
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Benchmark a single bundler (Biconomy by default)
    #[command(name = "single")]
    Single(commands::SingleCommand),

    /// Compare the latency of several bundlers
    #[command(name = "compare")]
    Compare(commands::CompareCommand),
}

pub fn run() -> eyre::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    std::env::set_var("RUST_LOG", cli.log_directives(std::env::var("RUST_LOG").ok()));
    tracing_subscriber::fmt::init();

    let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

    let task = async move {
        match cli.command {
            Commands::Single(command) => command.execute().await,
            Commands::Compare(command) => command.execute().await,
        }
    };

    rt.block_on(run_until_ctrl_c(task))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn cli(verbosity: &str) -> Cli {
        Cli::try_parse_from(vec![
            "uobench",
            "-v",
            verbosity,
            "single",
            "--rpc-url",
            "http://127.0.0.1:8545",
            "--private-key",
            KEY,
        ])
        .unwrap()
    }

    #[test]
    fn log_level_from_verbosity() {
        assert_eq!(cli("0").get_log_level(), "error");
        assert_eq!(cli("3").get_log_level(), "debug");
        assert_eq!(cli("4").get_log_level(), "trace");
        assert!(Cli::try_parse_from(vec!["uobench", "-v", "5", "single"]).is_err());
    }

    #[test]
    fn log_directives_keep_rust_log() {
        let cli = cli("2");
        assert_eq!(
            cli.log_directives(None),
            "uobench=info,uobench_client=info,uobench_harness=info,uobench_primitives=info"
        );
        assert!(cli.log_directives(Some("jsonrpsee=debug".into())).starts_with("jsonrpsee=debug,"));
    }
}
