use ethers::types::{Address, U256};
use pin_utils::pin_mut;
use std::{
    future::Future,
    io::{self, ErrorKind},
    str::FromStr,
    time::Duration,
};
use tracing::warn;
use uobench_client::Bundler;

/// Parses address from string
pub fn parse_address(s: &str) -> Result<Address, String> {
    Address::from_str(s).map_err(|_| format!("String {s} is not a valid address"))
}

/// Parses U256 from string
pub fn parse_u256(s: &str) -> Result<U256, String> {
    U256::from_str_radix(s, 10).map_err(|_| format!("String {s} is not a valid U256"))
}

/// Parses duration in milliseconds
pub fn parse_duration(duration: &str) -> Result<Duration, String> {
    let millis: u64 = duration.parse().map_err(|_| format!("{duration} must be unsigned int"))?;
    Ok(Duration::from_millis(millis))
}

/// Parses bundler (`biconomy`, `alchemy`, `pimlico` or `name=url`)
pub fn parse_bundler(s: &str) -> Result<Bundler, String> {
    Bundler::from_str(s)
}

/// Runs the future to completion or until:
/// - `ctrl-c` is received.
/// - `SIGTERM` is received (unix only).
///
/// A run ended by a signal returns an [`ErrorKind::Interrupted`] error.
pub async fn run_until_ctrl_c<F, E>(fut: F) -> Result<(), E>
where
    F: Future<Output = Result<(), E>>,
    E: Send + Sync + 'static + From<io::Error>,
{
    let mut stream = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    let signal = async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => "ctrl-c",
            _ = stream.recv() => "SIGTERM",
        }
    };

    run_until_signal(fut, signal).await
}

/// Runs the future to completion or until `signal` resolves with the name of the received signal.
async fn run_until_signal<F, S, E>(fut: F, signal: S) -> Result<(), E>
where
    F: Future<Output = Result<(), E>>,
    S: Future<Output = &'static str>,
    E: From<io::Error>,
{
    pin_mut!(signal, fut);

    tokio::select! {
        name = signal => {
            warn!("Received {name} signal, results of the unfinished run are not written.");
            Err(io::Error::new(
                ErrorKind::Interrupted,
                format!("benchmark interrupted by {name}"),
            )
            .into())
        },
        res = fut => res,
    }
}

/// Validates a hex encoded private key (32 bytes, optional `0x` prefix)
pub fn validate_private_key(hex_string: &str) -> Result<String, String> {
    let key = hex_string.strip_prefix("0x").unwrap_or(hex_string);
    let chars = key.chars();

    if chars.clone().count() != 64 {
        return Err("private key must be 32 bytes (64 hex characters)".to_string());
    }

    for c in chars {
        if !c.is_ascii_hexdigit() {
            return Err("private key is not a valid hexadecimal string".to_string());
        }
    }

    Ok(String::from(hex_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_key_validation() {
        let key = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
        assert_eq!(validate_private_key(key).unwrap(), key);
        assert!(validate_private_key(&format!("0x{key}")).is_ok());
        assert!(validate_private_key(&key[2..]).is_err());
        assert!(validate_private_key(&key.replace('c', "g")).is_err());
        // the key must never be echoed back in errors
        assert!(!validate_private_key(&key.replace('c', "g")).unwrap_err().contains("4g0883"));
    }

    #[test]
    fn value_parsers() {
        assert_eq!(
            parse_address("0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789").unwrap(),
            "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789".parse::<Address>().unwrap()
        );
        assert!(parse_address("0x1234").is_err());
        assert_eq!(parse_u256("2000000").unwrap(), U256::from(2_000_000));
        assert!(parse_u256("0.002").is_err());
        assert_eq!(parse_duration("250").unwrap(), Duration::from_millis(250));
        assert!(parse_duration("-1").is_err());
        assert_eq!(parse_bundler("pimlico").unwrap(), Bundler::Pimlico);
        assert!(parse_bundler("unknown").is_err());
    }

    #[tokio::test]
    async fn finished_run_is_not_interrupted() {
        let res: Result<(), io::Error> =
            run_until_signal(async { Ok(()) }, std::future::pending::<&'static str>()).await;
        assert!(res.is_ok());
    }

    #[tokio::test]
    async fn run_error_is_returned() {
        let fut = async { Err(eyre::eyre!("no bundler to compare")) };
        let res: eyre::Result<()> =
            run_until_signal(fut, std::future::pending::<&'static str>()).await;
        assert_eq!(res.unwrap_err().to_string(), "no bundler to compare");
    }

    #[tokio::test]
    async fn signal_ends_run_with_error() {
        let res: Result<(), io::Error> = run_until_signal(
            std::future::pending::<Result<(), io::Error>>(),
            std::future::ready("SIGTERM"),
        )
        .await;

        let err = res.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Interrupted);
        assert!(err.to_string().contains("SIGTERM"));
    }
}
