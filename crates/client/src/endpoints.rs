//! Benchmarked bundler services and their endpoint URLs

use std::{fmt, str::FromStr};
use uobench_primitives::constants::bundler_endpoints;

/// Credentials used to build the endpoint URLs of the hosted bundlers
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EndpointKeys {
    /// Full Biconomy bundler URL (the API key is part of the path)
    pub biconomy_bundler_url: Option<String>,
    pub alchemy_api_key: Option<String>,
    pub pimlico_api_key: Option<String>,
}

/// Bundler service
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Bundler {
    Biconomy,
    Alchemy,
    Pimlico,
    /// Any other bundler reachable over JSON-RPC
    Custom { name: String, url: String },
}

impl Bundler {
    /// Name used as the target label in the reports
    pub fn name(&self) -> &str {
        match self {
            Bundler::Biconomy => "biconomy",
            Bundler::Alchemy => "alchemy",
            Bundler::Pimlico => "pimlico",
            Bundler::Custom { name, .. } => name,
        }
    }

    /// Resolves the endpoint URL of the bundler
    pub fn endpoint(&self, keys: &EndpointKeys) -> eyre::Result<String> {
        match self {
            Bundler::Biconomy => keys.biconomy_bundler_url.clone().ok_or_else(|| {
                eyre::eyre!(
                    "missing Biconomy bundler URL (set BICONOMY_BUNDLER_URL, e.g. {}<api key>)",
                    bundler_endpoints::BICONOMY
                )
            }),
            Bundler::Alchemy => keys
                .alchemy_api_key
                .as_ref()
                .map(|key| format!("{}{key}", bundler_endpoints::ALCHEMY))
                .ok_or_else(|| eyre::eyre!("missing Alchemy API key (set ALCHEMY_API_KEY)")),
            Bundler::Pimlico => keys
                .pimlico_api_key
                .as_ref()
                .map(|key| format!("{}{key}", bundler_endpoints::PIMLICO))
                .ok_or_else(|| eyre::eyre!("missing Pimlico API key (set PIMLICO_API_KEY)")),
            Bundler::Custom { url, .. } => Ok(url.clone()),
        }
    }
}

impl fmt::Display for Bundler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses `biconomy`, `alchemy`, `pimlico` or `name=url`
impl FromStr for Bundler {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((name, url)) = s.split_once('=') {
            let (name, url) = (name.trim(), url.trim());
            if name.is_empty() || url.is_empty() {
                return Err(format!("invalid bundler '{s}', expected name=url"));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!("invalid bundler URL '{url}', expected http(s)://"));
            }
            return Ok(Bundler::Custom { name: name.to_string(), url: url.to_string() });
        }

        match s.to_lowercase().as_str() {
            "biconomy" => Ok(Bundler::Biconomy),
            "alchemy" => Ok(Bundler::Alchemy),
            "pimlico" => Ok(Bundler::Pimlico),
            _ => Err(format!(
                "unknown bundler '{s}', expected biconomy, alchemy, pimlico or name=url"
            )),
        }
    }
}
