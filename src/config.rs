//! Run configuration for the SMS load generator.
//!
//! Two sources feed a run:
//! - command line flags (`CliArgs`) for the load shape and target selection
//! - environment variables (`EnvConfig`, `.env` honoured) for the target base URLs
//!
//! Both collapse into an immutable [`Config`] built once at startup.

use anyhow::Result;
use clap::Parser;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Default base URL of the production deployment behind the istio gateway.
pub const DEFAULT_ISTIO_URL: &str = "http://istio.team14.local/sms/";

/// Default base URL of the canary deployment.
pub const DEFAULT_CANARY_URL: &str = "http://canary.team14.local/sms/";

/// SMS spam classifier load generator
#[derive(Parser, Debug, Clone)]
#[command(name = "sms-spam-load")]
#[command(about = "Spam the istio and canary SMS classifier deployments with randomly labelled messages")]
pub struct CliArgs {
    /// How many requests each worker sends
    #[arg(short, long, default_value = "1000")]
    pub count: u64,

    /// How many workers per target url
    #[arg(short, long, default_value = "5")]
    pub workers: usize,

    /// Do not send requests to the canary deployment
    #[arg(long)]
    pub skip_canary: bool,

    /// Do not send requests to the istio deployment
    #[arg(long)]
    pub skip_istio: bool,

    /// Upper bound on distinct messages drawn from the corpus
    #[arg(short, long, default_value = "1000")]
    pub unique: usize,

    /// Newline-delimited SMS corpus
    #[arg(long, env = "SMS_CORPUS", default_value = "SMSSpamCollection")]
    pub corpus: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid URL ({value:?}): {source}")]
    InvalidUrl {
        var: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Target base URLs, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// Production deployment (`ISTIO_URL`)
    pub istio_url: Url,

    /// Canary deployment (`CANARY_URL`)
    pub canary_url: Url,
}

impl EnvConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the URLs through `lookup`, falling back to the built-in defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            istio_url: url_var(&lookup, "ISTIO_URL", DEFAULT_ISTIO_URL)?,
            canary_url: url_var(&lookup, "CANARY_URL", DEFAULT_CANARY_URL)?,
        })
    }
}

fn url_var<F>(lookup: &F, var: &'static str, default: &str) -> Result<Url, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(var).unwrap_or_else(|| default.to_string());
    Url::parse(&value).map_err(|source| ConfigError::InvalidUrl { var, value, source })
}

/// The deployments a run can aim at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Istio,
    Canary,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Istio => "istio",
            Target::Canary => "canary",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selected target together with the URL its workers post to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub target: Target,
    pub url: Url,
}

/// Load shape of a single run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Requests each worker sends before finishing
    pub iterations_per_worker: u64,
    /// Workers spawned for every included target
    pub workers_per_target: usize,
    pub include_canary: bool,
    pub include_istio: bool,
    /// Upper bound on the message pool size
    pub unique_message_cap: usize,
}

impl RunConfig {
    /// Endpoints selected by the inclusion flags, istio first.
    pub fn endpoints(&self, env: &EnvConfig) -> Vec<Endpoint> {
        let mut endpoints = Vec::with_capacity(2);
        if self.include_istio {
            endpoints.push(Endpoint {
                target: Target::Istio,
                url: env.istio_url.clone(),
            });
        }
        if self.include_canary {
            endpoints.push(Endpoint {
                target: Target::Canary,
                url: env.canary_url.clone(),
            });
        }
        endpoints
    }

    /// Number of workers a run with this configuration starts.
    pub fn total_workers(&self) -> usize {
        let targets = usize::from(self.include_istio) + usize::from(self.include_canary);
        self.workers_per_target * targets
    }
}

impl From<&CliArgs> for RunConfig {
    fn from(cli: &CliArgs) -> Self {
        Self {
            iterations_per_worker: cli.count,
            workers_per_target: cli.workers,
            include_canary: !cli.skip_canary,
            include_istio: !cli.skip_istio,
            unique_message_cap: cli.unique,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub run: RunConfig,
    pub corpus: PathBuf,
    pub env: EnvConfig,
}

impl Config {
    /// Parse the command line and the environment.
    ///
    /// Malformed flags terminate the process with a usage message (clap exits with status 2).
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let cli = CliArgs::parse();
        let env = EnvConfig::from_env()?;

        Ok(Self::from_parts(&cli, env))
    }

    pub fn from_parts(cli: &CliArgs, env: EnvConfig) -> Self {
        Self {
            run: RunConfig::from(cli),
            corpus: cli.corpus.clone(),
            env,
        }
    }

    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.run.endpoints(&self.env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn default_env() -> EnvConfig {
        EnvConfig::from_lookup(|_| None).unwrap()
    }

    #[test]
    fn test_cli_defaults() {
        let cli = CliArgs::try_parse_from(["sms-spam-load"]).unwrap();
        let run = RunConfig::from(&cli);

        assert_eq!(run.iterations_per_worker, 1000);
        assert_eq!(run.workers_per_target, 5);
        assert_eq!(run.unique_message_cap, 1000);
        assert!(run.include_istio);
        assert!(run.include_canary);
        assert_eq!(run.total_workers(), 10);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = CliArgs::try_parse_from([
            "sms-spam-load",
            "-c",
            "3",
            "-w",
            "1",
            "-u",
            "2",
            "--skip-canary",
        ])
        .unwrap();
        let run = RunConfig::from(&cli);

        assert_eq!(run.iterations_per_worker, 3);
        assert_eq!(run.workers_per_target, 1);
        assert_eq!(run.unique_message_cap, 2);
        assert!(!run.include_canary);
        assert!(run.include_istio);
        assert_eq!(run.total_workers(), 1);
    }

    #[test]
    fn test_cli_rejects_non_integer() {
        let err = CliArgs::try_parse_from(["sms-spam-load", "--count", "lots"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let err = CliArgs::try_parse_from(["sms-spam-load", "--unique", "2.5"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_zero_values_are_accepted() {
        let cli = CliArgs::try_parse_from(["sms-spam-load", "-c", "0", "-w", "0"]).unwrap();
        let run = RunConfig::from(&cli);
        assert_eq!(run.iterations_per_worker, 0);
        assert_eq!(run.total_workers(), 0);
    }

    #[test]
    fn test_endpoint_selection() {
        let env = default_env();
        let cli = CliArgs::try_parse_from(["sms-spam-load"]).unwrap();
        let endpoints = RunConfig::from(&cli).endpoints(&env);
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].target, Target::Istio);
        assert_eq!(endpoints[0].url.as_str(), DEFAULT_ISTIO_URL);
        assert_eq!(endpoints[1].target, Target::Canary);
        assert_eq!(endpoints[1].url.as_str(), DEFAULT_CANARY_URL);

        let cli =
            CliArgs::try_parse_from(["sms-spam-load", "--skip-canary", "--skip-istio"]).unwrap();
        let run = RunConfig::from(&cli);
        assert!(run.endpoints(&env).is_empty());
        assert_eq!(run.total_workers(), 0);
    }

    #[test]
    fn test_env_overrides_urls() {
        let env = EnvConfig::from_lookup(|key| match key {
            "CANARY_URL" => Some("http://localhost:8081/sms/".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(env.istio_url.as_str(), DEFAULT_ISTIO_URL);
        assert_eq!(env.canary_url.as_str(), "http://localhost:8081/sms/");
    }

    #[test]
    fn test_env_rejects_malformed_url() {
        let err = EnvConfig::from_lookup(|key| match key {
            "ISTIO_URL" => Some("not a url".to_string()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { var: "ISTIO_URL", .. }));
    }
}
