//! CLI flags and the immutable [`RunConfig`] they translate into.

use crate::{ConfigError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;

/// Flags accepted by the run driver binary, matching the external interface.
#[derive(clap::Parser, Debug, Clone)]
#[command(name = "labu", about = "Multi-client conformance test harness", long_about = None)]
pub struct CliArgs {
    /// Simulator name (the directory under `simulators/`).
    #[arg(long = "sim", required = true)]
    pub sim: String,

    /// Comma-separated client names to make available to the simulator.
    #[arg(long = "client", required = true, value_delimiter = ',')]
    pub client: Vec<String>,

    /// Workspace directory for logs, node files, and results.
    #[arg(long = "workspace", default_value = "./workspace")]
    pub workspace: PathBuf,

    /// Host directory of test vectors, mounted read-only at `/vectors`.
    #[arg(long = "vectors")]
    pub vectors: Option<PathBuf>,

    /// Regex filter applied to test names.
    #[arg(long = "sim.limit")]
    pub sim_limit: Option<String>,

    /// Concurrency hint passed through to the simulator.
    #[arg(long = "sim.parallelism", default_value_t = 1)]
    pub sim_parallelism: u32,

    /// Random seed; 0 means derive one from the wall clock.
    #[arg(long = "sim.randomseed", default_value_t = 0)]
    pub sim_randomseed: i64,

    /// Simulator log verbosity, 0 (quiet) through 5 (trace).
    #[arg(long = "sim.loglevel", default_value_t = 3)]
    pub sim_loglevel: u8,

    /// Image tag override for the simulator itself.
    #[arg(long = "sim.image")]
    pub sim_image: Option<String>,

    /// Comma-separated `name=tag` pairs overriding per-client image tags.
    #[arg(long = "client.images", value_delimiter = ',')]
    pub client_images: Vec<String>,
}

/// Immutable configuration for a single invocation, built once by the run
/// driver from [`CliArgs`] and never mutated afterward.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub sim_name: String,
    pub clients: Vec<String>,
    pub image_overrides: HashMap<String, String>,
    pub vectors_dir: Option<PathBuf>,
    pub test_filter: Option<Regex>,
    pub parallelism: u32,
    pub random_seed: i64,
    pub log_level: u8,
    pub sim_image_override: Option<String>,
    pub workspace: PathBuf,
}

impl TryFrom<CliArgs> for RunConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self> {
        if args.sim.trim().is_empty() {
            return Err(ConfigError::Invalid("--sim must not be empty".into()));
        }
        if args.client.is_empty() {
            return Err(ConfigError::Invalid(
                "--client must name at least one client".into(),
            ));
        }

        let mut image_overrides = HashMap::new();
        for pair in &args.client_images {
            let (name, tag) = pair.split_once('=').ok_or_else(|| {
                ConfigError::Invalid(format!("--client.images entry {pair:?} is not name=tag"))
            })?;
            image_overrides.insert(name.to_string(), tag.to_string());
        }

        let test_filter = args
            .sim_limit
            .as_deref()
            .map(Regex::new)
            .transpose()?;

        let workspace = std::fs::canonicalize(&args.workspace).unwrap_or(args.workspace);

        Ok(RunConfig {
            sim_name: args.sim,
            clients: args.client,
            image_overrides,
            vectors_dir: args.vectors,
            test_filter,
            parallelism: args.sim_parallelism,
            random_seed: args.sim_randomseed,
            log_level: args.sim_loglevel,
            sim_image_override: args.sim_image,
            workspace,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            sim: "sim-a".into(),
            client: vec!["geth".into(), "besu".into()],
            workspace: PathBuf::from("."),
            vectors: None,
            sim_limit: None,
            sim_parallelism: 1,
            sim_randomseed: 0,
            sim_loglevel: 3,
            sim_image: None,
            client_images: vec![],
        }
    }

    #[test]
    fn parses_client_image_overrides() {
        let mut args = base_args();
        args.client_images = vec!["geth=geth:v1".into()];
        let config = RunConfig::try_from(args).unwrap();
        assert_eq!(
            config.image_overrides.get("geth"),
            Some(&"geth:v1".to_string())
        );
    }

    #[test]
    fn rejects_empty_sim_name() {
        let mut args = base_args();
        args.sim = String::new();
        assert!(RunConfig::try_from(args).is_err());
    }

    #[test]
    fn rejects_malformed_image_override() {
        let mut args = base_args();
        args.client_images = vec!["no-equals-sign".into()];
        assert!(RunConfig::try_from(args).is_err());
    }

    #[test]
    fn compiles_test_filter_regex() {
        let mut args = base_args();
        args.sim_limit = Some("rpc/.*".into());
        let config = RunConfig::try_from(args).unwrap();
        let filter = config.test_filter.unwrap();
        assert!(filter.is_match("rpc/getBalance"));
        assert!(!filter.is_match("sys/ping"));
    }
}
