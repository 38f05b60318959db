//! Sim configuration, read entirely from the environment the run driver
//! publishes to the simulator container (see the control-plane environment
//! contract).

use regex::Regex;
use std::time::Duration;

use crate::error::{Result, SdkError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub test_filter: Option<Regex>,
    pub parallelism: u32,
    pub random_seed: i64,
    pub log_level: u8,
    pub clients: Vec<String>,
    pub vector_dir: Option<String>,
}

impl SimConfig {
    /// Reads `LABU_SIMULATOR`, `LABU_TEST_PATTERN`, `LABU_PARALLELISM`,
    /// `LABU_RANDOM_SEED`, `LABU_LOGLEVEL`, `LABU_CLIENTS`, `LABU_VECTOR_DIR`.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("LABU_SIMULATOR")
            .map_err(|_| SdkError::Config("LABU_SIMULATOR is not set".into()))?;

        let test_filter = match std::env::var("LABU_TEST_PATTERN") {
            Ok(pattern) if !pattern.is_empty() => Some(
                Regex::new(&pattern)
                    .map_err(|e| SdkError::Config(format!("invalid LABU_TEST_PATTERN: {e}")))?,
            ),
            _ => None,
        };

        let parallelism = env_u32("LABU_PARALLELISM", 1);
        let random_seed = env_i64("LABU_RANDOM_SEED", 0);
        let log_level = env_u32("LABU_LOGLEVEL", 3) as u8;

        let clients = std::env::var("LABU_CLIENTS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let vector_dir = std::env::var("LABU_VECTOR_DIR").ok().filter(|s| !s.is_empty());

        Ok(Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            test_filter,
            parallelism,
            random_seed,
            log_level,
            clients,
            vector_dir,
        })
    }
}

fn env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_i64(name: &str, default: i64) -> i64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
