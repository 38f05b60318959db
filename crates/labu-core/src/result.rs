//! The per-run result document.
//!
//! A [`SuiteResult`] is an accumulator, not a projection of the live
//! [`crate::model::Suite`]: it is created alongside the suite and retained
//! for the life of the run even after the suite is deleted, so that results
//! survive early teardown.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `{ip, name, instantiatedAt, logFile}` snapshot of a node, captured at
/// `EndTest` time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub ip: String,
    pub name: String,
    #[serde(rename = "instantiatedAt")]
    pub instantiated_at: DateTime<Utc>,
    #[serde(rename = "logFile")]
    pub log_file: String,
}

/// Pass/fail verdict plus free-form details, as reported to `EndTest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResult {
    pub pass: bool,
    pub details: String,
}

/// One finalized test's entry in a [`SuiteResult`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCaseResult {
    pub name: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(rename = "summaryResult")]
    pub summary_result: SummaryResult,
    #[serde(rename = "clientInfo")]
    pub client_info: HashMap<String, ClientInfo>,
}

/// The accumulated outcome of one suite, written to `results/suite-<id>.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub id: u64,
    pub name: String,
    pub description: String,
    #[serde(rename = "clientVersions")]
    pub client_versions: HashMap<String, String>,
    #[serde(rename = "simLog")]
    pub sim_log: String,
    #[serde(rename = "testCases")]
    pub test_cases: HashMap<String, TestCaseResult>,
}

impl SuiteResult {
    pub fn new(id: u64, name: String, description: String, clients: &[String]) -> Self {
        let client_versions = clients
            .iter()
            .map(|name| (name.clone(), String::new()))
            .collect();
        Self {
            id,
            name,
            description,
            client_versions,
            sim_log: String::new(),
            test_cases: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_spec_field_names() {
        let mut result = SuiteResult::new(1, "rpc".into(), "".into(), &["geth".into()]);
        result.test_cases.insert(
            "1".into(),
            TestCaseResult {
                name: "a".into(),
                description: String::new(),
                start: Utc::now(),
                end: Utc::now(),
                summary_result: SummaryResult {
                    pass: true,
                    details: String::new(),
                },
                client_info: HashMap::new(),
            },
        );
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("clientVersions").is_some());
        assert!(json["testCases"]["1"].get("summaryResult").is_some());
    }
}
