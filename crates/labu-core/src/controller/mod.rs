//! The Controller: sole owner of mutable run state.
//!
//! All public operations acquire a single coarse mutex for the duration of
//! any map lookup or mutation. Long-running adapter calls (build, run, exec)
//! are issued with the mutex released, after copying out whatever inputs
//! they need — see [`node`] for the canonical example, `LaunchNode`.

mod network;
mod node;

pub use network::*;
pub use node::*;

use crate::model::{ClientDefinition, Suite, Test};
use crate::result::SuiteResult;
use crate::{CoreError, Result};
use chrono::Utc;
use labu_runtime::ContainerRuntime;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Everything behind the lock. No map operation here spans an `.await`
/// point, so a standard-library mutex is the right tool — no need to pay for
/// an async-aware one.
pub(crate) struct ControllerState {
    pub(crate) suites: HashMap<u64, Suite>,
    pub(crate) results: HashMap<u64, SuiteResult>,
    pub(crate) networks: HashSet<String>,
    pub(crate) next_suite_id: u64,
    pub(crate) next_test_id: u64,
}

/// Read-only configuration the Controller was started with.
pub struct ControllerConfig {
    pub clients: Vec<ClientDefinition>,
    pub run_clients: Vec<String>,
    pub image_overrides: HashMap<String, String>,
    pub workspace: PathBuf,
    pub default_network: String,
}

pub struct Controller {
    pub(crate) state: Mutex<ControllerState>,
    pub(crate) runtime: Arc<dyn ContainerRuntime>,
    pub(crate) clients: HashMap<String, ClientDefinition>,
    pub(crate) run_clients: Vec<String>,
    pub(crate) image_overrides: HashMap<String, String>,
    pub(crate) workspace: PathBuf,
    pub(crate) default_network: String,
}

impl Controller {
    pub fn new(runtime: Box<dyn ContainerRuntime>, config: ControllerConfig) -> Self {
        Self::with_runtime(Arc::from(runtime), config)
    }

    /// Like [`Controller::new`], but takes an already-shared runtime handle
    /// so a caller (tests, mainly) can keep its own clone to inspect call
    /// history after the Controller is built.
    pub fn with_runtime(runtime: Arc<dyn ContainerRuntime>, config: ControllerConfig) -> Self {
        let clients = config
            .clients
            .into_iter()
            .map(|c| (c.name.clone(), c))
            .collect();

        Self {
            state: Mutex::new(ControllerState {
                suites: HashMap::new(),
                results: HashMap::new(),
                networks: HashSet::new(),
                next_suite_id: 1,
                next_test_id: 1,
            }),
            runtime,
            clients,
            run_clients: config.run_clients,
            image_overrides: config.image_overrides,
            workspace: config.workspace,
            default_network: config.default_network,
        }
    }

    /// Snapshot of the client definitions the Controller was seeded with.
    pub fn list_clients(&self) -> Vec<ClientDefinition> {
        let mut clients: Vec<_> = self.clients.values().cloned().collect();
        clients.sort_by(|a, b| a.name.cmp(&b.name));
        clients
    }

    pub fn create_suite(&self, name: &str, description: &str) -> u64 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_suite_id;
        state.next_suite_id += 1;

        state.suites.insert(
            id,
            Suite {
                id,
                name: name.to_string(),
                description: description.to_string(),
                tests: HashMap::new(),
            },
        );
        state.results.insert(
            id,
            SuiteResult::new(
                id,
                name.to_string(),
                description.to_string(),
                &self.run_clients,
            ),
        );
        id
    }

    /// Removes the live `Suite`; the accumulated `SuiteResult` is retained.
    pub fn end_suite(&self, suite_id: u64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state
            .suites
            .remove(&suite_id)
            .ok_or_else(|| CoreError::NotFound(format!("suite {suite_id} not found")))?;
        Ok(())
    }

    pub fn create_test(&self, suite_id: u64, name: &str, description: &str) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        if !state.suites.contains_key(&suite_id) {
            return Err(CoreError::NotFound(format!("suite {suite_id} not found")));
        }
        let id = state.next_test_id;
        state.next_test_id += 1;

        let suite = state.suites.get_mut(&suite_id).unwrap();
        suite.tests.insert(
            id,
            Test {
                id,
                name: name.to_string(),
                description: description.to_string(),
                start: Utc::now(),
                nodes: HashMap::new(),
            },
        );
        Ok(id)
    }

    /// Finalizes a test: records the verdict, snapshots node info into the
    /// suite's result, then removes the test's node containers outside the
    /// lock (best-effort; failures are logged, not propagated).
    pub async fn end_test(
        &self,
        suite_id: u64,
        test_id: u64,
        pass: bool,
        details: &str,
    ) -> Result<()> {
        let node_ids: Vec<labu_runtime::ContainerId> = {
            let mut state = self.state.lock().unwrap();
            let suite = state
                .suites
                .get_mut(&suite_id)
                .ok_or_else(|| CoreError::NotFound(format!("suite {suite_id} not found")))?;
            let test = suite
                .tests
                .remove(&test_id)
                .ok_or_else(|| CoreError::NotFound(format!("test {test_id} not found")))?;

            let client_info = test
                .nodes
                .iter()
                .map(|(id, node)| {
                    (
                        id.clone(),
                        crate::result::ClientInfo {
                            ip: node.ip.clone(),
                            name: node.client_name.clone(),
                            instantiated_at: node.instantiated_at,
                            log_file: node.log_file.clone(),
                        },
                    )
                })
                .collect();

            let case = crate::result::TestCaseResult {
                name: test.name.clone(),
                description: test.description.clone(),
                start: test.start,
                end: Utc::now(),
                summary_result: crate::result::SummaryResult {
                    pass,
                    details: details.to_string(),
                },
                client_info,
            };

            if let Some(result) = state.results.get_mut(&suite_id) {
                result.test_cases.insert(test_id.to_string(), case);
            }

            test.nodes.into_values().map(|n| n.id).collect()
        };

        for id in node_ids {
            if let Err(e) = self.runtime.remove(&id).await {
                tracing::warn!(container = %id, error = %e, "failed to remove node container on test end");
            }
        }
        Ok(())
    }

    pub fn set_sim_log(&self, filename: &str) {
        let mut state = self.state.lock().unwrap();
        for result in state.results.values_mut() {
            result.sim_log = filename.to_string();
        }
    }

    pub fn set_client_versions(&self, names: &[String]) {
        let mut state = self.state.lock().unwrap();
        for result in state.results.values_mut() {
            for name in names {
                result.client_versions.entry(name.clone()).or_default();
            }
        }
    }

    /// Serializes every `SuiteResult` currently held, one document per suite.
    pub fn snapshot_results(&self) -> Vec<SuiteResult> {
        let state = self.state.lock().unwrap();
        state.results.values().cloned().collect()
    }

    pub fn workspace(&self) -> &std::path::Path {
        &self.workspace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_controller;

    #[tokio::test]
    async fn suite_and_test_ids_are_monotonic() {
        let controller = test_controller(&["geth"]);
        let s1 = controller.create_suite("a", "");
        let s2 = controller.create_suite("b", "");
        assert!(s2 > s1);

        let t1 = controller.create_test(s1, "t1", "").unwrap();
        let t2 = controller.create_test(s1, "t2", "").unwrap();
        assert!(t2 > t1);
    }

    #[tokio::test]
    async fn end_suite_keeps_the_result_document() {
        let controller = test_controller(&["geth"]);
        let suite_id = controller.create_suite("rpc", "desc");
        controller.end_suite(suite_id).unwrap();

        let results = controller.snapshot_results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, suite_id);
    }

    #[tokio::test]
    async fn end_suite_unknown_id_is_not_found() {
        let controller = test_controller(&["geth"]);
        let err = controller.end_suite(42).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_test_on_unknown_suite_is_not_found() {
        let controller = test_controller(&["geth"]);
        let err = controller.create_test(42, "t", "").unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn end_test_records_result_and_removes_suite_entry() {
        let controller = test_controller(&["geth"]);
        let suite_id = controller.create_suite("rpc", "");
        let test_id = controller.create_test(suite_id, "a", "").unwrap();
        controller
            .end_test(suite_id, test_id, true, "")
            .await
            .unwrap();

        let results = controller.snapshot_results();
        let result = results.iter().find(|r| r.id == suite_id).unwrap();
        assert!(result.test_cases.contains_key(&test_id.to_string()));
        assert!(result.test_cases[&test_id.to_string()].summary_result.pass);
    }

    #[tokio::test]
    async fn create_suite_seeds_client_versions_from_run_config() {
        let controller = test_controller(&["geth", "besu"]);
        let suite_id = controller.create_suite("rpc", "");
        let results = controller.snapshot_results();
        let result = results.iter().find(|r| r.id == suite_id).unwrap();
        assert_eq!(result.client_versions.len(), 2);
        assert_eq!(result.client_versions.get("geth"), Some(&String::new()));
    }
}
