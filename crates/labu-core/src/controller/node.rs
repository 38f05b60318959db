//! Node (client container) lifecycle operations: launch, remove, inspect,
//! and exec.

use super::Controller;
use crate::model::Node;
use crate::{CoreError, Result};
use chrono::Utc;
use labu_runtime::{BuildConfig, ContainerId, ExecConfig, ExecResult, MountSpec, RunConfig};
use std::collections::HashMap;

const IMAGE_PREFIX: &str = "labu";

/// `{client, networks, environment}` as received on `POST .../node`.
#[derive(Debug, Clone, Default)]
pub struct LaunchNodeSpec {
    pub client: String,
    pub networks: Vec<String>,
    pub environment: HashMap<String, String>,
}

/// `{id, ip}` returned on a successful launch.
#[derive(Debug, Clone)]
pub struct LaunchedNode {
    pub id: String,
    pub ip: String,
}

/// Result of [`Controller::node_info`]: either a full snapshot of a known
/// node, or just the requested id when nothing matches — a diagnostic
/// fallback, not an authoritative lookup.
#[derive(Debug, Clone)]
pub enum NodeInfoResult {
    Found(Node),
    Unknown { id: String },
}

impl Controller {
    /// Launch a client container for `test_id` in `suite_id`.
    ///
    /// `files` maps the declared mount filename to its uploaded bytes;
    /// duplicate keys are the caller's responsibility to resolve (the HTTP
    /// layer keeps only the last upload per form key).
    pub async fn launch_node(
        &self,
        suite_id: u64,
        test_id: u64,
        spec: LaunchNodeSpec,
        files: HashMap<String, Vec<u8>>,
    ) -> Result<LaunchedNode> {
        let build_dir = {
            let state = self.state.lock().unwrap();
            let suite = state
                .suites
                .get(&suite_id)
                .ok_or_else(|| CoreError::NotFound(format!("suite {suite_id} not found")))?;
            if !suite.tests.contains_key(&test_id) {
                return Err(CoreError::NotFound(format!("test {test_id} not found")));
            }
            self.clients
                .get(&spec.client)
                .ok_or_else(|| CoreError::UnknownClient(spec.client.clone()))?
                .build_dir
                .clone()
        };

        let tag = match self.image_overrides.get(&spec.client) {
            Some(tag) => tag.clone(),
            None => {
                let tag = format!("{IMAGE_PREFIX}-client-{}", spec.client);
                self.runtime
                    .build(&BuildConfig {
                        context: build_dir,
                        dockerfile: "Dockerfile".to_string(),
                        tag: tag.clone(),
                        ..Default::default()
                    })
                    .await?;
                tag
            }
        };

        let node_dir = self
            .workspace
            .join("nodes")
            .join(format!("suite-{suite_id}"))
            .join(format!("test-{test_id}"));
        std::fs::create_dir_all(&node_dir)?;
        for (name, bytes) in &files {
            std::fs::write(node_dir.join(name), bytes)?;
        }

        let network = spec
            .networks
            .first()
            .cloned()
            .unwrap_or_else(|| self.default_network.clone());

        let mut env = spec.environment;
        env.entry("LABU_FILES_DIR".to_string())
            .or_insert_with(|| "/labu-files".to_string());
        env.entry("LABU_STATE_DIR".to_string())
            .or_insert_with(|| "/state".to_string());
        env.entry("LABU_NETWORK".to_string())
            .or_insert_with(|| network.clone());

        let container_id = self
            .runtime
            .run_detached(&RunConfig {
                image: tag,
                network: Some(network.clone()),
                env,
                mounts: vec![MountSpec {
                    source: node_dir.clone(),
                    target: "/labu-files".to_string(),
                    read_only: true,
                }],
                ..Default::default()
            })
            .await?;

        let ip = self
            .runtime
            .container_ip(&network, &container_id)
            .await?;

        let log_file = format!("nodes/suite-{suite_id}/test-{test_id}/{container_id}.log");

        {
            let mut state = self.state.lock().unwrap();
            if let Some(suite) = state.suites.get_mut(&suite_id) {
                if let Some(test) = suite.tests.get_mut(&test_id) {
                    test.nodes.insert(
                        container_id.0.clone(),
                        Node {
                            id: container_id.clone(),
                            client_name: spec.client.clone(),
                            ip: ip.clone(),
                            instantiated_at: Utc::now(),
                            log_file,
                        },
                    );
                }
            }
        }

        Ok(LaunchedNode {
            id: container_id.0,
            ip,
        })
    }

    /// Best-effort removal: the adapter is always asked to remove the
    /// container, and the tracking record is dropped wherever it is found.
    pub async fn remove_node(&self, container_id: &str) {
        {
            let mut state = self.state.lock().unwrap();
            for suite in state.suites.values_mut() {
                for test in suite.tests.values_mut() {
                    test.nodes.remove(container_id);
                }
            }
        }
        if let Err(e) = self.runtime.remove(&ContainerId::new(container_id)).await {
            tracing::warn!(container = %container_id, error = %e, "failed to remove node container");
        }
    }

    /// Scan all suites/tests for a node. A diagnostic lookup, not
    /// authoritative: an unknown id returns `{id}` rather than an error.
    pub fn node_info(&self, container_id: &str) -> NodeInfoResult {
        let state = self.state.lock().unwrap();
        for suite in state.suites.values() {
            for test in suite.tests.values() {
                if let Some(node) = test.nodes.get(container_id) {
                    return NodeInfoResult::Found(node.clone());
                }
            }
        }
        NodeInfoResult::Unknown {
            id: container_id.to_string(),
        }
    }

    /// Pure pass-through to the adapter.
    pub async fn docker_exec(&self, container_id: &str, command: Vec<String>) -> Result<ExecResult> {
        let result = self
            .runtime
            .exec(&ContainerId::new(container_id), &ExecConfig { cmd: command })
            .await?;
        Ok(result)
    }

}
