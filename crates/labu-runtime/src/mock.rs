//! In-memory [`ContainerRuntime`] used by the Controller's own tests and by
//! simulators authors who want to exercise the control plane without a real
//! engine. A mock is the correct target here: the capability set is a sum of
//! operations, not an inheritance tree, so faking it is trivial.

use crate::{
    BuildConfig, ContainerId, ContainerRuntime, ExecConfig, ExecResult, ImageId, Result,
    RunConfig, RuntimeError,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone)]
struct MockContainer {
    network: Option<String>,
    ip: String,
}

/// Records every call it receives and fabricates plausible results, so tests
/// can assert both on the Controller's view of the world and on what it told
/// the runtime to do.
#[derive(Default)]
pub struct MockRuntime {
    next_id: AtomicU64,
    containers: Mutex<HashMap<String, MockContainer>>,
    networks: Mutex<Vec<String>>,
    pub removed: Mutex<Vec<ContainerId>>,
    pub built: Mutex<Vec<BuildConfig>>,
    /// Every `run_detached` call, in order, including mounts and env -
    /// unlike `containers`, this is never pruned on `remove`.
    pub run_detached_calls: Mutex<Vec<RunConfig>>,
    /// Every `create_network` call, in order, before the idempotency check -
    /// a repeated name still appends here even though it's a no-op on
    /// `networks`.
    pub network_create_calls: Mutex<Vec<String>>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        format!("{prefix}-{n:06}")
    }
}

#[async_trait]
impl ContainerRuntime for MockRuntime {
    async fn build(&self, config: &BuildConfig) -> Result<ImageId> {
        self.built.lock().unwrap().push(config.clone());
        Ok(ImageId::new(config.tag.clone()))
    }

    async fn run_detached(&self, config: &RunConfig) -> Result<ContainerId> {
        self.run_detached_calls.lock().unwrap().push(config.clone());
        let id = self.fresh_id("ctr");
        let ip = format!("10.0.{}.{}", 0, (self.containers.lock().unwrap().len() + 2));
        self.containers.lock().unwrap().insert(
            id.clone(),
            MockContainer {
                network: config.network.clone(),
                ip,
            },
        );
        Ok(ContainerId::new(id))
    }

    async fn exec(&self, id: &ContainerId, config: &ExecConfig) -> Result<ExecResult> {
        if !self.containers.lock().unwrap().contains_key(&id.0) {
            return Err(RuntimeError::ContainerNotFound(id.0.clone()));
        }
        Ok(ExecResult {
            exit_code: 0,
            stdout: format!("{}\n", config.cmd.join(" ")),
            stderr: String::new(),
        })
    }

    async fn stop(&self, id: &ContainerId, _timeout: Option<u32>) -> Result<()> {
        if !self.containers.lock().unwrap().contains_key(&id.0) {
            return Err(RuntimeError::ContainerNotFound(id.0.clone()));
        }
        Ok(())
    }

    async fn remove(&self, id: &ContainerId) -> Result<()> {
        self.containers.lock().unwrap().remove(&id.0);
        self.removed.lock().unwrap().push(id.clone());
        Ok(())
    }

    async fn wait(&self, _id: &ContainerId) -> Result<i64> {
        Ok(0)
    }

    async fn logs(&self, _id: &ContainerId) -> Result<String> {
        Ok(String::new())
    }

    async fn create_network(&self, name: &str) -> Result<()> {
        self.network_create_calls.lock().unwrap().push(name.to_string());
        let mut networks = self.networks.lock().unwrap();
        if !networks.iter().any(|n| n == name) {
            networks.push(name.to_string());
        }
        Ok(())
    }

    async fn remove_network(&self, name: &str) -> Result<()> {
        self.networks.lock().unwrap().retain(|n| n != name);
        Ok(())
    }

    async fn connect_network(&self, name: &str, id: &ContainerId) -> Result<()> {
        let mut containers = self.containers.lock().unwrap();
        let container = containers
            .get_mut(&id.0)
            .ok_or_else(|| RuntimeError::ContainerNotFound(id.0.clone()))?;
        container.network = Some(name.to_string());
        Ok(())
    }

    async fn disconnect_network(&self, _name: &str, id: &ContainerId) -> Result<()> {
        let mut containers = self.containers.lock().unwrap();
        let container = containers
            .get_mut(&id.0)
            .ok_or_else(|| RuntimeError::ContainerNotFound(id.0.clone()))?;
        container.network = None;
        Ok(())
    }

    async fn container_ip(&self, _network: &str, id: &ContainerId) -> Result<String> {
        self.containers
            .lock()
            .unwrap()
            .get(&id.0)
            .map(|c| c.ip.clone())
            .ok_or_else(|| RuntimeError::ContainerNotFound(id.0.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn run_then_remove_tracks_calls() {
        let runtime = MockRuntime::new();
        let id = runtime
            .run_detached(&RunConfig {
                image: "client:latest".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(runtime.container_ip("net", &id).await.is_ok());
        runtime.remove(&id).await.unwrap();
        assert_eq!(runtime.removed.lock().unwrap().len(), 1);
        assert!(runtime.container_ip("net", &id).await.is_err());
    }

    #[tokio::test]
    async fn create_network_is_idempotent() {
        let runtime = MockRuntime::new();
        runtime.create_network("devnet").await.unwrap();
        runtime.create_network("devnet").await.unwrap();
        assert_eq!(runtime.networks.lock().unwrap().len(), 1);
        assert_eq!(runtime.network_create_calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn run_detached_records_mounts_and_env() {
        let runtime = MockRuntime::new();
        runtime
            .run_detached(&RunConfig {
                image: "client:latest".into(),
                mounts: vec![crate::MountSpec {
                    source: "/host/files".into(),
                    target: "/labu-files".into(),
                    read_only: true,
                }],
                ..Default::default()
            })
            .await
            .unwrap();

        let calls = runtime.run_detached_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].mounts[0].target, "/labu-files");
    }
}
