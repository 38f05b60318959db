//! Test-only helpers for constructing a [`Controller`] wired to
//! [`labu_runtime::mock::MockRuntime`] instead of a real engine.

use crate::controller::{Controller, ControllerConfig};
use labu_config::ClientDefinition;
use labu_runtime::mock::MockRuntime;
use labu_runtime::ContainerRuntime;
use serde_json::json;
use std::sync::Arc;

/// A Controller over a fresh temp workspace, seeded with one
/// [`ClientDefinition`] per name in `client_names`.
pub fn test_controller(client_names: &[&str]) -> Controller {
    test_controller_with_runtime(client_names).0
}

/// Like [`test_controller`], but also returns the `MockRuntime` handle so a
/// test can inspect call history (mounts passed to `run_detached`, network
/// create call counts) rather than only the Controller's own state.
pub fn test_controller_with_runtime(client_names: &[&str]) -> (Controller, Arc<MockRuntime>) {
    let workspace = tempfile::tempdir().expect("tempdir").into_path();
    let clients = client_names
        .iter()
        .map(|name| ClientDefinition {
            name: name.to_string(),
            build_dir: workspace.join(name),
            metadata: json!({}),
        })
        .collect();

    let mock = Arc::new(MockRuntime::new());
    let runtime: Arc<dyn ContainerRuntime> = mock.clone();
    let controller = Controller::with_runtime(
        runtime,
        ControllerConfig {
            clients,
            run_clients: client_names.iter().map(|s| s.to_string()).collect(),
            image_overrides: Default::default(),
            workspace,
            default_network: "devnet".to_string(),
        },
    );
    (controller, mock)
}
