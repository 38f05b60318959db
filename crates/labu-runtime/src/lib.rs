//! The container runtime adapter: a capability set over a container engine.
//!
//! The core never depends on a specific engine. It depends on this trait —
//! build an image, run a container detached, exec inside it, stop/remove it,
//! wait for it to exit, fetch its logs, and manage overlay networks. The
//! reference implementation in [`cli`] shells out to the `docker`/`podman`
//! CLI; any backend satisfying [`ContainerRuntime`] is acceptable, which is
//! why tests exercise [`mock::MockRuntime`] instead of a real engine.

pub mod cli;
mod error;
pub mod mock;
mod types;

pub use error::*;
pub use types::*;

use async_trait::async_trait;

/// Capability set the Controller needs from a container engine.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Build an image from a Dockerfile. Idempotent: building the same
    /// context/tag twice is safe and simply re-tags.
    async fn build(&self, config: &BuildConfig) -> Result<ImageId>;

    /// Start a new container in detached mode, returning its id.
    async fn run_detached(&self, config: &RunConfig) -> Result<ContainerId>;

    /// Execute a command inside a running container and collect its output.
    async fn exec(&self, id: &ContainerId, config: &ExecConfig) -> Result<ExecResult>;

    /// Stop a running container, killing it after `timeout` seconds.
    async fn stop(&self, id: &ContainerId, timeout: Option<u32>) -> Result<()>;

    /// Remove a container. Best-effort at the call sites that use it.
    async fn remove(&self, id: &ContainerId) -> Result<()>;

    /// Block until the container exits, returning its exit code.
    async fn wait(&self, id: &ContainerId) -> Result<i64>;

    /// Fetch the full captured log output of a container.
    async fn logs(&self, id: &ContainerId) -> Result<String>;

    /// Create an overlay network. Idempotent: creating an existing network
    /// by name is not an error.
    async fn create_network(&self, name: &str) -> Result<()>;

    /// Remove an overlay network. Removing an absent network is not an error.
    async fn remove_network(&self, name: &str) -> Result<()>;

    /// Attach a running container to a network.
    async fn connect_network(&self, name: &str, id: &ContainerId) -> Result<()>;

    /// Detach a running container from a network.
    async fn disconnect_network(&self, name: &str, id: &ContainerId) -> Result<()>;

    /// Query the IP a container was assigned on a given network.
    async fn container_ip(&self, network: &str, id: &ContainerId) -> Result<String>;
}
