//! Common types exchanged with the container runtime adapter

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Opaque container id, also used as the runtime handle for the container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(pub String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn short(&self) -> &str {
        if self.0.len() > 12 {
            &self.0[..12]
        } else {
            &self.0
        }
    }
}

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ContainerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Image tag or id returned by a build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub String);

impl ImageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which container CLI a [`crate::cli::CliRuntime`] drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeKind {
    Docker,
    Podman,
}

impl std::fmt::Display for RuntimeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Docker => write!(f, "docker"),
            Self::Podman => write!(f, "podman"),
        }
    }
}

impl std::str::FromStr for RuntimeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "docker" => Ok(Self::Docker),
            "podman" => Ok(Self::Podman),
            _ => Err(format!("unknown runtime kind: {s}")),
        }
    }
}

/// Build configuration for creating images from a Dockerfile.
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    /// Path to the build context directory.
    pub context: PathBuf,
    /// Dockerfile path, relative to `context` unless absolute (used when the
    /// build context has been redirected away from the Dockerfile's own
    /// directory).
    pub dockerfile: String,
    /// Tag to apply to the built image.
    pub tag: String,
    /// Build-time arguments (`--build-arg`).
    pub build_args: HashMap<String, String>,
    /// Labels to apply to the built image.
    pub labels: HashMap<String, String>,
    /// Don't use layer cache.
    pub no_cache: bool,
}

/// A bind mount passed to [`ContainerRuntime::run_detached`].
#[derive(Debug, Clone)]
pub struct MountSpec {
    /// Host-side source path.
    pub source: PathBuf,
    /// Path inside the container.
    pub target: String,
    pub read_only: bool,
}

/// Configuration for launching a detached container.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Image to run.
    pub image: String,
    /// Container name, auto-generated by the runtime when absent.
    pub name: Option<String>,
    /// Overlay network to attach on creation.
    pub network: Option<String>,
    /// Environment variables.
    pub env: HashMap<String, String>,
    /// Bind mounts.
    pub mounts: Vec<MountSpec>,
    /// Labels applied to the container.
    pub labels: HashMap<String, String>,
    /// Command override; `None` uses the image's entrypoint/cmd.
    pub cmd: Option<Vec<String>>,
}

/// Configuration for a one-shot exec inside a running container.
#[derive(Debug, Clone, Default)]
pub struct ExecConfig {
    pub cmd: Vec<String>,
}

/// Result of an exec call, with stdout/stderr captured separately.
#[derive(Debug, Clone)]
pub struct ExecResult {
    pub exit_code: i64,
    pub stdout: String,
    pub stderr: String,
}
