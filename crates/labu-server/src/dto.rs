//! Wire-level JSON/multipart shapes. These are deliberately separate from
//! `labu_core`'s model types: the server owns the on-the-wire representation,
//! the core owns the domain representation.

use labu_core::{LaunchNodeSpec, Node, NodeInfoResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct CreateSuiteRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateTestRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct EndTestRequest {
    pub pass: bool,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Deserialize)]
pub struct ExecRequest {
    pub command: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ExecResponse {
    #[serde(rename = "exitCode")]
    pub exit_code: i64,
    pub stdout: String,
    pub stderr: String,
}

impl From<labu_runtime::ExecResult> for ExecResponse {
    fn from(r: labu_runtime::ExecResult) -> Self {
        Self {
            exit_code: r.exit_code,
            stdout: r.stdout,
            stderr: r.stderr,
        }
    }
}

/// The JSON body of the `config` multipart part on `POST .../node`.
#[derive(Debug, Deserialize)]
pub struct LaunchNodeConfig {
    pub client: String,
    #[serde(default)]
    pub networks: Vec<String>,
    #[serde(default)]
    pub environment: HashMap<String, String>,
}

impl From<LaunchNodeConfig> for LaunchNodeSpec {
    fn from(cfg: LaunchNodeConfig) -> Self {
        LaunchNodeSpec {
            client: cfg.client,
            networks: cfg.networks,
            environment: cfg.environment,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LaunchedNodeResponse {
    pub id: String,
    pub ip: String,
}

impl From<labu_core::LaunchedNode> for LaunchedNodeResponse {
    fn from(n: labu_core::LaunchedNode) -> Self {
        Self { id: n.id, ip: n.ip }
    }
}

#[derive(Debug, Serialize)]
pub struct NodeInfoResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(rename = "instantiatedAt", skip_serializing_if = "Option::is_none")]
    pub instantiated_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(rename = "logFile", skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
}

impl From<NodeInfoResult> for NodeInfoResponse {
    fn from(result: NodeInfoResult) -> Self {
        match result {
            NodeInfoResult::Found(Node {
                id,
                client_name,
                ip,
                instantiated_at,
                log_file,
            }) => NodeInfoResponse {
                id: id.0,
                name: Some(client_name),
                ip: Some(ip),
                instantiated_at: Some(instantiated_at),
                log_file: Some(log_file),
            },
            NodeInfoResult::Unknown { id } => NodeInfoResponse {
                id,
                name: None,
                ip: None,
                instantiated_at: None,
                log_file: None,
            },
        }
    }
}
