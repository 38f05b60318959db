//! Thin async HTTP client over the control-plane protocol.

use std::collections::HashMap;

use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::SimConfig;
use crate::error::{Result, SdkError};

#[derive(Debug, Clone, Default, Serialize)]
pub struct LaunchSpec {
    pub client: String,
    #[serde(default)]
    pub networks: Vec<String>,
    #[serde(default)]
    pub environment: HashMap<String, String>,
    #[serde(skip)]
    pub files: HashMap<String, Vec<u8>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LaunchedNode {
    pub id: String,
    pub ip: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecOutput {
    #[serde(rename = "exitCode")]
    pub exit_code: i64,
    pub stdout: String,
    pub stderr: String,
}

/// Talks to exactly one control-plane server; holds no suite/test state of
/// its own beyond the ids it is handed back.
#[derive(Clone)]
pub struct SimClient {
    http: HttpClient,
    base_url: String,
}

impl SimClient {
    pub fn new(config: &SimConfig) -> Result<Self> {
        let http = HttpClient::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn create_suite(&self, name: &str, description: &str) -> Result<u64> {
        let value: Value = self
            .post_json(&format!("{}/testsuite", self.base_url), &json!({"name": name, "description": description}))
            .await?;
        value.as_u64().ok_or_else(|| SdkError::Api {
            status: 200,
            message: "expected a numeric suite id".into(),
        })
    }

    pub async fn end_suite(&self, suite_id: u64) -> Result<()> {
        self.delete(&format!("{}/testsuite/{suite_id}", self.base_url)).await?;
        Ok(())
    }

    pub async fn create_test(&self, suite_id: u64, name: &str, description: &str) -> Result<u64> {
        let value: Value = self
            .post_json(
                &format!("{}/testsuite/{suite_id}/test", self.base_url),
                &json!({"name": name, "description": description}),
            )
            .await?;
        value.as_u64().ok_or_else(|| SdkError::Api {
            status: 200,
            message: "expected a numeric test id".into(),
        })
    }

    pub async fn end_test(&self, suite_id: u64, test_id: u64, pass: bool, details: &str) -> Result<()> {
        self.post_json::<Value>(
            &format!("{}/testsuite/{suite_id}/test/{test_id}", self.base_url),
            &json!({"pass": pass, "details": details}),
        )
        .await?;
        Ok(())
    }

    pub async fn launch_node(&self, suite_id: u64, test_id: u64, spec: &LaunchSpec) -> Result<LaunchedNode> {
        let config = json!({
            "client": spec.client,
            "networks": spec.networks,
            "environment": spec.environment,
        })
        .to_string();

        let mut form = reqwest::multipart::Form::new().text("config", config);
        for (name, bytes) in &spec.files {
            form = form.part(
                name.clone(),
                reqwest::multipart::Part::bytes(bytes.clone()).file_name(name.clone()),
            );
        }

        let url = format!("{}/testsuite/{suite_id}/test/{test_id}/node", self.base_url);
        tracing::debug!(%url, client = %spec.client, files = spec.files.len(), "launching node");
        let response = self.http.post(&url).multipart(form).send().await?;
        Self::decode(response).await
    }

    pub async fn remove_node(&self, suite_id: u64, test_id: u64, node_id: &str) -> Result<()> {
        self.delete(&format!(
            "{}/testsuite/{suite_id}/test/{test_id}/node/{node_id}",
            self.base_url
        ))
        .await?;
        Ok(())
    }

    pub async fn exec(&self, suite_id: u64, test_id: u64, node_id: &str, command: &[String]) -> Result<ExecOutput> {
        self.post_json(
            &format!(
                "{}/testsuite/{suite_id}/test/{test_id}/node/{node_id}/exec",
                self.base_url
            ),
            &json!({"command": command}),
        )
        .await
    }

    async fn post_json<T: for<'de> Deserialize<'de>>(&self, url: &str, body: &Value) -> Result<T> {
        tracing::debug!(%url, "POST");
        let response = self.http.post(url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn delete(&self, url: &str) -> Result<Value> {
        tracing::debug!(%url, "DELETE");
        let response = self.http.delete(url).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status.is_success() {
            tracing::debug!(%status, "request succeeded");
            serde_json::from_str(&body).map_err(|e| SdkError::Api {
                status: status.as_u16(),
                message: format!("could not decode response: {e}"),
            })
        } else {
            let message = extract_error_message(&body, status);
            tracing::warn!(%status, %message, "request failed");
            Err(SdkError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

fn extract_error_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| {
            if body.is_empty() {
                status.to_string()
            } else {
                body.to_string()
            }
        })
}
