//! Route handlers: thin translation from HTTP requests into `Controller`
//! calls, with no business logic of their own.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use labu_core::Controller;
use serde_json::{json, Value};

use crate::dto::{
    CreateSuiteRequest, CreateTestRequest, EndTestRequest, ExecRequest, ExecResponse,
    LaunchNodeConfig, LaunchedNodeResponse, NodeInfoResponse,
};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::results::flush_results;

pub type AppState = Arc<Controller>;

pub async fn list_clients(State(controller): State<AppState>) -> Json<Value> {
    Json(json!(controller.list_clients()))
}

pub async fn create_suite(
    State(controller): State<AppState>,
    ApiJson(req): ApiJson<CreateSuiteRequest>,
) -> Json<Value> {
    let id = controller.create_suite(&req.name, &req.description);
    Json(json!(id))
}

pub async fn end_suite(
    State(controller): State<AppState>,
    ApiPath(suite_id): ApiPath<u64>,
) -> Result<Json<Value>, ApiError> {
    controller.end_suite(suite_id)?;
    Ok(Json(json!("ok")))
}

pub async fn create_test(
    State(controller): State<AppState>,
    ApiPath(suite_id): ApiPath<u64>,
    ApiJson(req): ApiJson<CreateTestRequest>,
) -> Result<Json<Value>, ApiError> {
    let id = controller.create_test(suite_id, &req.name, &req.description)?;
    Ok(Json(json!(id)))
}

pub async fn end_test(
    State(controller): State<AppState>,
    ApiPath((suite_id, test_id)): ApiPath<(u64, u64)>,
    ApiJson(req): ApiJson<EndTestRequest>,
) -> Result<Json<Value>, ApiError> {
    controller
        .end_test(suite_id, test_id, req.pass, &req.details)
        .await?;
    if let Err(e) = flush_results(&controller) {
        tracing::warn!(error = %e, "failed to flush results after EndTest");
    }
    Ok(Json(json!("ok")))
}

/// `config` text part (required) plus zero or more file parts, keyed by
/// their destination filename.
pub async fn launch_node(
    State(controller): State<AppState>,
    ApiPath((suite_id, test_id)): ApiPath<(u64, u64)>,
    mut multipart: Multipart,
) -> Result<Json<LaunchedNodeResponse>, ApiError> {
    let mut config: Option<LaunchNodeConfig> = None;
    let mut files: HashMap<String, Vec<u8>> = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field
            .name()
            .ok_or_else(|| ApiError::BadRequest("multipart field missing a name".into()))?
            .to_string();
        if name == "config" {
            let text = field
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            config = Some(
                serde_json::from_str(&text)
                    .map_err(|e| ApiError::BadRequest(format!("invalid config: {e}")))?,
            );
        } else {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            files.insert(name, bytes.to_vec());
        }
    }

    let config = config.ok_or_else(|| ApiError::BadRequest("missing config part".into()))?;
    let launched = controller
        .launch_node(suite_id, test_id, config.into(), files)
        .await?;
    Ok(Json(launched.into()))
}

pub async fn node_info(
    State(controller): State<AppState>,
    ApiPath((_suite_id, _test_id, node_id)): ApiPath<(u64, u64, String)>,
) -> Json<NodeInfoResponse> {
    Json(controller.node_info(&node_id).into())
}

pub async fn remove_node(
    State(controller): State<AppState>,
    ApiPath((_suite_id, _test_id, node_id)): ApiPath<(u64, u64, String)>,
) -> Json<Value> {
    controller.remove_node(&node_id).await;
    Json(json!("ok"))
}

pub async fn node_exec(
    State(controller): State<AppState>,
    ApiPath((_suite_id, _test_id, node_id)): ApiPath<(u64, u64, String)>,
    ApiJson(req): ApiJson<ExecRequest>,
) -> Result<Json<ExecResponse>, ApiError> {
    let result = controller.docker_exec(&node_id, req.command).await?;
    Ok(Json(result.into()))
}

pub async fn create_network(
    State(controller): State<AppState>,
    ApiPath((_suite_id, name)): ApiPath<(u64, String)>,
) -> Result<Json<Value>, ApiError> {
    controller.create_network(&name).await?;
    Ok(Json(json!("ok")))
}

pub async fn remove_network(
    State(controller): State<AppState>,
    ApiPath((_suite_id, name)): ApiPath<(u64, String)>,
) -> Result<Json<Value>, ApiError> {
    controller.remove_network(&name).await?;
    Ok(Json(json!("ok")))
}

pub async fn connect_network(
    State(controller): State<AppState>,
    ApiPath((_suite_id, name, node_id)): ApiPath<(u64, String, String)>,
) -> Result<Json<Value>, ApiError> {
    controller.connect_network(&name, &node_id).await?;
    Ok(Json(json!("ok")))
}

pub async fn disconnect_network(
    State(controller): State<AppState>,
    ApiPath((_suite_id, name, node_id)): ApiPath<(u64, String, String)>,
) -> Result<Json<Value>, ApiError> {
    controller.disconnect_network(&name, &node_id).await?;
    Ok(Json(json!("ok")))
}

pub async fn network_ip(
    State(controller): State<AppState>,
    ApiPath((_suite_id, name, node_id)): ApiPath<(u64, String, String)>,
) -> Result<Json<Value>, ApiError> {
    let ip = controller.network_ip(&name, &node_id).await?;
    Ok(Json(json!(ip)))
}

/// Catches any path the router has no route for; `NotFound` under the same
/// `{"error":"<message>"}` shape every other status code uses.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("no such endpoint".to_string())
}
