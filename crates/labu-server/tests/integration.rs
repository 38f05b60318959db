use std::sync::Arc;

use labu_core::test_support::test_controller;
use serde_json::json;

async fn spawn_test_server(clients: &[&str]) -> (labu_server::ServerHandle, String) {
    let controller = Arc::new(test_controller(clients));
    let handle = labu_server::spawn(controller).await.unwrap();
    let base_url = format!("http://{}", handle.addr);
    (handle, base_url)
}

#[tokio::test]
async fn single_suite_single_passing_test() {
    let (server, base) = spawn_test_server(&["geth"]).await;
    let client = reqwest::Client::new();

    let suite_id: u64 = client
        .post(format!("{base}/testsuite"))
        .json(&json!({"name": "rpc", "description": ""}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(suite_id, 1);

    let test_id: u64 = client
        .post(format!("{base}/testsuite/{suite_id}/test"))
        .json(&json!({"name": "a", "description": ""}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(test_id, 1);

    let resp = client
        .post(format!("{base}/testsuite/{suite_id}/test/{test_id}"))
        .json(&json!({"pass": true, "details": ""}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    server.shutdown().await;
}

#[tokio::test]
async fn create_test_on_unknown_suite_is_404() {
    let (server, base) = spawn_test_server(&["geth"]).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/testsuite/42/test"))
        .json(&json!({"name": "a", "description": ""}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("42"));

    server.shutdown().await;
}

#[tokio::test]
async fn launch_exec_and_remove_node() {
    let (server, base) = spawn_test_server(&["geth"]).await;
    let client = reqwest::Client::new();

    let suite_id: u64 = client
        .post(format!("{base}/testsuite"))
        .json(&json!({"name": "rpc", "description": ""}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let test_id: u64 = client
        .post(format!("{base}/testsuite/{suite_id}/test"))
        .json(&json!({"name": "a", "description": ""}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let config = json!({"client": "geth", "networks": ["n1"], "environment": {}}).to_string();
    let form = reqwest::multipart::Form::new()
        .text("config", config)
        .part(
            "genesis.json",
            reqwest::multipart::Part::bytes(b"{}".to_vec()).file_name("genesis.json"),
        );

    let launched: serde_json::Value = client
        .post(format!("{base}/testsuite/{suite_id}/test/{test_id}/node"))
        .multipart(form)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let node_id = launched["id"].as_str().unwrap().to_string();
    assert!(!launched["ip"].as_str().unwrap().is_empty());

    let exec: serde_json::Value = client
        .post(format!(
            "{base}/testsuite/{suite_id}/test/{test_id}/node/{node_id}/exec"
        ))
        .json(&json!({"command": ["echo", "hi"]}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(exec["exitCode"], 0);

    let end_resp = client
        .post(format!("{base}/testsuite/{suite_id}/test/{test_id}"))
        .json(&json!({"pass": true, "details": ""}))
        .send()
        .await
        .unwrap();
    assert_eq!(end_resp.status(), 200);

    let remove_resp = client
        .delete(format!(
            "{base}/testsuite/{suite_id}/test/{test_id}/node/{node_id}"
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(remove_resp.status(), 200);

    server.shutdown().await;
}

#[tokio::test]
async fn unmatched_path_is_json_404() {
    let (server, base) = spawn_test_server(&["geth"]).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/no/such/route")).send().await.unwrap();
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().is_some());

    server.shutdown().await;
}

#[tokio::test]
async fn malformed_json_body_is_json_400() {
    let (server, base) = spawn_test_server(&["geth"]).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/testsuite"))
        .header("content-type", "application/json")
        .body("{not valid json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().is_some());

    server.shutdown().await;
}

#[tokio::test]
async fn non_numeric_suite_id_is_json_400() {
    let (server, base) = spawn_test_server(&["geth"]).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/testsuite/not-a-number/test"))
        .json(&json!({"name": "a", "description": ""}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().is_some());

    server.shutdown().await;
}

#[tokio::test]
async fn network_create_is_idempotent_over_http() {
    let (server, base) = spawn_test_server(&["geth"]).await;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        let resp = client
            .post(format!("{base}/testsuite/1/network/devnet"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    let resp = client
        .delete(format!("{base}/testsuite/1/network/devnet"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    server.shutdown().await;
}
