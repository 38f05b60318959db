use std::sync::Arc;

use labu_core::test_support::test_controller;
use labu_sdk::{run_suite, ClientTestSpec, SimClient, SimConfig, Suite, TestSpec};

async fn sim_config_for(base_url: String) -> SimConfig {
    SimConfig {
        base_url,
        timeout: std::time::Duration::from_secs(5),
        test_filter: None,
        parallelism: 1,
        random_seed: 0,
        log_level: 3,
        clients: vec!["geth".to_string()],
        vector_dir: None,
    }
}

#[tokio::test]
async fn runs_a_passing_free_form_test() {
    let controller = Arc::new(test_controller(&["geth"]));
    let server = labu_server::spawn(controller).await.unwrap();
    let config = sim_config_for(format!("http://{}", server.addr)).await;
    let client = SimClient::new(&config).unwrap();

    let mut suite = Suite::new("rpc", "");
    suite.add_test(TestSpec {
        name: "a".into(),
        description: "".into(),
        run: Box::new(|ctx| {
            Box::pin(async move {
                ctx.log("did a thing");
            })
        }),
    });

    run_suite(&client, &config, &suite).await.unwrap();
    server.shutdown().await;
}

#[tokio::test]
async fn client_test_launches_and_execs() {
    let controller = Arc::new(test_controller(&["geth"]));
    let server = labu_server::spawn(controller).await.unwrap();
    let config = sim_config_for(format!("http://{}", server.addr)).await;
    let client = SimClient::new(&config).unwrap();

    let mut suite = Suite::new("rpc", "");
    suite.add_client_test(ClientTestSpec {
        name: "launches".into(),
        description: "".into(),
        client: "geth".into(),
        networks: vec!["n1".into()],
        environment: Default::default(),
        files: Default::default(),
        run: Box::new(|ctx, handle| {
            Box::pin(async move {
                match handle.exec(&["echo".into(), "hi".into()]).await {
                    Ok(out) if out.exit_code == 0 => {}
                    Ok(out) => ctx.fail(format!("non-zero exit: {}", out.exit_code)),
                    Err(e) => ctx.fail(e.to_string()),
                }
            })
        }),
    });

    run_suite(&client, &config, &suite).await.unwrap();
    server.shutdown().await;
}

#[tokio::test]
async fn name_filter_skips_non_matching_tests() {
    let controller = Arc::new(test_controller(&["geth"]));
    let server = labu_server::spawn(controller).await.unwrap();
    let mut config = sim_config_for(format!("http://{}", server.addr)).await;
    config.test_filter = Some(regex_for("^rpc/"));
    let client = SimClient::new(&config).unwrap();

    let seen = Arc::new(tokio::sync::Mutex::new(Vec::new()));

    let mut suite = Suite::new("mixed", "");
    for name in ["rpc/a", "sys/b"] {
        let seen = Arc::clone(&seen);
        suite.add_test(TestSpec {
            name: name.into(),
            description: "".into(),
            run: Box::new(move |_ctx| {
                let seen = Arc::clone(&seen);
                Box::pin(async move {
                    seen.lock().await.push(());
                })
            }),
        });
    }

    run_suite(&client, &config, &suite).await.unwrap();
    assert_eq!(seen.lock().await.len(), 1);
    server.shutdown().await;
}

fn regex_for(pattern: &str) -> regex::Regex {
    regex::Regex::new(pattern).unwrap()
}
