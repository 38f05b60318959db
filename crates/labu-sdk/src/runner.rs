//! Drives one [`Suite`] against the control plane. Tests run sequentially:
//! each test's create → run → end is never interleaved with another's.

use crate::client::SimClient;
use crate::config::SimConfig;
use crate::context::TestContext;
use crate::spec::Suite;

/// Runs every test and client-test in `suite` whose name matches
/// `config.test_filter` (all of them, when unset), then deletes the suite
/// regardless of outcome.
pub async fn run_suite(client: &SimClient, config: &SimConfig, suite: &Suite) -> crate::error::Result<()> {
    let suite_id = client.create_suite(&suite.name, &suite.description).await?;

    for test in &suite.tests {
        if !matches_filter(config, &test.name) {
            continue;
        }
        let test_id = client.create_test(suite_id, &test.name, &test.description).await?;
        let mut ctx = TestContext::new(client.clone(), config.clone(), suite_id, test_id);
        (test.run)(&mut ctx).await;
        let (pass, details) = ctx.verdict();
        client.end_test(suite_id, test_id, pass, &details).await?;
    }

    for test in &suite.client_tests {
        if !matches_filter(config, &test.name) {
            continue;
        }
        let test_id = client.create_test(suite_id, &test.name, &test.description).await?;
        let mut ctx = TestContext::new(client.clone(), config.clone(), suite_id, test_id);

        let spec = test.launch_spec();
        match ctx.launch_client_with_spec(spec).await {
            Ok(handle) => {
                (test.run)(&mut ctx, &handle).await;
            }
            Err(e) => {
                ctx.fail(format!("LaunchNode failed: {e}"));
            }
        }

        let (pass, details) = ctx.verdict();
        client.end_test(suite_id, test_id, pass, &details).await?;
    }

    client.end_suite(suite_id).await?;
    Ok(())
}

fn matches_filter(config: &SimConfig, name: &str) -> bool {
    config.test_filter.as_ref().map_or(true, |re| re.is_match(name))
}
