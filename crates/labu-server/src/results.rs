//! Flushes accumulated `SuiteResult` documents to `workspace/results/`.
//!
//! This is glue around the result document the core already builds, not a
//! component in its own right: it owns no state, only a file path
//! convention (`results/suite-<id>.json`).

use labu_core::Controller;
use std::io;

pub fn flush_results(controller: &Controller) -> io::Result<()> {
    let dir = controller.workspace().join("results");
    std::fs::create_dir_all(&dir)?;
    for result in controller.snapshot_results() {
        let path = dir.join(format!("suite-{}.json", result.id));
        let body = serde_json::to_vec_pretty(&result)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        std::fs::write(path, body)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use labu_core::test_support::test_controller;

    #[tokio::test]
    async fn flush_writes_one_file_per_suite() {
        let controller = test_controller(&["geth"]);
        let suite_id = controller.create_suite("rpc", "");
        let test_id = controller.create_test(suite_id, "a", "").unwrap();
        controller
            .end_test(suite_id, test_id, true, "")
            .await
            .unwrap();

        flush_results(&controller).unwrap();

        let path = controller
            .workspace()
            .join("results")
            .join(format!("suite-{suite_id}.json"));
        let body = std::fs::read_to_string(path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(parsed["testCases"][test_id.to_string()]["summaryResult"]["pass"] == true);
    }
}
