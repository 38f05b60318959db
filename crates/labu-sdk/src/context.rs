//! The mutable handle a running test body sees.

use crate::client::{LaunchSpec, SimClient};
use crate::config::SimConfig;
use crate::error::Result;
use crate::vectors;

/// A running client container, scoped to the test that launched it.
pub struct ClientHandle {
    client: SimClient,
    suite_id: u64,
    test_id: u64,
    pub id: String,
    pub ip: String,
}

impl ClientHandle {
    pub async fn exec(&self, command: &[String]) -> Result<crate::client::ExecOutput> {
        self.client
            .exec(self.suite_id, self.test_id, &self.id, command)
            .await
    }
}

/// Accumulates a test's verdict as its body runs; mutated in place rather
/// than returned, since a failed assertion should not unwind the test body.
pub struct TestContext {
    client: SimClient,
    config: SimConfig,
    suite_id: u64,
    test_id: u64,
    pass: bool,
    details: String,
}

impl TestContext {
    pub(crate) fn new(client: SimClient, config: SimConfig, suite_id: u64, test_id: u64) -> Self {
        Self {
            client,
            config,
            suite_id,
            test_id,
            pass: true,
            details: String::new(),
        }
    }

    pub fn fail(&mut self, details: impl Into<String>) {
        self.pass = false;
        self.append(details.into());
    }

    pub fn failf(&mut self, args: std::fmt::Arguments<'_>) {
        self.fail(args.to_string());
    }

    pub fn log(&mut self, details: impl Into<String>) {
        self.append(details.into());
    }

    pub async fn launch_client(&self, client: &str) -> Result<ClientHandle> {
        let mut spec = LaunchSpec {
            client: client.to_string(),
            ..Default::default()
        };
        self.decorate_with_vectors(&mut spec);
        self.launch(spec).await
    }

    pub async fn launch_client_with_spec(&self, mut spec: LaunchSpec) -> Result<ClientHandle> {
        self.decorate_with_vectors(&mut spec);
        self.launch(spec).await
    }

    fn decorate_with_vectors(&self, spec: &mut LaunchSpec) {
        if let Some(dir) = &self.config.vector_dir {
            vectors::decorate(spec, dir);
        }
    }

    async fn launch(&self, spec: LaunchSpec) -> Result<ClientHandle> {
        let launched = self
            .client
            .launch_node(self.suite_id, self.test_id, &spec)
            .await?;
        Ok(ClientHandle {
            client: self.client.clone(),
            suite_id: self.suite_id,
            test_id: self.test_id,
            id: launched.id,
            ip: launched.ip,
        })
    }

    pub(crate) fn verdict(&self) -> (bool, String) {
        (self.pass, self.details.clone())
    }

    fn append(&mut self, line: String) {
        if self.details.is_empty() {
            self.details = line;
        } else {
            self.details.push('\n');
            self.details.push_str(&line);
        }
    }
}
