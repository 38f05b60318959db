//! The suite registry a simulator author builds up before calling
//! [`crate::run_suite`].

use futures::future::BoxFuture;

use crate::client::LaunchSpec;
use crate::context::{ClientHandle, TestContext};

pub type TestRun = Box<dyn Fn(&mut TestContext) -> BoxFuture<'_, ()> + Send + Sync>;
pub type ClientTestRun =
    Box<dyn for<'a> Fn(&'a mut TestContext, &'a ClientHandle) -> BoxFuture<'a, ()> + Send + Sync>;

/// A free-form test: no client is launched before `run`.
pub struct TestSpec {
    pub name: String,
    pub description: String,
    pub run: TestRun,
}

/// A test that auto-launches one client before `run`.
pub struct ClientTestSpec {
    pub name: String,
    pub description: String,
    pub client: String,
    pub networks: Vec<String>,
    pub environment: std::collections::HashMap<String, String>,
    pub files: std::collections::HashMap<String, Vec<u8>>,
    pub run: ClientTestRun,
}

impl ClientTestSpec {
    pub(crate) fn launch_spec(&self) -> LaunchSpec {
        LaunchSpec {
            client: self.client.clone(),
            networks: self.networks.clone(),
            environment: self.environment.clone(),
            files: self.files.clone(),
        }
    }
}

#[derive(Default)]
pub struct Suite {
    pub name: String,
    pub description: String,
    pub tests: Vec<TestSpec>,
    pub client_tests: Vec<ClientTestSpec>,
}

impl Suite {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            tests: Vec::new(),
            client_tests: Vec::new(),
        }
    }

    pub fn add_test(&mut self, test: TestSpec) -> &mut Self {
        self.tests.push(test);
        self
    }

    pub fn add_client_test(&mut self, test: ClientTestSpec) -> &mut Self {
        self.client_tests.push(test);
        self
    }
}
