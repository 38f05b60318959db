//! Live entities the Controller owns while a run is in progress.
//!
//! These are the mutable records behind the coarse mutex; they disappear as
//! their owners are torn down. The durable view of a run lives in
//! [`crate::result`] instead, which is why `Suite` and `Test` hold no result
//! fields of their own.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

pub use labu_config::ClientDefinition;
pub use labu_runtime::ContainerId;

/// A client container bound to exactly one [`Test`].
#[derive(Debug, Clone)]
pub struct Node {
    pub id: ContainerId,
    pub client_name: String,
    pub ip: String,
    pub instantiated_at: DateTime<Utc>,
    pub log_file: String,
}

/// A single named assertion scope, owning zero or more [`Node`]s until it is
/// finalized by `EndTest`.
#[derive(Debug, Clone)]
pub struct Test {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub nodes: HashMap<String, Node>,
}

/// A named group of tests. Deleting the suite (`EndSuite`) drops this live
/// record; the accumulated [`crate::result::SuiteResult`] survives.
#[derive(Debug, Clone)]
pub struct Suite {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub tests: HashMap<u64, Test>,
}
