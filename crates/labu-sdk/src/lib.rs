//! Client library a simulator links against to drive the control-plane API:
//! sim configuration, an HTTP client, a suite registry, and a sequential
//! runner.

mod client;
mod config;
mod context;
mod error;
mod runner;
mod spec;
mod vectors;

pub use client::{ExecOutput, LaunchSpec, LaunchedNode, SimClient};
pub use config::SimConfig;
pub use context::{ClientHandle, TestContext};
pub use error::{Result, SdkError};
pub use runner::run_suite;
pub use spec::{ClientTestSpec, Suite, TestSpec};
