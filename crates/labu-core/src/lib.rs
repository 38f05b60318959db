//! Core logic for the labu conformance harness
//!
//! This crate provides:
//! - The Controller: a state machine over suites, tests, nodes, and networks
//! - The result document model (`SuiteResult`, `TestCaseResult`, ...)
//! - Identifier allocation and result aggregation for one run

pub mod controller;
mod error;
pub mod model;
pub mod result;

pub use controller::*;
pub use error::*;
pub use model::*;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
