//! Configuration parsing for labu
//!
//! This crate handles:
//! - CLI flags, translated into the immutable [`RunConfig`]
//! - Client descriptor (`labu.json`) loading

mod client;
mod error;
mod run_config;

pub use client::*;
pub use error::*;
pub use run_config::*;
