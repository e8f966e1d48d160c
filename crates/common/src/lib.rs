//! Common utilities for monitor-console
//!
//! This crate provides the pieces shared across the workspace: the error
//! type, logging setup, and helpers for building test fixtures.

pub mod error;
pub mod logging;
pub mod test_utils;

pub use error::{Error, Result};
pub use logging::setup_logging;
