//! Shared utilities that glue the greeting, indicators and bindings together.
pub mod config;
pub mod error;
pub mod log;

pub use error::{ErrorCode, RttaError, RttaResult};
