//! rtta native core: the module greeting plus streaming technical-analysis
//! indicators, exposed to CPython as `rtta._core`.
pub mod api;
pub mod common;
pub mod greeting;
pub mod indicator;

pub use common::{ErrorCode, RttaError, RttaResult};
pub use greeting::hello_from_bin;
