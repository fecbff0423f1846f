//! Host-facing entry points.
//!
//! The interpreter module is compiled only with the `python` feature so the
//! core builds and tests without an interpreter present.

#[cfg(feature = "python")]
pub mod python;
