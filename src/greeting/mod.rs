//! The greeting exposed by the native module.

/// Text returned by [`hello_from_bin`].
pub const GREETING: &str = "Hello from rtta!";

/// Returns the module's greeting. Pure and total.
pub fn hello_from_bin() -> &'static str {
    tracing::trace!("hello_from_bin");
    GREETING
}
