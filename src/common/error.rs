//! Error handling primitives shared across the core.

use thiserror::Error;

/// Stable, machine-readable codes for core errors.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorCode {
    /// An indicator was configured with an unusable window length.
    InvalidWindow = 1,
    /// Parallel input series passed to a batch call differ in length.
    LengthMismatch = 2,
}

/// Canonical error type for the core.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RttaError {
    /// `window` is signed so negative lengths from the interpreter can be
    /// reported as given.
    #[error("{name} must be a window length of at least 1, got {window}")]
    InvalidWindow { name: &'static str, window: i128 },

    #[error("input series differ in length: {name} has {found} values, expected {expected}")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Result alias used throughout the crate.
pub type RttaResult<T> = Result<T, RttaError>;

impl RttaError {
    /// Machine parsable error code.
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidWindow { .. } => ErrorCode::InvalidWindow,
            Self::LengthMismatch { .. } => ErrorCode::LengthMismatch,
        }
    }
}

/// Reject zero-length windows.
pub fn check_window(name: &'static str, window: usize) -> RttaResult<usize> {
    if window == 0 {
        return Err(RttaError::InvalidWindow {
            name,
            window: window as i128,
        });
    }
    Ok(window)
}

/// Convert a signed window length coming from the interpreter.
pub fn window_arg(name: &'static str, window: i64) -> RttaResult<usize> {
    let len = usize::try_from(window).map_err(|_| RttaError::InvalidWindow {
        name,
        window: i128::from(window),
    })?;
    check_window(name, len)
}

/// Number of slots needed to hold the current value plus `window` past ones.
pub fn lookback(name: &'static str, window: usize) -> RttaResult<usize> {
    window.checked_add(1).ok_or(RttaError::InvalidWindow {
        name,
        window: window as i128,
    })
}

/// Ensure a parallel series has the same length as the leading one.
pub fn check_len(name: &'static str, expected: usize, found: usize) -> RttaResult<()> {
    if expected != found {
        return Err(RttaError::LengthMismatch {
            name,
            expected,
            found,
        });
    }
    Ok(())
}
