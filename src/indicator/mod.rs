//! Real-time technical analysis indicators.
//!
//! Every indicator consumes one observation per [`Indicator::update`] call and
//! keeps only a bounded amount of state, so the next value is available with
//! minimal latency. Nothing is ever recomputed from history.

pub mod domain;
pub mod momentum;
pub mod price;
pub mod smoothing;
pub mod trend;
pub mod volatility;
pub mod window;

pub use domain::{Bar, Indicator, Oscillator, Span};
pub use momentum::{AwesomeOscillator, PercentagePrice, PercentageVolume, Roc, Rsi, StochRsi, Tsi};
pub use price::{Delay, High, Low};
pub use trend::{Ema, Macd, MassIndex, Sma};
pub use volatility::{Atr, Atrp, StdDev};

#[cfg(test)]
pub(crate) fn assert_close(got: f64, want: f64) {
    let tol = 1e-9 * want.abs().max(1.0);
    assert!(
        (got - want).abs() <= tol,
        "expected {want}, got {got} (tolerance {tol})"
    );
}

/// Sixty synthetic bars shared by the reference-value tests.
#[cfg(test)]
pub(crate) mod fixture {
    pub const LEN: usize = 60;

    pub fn close() -> Vec<f64> {
        (0..LEN).map(|i| 10.0 + ((i * 7) % 11) as f64 * 0.5).collect()
    }

    pub fn high() -> Vec<f64> {
        close()
            .into_iter()
            .enumerate()
            .map(|(i, c)| c + 1.0 + (i % 3) as f64 * 0.25)
            .collect()
    }

    pub fn low() -> Vec<f64> {
        close()
            .into_iter()
            .enumerate()
            .map(|(i, c)| c - 0.5 - (i % 4) as f64 * 0.25)
            .collect()
    }

    pub fn volume() -> Vec<f64> {
        (0..LEN).map(|i| 1000.0 + ((i * 13) % 17) as f64 * 25.0).collect()
    }

    pub fn first_valid(values: &[f64]) -> Option<usize> {
        values.iter().position(|v| !v.is_nan())
    }
}
