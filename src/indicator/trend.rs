//! Trend indicators: moving averages, MACD and the mass index.

use tracing::debug;

use crate::common::error::{check_window, RttaResult};

use super::domain::{warm, Indicator, Oscillator, Span};
use super::smoothing::{span_alpha, Ewm};
use super::window::{RollingSum, Window};

/// Simple moving average.
///
/// Without `fillna` the first `window - 1` updates yield `NaN`; with it the
/// mean of everything seen so far is returned until the window fills.
#[derive(Clone, Debug)]
pub struct Sma {
    window: Window,
    fillna: bool,
}

impl Sma {
    pub fn new(window: usize, fillna: bool) -> RttaResult<Self> {
        let window = check_window("window", window)?;
        debug!(window, fillna, "sma");
        Ok(Self {
            window: Window::new(window),
            fillna,
        })
    }
}

impl Indicator for Sma {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, close: f64) -> f64 {
        self.window.push(close);
        warm(self.window.is_full(), self.fillna, self.window.mean())
    }
}

/// Exponential moving average starting from zero, `alpha = 2 / (window + 1)`.
#[derive(Clone, Debug)]
pub struct Ema {
    ewm: Ewm,
    window: usize,
    fillna: bool,
}

impl Ema {
    pub fn new(window: usize, fillna: bool) -> RttaResult<Self> {
        let window = check_window("window", window)?;
        debug!(window, fillna, "ema");
        Ok(Self {
            ewm: Ewm::zeroed(span_alpha(window)),
            window,
            fillna,
        })
    }
}

impl Indicator for Ema {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, close: f64) -> f64 {
        let value = self.ewm.update(close);
        warm(self.ewm.count() >= self.window, self.fillna, value)
    }
}

/// Fast/slow exponential averages, a derived line and its signal average.
/// Shared by MACD and the percentage oscillators.
#[derive(Clone, Debug)]
pub(crate) struct EmaSpread {
    fast: Ewm,
    slow: Ewm,
    signal: Ewm,
    window_slow: usize,
    window_sign: usize,
    fillna: bool,
}

impl EmaSpread {
    pub(crate) fn new(
        window_slow: usize,
        window_fast: usize,
        window_sign: usize,
        fillna: bool,
    ) -> RttaResult<Self> {
        let window_slow = check_window("window_slow", window_slow)?;
        let window_fast = check_window("window_fast", window_fast)?;
        let window_sign = check_window("window_sign", window_sign)?;
        Ok(Self {
            fast: Ewm::span(window_fast),
            slow: Ewm::span(window_slow),
            signal: Ewm::span(window_sign),
            window_slow,
            window_sign,
            fillna,
        })
    }

    /// Advance both averages and derive the line with `line(fast, slow)`.
    pub(crate) fn update<F>(&mut self, x: f64, line: F) -> Oscillator
    where
        F: Fn(f64, f64) -> f64,
    {
        let fast = self.fast.update(x);
        let slow = self.slow.update(x);
        if !self.fillna && self.slow.count() < self.window_slow {
            return Oscillator::new(f64::NAN, f64::NAN);
        }

        let line = line(fast, slow);
        let signal = self.signal.update(line);
        let signal = warm(self.signal.count() >= self.window_sign, self.fillna, signal);
        Oscillator::new(line, signal)
    }
}

/// Moving average convergence divergence.
#[derive(Clone, Debug)]
pub struct Macd {
    spread: EmaSpread,
}

impl Macd {
    pub fn new(
        window_slow: usize,
        window_fast: usize,
        window_sign: usize,
        fillna: bool,
    ) -> RttaResult<Self> {
        debug!(window_slow, window_fast, window_sign, fillna, "macd");
        Ok(Self {
            spread: EmaSpread::new(window_slow, window_fast, window_sign, fillna)?,
        })
    }
}

impl Indicator for Macd {
    type Input = f64;
    type Output = Oscillator;

    fn update(&mut self, close: f64) -> Oscillator {
        self.spread.update(close, |fast, slow| fast - slow)
    }
}

/// Mass index: rolling sum of the ratio between a single and a double
/// exponential average of the high-low range.
#[derive(Clone, Debug)]
pub struct MassIndex {
    single: Ewm,
    double: Ewm,
    masses: RollingSum,
    window_fast: usize,
    fillna: bool,
}

impl MassIndex {
    pub fn new(window_fast: usize, window_slow: usize, fillna: bool) -> RttaResult<Self> {
        let window_fast = check_window("window_fast", window_fast)?;
        let window_slow = check_window("window_slow", window_slow)?;
        debug!(window_fast, window_slow, fillna, "mass_index");
        Ok(Self {
            single: Ewm::span(window_fast),
            double: Ewm::span(window_fast),
            masses: RollingSum::new(window_slow),
            window_fast,
            fillna,
        })
    }
}

impl Indicator for MassIndex {
    type Input = Span;
    type Output = f64;

    fn update(&mut self, span: Span) -> f64 {
        let single = self.single.update(span.amplitude());
        if !self.fillna && self.single.count() < self.window_fast {
            return f64::NAN;
        }

        let double = self.double.update(single);
        if !self.fillna && self.double.count() < self.window_fast {
            return f64::NAN;
        }

        let mass = if double == 0.0 { 0.0 } else { single / double };
        let sum = self.masses.push(mass);
        warm(self.masses.is_full(), self.fillna, sum)
    }
}
