//! Contracts shared by every streaming indicator.

use crate::common::error::{check_len, RttaResult};

/// A streaming calculator fed one observation at a time.
///
/// `update` never looks back further than the indicator's own window, and
/// values are never revised once emitted.
pub trait Indicator {
    type Input;
    type Output;

    /// Consume the next observation and return the indicator's value for it.
    fn update(&mut self, input: Self::Input) -> Self::Output;

    /// Feed a whole series through [`Indicator::update`], keeping state
    /// between the observations and across calls.
    fn batch<I>(&mut self, inputs: I) -> Vec<Self::Output>
    where
        I: IntoIterator<Item = Self::Input>,
        Self: Sized,
    {
        inputs.into_iter().map(|input| self.update(input)).collect()
    }
}

/// Close, high and low of one period.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Bar {
    pub close: f64,
    pub high: f64,
    pub low: f64,
}

impl Bar {
    pub fn new(close: f64, high: f64, low: f64) -> Self {
        Self { close, high, low }
    }

    /// Pair up parallel close/high/low series.
    pub fn zip(close: &[f64], high: &[f64], low: &[f64]) -> RttaResult<Vec<Self>> {
        check_len("high", close.len(), high.len())?;
        check_len("low", close.len(), low.len())?;
        Ok(close
            .iter()
            .zip(high)
            .zip(low)
            .map(|((c, h), l)| Self::new(*c, *h, *l))
            .collect())
    }
}

/// High and low of one period.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Span {
    pub high: f64,
    pub low: f64,
}

impl Span {
    pub fn new(high: f64, low: f64) -> Self {
        Self { high, low }
    }

    /// Pair up parallel high/low series.
    pub fn zip(high: &[f64], low: &[f64]) -> RttaResult<Vec<Self>> {
        check_len("low", high.len(), low.len())?;
        Ok(high.iter().zip(low).map(|(h, l)| Self::new(*h, *l)).collect())
    }

    pub fn amplitude(&self) -> f64 {
        self.high - self.low
    }

    pub fn median(&self) -> f64 {
        0.5 * (self.high + self.low)
    }
}

/// Three-line oscillator output (MACD, PPO, PVO).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Oscillator {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl Oscillator {
    pub(crate) fn new(line: f64, signal: f64) -> Self {
        Self {
            line,
            signal,
            histogram: line - signal,
        }
    }
}

/// Pick between the computed value and the warm-up placeholder.
pub(crate) fn warm(ready: bool, fillna: bool, value: f64) -> f64 {
    if ready || fillna {
        value
    } else {
        f64::NAN
    }
}
