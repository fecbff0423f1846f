//! Momentum indicators and oscillators.

use tracing::debug;

use crate::common::error::{check_window, lookback, RttaResult};

use super::domain::{warm, Indicator, Oscillator, Span};
use super::smoothing::Ewm;
use super::trend::{EmaSpread, Sma};
use super::window::Window;

/// Relative strength index with Wilder smoothing.
///
/// The first price change seeds the average on its own side. After that a
/// gain only moves the average gain and a loss only moves the average loss,
/// each by `(change - avg) / window`. A series with no changes reads 50.
#[derive(Clone, Debug)]
pub struct Rsi {
    window: usize,
    fillna: bool,
    prev: Option<f64>,
    gain: f64,
    loss: f64,
    seeded: bool,
    changes: usize,
}

impl Rsi {
    pub fn new(window: usize, fillna: bool) -> RttaResult<Self> {
        let window = check_window("window", window)?;
        debug!(window, fillna, "rsi");
        Ok(Self {
            window,
            fillna,
            prev: None,
            gain: 0.0,
            loss: 0.0,
            seeded: false,
            changes: 0,
        })
    }

    fn smooth(avg: &mut f64, x: f64, window: usize, seeded: bool) {
        if seeded {
            *avg += (x - *avg) / window as f64;
        } else {
            *avg = x;
        }
    }

    fn value(&self) -> f64 {
        if self.loss == 0.0 {
            if self.gain == 0.0 {
                50.0
            } else {
                100.0
            }
        } else {
            100.0 - 100.0 / (1.0 + self.gain / self.loss)
        }
    }
}

impl Indicator for Rsi {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, close: f64) -> f64 {
        let Some(prev) = self.prev.replace(close) else {
            return warm(false, self.fillna, 50.0);
        };

        let change = close - prev;
        self.changes += 1;
        if change > 0.0 {
            Self::smooth(&mut self.gain, change, self.window, self.seeded);
            self.seeded = true;
        } else if change < 0.0 {
            Self::smooth(&mut self.loss, -change, self.window, self.seeded);
            self.seeded = true;
        }

        warm(self.changes >= self.window, self.fillna, self.value())
    }
}

/// Stochastic RSI: where the current RSI sits within its range over the
/// last `window` RSI readings, in `[0, 1]`.
#[derive(Clone, Debug)]
pub struct StochRsi {
    rsi: Rsi,
    history: Window,
    fillna: bool,
}

impl StochRsi {
    pub fn new(window: usize, fillna: bool) -> RttaResult<Self> {
        let rsi = Rsi::new(window, fillna)?;
        debug!(window, fillna, "stoch_rsi");
        Ok(Self {
            rsi,
            history: Window::new(window),
            fillna,
        })
    }
}

impl Indicator for StochRsi {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, close: f64) -> f64 {
        let rsi = self.rsi.update(close);
        if rsi.is_nan() {
            return f64::NAN;
        }

        self.history.push(rsi);
        if !self.fillna && !self.history.is_full() {
            return f64::NAN;
        }

        let (lo, hi) = (self.history.min(), self.history.max());
        if hi == lo {
            return warm(false, self.fillna, 0.0);
        }
        (rsi - lo) / (hi - lo)
    }
}

/// True strength index: doubly smoothed price change over doubly smoothed
/// absolute price change, scaled to percent. The previous close starts at 0.
#[derive(Clone, Debug)]
pub struct Tsi {
    prev: f64,
    slow_change: Ewm,
    fast_change: Ewm,
    slow_abs: Ewm,
    fast_abs: Ewm,
}

impl Tsi {
    pub fn new(window_slow: usize, window_fast: usize) -> RttaResult<Self> {
        let window_slow = check_window("window_slow", window_slow)?;
        let window_fast = check_window("window_fast", window_fast)?;
        debug!(window_slow, window_fast, "tsi");
        Ok(Self {
            prev: 0.0,
            slow_change: Ewm::span(window_slow),
            fast_change: Ewm::span(window_fast),
            slow_abs: Ewm::span(window_slow),
            fast_abs: Ewm::span(window_fast),
        })
    }
}

impl Indicator for Tsi {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, close: f64) -> f64 {
        let change = close - self.prev;
        self.prev = close;

        let num = self.fast_change.update(self.slow_change.update(change));
        let den = self.fast_abs.update(self.slow_abs.update(change.abs()));
        if den == 0.0 {
            return 0.0;
        }
        100.0 * num / den
    }
}

/// Rate of change in percent against the close `window` updates ago.
#[derive(Clone, Debug)]
pub struct Roc {
    history: Window,
    fillna: bool,
}

impl Roc {
    pub fn new(window: usize, fillna: bool) -> RttaResult<Self> {
        let window = check_window("window", window)?;
        debug!(window, fillna, "roc");
        Ok(Self {
            history: Window::new(lookback("window", window)?),
            fillna,
        })
    }
}

impl Indicator for Roc {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, close: f64) -> f64 {
        self.history.push(close);
        match self.history.oldest() {
            Some(past) if self.history.is_full() => (close - past) / past * 100.0,
            _ => warm(false, self.fillna, 0.0),
        }
    }
}

/// Awesome oscillator: short minus long simple average of the median price.
#[derive(Clone, Debug)]
pub struct AwesomeOscillator {
    short: Sma,
    long: Sma,
}

impl AwesomeOscillator {
    pub fn new(window1: usize, window2: usize, fillna: bool) -> RttaResult<Self> {
        let window1 = check_window("window1", window1)?;
        let window2 = check_window("window2", window2)?;
        debug!(window1, window2, fillna, "awesome_oscillator");
        Ok(Self {
            short: Sma::new(window1, fillna)?,
            long: Sma::new(window2, fillna)?,
        })
    }
}

impl Indicator for AwesomeOscillator {
    type Input = Span;
    type Output = f64;

    fn update(&mut self, span: Span) -> f64 {
        let median = span.median();
        self.short.update(median) - self.long.update(median)
    }
}

fn percentage_spread(fast: f64, slow: f64) -> f64 {
    (fast - slow) / slow * 100.0
}

/// Percentage price oscillator: MACD expressed relative to the slow average.
#[derive(Clone, Debug)]
pub struct PercentagePrice {
    spread: EmaSpread,
}

impl PercentagePrice {
    pub fn new(
        window_slow: usize,
        window_fast: usize,
        window_sign: usize,
        fillna: bool,
    ) -> RttaResult<Self> {
        debug!(window_slow, window_fast, window_sign, fillna, "percentage_price");
        Ok(Self {
            spread: EmaSpread::new(window_slow, window_fast, window_sign, fillna)?,
        })
    }
}

impl Indicator for PercentagePrice {
    type Input = f64;
    type Output = Oscillator;

    fn update(&mut self, close: f64) -> Oscillator {
        self.spread.update(close, percentage_spread)
    }
}

/// Percentage volume oscillator: the percentage spread applied to volume.
#[derive(Clone, Debug)]
pub struct PercentageVolume {
    spread: EmaSpread,
}

impl PercentageVolume {
    pub fn new(
        window_slow: usize,
        window_fast: usize,
        window_sign: usize,
        fillna: bool,
    ) -> RttaResult<Self> {
        debug!(window_slow, window_fast, window_sign, fillna, "percentage_volume");
        Ok(Self {
            spread: EmaSpread::new(window_slow, window_fast, window_sign, fillna)?,
        })
    }
}

impl Indicator for PercentageVolume {
    type Input = f64;
    type Output = Oscillator;

    fn update(&mut self, volume: f64) -> Oscillator {
        self.spread.update(volume, percentage_spread)
    }
}
