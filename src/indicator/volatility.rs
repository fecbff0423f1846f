//! Volatility measures: rolling dispersion and average true range.

use tracing::debug;

use crate::common::error::{check_window, RttaResult};

use super::domain::{warm, Bar, Indicator};
use super::window::{RollingSum, Window};

/// Population standard deviation of the last `window` observations.
#[derive(Clone, Debug)]
pub struct StdDev {
    window: Window,
    seen: usize,
    fillna: bool,
}

impl StdDev {
    pub fn new(window: usize, fillna: bool) -> RttaResult<Self> {
        let window = check_window("window", window)?;
        debug!(window, fillna, "stddev");
        Ok(Self {
            window: Window::new(window),
            seen: 0,
            fillna,
        })
    }
}

impl Indicator for StdDev {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, close: f64) -> f64 {
        self.window.push(close);
        self.seen += 1;
        warm(self.seen > self.window.capacity(), self.fillna, self.window.std_dev())
    }
}

/// Average true range.
///
/// True range is `max(high - low, |high - prev_close|, |low - prev_close|)`
/// with the previous close starting at 0. The average divides the sum of
/// the last `window` ranges by `window`, so it ramps up over the first
/// `window` bars.
#[derive(Clone, Debug)]
pub struct Atr {
    ranges: RollingSum,
    prev_close: f64,
}

impl Atr {
    pub fn new(window: usize) -> RttaResult<Self> {
        let window = check_window("window", window)?;
        debug!(window, "atr");
        Ok(Self {
            ranges: RollingSum::new(window),
            prev_close: 0.0,
        })
    }

    fn true_range(&self, bar: &Bar) -> f64 {
        let hl = bar.high - bar.low;
        let hc = (bar.high - self.prev_close).abs();
        let lc = (bar.low - self.prev_close).abs();
        hl.max(hc).max(lc)
    }
}

impl Indicator for Atr {
    type Input = Bar;
    type Output = f64;

    fn update(&mut self, bar: Bar) -> f64 {
        let tr = self.true_range(&bar);
        self.prev_close = bar.close;
        self.ranges.push(tr) / self.ranges.capacity() as f64
    }
}

/// Average true range as a fraction of the close.
#[derive(Clone, Debug)]
pub struct Atrp {
    atr: Atr,
}

impl Atrp {
    pub fn new(window: usize) -> RttaResult<Self> {
        Ok(Self {
            atr: Atr::new(window)?,
        })
    }
}

impl Indicator for Atrp {
    type Input = Bar;
    type Output = f64;

    fn update(&mut self, bar: Bar) -> f64 {
        self.atr.update(bar) / bar.close
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::{assert_close, fixture};

    fn bars() -> Vec<Bar> {
        vec![
            Bar::new(1.0, 2.0, 3.0),
            Bar::new(1.0, 2.0, 4.0),
            Bar::new(2.0, 3.0, 4.0),
            Bar::new(2.0, 3.0, 4.0),
        ]
    }

    #[test]
    fn stddev_without_fill() {
        let mut sd = StdDev::new(2, false).unwrap();
        assert!(sd.update(1.0).is_nan());
        assert!(sd.update(2.0).is_nan());
        for (x, want) in [(1.0, 0.5), (2.0, 0.5), (3.0, 0.5), (1.0, 1.0), (2.0, 0.5)] {
            assert_close(sd.update(x), want);
        }
    }

    #[test]
    fn stddev_with_fill() {
        let mut sd = StdDev::new(2, true).unwrap();
        for (x, want) in [(1.0, 0.0), (2.0, 0.5), (0.0, 1.0), (1.0, 0.5)] {
            assert_close(sd.update(x), want);
        }
    }

    #[test]
    fn atr_ramps_over_the_window() {
        let mut atr = Atr::new(2).unwrap();
        assert_eq!(atr.batch(bars()), vec![1.5, 3.0, 3.0, 2.5]);
    }

    #[test]
    fn atrp_scales_by_close() {
        let mut atrp = Atrp::new(2).unwrap();
        assert_eq!(atrp.batch(bars()), vec![1.5, 3.0, 1.5, 1.25]);
    }

    #[test]
    fn true_range_uses_previous_close() {
        let mut atr = Atr::new(1).unwrap();
        // First bar measures against a zero close.
        assert_eq!(atr.update(Bar::new(10.0, 11.0, 9.0)), 11.0);
        // Gap up: |high - prev_close| dominates.
        assert_eq!(atr.update(Bar::new(14.0, 15.0, 13.0)), 5.0);
        // Inside bar: high - low dominates.
        assert_eq!(atr.update(Bar::new(14.0, 18.0, 10.0)), 8.0);
    }

    #[test]
    fn atr_batch_equals_repeated_update() {
        let bars = Bar::zip(&fixture::close(), &fixture::high(), &fixture::low()).unwrap();
        let mut a = Atr::new(14).unwrap();
        let mut b = Atr::new(14).unwrap();
        let batched = a.batch(bars.iter().copied());
        let stepped: Vec<f64> = bars.iter().map(|bar| b.update(*bar)).collect();
        assert_eq!(batched, stepped);
        assert!(batched.iter().all(|v| v.is_finite()));
    }
}
