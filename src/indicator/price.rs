//! Rolling price extremes and lagged prices.

use tracing::debug;

use crate::common::error::{check_window, lookback, RttaResult};

use super::domain::{warm, Indicator};
use super::window::Window;

/// Highest value of the last `window` observations.
///
/// Without `fillna` the first `window` updates yield `NaN`.
#[derive(Clone, Debug)]
pub struct High {
    window: Window,
    seen: usize,
    fillna: bool,
}

impl High {
    pub fn new(window: usize, fillna: bool) -> RttaResult<Self> {
        let window = check_window("window", window)?;
        debug!(window, fillna, "high");
        Ok(Self {
            window: Window::new(window),
            seen: 0,
            fillna,
        })
    }
}

impl Indicator for High {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, close: f64) -> f64 {
        self.window.push(close);
        self.seen += 1;
        warm(self.seen > self.window.capacity(), self.fillna, self.window.max())
    }
}

/// Lowest value of the last `window` observations.
///
/// Without `fillna` the first `window` updates yield `NaN`.
#[derive(Clone, Debug)]
pub struct Low {
    window: Window,
    seen: usize,
    fillna: bool,
}

impl Low {
    pub fn new(window: usize, fillna: bool) -> RttaResult<Self> {
        let window = check_window("window", window)?;
        debug!(window, fillna, "low");
        Ok(Self {
            window: Window::new(window),
            seen: 0,
            fillna,
        })
    }
}

impl Indicator for Low {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, close: f64) -> f64 {
        self.window.push(close);
        self.seen += 1;
        warm(self.seen > self.window.capacity(), self.fillna, self.window.min())
    }
}

/// The observation from `window` updates ago.
#[derive(Clone, Debug)]
pub struct Delay {
    // Holds the current value plus the `window` before it.
    history: Window,
    fillna: bool,
}

impl Delay {
    pub fn new(window: usize, fillna: bool) -> RttaResult<Self> {
        let window = check_window("window", window)?;
        debug!(window, fillna, "delay");
        Ok(Self {
            history: Window::new(lookback("window", window)?),
            fillna,
        })
    }

    pub(crate) fn fill(&self) -> f64 {
        if self.fillna {
            0.0
        } else {
            f64::NAN
        }
    }
}

impl Indicator for Delay {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, close: f64) -> f64 {
        self.history.push(close);
        if self.history.is_full() {
            self.history.oldest().unwrap_or(f64::NAN)
        } else {
            self.fill()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::assert_close;

    #[test]
    fn high_without_fill() {
        let mut high = High::new(2, false).unwrap();
        assert!(high.update(1.0).is_nan());
        assert!(high.update(2.0).is_nan());
        for (x, want) in [(1.0, 2.0), (2.0, 2.0), (3.0, 3.0), (1.0, 3.0), (2.0, 2.0)] {
            assert_close(high.update(x), want);
        }
    }

    #[test]
    fn high_with_fill() {
        let mut high = High::new(2, true).unwrap();
        let got = high.batch([1.0, 2.0, 0.0, 1.0]);
        assert_eq!(got, vec![1.0, 2.0, 2.0, 1.0]);
    }

    #[test]
    fn low_without_fill() {
        let mut low = Low::new(2, false).unwrap();
        assert!(low.update(1.0).is_nan());
        assert!(low.update(2.0).is_nan());
        for (x, want) in [(1.0, 1.0), (2.0, 1.0), (3.0, 2.0), (1.0, 1.0), (2.0, 1.0)] {
            assert_close(low.update(x), want);
        }
    }

    #[test]
    fn low_with_fill() {
        let mut low = Low::new(2, true).unwrap();
        assert_eq!(low.batch([1.0, 2.0, 0.0, 1.0]), vec![1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn delay_by_two() {
        let mut delay = Delay::new(2, false).unwrap();
        assert!(delay.update(1.0).is_nan());
        assert!(delay.update(2.0).is_nan());
        assert_eq!(delay.batch([3.0, 4.0, 5.0, 6.0, 7.0]), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn delay_by_one() {
        let mut delay = Delay::new(1, false).unwrap();
        assert!(delay.update(1.0).is_nan());
        assert_eq!(delay.batch([2.0, 3.0, 4.0]), vec![1.0, 2.0, 3.0]);

        let mut filled = Delay::new(1, true).unwrap();
        assert_eq!(filled.batch([1.0, 2.0, 3.0, 4.0]), vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(High::new(0, false).is_err());
        assert!(Low::new(0, true).is_err());
        assert!(Delay::new(0, true).is_err());
    }

    #[test]
    fn delay_window_without_room_for_lookback_is_rejected() {
        assert!(Delay::new(usize::MAX, false).is_err());
        assert!(Delay::new(usize::MAX - 1, false).is_ok());
    }
}
