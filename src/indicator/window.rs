//! Fixed-capacity rolling windows backing the windowed indicators.

use std::collections::VecDeque;

/// The last `capacity` observations, oldest first.
#[derive(Clone, Debug)]
pub struct Window {
    values: VecDeque<f64>,
    capacity: usize,
}

impl Window {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::new(),
            capacity,
        }
    }

    /// Append a value, returning the one that fell out of the window.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        let evicted = if self.values.len() == self.capacity {
            self.values.pop_front()
        } else {
            None
        };
        self.values.push_back(value);
        evicted
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest value still held.
    pub fn oldest(&self) -> Option<f64> {
        self.values.front().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    pub fn max(&self) -> f64 {
        self.iter().fold(f64::NAN, f64::max)
    }

    pub fn min(&self) -> f64 {
        self.iter().fold(f64::NAN, f64::min)
    }

    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return f64::NAN;
        }
        self.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Population standard deviation of the held values.
    pub fn std_dev(&self) -> f64 {
        if self.values.is_empty() {
            return f64::NAN;
        }
        let mean = self.mean();
        let sq = self.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>();
        (sq / self.values.len() as f64).sqrt()
    }
}

/// Running sum over the last `capacity` observations.
#[derive(Clone, Debug)]
pub struct RollingSum {
    window: Window,
    sum: f64,
}

impl RollingSum {
    pub fn new(capacity: usize) -> Self {
        Self {
            window: Window::new(capacity),
            sum: 0.0,
        }
    }

    /// Add a value and return the updated sum.
    pub fn push(&mut self, value: f64) -> f64 {
        if let Some(old) = self.window.push(value) {
            self.sum -= old;
        }
        self.sum += value;
        self.sum
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn is_full(&self) -> bool {
        self.window.is_full()
    }

    pub fn capacity(&self) -> usize {
        self.window.capacity()
    }
}
