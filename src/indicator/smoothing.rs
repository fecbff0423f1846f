//! Exponential smoothing building blocks.

/// Smoothing factor of an exponential average spanning `span` periods.
pub fn span_alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// Exponentially weighted mean, `y = alpha * x + (1 - alpha) * y_prev`.
///
/// A seeded average takes its first observation as its starting value, a
/// zeroed one starts from 0 and therefore ramps up from below.
#[derive(Clone, Debug)]
pub struct Ewm {
    alpha: f64,
    value: Option<f64>,
    count: usize,
}

impl Ewm {
    pub fn seeded(alpha: f64) -> Self {
        Self {
            alpha,
            value: None,
            count: 0,
        }
    }

    pub fn zeroed(alpha: f64) -> Self {
        Self {
            alpha,
            value: Some(0.0),
            count: 0,
        }
    }

    /// Seeded average with `alpha = 2 / (span + 1)`.
    pub fn span(span: usize) -> Self {
        Self::seeded(span_alpha(span))
    }

    pub fn update(&mut self, x: f64) -> f64 {
        let next = match self.value {
            None => x,
            Some(prev) => self.alpha * x + (1.0 - self.alpha) * prev,
        };
        self.value = Some(next);
        self.count += 1;
        next
    }

    /// Current value, `NaN` before any observation of a seeded average.
    pub fn value(&self) -> f64 {
        self.value.unwrap_or(f64::NAN)
    }

    /// Number of observations consumed.
    pub fn count(&self) -> usize {
        self.count
    }
}
