//! Streaming indicators.
//!
//! Each indicator owns its own rolling window, is updated exactly once per
//! bar, and keeps its last two readings (current bar, previous bar) so the
//! evaluator can run two-bar comparisons without indexing into history.
//!
//! The two indicators deliberately use different deviation estimators:
//! the profit-target deviation is a sample deviation (N - 1) and the bands
//! use a population deviation (N).

pub mod bollinger;
pub mod history;
pub mod rolling_window;
pub mod stddev;

pub use bollinger::{BandReading, Bands, BollingerBandsIndicator};
pub use history::TwoBarHistory;
pub use rolling_window::RollingWindow;
pub use stddev::StdDevIndicator;

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum IndicatorError {
    #[error("indicator input must be finite, got {0}")]
    NonFiniteInput(f64),
}

/// An indicator fed one close per bar.
pub trait StreamingIndicator: Send + Sync {
    type Output: Copy;

    /// Human-readable name, as shown to the host.
    fn name(&self) -> &str;

    /// Window length.
    fn period(&self) -> usize;

    /// Push the bar's close and return this bar's value, or `None` while the
    /// window is still filling. A rejected input leaves all state untouched.
    fn update(&mut self, close: f64) -> Result<Option<Self::Output>, IndicatorError>;

    /// Value computed on the most recent bar.
    fn current(&self) -> Option<Self::Output>;

    /// Value computed on the bar before that.
    fn previous(&self) -> Option<Self::Output>;

    fn is_ready(&self) -> bool {
        self.current().is_some()
    }
}

pub(crate) fn check_input(close: f64) -> Result<(), IndicatorError> {
    if close.is_finite() {
        Ok(())
    } else {
        Err(IndicatorError::NonFiniteInput(close))
    }
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
