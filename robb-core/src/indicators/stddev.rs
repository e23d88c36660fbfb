//! Standard deviation of closes, scaled by a multiplier.
//!
//! value = multiplier * sample_stddev(close, period)
//!
//! Sample deviation (divide by N - 1), so period must be >= 2.
//! First value on the bar that fills the window.

use crate::config::{check_multiplier, check_period, ConfigError};

use super::{check_input, IndicatorError, RollingWindow, StreamingIndicator, TwoBarHistory};

#[derive(Debug, Clone)]
pub struct StdDevIndicator {
    window: RollingWindow,
    multiplier: f64,
    history: TwoBarHistory<f64>,
}

impl StdDevIndicator {
    pub fn new(period: usize, multiplier: f64) -> Result<Self, ConfigError> {
        check_period("stddev_period", period)?;
        check_multiplier("profit_target_stddevs", multiplier)?;
        Ok(Self {
            window: RollingWindow::new(period),
            multiplier,
            history: TwoBarHistory::new(),
        })
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

impl StreamingIndicator for StdDevIndicator {
    type Output = f64;

    fn name(&self) -> &str {
        "Standard Deviation indicator"
    }

    fn period(&self) -> usize {
        self.window.capacity()
    }

    fn update(&mut self, close: f64) -> Result<Option<f64>, IndicatorError> {
        check_input(close)?;
        self.window.push(close);

        let Some(sd) = self.window.sample_std_dev() else {
            return Ok(None);
        };
        let value = self.multiplier * sd;
        self.history.record(value);
        Ok(Some(value))
    }

    fn current(&self) -> Option<f64> {
        self.history.current()
    }

    fn previous(&self) -> Option<f64> {
        self.history.previous()
    }
}
