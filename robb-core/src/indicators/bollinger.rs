//! Bollinger Bands: moving average +/- standard deviation multiples.
//!
//! - Middle: SMA(close, period)
//! - Upper: middle + upper_mult * stddev(close, period)
//! - Lower: middle - lower_mult * stddev(close, period)
//!
//! Uses population stddev (divide by N).
//! Upper and lower multipliers are independent.

use serde::{Deserialize, Serialize};

use crate::config::{check_multiplier, check_period, ConfigError};

use super::{check_input, IndicatorError, RollingWindow, StreamingIndicator, TwoBarHistory};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bands {
    pub middle: f64,
    pub upper: f64,
    pub lower: f64,
}

impl Bands {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Bands together with the close they were computed on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandReading {
    pub close: f64,
    pub bands: Bands,
}

#[derive(Debug, Clone)]
pub struct BollingerBandsIndicator {
    window: RollingWindow,
    upper_mult: f64,
    lower_mult: f64,
    history: TwoBarHistory<BandReading>,
}

impl BollingerBandsIndicator {
    pub fn new(period: usize, upper_mult: f64, lower_mult: f64) -> Result<Self, ConfigError> {
        check_period("bbands_period", period)?;
        check_multiplier("upper_stddevs", upper_mult)?;
        check_multiplier("lower_stddevs", lower_mult)?;
        Ok(Self {
            window: RollingWindow::new(period),
            upper_mult,
            lower_mult,
            history: TwoBarHistory::new(),
        })
    }

    /// Current bar's bands and close.
    pub fn current_reading(&self) -> Option<BandReading> {
        self.history.current()
    }

    /// Previous bar's bands and close.
    pub fn previous_reading(&self) -> Option<BandReading> {
        self.history.previous()
    }
}

impl StreamingIndicator for BollingerBandsIndicator {
    type Output = Bands;

    fn name(&self) -> &str {
        "Bollinger Bands indicator"
    }

    fn period(&self) -> usize {
        self.window.capacity()
    }

    fn update(&mut self, close: f64) -> Result<Option<Bands>, IndicatorError> {
        check_input(close)?;
        self.window.push(close);

        let (Some(middle), Some(sigma)) = (self.window.mean(), self.window.population_std_dev())
        else {
            return Ok(None);
        };
        let bands = Bands {
            middle,
            upper: middle + self.upper_mult * sigma,
            lower: middle - self.lower_mult * sigma,
        };
        self.history.record(BandReading { close, bands });
        Ok(Some(bands))
    }

    fn current(&self) -> Option<Bands> {
        self.history.current().map(|r| r.bands)
    }

    fn previous(&self) -> Option<Bands> {
        self.history.previous().map(|r| r.bands)
    }
}
