//! Signal evaluator: lower-band crossover entry and profit-target re-quotes.
//!
//! Rules, checked in order on every bar:
//! 1. Flat, and the close moved from at-or-above the lower band on the
//!    previous bar to strictly below it on this bar: sell at market and place
//!    a profit-target limit at `close - stddev`.
//! 2. Short: re-issue the profit-target limit at `fill_price - stddev`, using
//!    this bar's deviation value.
//! 3. Anything else: no intent.
//!
//! The position snapshot describes the end of the previous bar, so a fill
//! caused by rule 1 is only visible on the next call.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, StrategyParams};
use crate::domain::{PositionSnapshot, PositionState, PriceBar};
use crate::indicators::{
    BandReading, BollingerBandsIndicator, IndicatorError, StdDevIndicator, StreamingIndicator,
};

use super::OrderIntent;

/// Units sold on entry.
pub const ENTRY_QUANTITY: u32 = 1;

#[derive(Debug, Error, PartialEq)]
pub enum EvaluatorError {
    #[error("bar {index} was already evaluated")]
    DuplicateBar { index: u64 },

    #[error("bar {got} arrived after bar {last}; bars must be strictly increasing")]
    OutOfOrderBar { last: u64, got: u64 },

    #[error("bar {index}: position is short but no fill price was reported")]
    MissingFillPrice { index: u64 },

    #[error("bar {index}: reported fill price {price} is not finite")]
    InvalidFillPrice { index: u64, price: f64 },

    #[error(transparent)]
    Indicator(#[from] IndicatorError),
}

/// Everything the evaluator asks for on one bar. Empty means no intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub bar_index: u64,
    pub intents: Vec<OrderIntent>,
}

impl Decision {
    pub fn none(bar_index: u64) -> Self {
        Self {
            bar_index,
            intents: Vec::new(),
        }
    }

    pub fn is_none(&self) -> bool {
        self.intents.is_empty()
    }

    pub fn is_entry(&self) -> bool {
        self.intents.iter().any(OrderIntent::is_entry)
    }

    /// The profit-target limit price, if one was issued this bar.
    pub fn exit_limit(&self) -> Option<f64> {
        self.intents.iter().find_map(|intent| match intent {
            OrderIntent::ExitShort { limit_price } => Some(*limit_price),
            OrderIntent::EnterShort { .. } => None,
        })
    }
}

/// Indicator readings the rules look at on one bar.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RuleInputs {
    pub previous: Option<BandReading>,
    pub current: Option<BandReading>,
    pub stddev: Option<f64>,
}

/// Owns both indicators and the last accepted bar index.
#[derive(Debug, Clone)]
pub struct SignalEvaluator {
    stddev: StdDevIndicator,
    bands: BollingerBandsIndicator,
    last_index: Option<u64>,
}

impl SignalEvaluator {
    pub fn new(params: &StrategyParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let stddev = StdDevIndicator::new(params.stddev_period, params.profit_target_stddevs)?;
        let bands = BollingerBandsIndicator::new(
            params.bbands_period,
            params.upper_stddevs,
            params.lower_stddevs,
        )?;
        debug!(
            stddev = stddev.name(),
            stddev_period = params.stddev_period,
            bands = bands.name(),
            bbands_period = params.bbands_period,
            "indicators initialized"
        );
        Ok(Self {
            stddev,
            bands,
            last_index: None,
        })
    }

    pub fn stddev(&self) -> &StdDevIndicator {
        &self.stddev
    }

    pub fn bands(&self) -> &BollingerBandsIndicator {
        &self.bands
    }

    /// Index of the last bar that was accepted.
    pub fn last_index(&self) -> Option<u64> {
        self.last_index
    }

    /// Update both indicators with the bar's close and apply the rules.
    ///
    /// Every check runs before the windows are touched: a rejected bar
    /// leaves the evaluator exactly as it was.
    pub fn on_bar(
        &mut self,
        bar: &PriceBar,
        position: &PositionSnapshot,
    ) -> Result<Decision, EvaluatorError> {
        if let Err(e) = self.check_bar(bar, position) {
            warn!(bar = bar.index, error = %e, "bar rejected");
            return Err(e);
        }

        self.stddev.update(bar.close)?;
        self.bands.update(bar.close)?;
        self.last_index = Some(bar.index);

        let inputs = RuleInputs {
            previous: self.bands.previous_reading(),
            current: self.bands.current_reading(),
            stddev: self.stddev.current(),
        };
        apply_rules(bar.index, &inputs, position)
    }

    fn check_bar(&self, bar: &PriceBar, position: &PositionSnapshot) -> Result<(), EvaluatorError> {
        match self.last_index {
            Some(last) if bar.index == last => {
                return Err(EvaluatorError::DuplicateBar { index: bar.index })
            }
            Some(last) if bar.index < last => {
                return Err(EvaluatorError::OutOfOrderBar {
                    last,
                    got: bar.index,
                })
            }
            _ => {}
        }
        if !bar.close.is_finite() {
            return Err(IndicatorError::NonFiniteInput(bar.close).into());
        }
        fill_price(bar.index, position)?;
        Ok(())
    }
}

fn fill_price(bar_index: u64, position: &PositionSnapshot) -> Result<Option<f64>, EvaluatorError> {
    match (position.state, position.last_fill_price) {
        (PositionState::Flat, _) => Ok(None),
        (PositionState::Short, Some(price)) if !price.is_finite() => {
            Err(EvaluatorError::InvalidFillPrice {
                index: bar_index,
                price,
            })
        }
        (PositionState::Short, Some(price)) => Ok(Some(price)),
        (PositionState::Short, None) => Err(EvaluatorError::MissingFillPrice { index: bar_index }),
    }
}

/// The transition rules, independent of how the readings were produced.
pub fn apply_rules(
    bar_index: u64,
    inputs: &RuleInputs,
    position: &PositionSnapshot,
) -> Result<Decision, EvaluatorError> {
    match position.state {
        PositionState::Flat => {
            let (Some(prev), Some(cur), Some(sd)) = (inputs.previous, inputs.current, inputs.stddev)
            else {
                return Ok(Decision::none(bar_index));
            };
            let crossed = prev.close >= prev.bands.lower && cur.close < cur.bands.lower;
            if !crossed {
                return Ok(Decision::none(bar_index));
            }

            let limit_price = cur.close - sd;
            info!(
                bar = bar_index,
                close = cur.close,
                lower = cur.bands.lower,
                limit_price,
                "lower band crossed, entering short"
            );
            Ok(Decision {
                bar_index,
                intents: vec![
                    OrderIntent::EnterShort {
                        quantity: ENTRY_QUANTITY,
                    },
                    OrderIntent::ExitShort { limit_price },
                ],
            })
        }
        PositionState::Short => {
            let Some(fill) = fill_price(bar_index, position)? else {
                return Ok(Decision::none(bar_index));
            };
            let Some(sd) = inputs.stddev else {
                return Ok(Decision::none(bar_index));
            };
            let limit_price = fill - sd;
            debug!(bar = bar_index, fill, limit_price, "re-quoting profit target");
            Ok(Decision {
                bar_index,
                intents: vec![OrderIntent::ExitShort { limit_price }],
            })
        }
    }
}
