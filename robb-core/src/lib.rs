//! Robb Core: rolling indicators and the lower-band short signal engine.
//!
//! This crate contains the decision side of the strategy:
//! - Domain types (price bars, position snapshots)
//! - Rolling window with sample and population statistics
//! - Streaming standard deviation and Bollinger Bands indicators
//! - Signal evaluator: lower-band crossover entry and profit-target re-quotes
//! - Strategy configuration and session policy flags
//! - Session wrapper owned by the host loop
//!
//! Order placement, fills and position bookkeeping belong to the host. The
//! core only reads the position snapshot it is handed each bar.

pub mod config;
pub mod domain;
pub mod indicators;
pub mod session;
pub mod signals;

pub use config::{ConfigError, SessionPolicy, StrategyConfig, StrategyParams, STRATEGY_NAME};
pub use domain::{PositionSnapshot, PositionState, PriceBar};
pub use indicators::{
    Bands, BollingerBandsIndicator, RollingWindow, StdDevIndicator, StreamingIndicator,
};
pub use session::StrategySession;
pub use signals::{Decision, EvaluatorError, OrderIntent, SignalEvaluator};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: session state can move to a worker thread.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<PriceBar>();
        require_sync::<PriceBar>();
        require_send::<PositionSnapshot>();
        require_sync::<PositionSnapshot>();
        require_send::<OrderIntent>();
        require_sync::<OrderIntent>();
        require_send::<Decision>();
        require_sync::<Decision>();

        require_send::<RollingWindow>();
        require_sync::<RollingWindow>();
        require_send::<StdDevIndicator>();
        require_sync::<StdDevIndicator>();
        require_send::<BollingerBandsIndicator>();
        require_sync::<BollingerBandsIndicator>();
        require_send::<SignalEvaluator>();
        require_sync::<SignalEvaluator>();
        require_send::<StrategySession>();
        require_sync::<StrategySession>();
    }

    /// Architecture contract: the evaluator reads position state, never writes it.
    ///
    /// `on_bar` borrows the snapshot immutably. If someone changes it to take
    /// `&mut PositionSnapshot`, this stops compiling.
    #[test]
    fn evaluator_only_borrows_position_snapshot() {
        fn _check(
            evaluator: &mut SignalEvaluator,
            bar: &PriceBar,
            position: &PositionSnapshot,
        ) -> Result<Decision, EvaluatorError> {
            evaluator.on_bar(bar, position)
        }
    }
}
