//! Strategy session: one owned value per trading session.
//!
//! Holds the evaluator together with the name and policy the host needs.
//! The host calls `on_bar` once per bar, in index order, and executes the
//! returned intents itself.

use tracing::{info, info_span};

use crate::config::{ConfigError, SessionPolicy, StrategyConfig};
use crate::domain::{PositionSnapshot, PriceBar};
use crate::signals::{Decision, EvaluatorError, SignalEvaluator};

#[derive(Debug, Clone)]
pub struct StrategySession {
    name: String,
    policy: SessionPolicy,
    evaluator: SignalEvaluator,
    bars_seen: u64,
    entries: u64,
}

impl StrategySession {
    pub fn start(config: &StrategyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let evaluator = SignalEvaluator::new(&config.params)?;
        info!(
            strategy = %config.name,
            warmup_bars = config.params.warmup_bars(),
            force_close = config.policy.force_close_at_session_end,
            max_open_position = config.policy.max_open_position,
            "session started"
        );
        Ok(Self {
            name: config.name.clone(),
            policy: config.policy,
            evaluator,
            bars_seen: 0,
            entries: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    pub fn evaluator(&self) -> &SignalEvaluator {
        &self.evaluator
    }

    pub fn on_bar(
        &mut self,
        bar: &PriceBar,
        position: &PositionSnapshot,
    ) -> Result<Decision, EvaluatorError> {
        let _span = info_span!("bar", index = bar.index).entered();
        let decision = self.evaluator.on_bar(bar, position)?;
        self.bars_seen += 1;
        if decision.is_entry() {
            self.entries += 1;
        }
        Ok(decision)
    }

    /// End the session. Returns (bars evaluated, entry signals).
    pub fn finish(self) -> (u64, u64) {
        info!(
            strategy = %self.name,
            bars = self.bars_seen,
            entries = self.entries,
            "session finished"
        );
        (self.bars_seen, self.entries)
    }
}
