//! Signal layer: order intents and the per-bar evaluator.

pub mod evaluator;
pub mod intent;

pub use evaluator::{
    apply_rules, Decision, EvaluatorError, RuleInputs, SignalEvaluator, ENTRY_QUANTITY,
};
pub use intent::{OrderIntent, OrderKind};
