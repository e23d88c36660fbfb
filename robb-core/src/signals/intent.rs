//! Order intent: what the evaluator asks the execution collaborator to do.

use serde::{Deserialize, Serialize};

/// How the collaborator should place the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderKind {
    Market,
    Limit,
}

/// A single order request for the current bar.
///
/// Intents are transient: the core never stores them. With simple order
/// management a resting limit lives for one bar, so the profit target is
/// re-issued every bar while short.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderIntent {
    /// Sell `quantity` units at market to open a short.
    EnterShort { quantity: u32 },

    /// Buy to cover at `limit_price` or better (the profit target).
    ExitShort { limit_price: f64 },
}

impl OrderIntent {
    pub fn kind(&self) -> OrderKind {
        match self {
            OrderIntent::EnterShort { .. } => OrderKind::Market,
            OrderIntent::ExitShort { .. } => OrderKind::Limit,
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, OrderIntent::EnterShort { .. })
    }

    /// Order comment attached when the collaborator places the order.
    pub fn label(&self) -> &'static str {
        match self {
            OrderIntent::EnterShort { .. } => "Enter short position",
            OrderIntent::ExitShort { .. } => "Exit short position (profit target)",
        }
    }
}
