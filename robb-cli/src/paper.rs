//! Paper execution: the minimal collaborator `replay` needs.
//!
//! Only closes are available, so fills are priced on closes:
//! - a market entry submitted on bar t fills at the close of bar t+1;
//! - a resting profit-target limit submitted on bar t fills on bar t+1 when
//!   that close is at or below the limit (filled at the limit);
//! - resting orders live for one bar and are dropped if not filled.
//!
//! The entry and its first target are submitted together; the target can
//! only trigger once the short is open, from the bar after the entry fill.

use robb_core::domain::PositionError;
use robb_core::{OrderIntent, PositionSnapshot, PositionState, PriceBar, SessionPolicy};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FillKind {
    Entry,
    ProfitTarget,
    ForceClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fill {
    pub bar_index: u64,
    pub kind: FillKind,
    pub price: f64,
}

/// Book of one instrument. `quantity` is signed: negative is short.
#[derive(Debug)]
pub struct PaperBroker {
    policy: SessionPolicy,
    quantity: i64,
    entry_price: Option<f64>,
    pending_entry: Option<u32>,
    resting_exit: Option<f64>,
}

impl PaperBroker {
    pub fn new(policy: SessionPolicy) -> Self {
        Self {
            policy,
            quantity: 0,
            entry_price: None,
            pending_entry: None,
            resting_exit: None,
        }
    }

    /// Position as reported to the strategy at the start of a bar.
    pub fn snapshot(&self) -> Result<PositionSnapshot, PositionError> {
        let state = PositionState::from_signed_quantity(self.quantity)?;
        Ok(PositionSnapshot {
            state,
            last_fill_price: self.entry_price.filter(|_| state.is_short()),
        })
    }

    fn close_position(&mut self) {
        self.quantity = 0;
        self.entry_price = None;
    }

    /// Match orders from the previous bar against this bar's close.
    pub fn match_orders(&mut self, bar: &PriceBar) -> Option<Fill> {
        let exit = self.resting_exit.take();

        if let Some(units) = self.pending_entry.take() {
            self.quantity -= i64::from(units);
            self.entry_price = Some(bar.close);
            debug!(bar = bar.index, price = bar.close, units, "entry filled");
            return Some(Fill {
                bar_index: bar.index,
                kind: FillKind::Entry,
                price: bar.close,
            });
        }

        match exit {
            Some(limit) if self.quantity < 0 && bar.close <= limit => {
                self.close_position();
                debug!(bar = bar.index, price = limit, "profit target filled");
                Some(Fill {
                    bar_index: bar.index,
                    kind: FillKind::ProfitTarget,
                    price: limit,
                })
            }
            _ => None,
        }
    }

    /// Accept this bar's intents.
    pub fn submit(&mut self, intents: &[OrderIntent]) {
        for intent in intents {
            match *intent {
                OrderIntent::EnterShort { quantity } => {
                    let open = self.quantity.unsigned_abs();
                    if open != 0 || self.pending_entry.is_some() {
                        warn!("entry ignored: position already open or pending");
                    } else if quantity > self.policy.max_open_position {
                        warn!(
                            quantity,
                            max = self.policy.max_open_position,
                            "entry ignored: exceeds max open position"
                        );
                    } else {
                        self.pending_entry = Some(quantity);
                    }
                }
                OrderIntent::ExitShort { limit_price } => {
                    self.resting_exit = Some(limit_price);
                }
            }
        }
    }

    /// Close any open short at the last close when the policy asks for it.
    pub fn end_session(&mut self, last: &PriceBar) -> Option<Fill> {
        self.pending_entry = None;
        self.resting_exit = None;
        if !self.policy.force_close_at_session_end || self.quantity == 0 {
            return None;
        }
        self.close_position();
        Some(Fill {
            bar_index: last.index,
            kind: FillKind::ForceClose,
            price: last.close,
        })
    }
}
