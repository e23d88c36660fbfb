//! PriceBar: the unit of market data the engine consumes.

use serde::{Deserialize, Serialize};

/// One closing price at a sequence position.
///
/// Bars arrive in strictly increasing `index` order and are never mutated
/// after the feed produces them. The strategy only looks at the close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub index: u64,
    pub close: f64,
}

impl PriceBar {
    pub fn new(index: u64, close: f64) -> Self {
        Self { index, close }
    }

    /// A usable price: finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}
