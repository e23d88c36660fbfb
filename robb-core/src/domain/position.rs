//! Position state as reported by the execution collaborator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PositionError {
    #[error("long position of {0} units reported; this strategy only trades short")]
    LongNotSupported(i64),
}

/// Open-position state for a short-only strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PositionState {
    #[default]
    Flat,
    Short,
}

impl PositionState {
    pub fn is_flat(&self) -> bool {
        matches!(self, PositionState::Flat)
    }

    pub fn is_short(&self) -> bool {
        matches!(self, PositionState::Short)
    }

    /// Map a signed broker quantity (negative = short) to a state.
    pub fn from_signed_quantity(quantity: i64) -> Result<Self, PositionError> {
        match quantity {
            0 => Ok(PositionState::Flat),
            q if q < 0 => Ok(PositionState::Short),
            q => Err(PositionError::LongNotSupported(q)),
        }
    }
}

/// What the host knows about the position at the start of a bar.
///
/// `last_fill_price` is the fill of the order that opened the current short.
/// It is `None` while flat and must be `Some` once short.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub state: PositionState,
    pub last_fill_price: Option<f64>,
}

impl PositionSnapshot {
    pub fn flat() -> Self {
        Self::default()
    }

    pub fn short(fill_price: f64) -> Self {
        Self {
            state: PositionState::Short,
            last_fill_price: Some(fill_price),
        }
    }
}
