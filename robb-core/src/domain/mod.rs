//! Domain types shared by the indicators, the evaluator and the host.

pub mod bar;
pub mod position;

pub use bar::PriceBar;
pub use position::{PositionError, PositionSnapshot, PositionState};
