//! Mapping of raw control readings into musical space
//!
//! Raw sensor and potentiometer readings become note indices, linear DAC
//! codes, or discrete selections via linear rescaling or fixed
//! audio-taper threshold bands.

mod linear;
mod position;
mod taper;

pub use linear::RangeMap;
pub use position::{OutputMode, PositionMapper};
pub use taper::{TaperTable, LENGTH_TAPER, LOOP_LENGTHS, MODE_TAPER, POT_MAX};
