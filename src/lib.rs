//! reach - Hand distance to control voltage
//!
//! Turns continuous hand-distance readings into quantized or linear CV
//! for modular synthesizers: scale tables, audio-taper knob mapping,
//! a clocked 64-step record/play sequencer, and a calibrated DAC codec.

pub mod config;
pub mod controls;
pub mod cv;
pub mod engine;
pub mod hw;
pub mod mapping;
pub mod scales;
pub mod sequencer;

pub use config::ReachConfig;
pub use engine::Engine;
