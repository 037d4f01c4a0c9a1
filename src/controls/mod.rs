//! Mode and length knobs
//!
//! Debounced interpretation of the two potentiometers. A knob reports a
//! change only when its reading moves past a noise threshold relative to
//! the last *reported* value, so jitter around a resting position never
//! retriggers the taper lookup.

use crate::mapping::{OutputMode, LENGTH_TAPER, LOOP_LENGTHS, MODE_TAPER, POT_MAX};
use crate::scales::ScaleBank;

/// Hysteresis filter over a single pot.
#[derive(Debug, Clone, Copy)]
pub struct PotFilter {
    reported: u16,
    threshold: u16,
}

impl PotFilter {
    pub fn new(initial: u16, threshold: u16) -> Self {
        Self {
            reported: initial.min(POT_MAX),
            threshold,
        }
    }

    /// Feed a raw reading; returns the new reported value when it moved
    /// past the threshold, `None` while it is only jitter.
    pub fn update(&mut self, reading: u16) -> Option<u16> {
        let reading = reading.min(POT_MAX);
        if reading.abs_diff(self.reported) > self.threshold {
            self.reported = reading;
            Some(reading)
        } else {
            None
        }
    }

    /// Last reported value.
    pub fn value(&self) -> u16 {
        self.reported
    }
}

/// Shared mode state the sequencer and codec read on the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub mode: OutputMode,
    /// Playable notes in the active scale (1 in linear mode).
    pub note_count: usize,
    /// Loop length in steps.
    pub loop_length: usize,
}

/// The two knobs and the state they select.
#[derive(Debug, Clone)]
pub struct ControlSurface {
    scale_pot: PotFilter,
    length_pot: PotFilter,
    state: ControlState,
}

impl ControlSurface {
    pub fn new(scale_reading: u16, length_reading: u16, hysteresis: u16) -> Self {
        let mut surface = Self {
            scale_pot: PotFilter::new(scale_reading, hysteresis),
            length_pot: PotFilter::new(length_reading, hysteresis),
            state: ControlState {
                mode: OutputMode::Linear,
                note_count: 1,
                loop_length: 2,
            },
        };
        surface.apply_scale(scale_reading);
        surface.apply_length(length_reading);
        surface
    }

    fn apply_scale(&mut self, reading: u16) {
        let mode = OutputMode::from_band(MODE_TAPER.select(reading));
        self.state.mode = mode;
        self.state.note_count = match mode {
            OutputMode::Scaled(scale) => ScaleBank::get().table(scale).note_count(),
            OutputMode::Linear => 1,
        };
    }

    fn apply_length(&mut self, reading: u16) {
        let index = LENGTH_TAPER.select(reading) as usize;
        self.state.loop_length = LOOP_LENGTHS[index.min(LOOP_LENGTHS.len() - 1)];
    }

    /// Feed fresh pot readings; returns true when either knob crossed its
    /// threshold and the shared state was recomputed.
    pub fn update(&mut self, scale_reading: u16, length_reading: u16) -> bool {
        let mut changed = false;
        if let Some(reading) = self.scale_pot.update(scale_reading) {
            self.apply_scale(reading);
            changed = true;
        }
        if let Some(reading) = self.length_pot.update(length_reading) {
            self.apply_length(reading);
            changed = true;
        }
        changed
    }

    pub fn state(&self) -> ControlState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scales::Scale;

    #[test]
    fn test_pot_filter_ignores_jitter() {
        let mut pot = PotFilter::new(100, 8);
        assert_eq!(pot.update(104), None);
        assert_eq!(pot.update(96), None);
        assert_eq!(pot.update(108), None);
        assert_eq!(pot.value(), 100);
    }

    #[test]
    fn test_pot_filter_reports_real_moves() {
        let mut pot = PotFilter::new(100, 8);
        assert_eq!(pot.update(120), Some(120));
        // Threshold is now relative to the new report.
        assert_eq!(pot.update(125), None);
        assert_eq!(pot.update(140), Some(140));
    }

    #[test]
    fn test_surface_initial_state() {
        let surface = ControlSurface::new(0, 300, 8);
        let state = surface.state();
        assert_eq!(state.mode, OutputMode::Scaled(Scale::Major));
        assert_eq!(state.note_count, 21);
        assert_eq!(state.loop_length, 8);
    }

    #[test]
    fn test_scale_knob_updates_mode_and_count() {
        let mut surface = ControlSurface::new(0, 300, 8);
        assert!(surface.update(1000, 300));
        let state = surface.state();
        assert_eq!(state.mode, OutputMode::Linear);
        assert_eq!(state.note_count, 1);
    }

    #[test]
    fn test_length_knob_updates_loop() {
        let mut surface = ControlSurface::new(0, 300, 8);
        assert!(surface.update(0, 1000));
        assert_eq!(surface.state().loop_length, 64);
    }

    #[test]
    fn test_jitter_does_not_recompute() {
        let mut surface = ControlSurface::new(0, 300, 8);
        let before = surface.state();
        assert!(!surface.update(4, 304));
        assert_eq!(surface.state(), before);
    }

    #[test]
    fn test_chromatic_band() {
        let mut surface = ControlSurface::new(0, 300, 8);
        surface.update(700, 300);
        let state = surface.state();
        assert_eq!(state.mode, OutputMode::Scaled(Scale::Chromatic));
        assert_eq!(state.note_count, 36);
    }
}
