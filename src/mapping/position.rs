//! Hand-position mapping
//!
//! Converts a distance reading in millimetres into either a note index
//! within the active scale or a raw linear DAC code, after rejecting
//! readings outside the plausible sensing window.

use super::RangeMap;
use crate::scales::{Scale, ALL_SCALES};

/// Linear DAC code range (12-bit reference design).
const LINEAR_CODE_MAX: i32 = 4095;

/// How the CV output interprets a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Quantize to a scale; positions map to note indices.
    Scaled(Scale),
    /// Unquantized; positions map straight to DAC codes.
    Linear,
}

impl OutputMode {
    /// Decode a mode-taper band value (0..=6 scales, 7 linear).
    pub fn from_band(band: u8) -> Self {
        match ALL_SCALES.get(band as usize) {
            Some(&scale) => OutputMode::Scaled(scale),
            None => OutputMode::Linear,
        }
    }
}

/// Maps distance readings into note indices or linear codes.
#[derive(Debug, Clone, Copy)]
pub struct PositionMapper {
    min_mm: i32,
    max_mm: i32,
    ceiling_mm: i32,
}

impl PositionMapper {
    pub fn new(min_mm: i32, max_mm: i32, ceiling_mm: i32) -> Self {
        Self {
            min_mm,
            max_mm,
            ceiling_mm,
        }
    }

    /// Snap implausible readings to the closest-hand position before any
    /// mapping runs.
    fn reject(&self, mm: i32) -> i32 {
        if mm < self.min_mm || mm > self.ceiling_mm {
            self.min_mm
        } else {
            mm
        }
    }

    /// Map a reading to a note index in `[0, note_count - 1]`.
    pub fn note_index(&self, mm: i32, note_count: usize) -> usize {
        let top = note_count.saturating_sub(1) as i32;
        let map = RangeMap::new(self.min_mm, self.max_mm, 0, top)
            .with_fault_ceiling(self.ceiling_mm);
        map.map(self.reject(mm)).clamp(0, top) as usize
    }

    /// Map a reading to a raw linear DAC code in `[0, 4095]`.
    pub fn linear_code(&self, mm: i32) -> u16 {
        let map = RangeMap::new(self.min_mm, self.max_mm, 0, LINEAR_CODE_MAX)
            .with_fault_ceiling(self.ceiling_mm);
        map.map(self.reject(mm)) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> PositionMapper {
        PositionMapper::new(30, 500, 675)
    }

    #[test]
    fn test_note_index_span() {
        let m = mapper();
        assert_eq!(m.note_index(30, 21), 0);
        assert_eq!(m.note_index(500, 21), 20);
        assert_eq!(m.note_index(265, 21), 10);
    }

    #[test]
    fn test_note_index_bounded() {
        let m = mapper();
        // Between max_mm and the fault ceiling: clamp to the top note.
        assert_eq!(m.note_index(600, 15), 14);
    }

    #[test]
    fn test_sensor_glitch_reads_as_minimum() {
        let m = mapper();
        assert_eq!(m.note_index(700, 21), m.note_index(30, 21));
        assert_eq!(m.linear_code(700), m.linear_code(30));
    }

    #[test]
    fn test_below_floor_reads_as_minimum() {
        let m = mapper();
        assert_eq!(m.note_index(5, 21), 0);
        assert_eq!(m.linear_code(5), 0);
    }

    #[test]
    fn test_linear_code_span() {
        let m = mapper();
        assert_eq!(m.linear_code(30), 0);
        assert_eq!(m.linear_code(500), 4095);
    }

    #[test]
    fn test_mode_from_band() {
        assert_eq!(OutputMode::from_band(0), OutputMode::Scaled(Scale::Major));
        assert_eq!(OutputMode::from_band(6), OutputMode::Scaled(Scale::Chromatic));
        assert_eq!(OutputMode::from_band(7), OutputMode::Linear);
        assert_eq!(OutputMode::from_band(200), OutputMode::Linear);
    }

    #[test]
    fn test_single_note_scale_maps_to_zero() {
        let m = mapper();
        assert_eq!(m.note_index(400, 1), 0);
    }
}
