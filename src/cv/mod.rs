//! CV conversion: semitones to volts to DAC codes
//!
//! 1 volt per octave, semitone 0 = 0 V. Code conversion rounds up so a
//! voltage just above a note threshold never lands on the note below.

pub const SEMITONES_PER_OCTAVE: f64 = 12.0;
pub const VOLTS_PER_SEMITONE: f64 = 1.0 / SEMITONES_PER_OCTAVE;

/// Convert a semitone value to volts (1 V/oct).
pub fn note_to_volts(semitone: u8) -> f64 {
    semitone as f64 * VOLTS_PER_SEMITONE
}

/// The numeric range and calibration of the DAC output.
#[derive(Debug, Clone, Copy)]
pub struct DacRange {
    pub resolution_bits: u8,
    pub min_volts: f64,
    pub max_volts: f64,
    /// Signed correction applied to the conversion ceiling, set once at
    /// calibration time.
    pub calibration_volts: f64,
}

impl DacRange {
    /// Highest representable code.
    pub fn max_code(&self) -> u16 {
        ((1u32 << self.resolution_bits) - 1) as u16
    }

    /// Convert a voltage to a DAC code.
    ///
    /// Normalizes into `[min_volts, max_volts + calibration_volts]`,
    /// scales to the code range, and rounds up. Out-of-range voltages
    /// clamp to the ends of the code range.
    pub fn volts_to_code(&self, volts: f64) -> u16 {
        let ceiling = self.max_volts + self.calibration_volts;
        let span = ceiling - self.min_volts;
        if span <= 0.0 {
            return 0;
        }
        let normalized = (volts - self.min_volts) / span;
        let scaled = (normalized * self.max_code() as f64).ceil();
        scaled.clamp(0.0, self.max_code() as f64) as u16
    }

    /// Convert a semitone value straight to a DAC code.
    pub fn note_to_code(&self, semitone: u8) -> u16 {
        self.volts_to_code(note_to_volts(semitone))
    }
}

impl Default for DacRange {
    fn default() -> Self {
        Self {
            resolution_bits: 12,
            min_volts: 0.0,
            max_volts: 5.0,
            calibration_volts: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> DacRange {
        DacRange::default()
    }

    #[test]
    fn test_note_to_volts_octaves() {
        assert_eq!(note_to_volts(0), 0.0);
        assert_eq!(note_to_volts(12), 1.0);
        assert_eq!(note_to_volts(24), 2.0);
    }

    #[test]
    fn test_volts_to_code_endpoints() {
        let r = range();
        assert_eq!(r.volts_to_code(0.0), 0);
        assert_eq!(r.volts_to_code(5.0), 4095);
    }

    #[test]
    fn test_volts_to_code_clamps() {
        let r = range();
        assert_eq!(r.volts_to_code(-1.0), 0);
        assert_eq!(r.volts_to_code(9.0), 4095);
    }

    #[test]
    fn test_volts_to_code_rounds_up() {
        let r = range();
        // One code is 5/4095 volts wide; anything past a code boundary
        // must land on the next code, not the previous one.
        let step = 5.0 / 4095.0;
        assert_eq!(r.volts_to_code(step * 0.5), 1);
        assert_eq!(r.volts_to_code(step * 1.5), 2);
    }

    #[test]
    fn test_volts_to_code_monotonic() {
        let r = range();
        let mut last = 0;
        for i in 0..=500 {
            let code = r.volts_to_code(i as f64 * 0.01);
            assert!(code >= last);
            last = code;
        }
    }

    #[test]
    fn test_calibration_shifts_ceiling() {
        let mut r = range();
        r.calibration_volts = 0.25;
        // Full-scale code now requires the corrected ceiling.
        assert_eq!(r.volts_to_code(5.25), 4095);
        assert!(r.volts_to_code(5.0) < 4095);
    }

    #[test]
    fn test_note_to_code_octave_spacing() {
        let r = range();
        let octave0 = r.note_to_code(0);
        let octave1 = r.note_to_code(12);
        let octave2 = r.note_to_code(24);
        // One octave = one volt = a fifth of the 5 V code range.
        assert_eq!(octave0, 0);
        assert_eq!(octave1, 819);
        assert_eq!(octave2 - octave1, octave1 - octave0);
    }

    #[test]
    fn test_degenerate_range() {
        let r = DacRange {
            resolution_bits: 12,
            min_volts: 2.0,
            max_volts: 2.0,
            calibration_volts: 0.0,
        };
        assert_eq!(r.volts_to_code(2.0), 0);
    }
}
