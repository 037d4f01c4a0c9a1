//! Audio-taper compensation tables
//!
//! The scale and length knobs are logarithmic-taper potentiometers, so a
//! uniform split of the 0..=1023 reading would cram most selections into
//! one end of the travel. Each knob instead uses a fixed table of
//! hand-tuned threshold bands: the first band whose upper bound is at or
//! above the reading wins.

/// Full-scale potentiometer reading.
pub const POT_MAX: u16 = 1023;

/// Loop lengths selectable on the length knob, in steps.
pub const LOOP_LENGTHS: [usize; 7] = [2, 3, 4, 8, 16, 32, 64];

/// Ordered `(upper_bound_inclusive, value)` bands over a pot reading.
#[derive(Debug, Clone, Copy)]
pub struct TaperTable<const N: usize> {
    bands: [(u16, u8); N],
}

impl<const N: usize> TaperTable<N> {
    pub const fn new(bands: [(u16, u8); N]) -> Self {
        Self { bands }
    }

    /// Select the band value for a reading. Readings past the last bound
    /// fall into the last band.
    pub fn select(&self, reading: u16) -> u8 {
        for &(upper, value) in &self.bands {
            if reading <= upper {
                return value;
            }
        }
        self.bands[N - 1].1
    }

    /// Band boundaries, for tests and diagnostics.
    pub fn bounds(&self) -> [u16; N] {
        let mut out = [0u16; N];
        for (slot, &(upper, _)) in out.iter_mut().zip(&self.bands) {
            *slot = upper;
        }
        out
    }
}

/// Scale knob: 7 musical scales plus linear mode (value 7).
/// Bands widen toward the top of the travel to undo the log taper.
pub const MODE_TAPER: TaperTable<8> = TaperTable::new([
    (15, 0),
    (40, 1),
    (90, 2),
    (180, 3),
    (330, 4),
    (530, 5),
    (760, 6),
    (POT_MAX, 7),
]);

/// Length knob: index into [`LOOP_LENGTHS`].
pub const LENGTH_TAPER: TaperTable<7> = TaperTable::new([
    (20, 0),
    (60, 1),
    (140, 2),
    (300, 3),
    (500, 4),
    (750, 5),
    (POT_MAX, 6),
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_matching_band_wins() {
        let table = TaperTable::new([(10, 0), (20, 1), (30, 2)]);
        assert_eq!(table.select(0), 0);
        assert_eq!(table.select(10), 0);
        assert_eq!(table.select(11), 1);
        assert_eq!(table.select(25), 2);
    }

    #[test]
    fn test_past_last_bound_sticks() {
        let table = TaperTable::new([(10, 0), (20, 1)]);
        assert_eq!(table.select(500), 1);
    }

    #[test]
    fn test_mode_taper_boundaries_adjacent() {
        // Just below and just above every boundary must select adjacent
        // values with no gap or overlap.
        let bounds = MODE_TAPER.bounds();
        for (i, &upper) in bounds.iter().enumerate().take(bounds.len() - 1) {
            assert_eq!(MODE_TAPER.select(upper), i as u8);
            assert_eq!(MODE_TAPER.select(upper + 1), i as u8 + 1);
        }
    }

    #[test]
    fn test_length_taper_boundaries_adjacent() {
        let bounds = LENGTH_TAPER.bounds();
        for (i, &upper) in bounds.iter().enumerate().take(bounds.len() - 1) {
            assert_eq!(LENGTH_TAPER.select(upper), i as u8);
            assert_eq!(LENGTH_TAPER.select(upper + 1), i as u8 + 1);
        }
    }

    #[test]
    fn test_tables_cover_full_travel() {
        assert_eq!(*MODE_TAPER.bounds().last().unwrap(), POT_MAX);
        assert_eq!(*LENGTH_TAPER.bounds().last().unwrap(), POT_MAX);
        assert_eq!(MODE_TAPER.select(POT_MAX), 7);
        assert_eq!(LENGTH_TAPER.select(POT_MAX), 6);
    }

    #[test]
    fn test_length_values() {
        assert_eq!(LOOP_LENGTHS[LENGTH_TAPER.select(0) as usize], 2);
        assert_eq!(LOOP_LENGTHS[LENGTH_TAPER.select(POT_MAX) as usize], 64);
        assert_eq!(LOOP_LENGTHS[LENGTH_TAPER.select(200) as usize], 8);
    }
}
