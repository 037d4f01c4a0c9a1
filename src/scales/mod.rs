//! Scale tables for the quantizer
//!
//! Each scale is a compact per-octave interval pattern expanded once at
//! startup into a flat multi-octave table of absolute semitone values.

use std::fmt;
use std::sync::OnceLock;

/// Number of entries in an expanded scale table.
pub const TABLE_LEN: usize = 37;

/// Octaves expanded before the table is padded with the ceiling value.
pub const MAX_OCTAVES: u8 = 3;

/// Padding value for table slots past the last generated note
/// (one semitone above the highest generatable note, 35).
pub const CEILING_SEMITONE: u8 = 36;

/// The musical scales the quantizer can snap to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scale {
    Major,
    Minor,
    MinorPentatonic,
    HarmonicMinor,
    Diminished,
    WholeTone,
    Chromatic,
}

/// All scales, in knob order.
pub const ALL_SCALES: [Scale; 7] = [
    Scale::Major,
    Scale::Minor,
    Scale::MinorPentatonic,
    Scale::HarmonicMinor,
    Scale::Diminished,
    Scale::WholeTone,
    Scale::Chromatic,
];

impl Scale {
    /// Semitone offsets within one octave, strictly increasing.
    /// End of slice marks the octave boundary.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            Scale::Major => &[0, 2, 4, 5, 7, 9, 11],
            Scale::Minor => &[0, 2, 3, 5, 7, 8, 10],
            Scale::MinorPentatonic => &[0, 3, 5, 7, 10],
            Scale::HarmonicMinor => &[0, 2, 3, 5, 7, 8, 11],
            Scale::Diminished => &[0, 1, 3, 4, 6, 7, 9, 10],
            Scale::WholeTone => &[0, 2, 4, 6, 8, 10],
            Scale::Chromatic => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        }
    }

    /// Display name for logs and the `scales` subcommand.
    pub fn name(self) -> &'static str {
        match self {
            Scale::Major => "Major",
            Scale::Minor => "Minor",
            Scale::MinorPentatonic => "Minor Pentatonic",
            Scale::HarmonicMinor => "Harmonic Minor",
            Scale::Diminished => "Diminished",
            Scale::WholeTone => "Whole Tone",
            Scale::Chromatic => "Chromatic",
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An expanded multi-octave scale table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullScaleTable {
    semitones: [u8; TABLE_LEN],
    note_count: usize,
}

impl FullScaleTable {
    /// Expand an interval pattern into a full table.
    ///
    /// Walks the pattern cyclically, adding `octave * 12` on each wrap,
    /// until the table is full or the octave cap is reached. Remaining
    /// slots hold [`CEILING_SEMITONE`].
    pub fn generate(pattern: &[u8]) -> Self {
        let mut semitones = [CEILING_SEMITONE; TABLE_LEN];
        if pattern.is_empty() {
            // Nothing to expand; the whole table is the ceiling note.
            return Self {
                semitones,
                note_count: 1,
            };
        }
        let mut note_index = 0;
        let mut pattern_index = 0;
        let mut octave: u8 = 0;

        while note_index < TABLE_LEN {
            if pattern_index == pattern.len() {
                pattern_index = 0;
                octave += 1;
                if octave >= MAX_OCTAVES {
                    break;
                }
            }
            semitones[note_index] = pattern[pattern_index] + octave * 12;
            note_index += 1;
            pattern_index += 1;
        }

        Self {
            semitones,
            note_count: note_index.max(1),
        }
    }

    /// Semitone value at `index`, clamped to the table bounds.
    pub fn semitone_at(&self, index: usize) -> u8 {
        self.semitones[index.min(TABLE_LEN - 1)]
    }

    /// Number of generated (non-padding) notes.
    pub fn note_count(&self) -> usize {
        self.note_count
    }

    /// The raw table.
    pub fn semitones(&self) -> &[u8; TABLE_LEN] {
        &self.semitones
    }
}

/// The expanded tables for all scales, generated once per process.
pub struct ScaleBank {
    tables: [FullScaleTable; ALL_SCALES.len()],
}

impl ScaleBank {
    fn build() -> Self {
        let mut tables = [FullScaleTable::generate(Scale::Chromatic.intervals()); ALL_SCALES.len()];
        for (slot, scale) in tables.iter_mut().zip(ALL_SCALES) {
            *slot = FullScaleTable::generate(scale.intervals());
        }
        Self { tables }
    }

    /// The process-wide bank.
    pub fn get() -> &'static ScaleBank {
        static BANK: OnceLock<ScaleBank> = OnceLock::new();
        BANK.get_or_init(ScaleBank::build)
    }

    /// Table for a scale.
    pub fn table(&self, scale: Scale) -> &FullScaleTable {
        let position = ALL_SCALES.iter().position(|&s| s == scale).unwrap_or(0);
        &self.tables[position]
    }
}
