//! Step sequencer state machine
//!
//! Records one value per external clock pulse while the record button is
//! held and replays the loop afterwards. All state lives in one struct
//! mutated only from the main loop; clock and reset edges arrive as
//! pre-drained flags, never as direct calls from handler context.

/// Fixed sequence capacity in steps.
pub const CAPACITY: usize = 64;

/// One recorded step: a note index into the active scale table and the
/// raw linear code captured at the same instant. Which one playback uses
/// is decided by the mode active at playback time, so turning the scale
/// knob re-harmonizes an already-recorded loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Step {
    pub note_index: u8,
    pub linear_code: u16,
}

/// Sequencer storage and transport state.
#[derive(Debug, Clone)]
pub struct SequencerState {
    steps: [Step; CAPACITY],
    /// `None` until the first clock edge.
    cursor: Option<usize>,
    /// Last valid step index; loop length is `count_size + 1`.
    count_size: usize,
    /// Transition flag for detecting a fresh punch into record.
    was_playing: bool,
}

impl SequencerState {
    /// Create an idle sequencer with the given loop length in steps.
    pub fn new(loop_length: usize) -> Self {
        let mut state = Self {
            steps: [Step::default(); CAPACITY],
            cursor: None,
            count_size: 0,
            was_playing: true,
        };
        state.set_loop_length(loop_length);
        state
    }

    /// Current step index, if the sequencer has seen a clock edge.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Loop length in steps.
    pub fn loop_length(&self) -> usize {
        self.count_size + 1
    }

    /// Reconfigure the loop length. If the cursor is currently past the
    /// new end, the wrap check at the next tick corrects it; one extra
    /// step may play until then, which is accepted.
    pub fn set_loop_length(&mut self, loop_length: usize) {
        self.count_size = loop_length.clamp(1, CAPACITY) - 1;
    }

    /// Process one clock edge and return the step index now under the
    /// cursor.
    ///
    /// Punching into record (button held where it was not at the last
    /// edge) forces the cursor to 0 so recording always restarts a fresh
    /// pass; otherwise the cursor advances and wraps past `count_size`.
    pub fn tick(&mut self, record_held: bool) -> usize {
        let next = if record_held && self.was_playing {
            0
        } else {
            match self.cursor {
                Some(current) if current < self.count_size => current + 1,
                _ => 0,
            }
        };
        self.cursor = Some(next);
        self.was_playing = !record_held;
        next
    }

    /// Reset edge: cursor back to the first step, any state, stored
    /// values untouched.
    pub fn reset(&mut self) {
        self.cursor = Some(0);
    }

    /// Record a step at the current cursor. No-op while idle.
    pub fn record(&mut self, step: Step) {
        if let Some(cursor) = self.cursor {
            self.steps[cursor] = step;
        }
    }

    /// The step under the cursor, or the first step while idle.
    pub fn current_step(&self) -> Step {
        self.steps[self.cursor.unwrap_or(0)]
    }

    /// Stored step at an index (bounded), for diagnostics and tests.
    pub fn step_at(&self, index: usize) -> Step {
        self.steps[index.min(CAPACITY - 1)]
    }
}
