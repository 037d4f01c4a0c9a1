//! The main control loop
//!
//! One cooperative polling loop owns every piece of mutable state. Clock
//! and reset edges arrive as flags raised elsewhere; each `poll` drains
//! them (take-and-clear in one atomic step, reset first), processes at
//! most one clock tick to completion, then services the sensor and the
//! knobs. Nothing in here blocks.

mod player;
mod recorder;

pub use player::{list_output_devices, CvPlayer};
pub use recorder::CvRecorder;

use std::sync::Arc;

use crate::config::ReachConfig;
use crate::controls::ControlSurface;
use crate::cv::DacRange;
use crate::hw::{CvSink, DistanceSensor, EdgeFlags, Pots};
use crate::mapping::{OutputMode, PositionMapper};
use crate::scales::ScaleBank;
use crate::sequencer::{SequencerState, Step};

/// The gesture-to-CV engine.
pub struct Engine {
    sequencer: SequencerState,
    surface: ControlSurface,
    position: PositionMapper,
    dac: DacRange,
    flags: Arc<EdgeFlags>,
    sensor: Box<dyn DistanceSensor>,
    pots: Pots,
    sink: Box<dyn CvSink>,
    last_mm: i32,
    record_held: bool,
    last_code: Option<u16>,
    ticks: u64,
}

impl Engine {
    /// Build an engine from a validated config and its collaborators.
    pub fn new(
        config: &ReachConfig,
        sensor: Box<dyn DistanceSensor>,
        pots: Pots,
        sink: Box<dyn CvSink>,
        flags: Arc<EdgeFlags>,
    ) -> Self {
        let surface = ControlSurface::new(
            config.controls.scale_pot,
            config.controls.length_pot,
            config.controls.hysteresis,
        );
        let sequencer = SequencerState::new(surface.state().loop_length);

        Self {
            sequencer,
            surface,
            position: PositionMapper::new(
                config.sensor.min_mm,
                config.sensor.max_mm,
                config.sensor.ceiling_mm,
            ),
            dac: config.dac.range(),
            flags,
            sensor,
            pots,
            sink,
            last_mm: config.sensor.min_mm,
            record_held: false,
            last_code: None,
            ticks: 0,
        }
    }

    /// Record button state, polled per processed tick.
    pub fn set_record_held(&mut self, held: bool) {
        self.record_held = held;
    }

    /// Last code written to the sink.
    pub fn last_code(&self) -> Option<u16> {
        self.last_code
    }

    /// Current step index, once clocked.
    pub fn cursor(&self) -> Option<usize> {
        self.sequencer.cursor()
    }

    /// Clock edges processed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Loop length currently configured on the sequencer.
    pub fn loop_length(&self) -> usize {
        self.sequencer.loop_length()
    }

    /// Run one iteration of the control loop.
    pub fn poll(&mut self) {
        // Reset first: it must win over a simultaneous clock edge.
        if self.flags.take_reset() {
            self.sequencer.reset();
        }

        let clocked = self.flags.take_clock();

        let fresh_sample = self.sensor.sample_ready();
        if fresh_sample {
            self.last_mm = self.sensor.read_mm();
        }

        self.poll_pots();

        if clocked {
            self.process_tick();
        } else if fresh_sample && self.sequencer.cursor().is_none() {
            // No clock yet: the hand drives the output directly.
            self.emit_live();
        }
    }

    /// Read both knobs; a real change reconfigures the mode and pushes
    /// the loop length into the sequencer before this iteration's tick.
    fn poll_pots(&mut self) {
        let scale_reading = self.pots.scale.read();
        let length_reading = self.pots.length.read();
        if self.surface.update(scale_reading, length_reading) {
            self.sequencer
                .set_loop_length(self.surface.state().loop_length);
        }
    }

    fn process_tick(&mut self) {
        self.ticks += 1;
        self.sequencer.tick(self.record_held);

        if self.record_held {
            let step = self.map_position(self.last_mm);
            self.sequencer.record(step);
            // Fall through to the play path so the performer hears the
            // step that was just captured.
        }

        let step = self.sequencer.current_step();
        let code = self.step_code(step);
        self.write(code);
    }

    fn emit_live(&mut self) {
        let step = self.map_position(self.last_mm);
        let code = self.step_code(step);
        self.write(code);
    }

    fn map_position(&self, mm: i32) -> Step {
        let note_count = self.surface.state().note_count;
        Step {
            note_index: self.position.note_index(mm, note_count) as u8,
            linear_code: self.position.linear_code(mm),
        }
    }

    fn step_code(&self, step: Step) -> u16 {
        match self.surface.state().mode {
            OutputMode::Scaled(scale) => {
                let semitone = ScaleBank::get()
                    .table(scale)
                    .semitone_at(step.note_index as usize);
                self.dac.note_to_code(semitone)
            }
            OutputMode::Linear => step.linear_code.min(self.dac.max_code()),
        }
    }

    fn write(&mut self, code: u16) {
        self.sink.write(code);
        self.last_code = Some(code);
    }
}
