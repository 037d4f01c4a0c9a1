//! Hosted stand-ins for the hardware
//!
//! A triangle-sweep sensor for demos, a scripted sensor for offline
//! rendering and tests, and sinks that hold or discard the output code.

use std::sync::atomic::{AtomicU16, AtomicU32, Ordering};
use std::sync::Arc;

use super::{CvSink, DistanceSensor, HwError, PotInput};

/// Sensor that sweeps the sensing range up and down, one reading per
/// poll. Stands in for a hand moving over the sensor.
pub struct SweepSensor {
    min_mm: i32,
    max_mm: i32,
    current: i32,
    step: i32,
}

impl SweepSensor {
    pub fn new(min_mm: i32, max_mm: i32, step: i32) -> Result<Self, HwError> {
        if min_mm >= max_mm {
            return Err(HwError::SensorInit(format!(
                "empty sweep range {min_mm}..{max_mm}"
            )));
        }
        Ok(Self {
            min_mm,
            max_mm,
            current: min_mm,
            step: step.max(1),
        })
    }
}

impl DistanceSensor for SweepSensor {
    fn sample_ready(&mut self) -> bool {
        true
    }

    fn read_mm(&mut self) -> i32 {
        let reading = self.current;
        self.current += self.step;
        if self.current >= self.max_mm || self.current <= self.min_mm {
            self.step = -self.step;
            self.current = self.current.clamp(self.min_mm, self.max_mm);
        }
        reading
    }
}

/// Sensor that plays back a fixed list of readings, then repeats the
/// last one. Used by `render` and by the engine tests.
pub struct ScriptSensor {
    readings: Vec<i32>,
    position: usize,
}

impl ScriptSensor {
    pub fn new(readings: Vec<i32>) -> Result<Self, HwError> {
        if readings.is_empty() {
            return Err(HwError::SensorInit("empty reading script".into()));
        }
        Ok(Self {
            readings,
            position: 0,
        })
    }
}

impl DistanceSensor for ScriptSensor {
    fn sample_ready(&mut self) -> bool {
        true
    }

    fn read_mm(&mut self) -> i32 {
        let reading = self.readings[self.position.min(self.readings.len() - 1)];
        if self.position + 1 < self.readings.len() {
            self.position += 1;
        }
        reading
    }
}

/// Knob stuck at one position.
#[derive(Debug, Clone, Copy)]
pub struct StaticPot {
    reading: u16,
}

impl StaticPot {
    pub fn new(reading: u16) -> Self {
        Self { reading }
    }
}

impl PotInput for StaticPot {
    fn read(&mut self) -> u16 {
        self.reading
    }
}

/// Knob whose position can be turned from outside the engine while it
/// runs. Clones share the same position.
#[derive(Debug, Clone)]
pub struct SharedPot {
    reading: Arc<AtomicU16>,
}

impl SharedPot {
    pub fn new(initial: u16) -> Self {
        Self {
            reading: Arc::new(AtomicU16::new(initial)),
        }
    }

    /// Turn the knob.
    pub fn set(&self, reading: u16) {
        self.reading.store(reading, Ordering::Relaxed);
    }
}

impl PotInput for SharedPot {
    fn read(&mut self) -> u16 {
        self.reading.load(Ordering::Relaxed)
    }
}

/// Shared CV level in `[0.0, 1.0]`, written by the engine and read by the
/// audio callback. Stored as f32 bits in an atomic so neither side locks.
#[derive(Debug, Default)]
pub struct HeldLevel {
    bits: AtomicU32,
}

impl HeldLevel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set(&self, level: f32) {
        self.bits.store(level.to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

/// Sink that publishes each code as a normalized held level.
pub struct LevelSink {
    level: Arc<HeldLevel>,
    max_code: u16,
}

impl LevelSink {
    pub fn new(level: Arc<HeldLevel>, max_code: u16) -> Self {
        Self {
            level,
            max_code: max_code.max(1),
        }
    }
}

impl CvSink for LevelSink {
    fn write(&mut self, code: u16) {
        self.level.set(code as f32 / self.max_code as f32);
    }
}

/// Sink that discards codes.
#[derive(Debug, Default)]
pub struct NullSink;

impl NullSink {
    pub fn new() -> Self {
        Self
    }
}

impl CvSink for NullSink {
    fn write(&mut self, _code: u16) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_reverses_at_ends() {
        let mut sensor = SweepSensor::new(0, 10, 5).unwrap();
        let readings: Vec<i32> = (0..6).map(|_| sensor.read_mm()).collect();
        assert_eq!(readings, vec![0, 5, 10, 5, 0, 5]);
    }

    #[test]
    fn test_sweep_rejects_empty_range() {
        assert!(SweepSensor::new(100, 100, 1).is_err());
    }

    #[test]
    fn test_script_holds_last_reading() {
        let mut sensor = ScriptSensor::new(vec![100, 200]).unwrap();
        assert_eq!(sensor.read_mm(), 100);
        assert_eq!(sensor.read_mm(), 200);
        assert_eq!(sensor.read_mm(), 200);
    }

    #[test]
    fn test_script_rejects_empty() {
        assert!(ScriptSensor::new(vec![]).is_err());
    }

    #[test]
    fn test_level_sink_normalizes() {
        let level = HeldLevel::new();
        let mut sink = LevelSink::new(Arc::clone(&level), 4095);
        sink.write(0);
        assert_eq!(level.get(), 0.0);
        sink.write(4095);
        assert_eq!(level.get(), 1.0);
    }

    #[test]
    fn test_static_pot_holds_position() {
        let mut pot = StaticPot::new(300);
        assert_eq!(pot.read(), 300);
        assert_eq!(pot.read(), 300);
    }

    #[test]
    fn test_shared_pot_turns() {
        let knob = SharedPot::new(0);
        let mut engine_side = knob.clone();
        assert_eq!(engine_side.read(), 0);
        knob.set(1000);
        assert_eq!(engine_side.read(), 1000);
    }
}
