//! Hardware boundary
//!
//! The narrow contracts the core requires of its collaborators: a polled
//! distance sensor, a CV output that holds its last code, and edge flags
//! raised by clock/reset handlers. Hosted simulations live in [`sim`].

pub mod sim;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use thiserror::Error;

/// Failure bringing up a sensor. The only unrecoverable condition in the
/// system: operation halts rather than running on unreliable input.
#[derive(Debug, Error)]
pub enum HwError {
    #[error("distance sensor not responding: {0}")]
    SensorInit(String),
}

/// A polled distance sensor.
///
/// `read_mm` is only called after `sample_ready` returns true, once per
/// main-loop iteration; it must never block.
pub trait DistanceSensor: Send {
    fn sample_ready(&mut self) -> bool;
    fn read_mm(&mut self) -> i32;
}

/// A debounced potentiometer, read once per main-loop iteration.
/// Readings are raw counts in `0..=1023`; hysteresis lives in the
/// control surface, not here.
pub trait PotInput: Send {
    fn read(&mut self) -> u16;
}

/// The two knobs of the control surface.
pub struct Pots {
    pub scale: Box<dyn PotInput>,
    pub length: Box<dyn PotInput>,
}

impl Pots {
    pub fn new(scale: Box<dyn PotInput>, length: Box<dyn PotInput>) -> Self {
        Self { scale, length }
    }

    /// Knobs frozen at fixed positions.
    pub fn fixed(scale: u16, length: u16) -> Self {
        Self::new(
            Box::new(sim::StaticPot::new(scale)),
            Box::new(sim::StaticPot::new(length)),
        )
    }
}

/// A CV output that holds each written code until the next write.
pub trait CvSink: Send {
    fn write(&mut self, code: u16);
}

/// One-shot clock and reset edge flags.
///
/// Handlers (or the internal clock thread) only `raise_*`; the main loop
/// only `take_*`. Take is an atomic swap, so reading and clearing is one
/// step and an edge arriving concurrently is never lost.
#[derive(Debug, Default)]
pub struct EdgeFlags {
    clock: AtomicBool,
    reset: AtomicBool,
}

impl EdgeFlags {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn raise_clock(&self) {
        self.clock.store(true, Ordering::SeqCst);
    }

    pub fn raise_reset(&self) {
        self.reset.store(true, Ordering::SeqCst);
    }

    pub fn take_clock(&self) -> bool {
        self.clock.swap(false, Ordering::SeqCst)
    }

    pub fn take_reset(&self) -> bool {
        self.reset.swap(false, Ordering::SeqCst)
    }
}

/// Internal clock: a dedicated thread raising the clock flag at a fixed
/// interval, standing in for an external gate input.
pub struct InternalClock {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl InternalClock {
    /// Start ticking `flags` at `bpm` beats per minute.
    pub fn start(flags: Arc<EdgeFlags>, bpm: f64) -> Self {
        let interval = Duration::from_secs_f64(60.0 / bpm.max(1.0));
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = Arc::clone(&running);

        let thread = std::thread::spawn(move || {
            while thread_running.load(Ordering::SeqCst) {
                flags.raise_clock();
                std::thread::sleep(interval);
            }
        });

        Self {
            running,
            thread: Some(thread),
        }
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for InternalClock {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_clears_flag() {
        let flags = EdgeFlags::new();
        assert!(!flags.take_clock());

        flags.raise_clock();
        assert!(flags.take_clock());
        assert!(!flags.take_clock());
    }

    #[test]
    fn test_flags_independent() {
        let flags = EdgeFlags::new();
        flags.raise_reset();
        assert!(!flags.take_clock());
        assert!(flags.take_reset());
    }

    #[test]
    fn test_internal_clock_raises_edges() {
        let flags = EdgeFlags::new();
        let mut clock = InternalClock::start(Arc::clone(&flags), 6000.0);

        let mut seen = 0;
        for _ in 0..200 {
            if flags.take_clock() {
                seen += 1;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        clock.stop();
        assert!(seen >= 2, "expected repeated clock edges, saw {seen}");
    }
}
