//! Configuration schema definitions

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::cv::DacRange;

/// Main configuration for reach
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReachConfig {
    /// Distance sensor window
    #[serde(default)]
    pub sensor: SensorConfig,

    /// DAC range and calibration
    #[serde(default)]
    pub dac: DacConfig,

    /// Internal clock
    #[serde(default)]
    pub clock: ClockConfig,

    /// Potentiometer defaults
    #[serde(default)]
    pub controls: ControlsConfig,

    /// Audio output (live playback and rendering)
    #[serde(default)]
    pub audio: AudioConfig,
}

impl ReachConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.sensor.min_mm < 0 {
            bail!("Sensor minimum distance must not be negative");
        }
        if self.sensor.max_mm <= self.sensor.min_mm {
            bail!("Sensor maximum distance must be greater than the minimum");
        }
        if self.sensor.ceiling_mm < self.sensor.max_mm {
            bail!("Sensor fault ceiling must be at or above the maximum distance");
        }

        if self.dac.resolution_bits < 8 || self.dac.resolution_bits > 16 {
            bail!("DAC resolution must be between 8 and 16 bits");
        }
        if self.dac.max_volts <= self.dac.min_volts {
            bail!("DAC maximum volts must be greater than minimum volts");
        }
        if self.dac.max_volts + self.dac.calibration_volts <= self.dac.min_volts {
            bail!("Calibration offset collapses the DAC voltage range");
        }

        if self.clock.bpm < 20.0 || self.clock.bpm > 300.0 {
            bail!("BPM must be between 20 and 300");
        }

        if self.controls.scale_pot > 1023 || self.controls.length_pot > 1023 {
            bail!("Pot readings must be between 0 and 1023");
        }

        if self.audio.sample_rate < 8000 || self.audio.sample_rate > 192000 {
            bail!("Sample rate must be between 8000 and 192000");
        }

        Ok(())
    }
}

impl Default for ReachConfig {
    fn default() -> Self {
        Self {
            sensor: SensorConfig::default(),
            dac: DacConfig::default(),
            clock: ClockConfig::default(),
            controls: ControlsConfig::default(),
            audio: AudioConfig::default(),
        }
    }
}

/// Distance sensor window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Closest plausible hand distance in mm (default: 30)
    #[serde(default = "default_min_mm")]
    pub min_mm: i32,

    /// Farthest musically useful distance in mm (default: 500)
    #[serde(default = "default_max_mm")]
    pub max_mm: i32,

    /// Readings above this are glitches and read as min_mm (default: 675)
    #[serde(default = "default_ceiling_mm")]
    pub ceiling_mm: i32,
}

fn default_min_mm() -> i32 { 30 }
fn default_max_mm() -> i32 { 500 }
fn default_ceiling_mm() -> i32 { 675 }

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            min_mm: default_min_mm(),
            max_mm: default_max_mm(),
            ceiling_mm: default_ceiling_mm(),
        }
    }
}

/// DAC range and calibration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DacConfig {
    /// Output resolution in bits (default: 12)
    #[serde(default = "default_resolution_bits")]
    pub resolution_bits: u8,

    /// Voltage at code 0 (default: 0.0)
    #[serde(default)]
    pub min_volts: f64,

    /// Voltage at full-scale code (default: 5.0)
    #[serde(default = "default_max_volts")]
    pub max_volts: f64,

    /// Signed correction to the conversion ceiling, set at calibration
    /// time (default: 0.0)
    #[serde(default)]
    pub calibration_volts: f64,
}

fn default_resolution_bits() -> u8 { 12 }
fn default_max_volts() -> f64 { 5.0 }

impl Default for DacConfig {
    fn default() -> Self {
        Self {
            resolution_bits: default_resolution_bits(),
            min_volts: 0.0,
            max_volts: default_max_volts(),
            calibration_volts: 0.0,
        }
    }
}

impl DacConfig {
    /// The numeric range the CV codec works in.
    pub fn range(&self) -> DacRange {
        DacRange {
            resolution_bits: self.resolution_bits,
            min_volts: self.min_volts,
            max_volts: self.max_volts,
            calibration_volts: self.calibration_volts,
        }
    }
}

/// Internal clock settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Steps per minute for the internal clock (default: 120)
    #[serde(default = "default_bpm")]
    pub bpm: f64,
}

fn default_bpm() -> f64 { 120.0 }

impl Default for ClockConfig {
    fn default() -> Self {
        Self { bpm: default_bpm() }
    }
}

/// Potentiometer defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsConfig {
    /// Initial scale knob reading 0-1023 (default: 0, Major)
    #[serde(default)]
    pub scale_pot: u16,

    /// Initial length knob reading 0-1023 (default: 300, 8 steps)
    #[serde(default = "default_length_pot")]
    pub length_pot: u16,

    /// Change threshold in pot counts (default: 8)
    #[serde(default = "default_hysteresis")]
    pub hysteresis: u16,
}

fn default_length_pot() -> u16 { 300 }
fn default_hysteresis() -> u16 { 8 }

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            scale_pot: 0,
            length_pot: default_length_pot(),
            hysteresis: default_hysteresis(),
        }
    }
}

/// Audio output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate in Hz (default: 44100)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Output device name (None = default device)
    #[serde(default)]
    pub device: Option<String>,
}

fn default_sample_rate() -> u32 { 44100 }

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            device: None,
        }
    }
}
