//! Live CV output using cpal
//!
//! Streams the current held level as a DC sample value. On a DC-coupled
//! interface this drives a modular input in real time; the stream only
//! ever reads the shared level, so the control loop never blocks on
//! audio.

use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::hw::sim::HeldLevel;

/// Real-time CV level player
pub struct CvPlayer {
    stream: Option<Stream>,
    running: Arc<AtomicBool>,
}

impl CvPlayer {
    pub fn new() -> Self {
        Self {
            stream: None,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start streaming the held level to the default output device.
    pub fn start(&mut self, level: Arc<HeldLevel>) -> Result<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("No output device available"))?;

        let config = device.default_output_config()?;
        let sample_format = config.sample_format();
        let stream_config: StreamConfig = config.into();

        self.running.store(true, Ordering::SeqCst);
        let running = self.running.clone();

        let stream = match sample_format {
            SampleFormat::F32 => {
                self.build_stream::<f32>(&device, &stream_config, level, running)?
            }
            SampleFormat::I16 => {
                self.build_stream::<i16>(&device, &stream_config, level, running)?
            }
            SampleFormat::U16 => {
                self.build_stream::<u16>(&device, &stream_config, level, running)?
            }
            _ => return Err(anyhow!("Unsupported sample format")),
        };

        stream.play()?;
        self.stream = Some(stream);

        Ok(())
    }

    /// Stop streaming.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.stream = None;
    }

    /// Check if currently streaming.
    pub fn is_playing(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn build_stream<T: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>>(
        &self,
        device: &Device,
        config: &StreamConfig,
        level: Arc<HeldLevel>,
        running: Arc<AtomicBool>,
    ) -> Result<Stream> {
        let channels = config.channels as usize;

        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let sample = if running.load(Ordering::SeqCst) {
                    level.get()
                } else {
                    0.0
                };
                for frame in data.chunks_mut(channels) {
                    for channel_sample in frame.iter_mut() {
                        *channel_sample = T::from_sample(sample);
                    }
                }
            },
            |err| {
                eprintln!("CV stream error: {}", err);
            },
            None,
        )?;

        Ok(stream)
    }
}

impl Default for CvPlayer {
    fn default() -> Self {
        Self::new()
    }
}

/// List all available output devices.
pub fn list_output_devices() -> Vec<(String, StreamConfig)> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(output_devices) = host.output_devices() {
        for device in output_devices {
            if let (Ok(name), Ok(config)) = (device.name(), device.default_output_config()) {
                devices.push((name, config.into()));
            }
        }
    }

    devices
}
