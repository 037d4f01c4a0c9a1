//! WAV CV recorder
//!
//! Writes the held CV level as a mono float WAV, one frame per sample.
//! Played through a DC-coupled interface, the file drives a modular
//! input directly.

use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// WAV writer for CV levels
pub struct CvRecorder {
    writer: WavWriter<BufWriter<File>>,
    sample_rate: u32,
    samples_written: u64,
}

impl CvRecorder {
    /// Create a new recorder writing to `path` at `sample_rate`.
    pub fn new(path: &Path, sample_rate: u32) -> Result<Self> {
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let writer = WavWriter::create(path, spec)
            .with_context(|| format!("failed to create WAV file: {:?}", path))?;

        Ok(Self {
            writer,
            sample_rate,
            samples_written: 0,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Hold a CV level for a span of samples.
    pub fn hold(&mut self, level: f32, samples: u64) -> Result<()> {
        for _ in 0..samples {
            self.writer
                .write_sample(level)
                .context("failed to write sample")?;
        }
        self.samples_written += samples;
        Ok(())
    }

    /// Finalize the WAV file.
    ///
    /// Must be called to close the file and write the header.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize().context("failed to finalize WAV file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_recorder_creation() {
        let file = NamedTempFile::new().unwrap();
        let recorder = CvRecorder::new(file.path(), 44100).unwrap();

        assert_eq!(recorder.sample_rate(), 44100);
        assert_eq!(recorder.samples_written(), 0);
    }

    #[test]
    fn test_hold_counts_samples() {
        let file = NamedTempFile::new().unwrap();
        let mut recorder = CvRecorder::new(file.path(), 44100).unwrap();

        recorder.hold(0.5, 100).unwrap();
        recorder.hold(0.25, 50).unwrap();

        assert_eq!(recorder.samples_written(), 150);
    }

    #[test]
    fn test_recorder_produces_stepped_wav() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        {
            let mut recorder = CvRecorder::new(&path, 8000).unwrap();
            recorder.hold(0.0, 10).unwrap();
            recorder.hold(1.0, 10).unwrap();
            recorder.finalize().unwrap();
        }

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 8000);
        assert_eq!(spec.sample_format, SampleFormat::Float);

        let samples: Vec<f32> = reader.into_samples().map(|s| s.unwrap()).collect();
        assert_eq!(samples.len(), 20);
        assert!(samples[..10].iter().all(|&s| s == 0.0));
        assert!(samples[10..].iter().all(|&s| s == 1.0));
    }
}
