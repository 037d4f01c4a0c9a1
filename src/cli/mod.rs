//! CLI interface for reach

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Hand distance to control voltage
#[derive(Parser)]
#[command(name = "reach")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the engine live: internal clock, simulated hand sweep, CV on
    /// the default audio output
    Run {
        /// Configuration file path
        #[arg(short, long, default_value = "reach.yaml")]
        config: PathBuf,

        /// Skip audio output, print codes instead
        #[arg(short, long)]
        quiet: bool,
    },

    /// Render a gesture script to a CV WAV file
    Render {
        /// Configuration file path
        #[arg(short, long, default_value = "reach.yaml")]
        config: PathBuf,

        /// Gesture script path (YAML)
        #[arg(short, long)]
        script: PathBuf,

        /// Output WAV path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the generated scale tables
    Scales,

    /// List available audio output devices
    Devices,

    /// Validate a configuration file
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "reach.yaml")]
        config: PathBuf,
    },

    /// Generate an example configuration file
    Init,
}

/// A gesture to render offline: one distance reading per clock tick
/// while the record button is held, then a number of play ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureScript {
    /// Distance readings in mm, one per record tick
    pub record: Vec<i32>,

    /// Clock ticks to play after the button is released
    #[serde(default = "default_play_ticks")]
    pub play_ticks: usize,
}

fn default_play_ticks() -> usize {
    16
}

/// Load a gesture script from a YAML file.
pub fn load_script(path: &Path) -> Result<GestureScript> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read gesture script: {:?}", path))?;
    let script: GestureScript = serde_yaml::from_str(&contents)?;
    if script.record.is_empty() {
        bail!("Gesture script has no record readings");
    }
    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_script() {
        let yaml = "record: [150, 270, 390, 80]\nplay_ticks: 8\n";
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let script = load_script(file.path()).unwrap();
        assert_eq!(script.record, vec![150, 270, 390, 80]);
        assert_eq!(script.play_ticks, 8);
    }

    #[test]
    fn test_play_ticks_defaults() {
        let yaml = "record: [100]\n";
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        assert_eq!(load_script(file.path()).unwrap().play_ticks, 16);
    }

    #[test]
    fn test_empty_record_rejected() {
        let yaml = "record: []\n";
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        assert!(load_script(file.path()).is_err());
    }
}
