//! reach - Hand distance to control voltage

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use reach::config;
use reach::engine::{list_output_devices, CvPlayer, CvRecorder, Engine};
use reach::hw::sim::{HeldLevel, LevelSink, NullSink, ScriptSensor, SweepSensor};
use reach::hw::{EdgeFlags, InternalClock, Pots};
use reach::scales::{ScaleBank, ALL_SCALES};

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config: config_path,
            quiet,
        } => {
            println!("Loading configuration from {:?}...", config_path);
            let cfg = config::load_config(&config_path)?;

            println!("Starting reach...");
            println!("  Clock: {} BPM", cfg.clock.bpm);
            println!(
                "  Sensor window: {}..{} mm (fault ceiling {} mm)",
                cfg.sensor.min_mm, cfg.sensor.max_mm, cfg.sensor.ceiling_mm
            );

            let flags = EdgeFlags::new();
            let level = HeldLevel::new();
            let max_code = cfg.dac.range().max_code();

            let sensor = SweepSensor::new(cfg.sensor.min_mm, cfg.sensor.max_mm, 10)?;
            let mut engine = Engine::new(
                &cfg,
                Box::new(sensor),
                Pots::fixed(cfg.controls.scale_pot, cfg.controls.length_pot),
                if quiet {
                    Box::new(NullSink::new())
                } else {
                    Box::new(LevelSink::new(Arc::clone(&level), max_code))
                },
                Arc::clone(&flags),
            );

            let mut player = CvPlayer::new();
            if !quiet {
                player.start(Arc::clone(&level))?;
            }

            let mut clock = InternalClock::start(Arc::clone(&flags), cfg.clock.bpm);

            let running = Arc::new(AtomicBool::new(true));
            let ctrlc_running = Arc::clone(&running);
            ctrlc::set_handler(move || {
                ctrlc_running.store(false, Ordering::SeqCst);
            })?;

            // Record one full pass of the sweep, then loop it.
            engine.set_record_held(true);
            let record_ticks = engine.loop_length() as u64;
            println!(
                "Recording {} steps from the sweep, then looping. Ctrl-C to stop.",
                record_ticks
            );

            let mut last_printed = None;
            while running.load(Ordering::SeqCst) {
                engine.poll();

                if engine.ticks() >= record_ticks {
                    engine.set_record_held(false);
                }

                if engine.last_code() != last_printed {
                    last_printed = engine.last_code();
                    if let (Some(step), Some(code)) = (engine.cursor(), engine.last_code()) {
                        println!("  step {:2}  code {:4}", step, code);
                    }
                }

                std::thread::sleep(Duration::from_millis(1));
            }

            clock.stop();
            player.stop();
            println!("\nStopped.");
        }

        Commands::Render {
            config: config_path,
            script: script_path,
            output,
        } => {
            println!("Loading configuration from {:?}...", config_path);
            let cfg = config::load_config(&config_path)?;
            let script = cli::load_script(&script_path)?;

            println!(
                "Rendering {} record ticks + {} play ticks to {:?}...",
                script.record.len(),
                script.play_ticks,
                output
            );

            let flags = EdgeFlags::new();
            let level = HeldLevel::new();
            let max_code = cfg.dac.range().max_code();

            let sensor = ScriptSensor::new(script.record.clone())?;
            let mut engine = Engine::new(
                &cfg,
                Box::new(sensor),
                Pots::fixed(cfg.controls.scale_pot, cfg.controls.length_pot),
                Box::new(LevelSink::new(Arc::clone(&level), max_code)),
                Arc::clone(&flags),
            );

            let samples_per_step =
                (cfg.audio.sample_rate as f64 * 60.0 / cfg.clock.bpm) as u64;
            let mut recorder = CvRecorder::new(&output, cfg.audio.sample_rate)?;

            engine.set_record_held(true);
            for _ in 0..script.record.len() {
                flags.raise_clock();
                engine.poll();
                recorder.hold(level.get(), samples_per_step)?;
            }

            engine.set_record_held(false);
            for _ in 0..script.play_ticks {
                flags.raise_clock();
                engine.poll();
                recorder.hold(level.get(), samples_per_step)?;
            }

            let seconds = recorder.samples_written() as f64 / cfg.audio.sample_rate as f64;
            recorder.finalize()?;
            println!("Wrote {:.1}s of CV to {:?}", seconds, output);
        }

        Commands::Scales => {
            let bank = ScaleBank::get();
            for scale in ALL_SCALES {
                let table = bank.table(scale);
                println!("{} ({} notes):", scale, table.note_count());
                print!(" ");
                for &semitone in table.semitones() {
                    print!(" {}", semitone);
                }
                println!("\n");
            }
        }

        Commands::Devices => {
            println!("Available audio output devices:\n");
            let devices = list_output_devices();
            if devices.is_empty() {
                println!("  (none found)");
            }
            for (name, config) in devices {
                println!(
                    "  - {} ({} Hz, {} ch)",
                    name, config.sample_rate.0, config.channels
                );
            }
        }

        Commands::Check {
            config: config_path,
        } => {
            println!("Checking configuration at {:?}...", config_path);

            match config::load_config(&config_path) {
                Ok(cfg) => {
                    println!("Configuration is valid!");
                    println!(
                        "  Sensor window: {}..{} mm (fault ceiling {} mm)",
                        cfg.sensor.min_mm, cfg.sensor.max_mm, cfg.sensor.ceiling_mm
                    );
                    println!(
                        "  DAC: {} bits, {:.2}..{:.2} V (calibration {:+.3} V)",
                        cfg.dac.resolution_bits,
                        cfg.dac.min_volts,
                        cfg.dac.max_volts,
                        cfg.dac.calibration_volts
                    );
                    println!("  Clock: {} BPM", cfg.clock.bpm);
                    println!("  Sample rate: {} Hz", cfg.audio.sample_rate);
                }
                Err(e) => {
                    println!("Configuration is invalid: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Init => {
            let example_config = include_str!("../reach.example.yaml");

            let path = "reach.yaml";
            if std::path::Path::new(path).exists() {
                println!("reach.yaml already exists. Not overwriting.");
            } else {
                std::fs::write(path, example_config)?;
                println!("Created reach.yaml with example configuration.");
            }
        }
    }

    Ok(())
}
