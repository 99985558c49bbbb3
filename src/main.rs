//! Patchwork - block-based modular sound design

use anyhow::{Context, Result};
use clap::Parser;
use patchwork::config;
use patchwork::engine::{default_device_name, list_output_devices, Patcher};
use patchwork::patch;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            config: config_path,
            output,
            no_playback,
        } => {
            println!("Loading patch from {:?}...", config_path);
            let mut cfg = config::load_config(&config_path)?;

            if let Some(output) = output {
                cfg.audio.output_file = Some(output);
            }
            if no_playback {
                cfg.audio.playback = false;
            }

            if !cfg.audio.playback && cfg.audio.output_file.is_none() {
                println!("Playback is off and no output file is set; nothing will be heard or saved.");
            }

            println!("  Sample rate: {} Hz", cfg.audio.sample_rate);
            println!("  Bit depth: {}", cfg.audio.bit_depth);
            println!("  Tracks: {}", cfg.tracks.len());

            let stop = Arc::new(AtomicBool::new(false));
            {
                let stop = stop.clone();
                ctrlc::set_handler(move || {
                    stop.store(true, Ordering::SeqCst);
                })
                .context("failed to install Ctrl-C handler")?;
            }

            let mut patcher = Patcher::open(&cfg.audio)?;
            let result = patch::run_patch(&mut patcher, &cfg, &stop);
            // Close the sinks whether or not rendering succeeded
            let closed = patcher.terminate();

            let sent = result?;
            closed?;

            println!("\nSent {} of {} tracks", sent, cfg.tracks.len());
            if let Some(path) = &cfg.audio.output_file {
                println!("Recorded to {:?}", path);
            }
        }

        Commands::Devices => {
            println!("Available audio devices:\n");

            if let Some(name) = default_device_name() {
                println!("Default output: {}\n", name);
            }

            println!("Output devices:");
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

        Commands::Check { config: config_path } => {
            println!("Checking patch at {:?}...", config_path);

            match config::load_config(&config_path) {
                Ok(cfg) => {
                    println!("Patch is valid!");
                    println!("  Sample rate: {} Hz", cfg.audio.sample_rate);
                    println!("  Bit depth: {}", cfg.audio.bit_depth);
                    println!("  Playback: {}", if cfg.audio.playback { "on" } else { "off" });
                    match &cfg.audio.output_file {
                        Some(path) => println!("  Output file: {:?}", path),
                        None => println!("  Output file: none"),
                    }
                    println!("  Tracks: {}", cfg.tracks.len());
                    for (i, track) in cfg.tracks.iter().enumerate() {
                        println!(
                            "    {}. {} ({} effects, pan {:.2}/{:.2})",
                            i + 1,
                            track.name.as_deref().unwrap_or("unnamed"),
                            track.effects.len(),
                            track.pan.left,
                            track.pan.right
                        );
                    }
                }
                Err(e) => {
                    println!("Patch is invalid: {:#}", e);
                    return Err(e);
                }
            }
        }

        Commands::Init => {
            let example_config = include_str!("../patch.example.yaml");

            let path = "patch.yaml";
            if std::path::Path::new(path).exists() {
                println!("patch.yaml already exists. Not overwriting.");
            } else {
                std::fs::write(path, example_config)?;
                println!("Created patch.yaml with an example patch.");
            }
        }
    }

    Ok(())
}
