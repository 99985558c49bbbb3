//! CLI interface for Patchwork

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Block-based modular sound design
#[derive(Parser)]
#[command(name = "patchwork")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a patch to the speakers and/or a WAV file
    Render {
        /// Patch file path (YAML or JSON)
        #[arg(short, long, default_value = "patch.yaml")]
        config: PathBuf,

        /// Record to this WAV file instead of the configured one
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not open the audio device
        #[arg(long)]
        no_playback: bool,
    },

    /// List available audio output devices
    Devices,

    /// Validate a patch file
    Check {
        /// Patch file path (YAML or JSON)
        #[arg(short, long, default_value = "patch.yaml")]
        config: PathBuf,
    },

    /// Generate an example patch file
    Init,
}
