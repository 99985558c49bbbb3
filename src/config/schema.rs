//! Configuration schema definitions

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A patch file: output settings plus the tracks to send, in order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchConfig {
    /// Output settings
    pub audio: AudioConfig,

    /// Tracks rendered and sent to the master bus in order
    #[serde(default)]
    pub tracks: Vec<TrackConfig>,
}

impl PatchConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.audio.validate()?;

        for (i, track) in self.tracks.iter().enumerate() {
            let label = track.name.clone().unwrap_or_else(|| format!("#{}", i + 1));
            track
                .validate()
                .map_err(|e| anyhow::anyhow!("track {}: {}", label, e))?;
        }

        Ok(())
    }
}

/// Master bus construction parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate in Hz (default: 22000)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Signed integer sample width: 8, 16 or 32 (default: 16)
    #[serde(default = "default_bit_depth")]
    pub bit_depth: u16,

    /// Output channels, must be 2 (default: 2)
    #[serde(default = "default_channels")]
    pub channels: u16,

    /// WAV file to record to (None = no recording)
    #[serde(default)]
    pub output_file: Option<PathBuf>,

    /// Play through the default output device (default: true)
    #[serde(default = "default_playback")]
    pub playback: bool,
}

fn default_sample_rate() -> u32 { 22000 }
fn default_bit_depth() -> u16 { 16 }
fn default_channels() -> u16 { 2 }
fn default_playback() -> bool { true }

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            bit_depth: default_bit_depth(),
            channels: default_channels(),
            output_file: None,
            playback: default_playback(),
        }
    }
}

impl AudioConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 || self.sample_rate > 192000 {
            bail!("Sample rate must be between 1 and 192000");
        }
        if ![8, 16, 32].contains(&self.bit_depth) {
            bail!("Bit depth must be 8, 16 or 32");
        }
        if self.channels != 2 {
            bail!("Only 2 output channels are supported");
        }
        Ok(())
    }
}

/// One source, an effect chain and a pan position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackConfig {
    /// Optional label used in logs
    #[serde(default)]
    pub name: Option<String>,

    pub source: SourceConfig,

    /// Effects applied in order
    #[serde(default)]
    pub effects: Vec<EffectConfig>,

    #[serde(default)]
    pub pan: PanConfig,
}

impl TrackConfig {
    pub fn validate(&self) -> Result<()> {
        self.source.validate()?;
        for effect in &self.effects {
            effect.validate()?;
        }
        self.pan.validate()
    }
}

/// Block generators
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Decaying tone
    Tone { duration: f64, frequency: f64 },
    /// Decaying white noise
    Noise {
        duration: f64,
        decay: f64,
        #[serde(default = "default_gain")]
        gain: f64,
    },
    /// Silence
    Silence { duration: f64 },
    /// Sum of several sources
    Mix { sources: Vec<SourceConfig> },
}

impl SourceConfig {
    pub fn validate(&self) -> Result<()> {
        match self {
            SourceConfig::Tone { duration, frequency } => {
                positive("duration", *duration)?;
                positive("frequency", *frequency)
            }
            SourceConfig::Noise { duration, decay, .. } => {
                positive("duration", *duration)?;
                positive("decay", *decay)
            }
            SourceConfig::Silence { duration } => positive("duration", *duration),
            SourceConfig::Mix { sources } => {
                if sources.is_empty() {
                    bail!("mix needs at least one source");
                }
                sources.iter().try_for_each(SourceConfig::validate)
            }
        }
    }
}

/// Block effects
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectConfig {
    /// Bandpass filter from the fixed bank (index 1-6)
    Filter {
        index: usize,
        #[serde(default = "default_gain")]
        gain: f64,
    },
    /// Fractional-delay vibrato
    Vibrato { rate: f64, depth: f64 },
    /// Soft clipper
    Clip {
        ratio: f64,
        #[serde(default = "default_gain")]
        gain: f64,
    },
}

impl EffectConfig {
    pub fn validate(&self) -> Result<()> {
        match self {
            EffectConfig::Filter { index, .. } => {
                if !(1..=6).contains(index) {
                    bail!("filter index must be between 1 and 6, got {}", index);
                }
                Ok(())
            }
            EffectConfig::Vibrato { rate, .. } => positive("rate", *rate),
            EffectConfig::Clip { .. } => Ok(()),
        }
    }
}

fn default_gain() -> f64 { 1.0 }

/// Left/right gains applied when the track is sent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PanConfig {
    #[serde(default = "default_pan")]
    pub left: f64,
    #[serde(default = "default_pan")]
    pub right: f64,
}

fn default_pan() -> f64 { 0.5 }

impl Default for PanConfig {
    fn default() -> Self {
        Self {
            left: default_pan(),
            right: default_pan(),
        }
    }
}

impl PanConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.left) || !(0.0..=1.0).contains(&self.right) {
            bail!("pan gains must be between 0.0 and 1.0");
        }
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if !(value > 0.0) {
        bail!("{} must be positive, got {}", name, value);
    }
    Ok(())
}
