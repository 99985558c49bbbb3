//! Patcher: a rack bound to a master bus
//!
//! Opens the sinks named by the audio settings and exposes the module rack
//! and the bus send in one place.

use super::format::BitDepth;
use super::sink::{NullSink, Sink};
use super::{MasterBus, PlaybackSink, WavSink};
use crate::config::AudioConfig;
use crate::error::Result;
use crate::synth::{Rack, SignalBlock};

/// Sink chosen at runtime
pub type DynSink = Box<dyn Sink>;

pub struct Patcher<L: Sink = DynSink, P: Sink = DynSink> {
    rack: Rack,
    bus: MasterBus<L, P>,
}

impl Patcher {
    /// Open the default output device (if playback is enabled) and the
    /// output file (if one is configured)
    pub fn open(config: &AudioConfig) -> Result<Self> {
        let depth = BitDepth::try_from(config.bit_depth)?;

        let live: DynSink = if config.playback {
            Box::new(PlaybackSink::open(config.sample_rate, depth)?)
        } else {
            Box::new(NullSink::new())
        };

        let persist: DynSink = match &config.output_file {
            Some(path) => Box::new(WavSink::create(path, config.sample_rate, depth)?),
            None => Box::new(NullSink::new()),
        };

        Self::with_sinks(config, live, persist)
    }
}

impl<L: Sink, P: Sink> Patcher<L, P> {
    /// Build a patcher around caller-supplied sinks
    pub fn with_sinks(config: &AudioConfig, live: L, persist: P) -> Result<Self> {
        let rack = Rack::new(config.sample_rate)?;
        let bus = MasterBus::new(config, live, persist)?;
        Ok(Self { rack, bus })
    }

    /// Generators and effects at the patch sample rate
    pub fn rack(&self) -> &Rack {
        &self.rack
    }

    pub fn bus(&self) -> &MasterBus<L, P> {
        &self.bus
    }

    /// Send a block to the master bus
    pub fn to_master(&mut self, block: &SignalBlock, gain_left: f64, gain_right: f64) -> Result<()> {
        self.bus.send(block, gain_left, gain_right)
    }

    /// Close both sinks
    pub fn terminate(mut self) -> Result<()> {
        self.bus.close()
    }
}
