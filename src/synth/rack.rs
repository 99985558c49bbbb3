//! The module rack
//!
//! A `Rack` fixes the sample rate for a patch and hands out every
//! generator and effect bound to it.

use super::{filter, NoiseGenerator, SignalBlock, SoftClipper, ToneOscillator, Vibrato};
use super::block::sample_count;
use crate::engine::mixer;
use crate::error::{Error, Result};

/// Generators and effects sharing one sample rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rack {
    sample_rate: u32,
}

impl Rack {
    /// Create a rack. The sample rate must be positive.
    pub fn new(sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::Configuration("sample rate must be positive".to_string()));
        }
        Ok(Self { sample_rate })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Decaying tone, see [`ToneOscillator`]
    pub fn tone(&self, duration: f64, frequency: f64) -> SignalBlock {
        ToneOscillator::new(self.sample_rate).generate(duration, frequency)
    }

    /// Decaying white noise, see [`NoiseGenerator`]
    pub fn noise(&self, duration: f64, decay: f64, gain: f64) -> SignalBlock {
        NoiseGenerator::new(self.sample_rate).generate(duration, decay, gain)
    }

    /// `duration` seconds of silence
    pub fn silence(&self, duration: f64) -> SignalBlock {
        SignalBlock::silence(sample_count(duration, self.sample_rate), self.sample_rate)
    }

    /// Bandpass filter `index` (1-based) from the fixed bank
    pub fn filterbank(&self, block: &SignalBlock, index: usize, gain: f64) -> Result<SignalBlock> {
        filter::filterbank(block, index, gain)
    }

    pub fn vibrato(&self, block: &SignalBlock, rate: f64, depth: f64) -> SignalBlock {
        Vibrato::new(rate, depth).apply(block)
    }

    pub fn clip(&self, block: &SignalBlock, ratio: f64, gain: f64) -> SignalBlock {
        SoftClipper::new(ratio, gain).apply(block)
    }

    pub fn mix(&self, a: &SignalBlock, b: &SignalBlock) -> SignalBlock {
        mixer::mix(a, b)
    }
}
