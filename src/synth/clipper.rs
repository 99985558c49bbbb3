//! Soft clipper
//!
//! Scales each sample by `ratio * gain` when that does not raise it, and by
//! `gain` alone otherwise. The comparison depends on the sample's sign: for
//! a ratio below one, positive samples take the ratio and negative samples
//! do not. Results are truncated toward zero.

use super::block::SignalBlock;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftClipper {
    ratio: f64,
    gain: f64,
}

impl SoftClipper {
    pub fn new(ratio: f64, gain: f64) -> Self {
        Self { ratio, gain }
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Process a single sample
    pub fn process(&self, sample: f64) -> f64 {
        let compressed = self.ratio * self.gain * sample;
        if sample >= compressed {
            compressed.trunc()
        } else {
            (self.gain * sample).trunc()
        }
    }

    pub fn apply(&self, block: &SignalBlock) -> SignalBlock {
        block.map(|s| self.process(s))
    }
}
