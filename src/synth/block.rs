//! Signal blocks
//!
//! A block is a finite run of samples plus the sample rate they were
//! produced at. Every generator returns one and every effect maps one
//! block to another.

/// An ordered sequence of samples at a fixed sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct SignalBlock {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl SignalBlock {
    /// Wrap existing samples
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// A block of `len` zero samples
    pub fn silence(len: usize, sample_rate: u32) -> Self {
        Self::new(vec![0.0; len], sample_rate)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Length of the block in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.samples.iter()
    }

    /// Largest absolute sample value (0.0 for an empty block)
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0f64, |acc, s| acc.max(s.abs()))
    }

    /// Apply `f` to every sample, keeping the sample rate
    pub(crate) fn map(&self, f: impl FnMut(f64) -> f64) -> Self {
        Self::new(self.samples.iter().copied().map(f).collect(), self.sample_rate)
    }
}

/// Number of samples covering `duration` seconds, truncated
pub(crate) fn sample_count(duration: f64, sample_rate: u32) -> usize {
    (duration * sample_rate as f64).floor().max(0.0) as usize
}
