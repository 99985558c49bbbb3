//! Decaying tone oscillator
//!
//! The tone is the impulse response of a two-pole resonator whose pole
//! radius is chosen so the envelope falls to 1% by the end of the block.

use super::block::{sample_count, SignalBlock};
use std::f64::consts::PI;

/// Output gain applied to the resonator response
pub const TONE_GAIN: f64 = 1000.0;

/// Envelope level reached at the last sample
const TAIL_LEVEL: f64 = 0.01;

/// Generates decaying sinusoids at a fixed sample rate
#[derive(Debug, Clone, Copy)]
pub struct ToneOscillator {
    sample_rate: u32,
}

impl ToneOscillator {
    /// Create a new oscillator
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    /// Get the sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Generate `duration` seconds of a tone at `frequency` Hz.
    ///
    /// Both arguments must be positive; other values produce unspecified
    /// (but non-panicking) output.
    pub fn generate(&self, duration: f64, frequency: f64) -> SignalBlock {
        let fs = self.sample_rate as f64;
        let len = sample_count(duration, self.sample_rate);

        let omega = 2.0 * PI * frequency / fs;
        let r = TAIL_LEVEL.powf(1.0 / (duration * fs));

        let a1 = -2.0 * r * omega.cos();
        let a2 = r * r;

        let mut y1 = 0.0;
        let mut y2 = 0.0;
        let mut samples = Vec::with_capacity(len);

        for n in 0..len {
            let x0 = if n == 0 { 1.0 } else { 0.0 };
            let y0 = x0 - a1 * y1 - a2 * y2;

            y2 = y1;
            y1 = y0;

            samples.push(TONE_GAIN * y0);
        }

        SignalBlock::new(samples, self.sample_rate)
    }
}
