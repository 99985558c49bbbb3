//! Vibrato via a modulated fractional delay line
//!
//! The delay line is as long as the input block. The write pointer starts
//! half a block ahead of the read pointer; a sine LFO speeds the read
//! pointer up and slows it down, which bends the pitch.

use super::block::SignalBlock;
use std::f64::consts::PI;

/// Sinusoidal fractional-delay modulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vibrato {
    /// LFO frequency in Hz
    rate: f64,
    /// Read pointer excursion per sample
    depth: f64,
}

impl Vibrato {
    pub fn new(rate: f64, depth: f64) -> Self {
        Self { rate, depth }
    }

    /// LFO frequency in Hz
    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    /// Modulate `block`. The output always has the input's length.
    ///
    /// When the read pointer runs past the end of the delay line it restarts
    /// at zero rather than wrapping, so any fractional overshoot is lost.
    pub fn apply(&self, block: &SignalBlock) -> SignalBlock {
        let len = block.len();
        let fs = block.sample_rate() as f64;
        let mut buffer = vec![0.0; len];
        let mut output = Vec::with_capacity(len);

        let mut read = 0.0f64;
        let mut write = len / 2;

        for (n, &input) in block.iter().enumerate() {
            let prev = read.floor();
            let frac = read - prev;
            let prev = wrap(prev as i64, len);
            let next = wrap(prev as i64 + 1, len);

            output.push((1.0 - frac) * buffer[prev] + frac * buffer[next]);

            buffer[write] = input;

            read = read + 1.0 + self.depth * (2.0 * PI * self.rate * n as f64 / fs).sin();
            if read >= len as f64 {
                read = 0.0;
            }

            write += 1;
            if write == len {
                write = 0;
            }
        }

        SignalBlock::new(output, block.sample_rate())
    }
}

/// Index into a buffer of `len` samples, counting negative positions from the end
fn wrap(index: i64, len: usize) -> usize {
    index.rem_euclid(len as i64) as usize
}
