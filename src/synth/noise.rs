//! Decaying white noise generator

use super::block::{sample_count, SignalBlock};
use rand::Rng;

/// Lower bound of the integer draw
pub const NOISE_MIN: i32 = -32768;
/// Upper bound (exclusive) of the integer draw
pub const NOISE_MAX: i32 = 32767;

/// Envelope level reached after the decay time
const DECAY_LEVEL: f64 = 0.01;

/// White noise with an exponential amplitude envelope.
///
/// Each sample is an integer drawn uniformly from `[NOISE_MIN, NOISE_MAX)`
/// and then scaled by the envelope and the gain. The envelope falls to 1%
/// after the decay time and keeps falling at the same rate afterwards.
pub struct NoiseGenerator<R: Rng = rand::rngs::ThreadRng> {
    sample_rate: u32,
    rng: R,
}

impl NoiseGenerator<rand::rngs::ThreadRng> {
    /// Create a generator backed by the thread-local RNG
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            rng: rand::thread_rng(),
        }
    }
}

impl<R: Rng> NoiseGenerator<R> {
    /// Create a generator with a custom RNG
    ///
    /// ```
    /// use patchwork::synth::NoiseGenerator;
    /// use rand::SeedableRng;
    ///
    /// let rng = rand::rngs::StdRng::seed_from_u64(42);
    /// let mut noise = NoiseGenerator::with_rng(22000, rng);
    /// let block = noise.generate(0.1, 0.05, 1.0);
    /// assert_eq!(block.len(), 2200);
    /// ```
    pub fn with_rng(sample_rate: u32, rng: R) -> Self {
        Self { sample_rate, rng }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Per-sample exponent of the envelope for a decay time in seconds
    pub fn decay_constant(&self, decay: f64) -> f64 {
        // Sub-sample decay times collapse to a single sample
        let decay_samples = sample_count(decay, self.sample_rate).max(1);
        DECAY_LEVEL.ln() / decay_samples as f64
    }

    /// Generate `duration` seconds of noise decaying over `decay` seconds
    pub fn generate(&mut self, duration: f64, decay: f64, gain: f64) -> SignalBlock {
        let len = sample_count(duration, self.sample_rate);
        let a = self.decay_constant(decay);

        let samples = (0..len)
            .map(|n| {
                let draw = self.rng.gen_range(NOISE_MIN..NOISE_MAX) as f64;
                (a * n as f64).exp() * gain * draw
            })
            .collect();

        SignalBlock::new(samples, self.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(sample_rate: u32) -> NoiseGenerator<StdRng> {
        NoiseGenerator::with_rng(sample_rate, StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_noise_length() {
        let mut noise = seeded(22000);
        assert_eq!(noise.generate(0.21, 0.06, 0.6).len(), 4620);
    }

    #[test]
    fn test_noise_within_envelope() {
        let mut noise = seeded(22000);
        let gain = 0.6;
        let a = noise.decay_constant(0.05);
        let block = noise.generate(0.2, 0.05, gain);

        for (n, &s) in block.iter().enumerate() {
            let bound = (a * n as f64).exp() * gain * 32768.0;
            assert!(s.abs() <= bound + 1e-9, "sample {} = {} exceeds {}", n, s, bound);
        }
    }

    #[test]
    fn test_noise_envelope_non_increasing() {
        let mut noise = seeded(22000);
        let block = noise.generate(0.2, 0.05, 1.0);

        let window = 200;
        let maxima: Vec<f64> = block
            .samples()
            .chunks(window)
            .map(|w| w.iter().fold(0.0f64, |acc, s| acc.max(s.abs())))
            .collect();

        for pair in maxima.windows(2) {
            assert!(pair[1] <= pair[0], "envelope grew: {:?}", pair);
        }
    }

    #[test]
    fn test_noise_follows_envelope() {
        let mut noise = seeded(22000);
        let gain = 0.3;
        let a = noise.decay_constant(0.05);
        let block = noise.generate(0.2, 0.05, gain);

        let window = 200;
        for (i, chunk) in block.samples().chunks(window).enumerate() {
            let start = i * window;
            let bound = (a * start as f64).exp() * gain * 32768.0;
            let peak = chunk.iter().fold(0.0f64, |acc, s| acc.max(s.abs()));
            assert!(
                peak >= 0.5 * bound && peak <= bound,
                "window at {} peaks at {}, envelope {}",
                start,
                peak,
                bound
            );
        }
    }

    #[test]
    fn test_noise_reaches_one_percent_at_decay_time() {
        let noise = seeded(22000);
        let a = noise.decay_constant(0.05);
        let envelope = (a * 1100.0).exp();
        assert!((envelope - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_noise_is_not_deterministic() {
        let mut noise = NoiseGenerator::new(22000);
        let first = noise.generate(0.05, 0.05, 1.0);
        let second = noise.generate(0.05, 0.05, 1.0);
        assert_ne!(first, second);
    }

    #[test]
    fn test_zero_gain_is_silent() {
        let mut noise = seeded(8000);
        let block = noise.generate(0.1, 0.1, 0.0);
        assert!(block.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_tiny_decay_does_not_produce_nan() {
        let mut noise = seeded(8000);
        let block = noise.generate(0.01, 0.00001, 1.0);
        assert!(block.iter().all(|s| s.is_finite()));
    }
}
