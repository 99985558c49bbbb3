//! Fixed bandpass filterbank
//!
//! Six fourth-order IIR bandpass filters designed for a 22 kHz patch.
//! Filter 1 (100 Hz) is numerically unstable with these coefficients and
//! blows up on most inputs; it is kept as-is.

use super::block::SignalBlock;
use crate::error::{Error, Result};

/// Clamp bounds applied to filter output
pub const FILTER_MIN: f64 = -32768.0;
pub const FILTER_MAX: f64 = 32767.0;

/// Number of filters in the bank
pub const FILTER_COUNT: usize = 6;

/// Difference equation coefficients of one filter. `a[0]` is always 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    pub b: [f64; 5],
    pub a: [f64; 5],
    /// Nominal center frequency in Hz
    pub center: f64,
}

const B: [f64; 5] = [0.0001, 0.0000, -0.0003, 0.0000, 0.0001];

const BANK: [FilterSpec; FILTER_COUNT] = [
    FilterSpec { b: B, a: [1.0000, -3.9584, 5.8772, -3.8793, 0.9604], center: 100.0 },
    FilterSpec { b: B, a: [1.0000, -3.9197, 5.8010, -3.8413, 0.9604], center: 500.0 },
    FilterSpec { b: B, a: [1.0000, -3.7996, 5.5692, -3.7236, 0.9604], center: 1000.0 },
    FilterSpec { b: B, a: [1.0000, -3.3314, 4.7344, -3.2648, 0.9604], center: 2000.0 },
    FilterSpec { b: B, a: [1.0000, -0.5636, 2.0390, -0.5523, 0.9604], center: 5000.0 },
    FilterSpec { b: B, a: [1.0000, 3.7996, 5.5692, 3.7236, 0.9604], center: 10000.0 },
];

impl FilterSpec {
    /// Look up a filter by its 1-based index
    pub fn select(index: usize) -> Result<&'static FilterSpec> {
        if !(1..=FILTER_COUNT).contains(&index) {
            return Err(Error::invalid(
                "filter_index",
                format!("{} is outside [1, {}]", index, FILTER_COUNT),
            ));
        }
        Ok(&BANK[index - 1])
    }
}

/// A running fourth-order filter with four samples of input and output history
#[derive(Debug, Clone)]
pub struct BandPass {
    spec: FilterSpec,
    x: [f64; 4],
    y: [f64; 4],
}

impl BandPass {
    pub fn new(spec: FilterSpec) -> Self {
        Self {
            spec,
            x: [0.0; 4],
            y: [0.0; 4],
        }
    }

    /// Clear the history
    pub fn reset(&mut self) {
        self.x = [0.0; 4];
        self.y = [0.0; 4];
    }

    /// Process a single sample
    pub fn process(&mut self, x0: f64) -> f64 {
        let b = &self.spec.b;
        let a = &self.spec.a;
        let [x1, x2, x3, x4] = self.x;
        let [y1, y2, y3, y4] = self.y;

        let y0 = b[0] * x0 + b[1] * x1 + b[2] * x2 + b[3] * x3 + b[4] * x4
            - a[1] * y1
            - a[2] * y2
            - a[3] * y3
            - a[4] * y4;

        self.y = [y0, y1, y2, y3];
        self.x = [x0, x1, x2, x3];

        y0
    }
}

/// Run `block` through filter `index` (1-based) and scale by `gain`.
///
/// Output is clamped to `[FILTER_MIN, FILTER_MAX]` and any sample that is
/// still not finite is dropped, so the result can be shorter than the input.
/// History starts from silence on every call.
pub fn filterbank(block: &SignalBlock, index: usize, gain: f64) -> Result<SignalBlock> {
    let spec = FilterSpec::select(index)?;
    let mut filter = BandPass::new(*spec);

    let samples = block
        .iter()
        .map(|&x| (gain * filter.process(x)).clamp(FILTER_MIN, FILTER_MAX))
        .filter(|y| y.is_finite())
        .collect();

    Ok(SignalBlock::new(samples, block.sample_rate()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse(len: usize, height: f64) -> SignalBlock {
        let mut samples = vec![0.0; len];
        samples[0] = height;
        SignalBlock::new(samples, 22000)
    }

    #[test]
    fn test_select_rejects_out_of_range() {
        assert!(matches!(
            FilterSpec::select(0),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(FilterSpec::select(7).is_err());
        assert!(FilterSpec::select(6).is_ok());
    }

    #[test]
    fn test_filterbank_rejects_index() {
        let block = impulse(16, 1.0);
        assert!(filterbank(&block, 0, 1.0).is_err());
        assert!(filterbank(&block, 7, 1.0).is_err());
    }

    #[test]
    fn test_impulse_response_start() {
        // y0 = b0, y1 = -a1 * b0, y2 = b2 - a1*y1 - a2*y0
        let out = filterbank(&impulse(6, 1.0), 3, 1.0).unwrap();
        let expected = [0.0001, 0.00037996, 0.000586776016];
        for (got, want) in out.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12, "got {} want {}", got, want);
        }
    }

    #[test]
    fn test_gain_scales_output() {
        let unit = filterbank(&impulse(32, 1.0), 4, 1.0).unwrap();
        let double = filterbank(&impulse(32, 1.0), 4, 2.0).unwrap();
        for (u, d) in unit.iter().zip(double.iter()) {
            assert!((2.0 * u - d).abs() < 1e-12);
        }
    }

    #[test]
    fn test_stable_filters_preserve_length() {
        let input = impulse(40000, 1000.0);
        for index in 2..=6 {
            let out = filterbank(&input, index, 1.0).unwrap();
            assert_eq!(out.len(), input.len(), "filter {}", index);
            assert!(out.peak() < 100.0, "filter {} peak {}", index, out.peak());
        }
    }

    #[test]
    fn test_unstable_filter_drops_samples() {
        let input = impulse(40000, 1000.0);
        let out = filterbank(&input, 1, 1.0).unwrap();

        assert!(out.len() < input.len());
        assert!(out.iter().all(|s| s.is_finite()));
        assert!(out.iter().all(|s| (FILTER_MIN..=FILTER_MAX).contains(s)));
        assert_eq!(out.peak(), 32768.0);
    }

    #[test]
    fn test_no_state_between_calls() {
        let input = SignalBlock::new((0..500).map(|n| ((n * 37) % 101) as f64 - 50.0).collect(), 22000);
        let first = filterbank(&input, 3, 1.0).unwrap();
        let second = filterbank(&input, 3, 1.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_bandpass_reset() {
        let mut filter = BandPass::new(*FilterSpec::select(2).unwrap());
        for _ in 0..50 {
            filter.process(1.0);
        }
        filter.reset();
        assert_eq!(filter.process(0.0), 0.0);
    }
}
