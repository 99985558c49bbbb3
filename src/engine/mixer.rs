//! Block mixer
//!
//! Sums blocks sample by sample after truncating each to an integer. The
//! shorter block is padded with silence. No normalization is applied; run
//! the result through a clipper if the sum may leave the output range.

use crate::synth::SignalBlock;

/// Element-wise sum of two blocks.
///
/// Samples are summed by index and never resampled. The result carries
/// `a`'s sample rate; a mismatch with `b` is caught when the block reaches
/// [`MasterBus::pan`](crate::engine::MasterBus::pan).
pub fn mix(a: &SignalBlock, b: &SignalBlock) -> SignalBlock {
    let len = a.len().max(b.len());
    let samples = (0..len)
        .map(|n| truncated(a, n) + truncated(b, n))
        .collect();

    SignalBlock::new(samples, a.sample_rate())
}

/// Fold any number of blocks into one. Returns `None` for an empty list.
pub fn mix_all<'a, I>(blocks: I) -> Option<SignalBlock>
where
    I: IntoIterator<Item = &'a SignalBlock>,
{
    let mut blocks = blocks.into_iter();
    let first = blocks.next()?;
    // Mixing with an empty block applies the same truncation as a pairwise mix
    let start = mix(first, &SignalBlock::new(Vec::new(), first.sample_rate()));
    Some(blocks.fold(start, |acc, block| mix(&acc, block)))
}

fn truncated(block: &SignalBlock, n: usize) -> f64 {
    block.samples().get(n).map_or(0.0, |s| s.trunc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(samples: &[f64]) -> SignalBlock {
        SignalBlock::new(samples.to_vec(), 22000)
    }

    #[test]
    fn test_mix_pads_shorter() {
        let out = mix(&block(&[1.0, 2.0, 3.0]), &block(&[10.0]));
        assert_eq!(out.samples(), &[11.0, 2.0, 3.0]);
    }

    #[test]
    fn test_mix_truncates_inputs() {
        let out = mix(&block(&[1.9, -1.9]), &block(&[0.5, -0.5]));
        assert_eq!(out.samples(), &[1.0, -1.0]);
    }

    #[test]
    fn test_mix_commutes() {
        let a = block(&[3.2, -7.7, 100.0, 5.0]);
        let b = block(&[-1.1, 9.9]);
        assert_eq!(mix(&a, &b), mix(&b, &a));
    }

    #[test]
    fn test_mix_with_silence_is_identity() {
        let a = block(&[4.0, -12.0, 30000.0]);
        let zeros = SignalBlock::silence(a.len(), 22000);
        assert_eq!(mix(&a, &zeros), a);
    }

    #[test]
    fn test_mix_is_not_normalized() {
        let out = mix(&block(&[30000.0]), &block(&[30000.0]));
        assert_eq!(out.samples(), &[60000.0]);
    }

    #[test]
    fn test_mix_keeps_first_rate() {
        let a = SignalBlock::new(vec![1.0, 2.0], 22000);
        let b = SignalBlock::new(vec![3.0], 44100);
        let out = mix(&a, &b);
        assert_eq!(out.samples(), &[4.0, 2.0]);
        assert_eq!(out.sample_rate(), 22000);
        assert_eq!(mix(&b, &a).sample_rate(), 44100);
    }

    #[test]
    fn test_mix_all() {
        let blocks = [block(&[1.0]), block(&[2.0, 2.0]), block(&[3.0, 3.0, 3.0])];
        let out = mix_all(&blocks).unwrap();
        assert_eq!(out.samples(), &[6.0, 5.0, 3.0]);
        assert!(mix_all(std::iter::empty::<&SignalBlock>()).is_none());
    }
}
