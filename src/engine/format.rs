//! Output sample format
//!
//! Bit depth, the integer range it allows, and the interleaved stereo
//! frame handed to sinks.

use crate::error::{Error, Result};

/// Number of output channels
pub const CHANNELS: u16 = 2;

/// Signed integer sample width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitDepth {
    Eight,
    Sixteen,
    ThirtyTwo,
}

impl BitDepth {
    pub fn bits(self) -> u16 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Sixteen => 16,
            BitDepth::ThirtyTwo => 32,
        }
    }

    /// Bytes per encoded sample
    pub fn bytes(self) -> usize {
        self.bits() as usize / 8
    }

    /// Inclusive sample range for this width
    pub fn range(self) -> OutputRange {
        match self {
            BitDepth::Eight => OutputRange::new(i8::MIN as i32, i8::MAX as i32),
            BitDepth::Sixteen => OutputRange::new(i16::MIN as i32, i16::MAX as i32),
            BitDepth::ThirtyTwo => OutputRange::new(i32::MIN, i32::MAX),
        }
    }
}

impl TryFrom<u16> for BitDepth {
    type Error = Error;

    fn try_from(bits: u16) -> Result<Self> {
        match bits {
            8 => Ok(BitDepth::Eight),
            16 => Ok(BitDepth::Sixteen),
            32 => Ok(BitDepth::ThirtyTwo),
            other => Err(Error::Configuration(format!(
                "unsupported bit depth {} (expected 8, 16 or 32)",
                other
            ))),
        }
    }
}

/// Inclusive integer bounds for output samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputRange {
    min: i32,
    max: i32,
}

impl OutputRange {
    fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Hard-clip a sample to the range
    pub fn clamp(&self, sample: f64) -> f64 {
        sample.clamp(self.min as f64, self.max as f64)
    }

    pub fn contains(&self, sample: i32) -> bool {
        (self.min..=self.max).contains(&sample)
    }
}

/// Interleaved stereo samples (left, right, left, right, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    depth: BitDepth,
    samples: Vec<i32>,
}

impl Frame {
    /// Wrap interleaved samples. Every value must fit `depth`.
    pub fn new(depth: BitDepth, samples: Vec<i32>) -> Self {
        debug_assert!(samples.iter().all(|&s| depth.range().contains(s)));
        debug_assert_eq!(samples.len() % CHANNELS as usize, 0);
        Self { depth, samples }
    }

    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    /// Number of stereo pairs
    pub fn frames(&self) -> usize {
        self.samples.len() / CHANNELS as usize
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn left(&self) -> impl Iterator<Item = i32> + '_ {
        self.samples.iter().step_by(2).copied()
    }

    pub fn right(&self) -> impl Iterator<Item = i32> + '_ {
        self.samples.iter().skip(1).step_by(2).copied()
    }

    /// Pack as little-endian signed integers of the frame's width
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.samples.len() * self.depth.bytes());
        for &s in &self.samples {
            match self.depth {
                BitDepth::Eight => bytes.extend_from_slice(&(s as i8).to_le_bytes()),
                BitDepth::Sixteen => bytes.extend_from_slice(&(s as i16).to_le_bytes()),
                BitDepth::ThirtyTwo => bytes.extend_from_slice(&s.to_le_bytes()),
            }
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_depth_from_bits() {
        assert_eq!(BitDepth::try_from(8u16).unwrap(), BitDepth::Eight);
        assert_eq!(BitDepth::try_from(16u16).unwrap(), BitDepth::Sixteen);
        assert_eq!(BitDepth::try_from(32u16).unwrap(), BitDepth::ThirtyTwo);
        assert!(matches!(BitDepth::try_from(24u16), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_ranges() {
        assert_eq!(BitDepth::Eight.range().min(), -128);
        assert_eq!(BitDepth::Eight.range().max(), 127);
        assert_eq!(BitDepth::Sixteen.range().min(), -32768);
        assert_eq!(BitDepth::Sixteen.range().max(), 32767);
        assert_eq!(BitDepth::ThirtyTwo.range().max(), i32::MAX);
    }

    #[test]
    fn test_clamp_is_inclusive() {
        let range = BitDepth::Sixteen.range();
        assert_eq!(range.clamp(40000.0), 32767.0);
        assert_eq!(range.clamp(-40000.0), -32768.0);
        assert_eq!(range.clamp(32767.0), 32767.0);
        assert_eq!(range.clamp(12.5), 12.5);
    }

    #[test]
    fn test_frame_channels() {
        let frame = Frame::new(BitDepth::Sixteen, vec![1, -1, 2, -2, 3, -3]);
        assert_eq!(frame.frames(), 3);
        assert_eq!(frame.left().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(frame.right().collect::<Vec<_>>(), vec![-1, -2, -3]);
    }

    #[test]
    fn test_frame_bytes() {
        let frame = Frame::new(BitDepth::Sixteen, vec![1, -2]);
        assert_eq!(frame.to_le_bytes(), vec![0x01, 0x00, 0xFE, 0xFF]);

        let frame = Frame::new(BitDepth::Eight, vec![-1, 5]);
        assert_eq!(frame.to_le_bytes(), vec![0xFF, 0x05]);

        let frame = Frame::new(BitDepth::ThirtyTwo, vec![1, 0]);
        assert_eq!(frame.to_le_bytes().len(), 8);
    }
}
