//! WAV file sink
//!
//! Persists frames to a PCM WAV file matching the bus format.

use super::format::{BitDepth, Frame, CHANNELS};
use super::sink::Sink;
use crate::error::{Error, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Writes frames to a stereo integer WAV file
pub struct WavSink {
    writer: Option<WavWriter<BufWriter<File>>>,
    path: PathBuf,
    depth: BitDepth,
    sample_rate: u32,
    frames_written: u64,
}

impl WavSink {
    /// Create (or truncate) the file at `path`
    pub fn create(path: &Path, sample_rate: u32, depth: BitDepth) -> Result<Self> {
        let spec = WavSpec {
            channels: CHANNELS,
            sample_rate,
            bits_per_sample: depth.bits(),
            sample_format: SampleFormat::Int,
        };

        let writer = WavWriter::create(path, spec)?;
        log::info!("Recording to {:?} ({} Hz, {}-bit)", path, sample_rate, depth.bits());

        Ok(Self {
            writer: Some(writer),
            path: path.to_path_buf(),
            depth,
            sample_rate,
            frames_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of stereo frames written
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Duration recorded in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frames_written as f64 / self.sample_rate as f64
    }
}

impl Sink for WavSink {
    fn name(&self) -> &str {
        "wav"
    }

    fn write(&mut self, frame: &Frame) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| Error::SinkClosed("wav".to_string()))?;

        if frame.depth() != self.depth {
            return Err(Error::invalid(
                "frame",
                format!("{}-bit frame sent to {}-bit file", frame.depth().bits(), self.depth.bits()),
            ));
        }

        for &s in frame.samples() {
            match self.depth {
                BitDepth::Eight => writer.write_sample(s as i8)?,
                BitDepth::Sixteen => writer.write_sample(s as i16)?,
                BitDepth::ThirtyTwo => writer.write_sample(s)?,
            }
        }
        self.frames_written += frame.frames() as u64;
        Ok(())
    }

    /// Finalize the WAV header and close the file
    fn close(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            writer.finalize()?;
            log::info!(
                "Closed {:?} after {:.2}s of audio",
                self.path,
                self.duration_secs()
            );
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.writer.is_none()
    }
}

impl Drop for WavSink {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("Failed to finalize {:?}: {}", self.path, e);
        }
    }
}
