//! Master bus for Patchwork
//!
//! Clips blocks to the output range, pans them to stereo and hands the
//! frames to a live sink and a persistence sink, in that order.

pub mod format;
pub mod mixer;
mod patcher;
mod player;
mod recorder;
pub mod sink;

pub use format::{BitDepth, Frame, OutputRange};
pub use patcher::{DynSink, Patcher};
pub use player::{default_device_name, list_output_devices, PlaybackSink};
pub use recorder::WavSink;
pub use sink::{MemorySink, NullSink, Sink};

use crate::config::AudioConfig;
use crate::error::{Error, Result};
use crate::synth::SignalBlock;

/// The master bus.
///
/// Both sinks are owned for the bus's whole lifetime and are closed by
/// [`MasterBus::close`] or, failing that, when the bus is dropped.
pub struct MasterBus<L: Sink, P: Sink> {
    depth: BitDepth,
    range: OutputRange,
    sample_rate: u32,
    live: L,
    persist: P,
    blocks_sent: u64,
    closed: bool,
}

impl<L: Sink, P: Sink> MasterBus<L, P> {
    /// Create a bus from the audio settings and its two sinks
    pub fn new(config: &AudioConfig, live: L, persist: P) -> Result<Self> {
        let depth = BitDepth::try_from(config.bit_depth)?;
        if config.channels != format::CHANNELS {
            return Err(Error::Configuration(format!(
                "{} channels requested, only stereo is supported",
                config.channels
            )));
        }
        if config.sample_rate == 0 {
            return Err(Error::Configuration("sample rate must be positive".to_string()));
        }

        log::info!(
            "Master bus open: {} Hz, {}-bit, sinks [{}, {}]",
            config.sample_rate,
            depth.bits(),
            live.name(),
            persist.name()
        );

        Ok(Self {
            depth,
            range: depth.range(),
            sample_rate: config.sample_rate,
            live,
            persist,
            blocks_sent: 0,
            closed: false,
        })
    }

    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    /// Output range derived from the bit depth
    pub fn range(&self) -> OutputRange {
        self.range
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of successful sends
    pub fn blocks_sent(&self) -> u64 {
        self.blocks_sent
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The live sink
    pub fn live(&self) -> &L {
        &self.live
    }

    /// The persistence sink
    pub fn persistence(&self) -> &P {
        &self.persist
    }

    /// Clip `block` to the output range and pan it to an interleaved frame.
    ///
    /// Gains must lie in `[0, 1]`; they are checked before any sample is
    /// touched.
    pub fn pan(&self, block: &SignalBlock, gain_left: f64, gain_right: f64) -> Result<Frame> {
        check_gain("gain_left", gain_left)?;
        check_gain("gain_right", gain_right)?;
        if block.sample_rate() != self.sample_rate {
            return Err(Error::invalid(
                "block",
                format!(
                    "sample rate {} Hz does not match the bus ({} Hz)",
                    block.sample_rate(),
                    self.sample_rate
                ),
            ));
        }

        let mut samples = Vec::with_capacity(block.len() * format::CHANNELS as usize);
        for &s in block.iter() {
            let clipped = self.range.clamp(s);
            samples.push((gain_left * clipped) as i32);
            samples.push((gain_right * clipped) as i32);
        }

        Ok(Frame::new(self.depth, samples))
    }

    /// Send a block: clip, pan, then write to the live sink and the
    /// persistence sink. Nothing is written if validation fails.
    pub fn send(&mut self, block: &SignalBlock, gain_left: f64, gain_right: f64) -> Result<()> {
        if self.closed {
            return Err(Error::SinkClosed("master bus".to_string()));
        }

        let frame = self.pan(block, gain_left, gain_right)?;

        self.live.write(&frame)?;
        self.persist.write(&frame)?;

        self.blocks_sent += 1;
        log::debug!(
            "Sent block {} ({} frames, gains {:.2}/{:.2})",
            self.blocks_sent,
            frame.frames(),
            gain_left,
            gain_right
        );
        Ok(())
    }

    /// Close both sinks. Both are attempted even if the first fails; the
    /// first error is returned.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let live = self.live.close();
        let persist = self.persist.close();
        log::info!("Master bus closed after {} blocks", self.blocks_sent);

        live.and(persist)
    }
}

impl<L: Sink, P: Sink> Drop for MasterBus<L, P> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("Error closing master bus: {}", e);
        }
    }
}

fn check_gain(name: &'static str, gain: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&gain) {
        return Err(Error::invalid(name, format!("{} is outside [0, 1]", gain)));
    }
    Ok(())
}
