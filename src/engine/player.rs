//! Live playback sink using cpal

use super::format::{BitDepth, Frame, CHANNELS};
use super::sink::Sink;
use crate::error::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{
    Device, SampleFormat, Stream, StreamConfig, SupportedStreamConfig, SupportedStreamConfigRange,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Seconds of audio the queue holds before `write` blocks
const QUEUE_SECONDS: u32 = 1;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Samples waiting for the audio callback
struct SampleQueue {
    samples: Mutex<VecDeque<f32>>,
    drained: Condvar,
    capacity: usize,
    failed: AtomicBool,
}

impl SampleQueue {
    fn new(capacity: usize) -> Self {
        Self {
            samples: Mutex::new(VecDeque::with_capacity(capacity)),
            drained: Condvar::new(),
            capacity,
            failed: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, VecDeque<f32>>> {
        self.samples
            .lock()
            .map_err(|_| Error::Playback("sample queue poisoned".to_string()))
    }

    /// Queue samples, blocking while the queue is full
    fn push(&self, samples: impl Iterator<Item = f32>) -> Result<()> {
        let mut samples = samples.peekable();
        while samples.peek().is_some() {
            let mut queue = self.lock()?;
            while queue.len() >= self.capacity {
                if self.failed.load(Ordering::SeqCst) {
                    return Err(Error::Playback("output stream failed".to_string()));
                }
                queue = self
                    .drained
                    .wait_timeout(queue, POLL_INTERVAL)
                    .map_err(|_| Error::Playback("sample queue poisoned".to_string()))?
                    .0;
            }
            let free = self.capacity - queue.len();
            queue.extend(samples.by_ref().take(free));
        }
        Ok(())
    }

    /// Block until the callback has consumed everything
    fn drain(&self) -> Result<()> {
        let mut queue = self.lock()?;
        while !queue.is_empty() {
            if self.failed.load(Ordering::SeqCst) {
                return Err(Error::Playback("output stream failed".to_string()));
            }
            queue = self
                .drained
                .wait_timeout(queue, POLL_INTERVAL)
                .map_err(|_| Error::Playback("sample queue poisoned".to_string()))?
                .0;
        }
        Ok(())
    }
}

/// Streams frames to the default output device.
///
/// Frames are queued and played by the device callback; `write` blocks
/// while the queue is full and `close` waits for it to drain.
pub struct PlaybackSink {
    stream: Option<Stream>,
    queue: Arc<SampleQueue>,
    device_name: String,
    full_scale: f32,
}

impl PlaybackSink {
    /// Open the default output device at `sample_rate` in stereo
    pub fn open(sample_rate: u32, depth: BitDepth) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Playback("no output device available".to_string()))?;
        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());

        let ranges = device
            .supported_output_configs()
            .map_err(|e| Error::Playback(format!("failed to query {}: {}", device_name, e)))?;
        let supported = stereo_config_at(ranges, sample_rate).ok_or_else(|| {
            Error::Playback(format!(
                "{} does not support {} Hz stereo output",
                device_name, sample_rate
            ))
        })?;
        let sample_format = supported.sample_format();
        let stream_config = StreamConfig {
            channels: CHANNELS,
            sample_rate: supported.sample_rate(),
            buffer_size: cpal::BufferSize::Default,
        };

        let capacity = (sample_rate * QUEUE_SECONDS) as usize * CHANNELS as usize;
        let queue = Arc::new(SampleQueue::new(capacity));

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, queue.clone())?,
            SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, queue.clone())?,
            SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, queue.clone())?,
            other => {
                return Err(Error::Playback(format!(
                    "unsupported device sample format {:?}",
                    other
                )))
            }
        };
        stream.play().map_err(|e| Error::Playback(e.to_string()))?;

        log::info!("Playing on {} ({} Hz, {:?})", device_name, sample_rate, sample_format);

        Ok(Self {
            stream: Some(stream),
            queue,
            device_name,
            full_scale: 2f32.powi(depth.bits() as i32 - 1),
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

impl Sink for PlaybackSink {
    fn name(&self) -> &str {
        "playback"
    }

    fn write(&mut self, frame: &Frame) -> Result<()> {
        if self.stream.is_none() {
            return Err(Error::SinkClosed("playback".to_string()));
        }
        let scale = self.full_scale;
        self.queue
            .push(frame.samples().iter().map(|&s| s as f32 / scale))
    }

    /// Let queued audio finish, then stop the stream
    fn close(&mut self) -> Result<()> {
        if self.stream.is_none() {
            return Ok(());
        }
        let drained = self.queue.drain();
        self.stream = None;
        log::info!("Closed playback on {}", self.device_name);
        drained
    }

    fn is_closed(&self) -> bool {
        self.stream.is_none()
    }
}

impl Drop for PlaybackSink {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("Playback did not drain cleanly: {}", e);
        }
    }
}

/// Sample formats the callback can fill, best first
const PREFERRED_FORMATS: [SampleFormat; 3] = [SampleFormat::F32, SampleFormat::I16, SampleFormat::U16];

/// Pick a stereo config whose rate range covers `sample_rate`
fn stereo_config_at(
    ranges: impl IntoIterator<Item = SupportedStreamConfigRange>,
    sample_rate: u32,
) -> Option<SupportedStreamConfig> {
    let rate = cpal::SampleRate(sample_rate);
    let matching: Vec<SupportedStreamConfigRange> = ranges
        .into_iter()
        .filter(|r| r.channels() == CHANNELS)
        .filter(|r| r.min_sample_rate() <= rate && rate <= r.max_sample_rate())
        .collect();

    PREFERRED_FORMATS
        .iter()
        .find_map(|format| matching.iter().find(|r| r.sample_format() == *format))
        .cloned()
        .map(|r| r.with_sample_rate(rate))
}

fn build_stream<T: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>>(
    device: &Device,
    config: &StreamConfig,
    queue: Arc<SampleQueue>,
) -> Result<Stream> {
    let error_queue = queue.clone();

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                match queue.samples.try_lock() {
                    Ok(mut pending) => {
                        for sample in data.iter_mut() {
                            *sample = T::from_sample(pending.pop_front().unwrap_or(0.0));
                        }
                    }
                    Err(_) => {
                        // Writer holds the lock, fill with silence
                        for sample in data.iter_mut() {
                            *sample = T::from_sample(0.0f32);
                        }
                    }
                }
                queue.drained.notify_all();
            },
            move |err| {
                log::error!("Audio stream error: {}", err);
                error_queue.failed.store(true, Ordering::SeqCst);
            },
            None,
        )
        .map_err(|e| Error::Playback(e.to_string()))?;

    Ok(stream)
}

/// Get the default output device name
pub fn default_device_name() -> Option<String> {
    let host = cpal::default_host();
    host.default_output_device().and_then(|d| d.name().ok())
}

/// List all available output devices
pub fn list_output_devices() -> Vec<(String, StreamConfig)> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(output_devices) = host.output_devices() {
        for device in output_devices {
            if let (Ok(name), Ok(config)) = (device.name(), device.default_output_config()) {
                devices.push((name, config.into()));
            }
        }
    }

    devices
}
