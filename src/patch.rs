//! Rendering patch files
//!
//! Turns track descriptions into blocks using a [`Rack`] and sends them
//! to the master bus in file order.

use crate::config::{EffectConfig, PatchConfig, SourceConfig, TrackConfig};
use crate::engine::{mixer, Patcher, Sink};
use crate::error::Result;
use crate::synth::{Rack, SignalBlock};
use std::sync::atomic::{AtomicBool, Ordering};

/// Generate the block described by a source
pub fn render_source(rack: &Rack, source: &SourceConfig) -> SignalBlock {
    match source {
        SourceConfig::Tone { duration, frequency } => rack.tone(*duration, *frequency),
        SourceConfig::Noise { duration, decay, gain } => rack.noise(*duration, *decay, *gain),
        SourceConfig::Silence { duration } => rack.silence(*duration),
        SourceConfig::Mix { sources } => {
            let blocks: Vec<SignalBlock> =
                sources.iter().map(|s| render_source(rack, s)).collect();
            mixer::mix_all(&blocks).unwrap_or_else(|| rack.silence(0.0))
        }
    }
}

/// Apply one effect
pub fn apply_effect(rack: &Rack, block: &SignalBlock, effect: &EffectConfig) -> Result<SignalBlock> {
    match effect {
        EffectConfig::Filter { index, gain } => rack.filterbank(block, *index, *gain),
        EffectConfig::Vibrato { rate, depth } => Ok(rack.vibrato(block, *rate, *depth)),
        EffectConfig::Clip { ratio, gain } => Ok(rack.clip(block, *ratio, *gain)),
    }
}

/// Render a track's source through its effect chain
pub fn render_track(rack: &Rack, track: &TrackConfig) -> Result<SignalBlock> {
    let source = render_source(rack, &track.source);
    track
        .effects
        .iter()
        .try_fold(source, |block, effect| apply_effect(rack, &block, effect))
}

/// Render every track and send it to the master bus in order.
///
/// Stops early (between tracks) once `stop` is set. Returns the number of
/// tracks sent. Sinks are left open; call [`Patcher::terminate`] afterwards.
pub fn run_patch<L: Sink, P: Sink>(
    patcher: &mut Patcher<L, P>,
    config: &PatchConfig,
    stop: &AtomicBool,
) -> Result<usize> {
    let mut sent = 0;

    for (i, track) in config.tracks.iter().enumerate() {
        if stop.load(Ordering::SeqCst) {
            log::info!("Stopping before track {} of {}", i + 1, config.tracks.len());
            break;
        }

        let block = render_track(patcher.rack(), track)?;
        log::info!(
            "Track {}: {} ({:.2}s)",
            i + 1,
            track.name.as_deref().unwrap_or("unnamed"),
            block.duration_secs()
        );

        patcher.to_master(&block, track.pan.left, track.pan.right)?;
        sent += 1;
    }

    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AudioConfig, PanConfig};
    use crate::engine::MemorySink;

    fn rack() -> Rack {
        Rack::new(22000).unwrap()
    }

    fn track(source: SourceConfig, effects: Vec<EffectConfig>) -> TrackConfig {
        TrackConfig {
            name: None,
            source,
            effects,
            pan: PanConfig::default(),
        }
    }

    #[test]
    fn test_render_sources() {
        let rack = rack();
        let tone = render_source(&rack, &SourceConfig::Tone { duration: 0.3, frequency: 440.0 });
        assert_eq!(tone.len(), 6600);

        let mix = render_source(
            &rack,
            &SourceConfig::Mix {
                sources: vec![
                    SourceConfig::Silence { duration: 1.0 },
                    SourceConfig::Tone { duration: 0.3, frequency: 440.0 },
                ],
            },
        );
        assert_eq!(mix.len(), 22000);
    }

    #[test]
    fn test_effect_chain_runs_in_order() {
        let rack = rack();
        let t = track(
            SourceConfig::Tone { duration: 0.1, frequency: 1000.0 },
            vec![
                EffectConfig::Filter { index: 3, gain: 1.0 },
                EffectConfig::Clip { ratio: 0.5, gain: 1.0 },
            ],
        );

        let expected = {
            let tone = rack.tone(0.1, 1000.0);
            let filtered = rack.filterbank(&tone, 3, 1.0).unwrap();
            rack.clip(&filtered, 0.5, 1.0)
        };

        assert_eq!(render_track(&rack, &t).unwrap(), expected);
    }

    #[test]
    fn test_render_track_propagates_filter_error() {
        let t = track(
            SourceConfig::Silence { duration: 0.1 },
            vec![EffectConfig::Filter { index: 0, gain: 1.0 }],
        );
        assert!(render_track(&rack(), &t).is_err());
    }

    #[test]
    fn test_run_patch_sends_in_order() {
        let audio = AudioConfig { playback: false, ..AudioConfig::default() };
        let config = PatchConfig {
            audio: audio.clone(),
            tracks: vec![
                track(SourceConfig::Silence { duration: 0.01 }, vec![]),
                track(SourceConfig::Tone { duration: 0.02, frequency: 440.0 }, vec![]),
                track(SourceConfig::Silence { duration: 0.03 }, vec![]),
            ],
        };

        let mut patcher =
            Patcher::with_sinks(&audio, MemorySink::new("live"), MemorySink::new("file")).unwrap();
        let sent = run_patch(&mut patcher, &config, &AtomicBool::new(false)).unwrap();

        assert_eq!(sent, 3);
        let lengths: Vec<usize> =
            patcher.bus().persistence().frames().iter().map(|f| f.frames()).collect();
        assert_eq!(lengths, vec![220, 440, 660]);
    }

    #[test]
    fn test_run_patch_honours_stop() {
        let audio = AudioConfig { playback: false, ..AudioConfig::default() };
        let config = PatchConfig {
            audio: audio.clone(),
            tracks: vec![track(SourceConfig::Silence { duration: 0.01 }, vec![])],
        };

        let mut patcher =
            Patcher::with_sinks(&audio, MemorySink::new("live"), MemorySink::new("file")).unwrap();
        let sent = run_patch(&mut patcher, &config, &AtomicBool::new(true)).unwrap();

        assert_eq!(sent, 0);
        assert!(patcher.bus().live().frames().is_empty());
    }
}
