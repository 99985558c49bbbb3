//! Sound generation and block effects
//!
//! Contains the signal block type, generators (tone, noise), the fixed
//! filterbank, vibrato and the soft clipper.

mod block;
mod clipper;
pub mod filter;
mod noise;
mod oscillator;
mod rack;
mod vibrato;

pub use block::SignalBlock;
pub use clipper::SoftClipper;
pub use filter::{filterbank, BandPass, FilterSpec};
pub use noise::NoiseGenerator;
pub use oscillator::{ToneOscillator, TONE_GAIN};
pub use rack::Rack;
pub use vibrato::Vibrato;
