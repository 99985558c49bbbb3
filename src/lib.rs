//! Patchwork - block-based modular sound design
//!
//! Generators produce blocks of samples, filters and effects transform
//! them, and the master bus clips, pans and sends the result to a live
//! sink and a recording sink.

pub mod config;
pub mod engine;
pub mod error;
pub mod patch;
pub mod synth;

pub use config::PatchConfig;
pub use engine::{MasterBus, Patcher};
pub use error::{Error, Result};
pub use synth::{Rack, SignalBlock};
