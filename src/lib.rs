//! Audible Series - turns numeric time series into sound
//!
//! Each value of a series is mapped linearly onto a frequency band and played
//! as a short tone; the tones of one series play one after another, and
//! several series play at the same time. The building blocks, leaves first:
//!
//! - [`oscillators`] and [`ToneGenerator`]: finite tones of a waveform
//! - [`range`]: dynamic or fixed value ranges over a trailing window
//! - [`SoundSeries`]: values to pitches to a sequential tone stream
//! - [`SoundGraph`]: primary and side series mixed into one buffer
//! - [`PitchIndicator`]: a thread-safe, append-only single-series variant
//!
//! Gaps in the data are marked with [`range::MISSING`] (NaN) and rendered as
//! silence.

pub mod combinators;
pub mod config;
mod error;
pub mod generator;
pub mod graph;
pub mod oscillators;
pub mod pitch;
pub mod range;
pub mod series;
pub mod signals;
#[cfg(feature = "wav")]
pub mod wav;

// Re-export commonly used types at the crate root
pub use combinators::{BufferExt, Effect, Pan, Volume};
pub use config::SonificationConfig;
pub use error::{Result, SonifyError};
pub use generator::{ToneGenerator, WaveForm};
pub use graph::SoundGraph;
pub use oscillators::{
    ReverseSawtoothOscillator, SawtoothOscillator, SineOscillator, SquareOscillator,
    TriangleOscillator,
};
pub use pitch::{AudibleIndicator, PitchIndicator};
pub use range::{DynamicRange, FixedRange, MISSING, ValueRange};
pub use series::SoundSeries;
pub use signals::{AudioBuffer, Frame, Signal, frames_for};
