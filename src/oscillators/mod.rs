//! Oscillator implementations for tone synthesis.
//!
//! Every oscillator starts at phase 0, so two oscillators built with the same
//! frequency and sample rate produce identical sample streams.

mod phase;
mod sawtooth;
mod sine;
mod square;
mod triangle;

pub use sawtooth::{ReverseSawtoothOscillator, SawtoothOscillator};
pub use sine::SineOscillator;
pub use square::SquareOscillator;
pub use triangle::TriangleOscillator;
