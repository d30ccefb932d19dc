//! Signal processing types and traits.
//!
//! This module provides the core abstractions used throughout the library:
//! - `Signal` trait for endless mono sample sources (oscillators)
//! - `AudioBuffer`, the finite stereo sequence every render produces

mod buffer;
mod core;

pub use buffer::{AudioBuffer, Frame, frames_for};
pub use core::Signal;
