//! Sine wave oscillator implementation.

use super::phase::Phase;
use crate::Signal;
use std::f64::consts::TAU;

/// A sine wave oscillator.
///
/// Generates `sin(2π·phase)` and maintains phase continuity across calls to
/// `next_sample()`.
#[derive(Debug, Clone)]
pub struct SineOscillator {
    phase: Phase,
}

impl SineOscillator {
    /// Creates a new sine oscillator.
    ///
    /// # Arguments
    ///
    /// * `frequency` - Frequency of the sine wave in Hz
    /// * `sample_rate` - Sample rate in Hz (e.g., 44100 for CD quality)
    ///
    /// # Examples
    ///
    /// ```
    /// use audible_series::{Signal, SineOscillator};
    ///
    /// let mut osc = SineOscillator::new(440.0, 44100);
    /// assert_eq!(osc.next_sample(), 0.0);
    /// ```
    pub fn new(frequency: f64, sample_rate: u32) -> Self {
        Self {
            phase: Phase::new(frequency, sample_rate),
        }
    }
}

impl Signal for SineOscillator {
    fn next_sample(&mut self) -> f64 {
        (self.phase.advance() * TAU).sin()
    }
}
