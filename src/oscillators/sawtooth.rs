//! Sawtooth and reverse sawtooth oscillators.

use super::phase::Phase;
use crate::Signal;

/// A rising sawtooth oscillator.
///
/// The waveform rises linearly from -1.0 to 1.0, then drops sharply back to -1.0.
#[derive(Debug, Clone)]
pub struct SawtoothOscillator {
    phase: Phase,
}

impl SawtoothOscillator {
    pub fn new(frequency: f64, sample_rate: u32) -> Self {
        Self {
            phase: Phase::new(frequency, sample_rate),
        }
    }
}

impl Signal for SawtoothOscillator {
    fn next_sample(&mut self) -> f64 {
        2.0 * self.phase.advance() - 1.0
    }
}

/// A falling sawtooth oscillator.
///
/// Mirror image of [`SawtoothOscillator`]: starts at 1.0, falls linearly to
/// -1.0, then jumps back up.
#[derive(Debug, Clone)]
pub struct ReverseSawtoothOscillator {
    phase: Phase,
}

impl ReverseSawtoothOscillator {
    pub fn new(frequency: f64, sample_rate: u32) -> Self {
        Self {
            phase: Phase::new(frequency, sample_rate),
        }
    }
}

impl Signal for ReverseSawtoothOscillator {
    fn next_sample(&mut self) -> f64 {
        1.0 - 2.0 * self.phase.advance()
    }
}
