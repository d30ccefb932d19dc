//! Square wave oscillator implementation.

use super::phase::Phase;
use crate::Signal;

/// A square wave oscillator with a fixed 50% duty cycle.
///
/// Outputs `1.0` for the first half of each cycle and `-1.0` for the second.
#[derive(Debug, Clone)]
pub struct SquareOscillator {
    phase: Phase,
}

impl SquareOscillator {
    pub fn new(frequency: f64, sample_rate: u32) -> Self {
        Self {
            phase: Phase::new(frequency, sample_rate),
        }
    }
}

impl Signal for SquareOscillator {
    fn next_sample(&mut self) -> f64 {
        if self.phase.advance() < 0.5 { 1.0 } else { -1.0 }
    }
}
