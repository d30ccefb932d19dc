//! Triangle wave oscillator implementation.

use super::phase::Phase;
use crate::Signal;

/// A triangle wave oscillator.
///
/// The waveform rises linearly from -1.0 to 1.0 over the first half of the
/// cycle, then falls linearly back to -1.0.
///
/// # Examples
///
/// ```
/// use audible_series::{Signal, TriangleOscillator};
///
/// let mut osc = TriangleOscillator::new(440.0, 44100);
/// assert_eq!(osc.next_sample(), -1.0);
/// ```
#[derive(Debug, Clone)]
pub struct TriangleOscillator {
    phase: Phase,
}

impl TriangleOscillator {
    pub fn new(frequency: f64, sample_rate: u32) -> Self {
        Self {
            phase: Phase::new(frequency, sample_rate),
        }
    }
}

impl Signal for TriangleOscillator {
    fn next_sample(&mut self) -> f64 {
        let phase = self.phase.advance();
        if phase < 0.5 {
            4.0 * phase - 1.0
        } else {
            3.0 - 4.0 * phase
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waveform_shape() {
        // 100 samples per cycle
        let mut osc = TriangleOscillator::new(1.0, 100);
        let samples = osc.take_samples(100);
        assert!((samples[0] + 1.0).abs() < 1e-9);
        assert!((samples[25]).abs() < 1e-9);
        assert!((samples[50] - 1.0).abs() < 1e-9);
        assert!((samples[75]).abs() < 1e-9);
    }

    #[test]
    fn test_sample_range() {
        let mut osc = TriangleOscillator::new(523.25, 44100);
        for sample in osc.take_samples(44100) {
            assert!((-1.0..=1.0).contains(&sample));
        }
    }
}
