//! Core signal trait.
//!
//! A `Signal` is an endless source of mono samples. Oscillators implement it;
//! finite, stereo output is produced by taking a fixed number of samples into
//! an [`AudioBuffer`](super::AudioBuffer).

/// Common interface for all signal sources.
///
/// The trait provides two fundamental operations:
/// - Single sample generation via `next_sample()`
/// - Batch processing via `process()`
pub trait Signal {
    /// Generates the next sample from the signal.
    ///
    /// # Returns
    ///
    /// A sample value, typically between -1.0 and 1.0 for audio signals
    fn next_sample(&mut self) -> f64;

    /// Generates multiple samples into a buffer.
    ///
    /// Default implementation calls `next_sample()` for each element.
    fn process(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Collects exactly `n` samples into a new vector.
    fn take_samples(&mut self, n: usize) -> Vec<f64> {
        let mut samples = vec![0.0; n];
        self.process(&mut samples);
        samples
    }
}
