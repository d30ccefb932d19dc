//! Continuous pitch indicator: a single append-only series rendered on demand.
//!
//! Values are appended as they arrive (possibly from another thread) and the
//! indicator renders only its trailing `n_values` samples, each as a short
//! triangle tone followed by a gap. Reference tones at the band edges can be
//! played first so the listener knows where "low" and "high" are.

use crate::combinators::seq;
use crate::range::is_missing;
use crate::{AudioBuffer, Result, SonifyError, ToneGenerator, WaveForm};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, trace};

/// Something that can be listened to, with calibration tones.
pub trait AudibleIndicator {
    /// Tone at the top of the band.
    fn ref_max(&self) -> Result<AudioBuffer>;

    /// Tone at the bottom of the band.
    fn ref_min(&self) -> Result<AudioBuffer>;

    /// The indicator's current state, or `None` while it is not ready.
    fn render(&self) -> Result<Option<AudioBuffer>>;
}

/// Thread-safe pitch indicator over the last `n_values` appended values.
///
/// Each value is pitched against the min/max of the trailing `n_values + 1`
/// values, so the mapping follows the local range of the data.
///
/// # Examples
///
/// ```
/// use audible_series::{AudibleIndicator, PitchIndicator, ToneGenerator};
///
/// let indicator = PitchIndicator::new(200.0, 800.0, ToneGenerator::new(8000), 3).unwrap();
/// indicator.update(1.0);
/// assert!(indicator.render().unwrap().is_none());
///
/// for v in [2.0, 3.0, 4.0] {
///     indicator.update(v);
/// }
/// let audio = indicator.render().unwrap().unwrap();
/// // 3 tones of 100 ms, each followed by 50 ms of silence
/// assert_eq!(audio.len(), 3 * (800 + 400));
/// ```
#[derive(Debug)]
pub struct PitchIndicator {
    values: Mutex<Vec<f64>>,
    min_freq: f64,
    max_freq: f64,
    generator: ToneGenerator,
    n_values: usize,
    tone_duration: Duration,
    silence_duration: Duration,
    duplicate_appends: bool,
}

impl PitchIndicator {
    pub const DEFAULT_TONE_DURATION: Duration = Duration::from_millis(100);
    pub const DEFAULT_SILENCE_DURATION: Duration = Duration::from_millis(50);

    /// Creates an empty indicator. Fails with `InvalidWindow` when `n_values` is 0.
    pub fn new(
        min_freq: f64,
        max_freq: f64,
        generator: ToneGenerator,
        n_values: usize,
    ) -> Result<Self> {
        if n_values == 0 {
            return Err(SonifyError::InvalidWindow);
        }
        Ok(Self {
            values: Mutex::new(Vec::with_capacity(100)),
            min_freq,
            max_freq,
            generator,
            n_values,
            tone_duration: Self::DEFAULT_TONE_DURATION,
            silence_duration: Self::DEFAULT_SILENCE_DURATION,
            duplicate_appends: false,
        })
    }

    pub fn with_tone_duration(mut self, duration: Duration) -> Self {
        self.tone_duration = duration;
        self
    }

    pub fn with_silence_duration(mut self, duration: Duration) -> Self {
        self.silence_duration = duration;
        self
    }

    /// Stores every appended value twice, doubling how long each value
    /// stays in the rendered window.
    pub fn with_duplicate_appends(mut self, duplicate: bool) -> Self {
        self.duplicate_appends = duplicate;
        self
    }

    pub fn n_values(&self) -> usize {
        self.n_values
    }

    /// Appends a value.
    pub fn update(&self, value: f64) {
        let mut values = self.lock();
        values.push(value);
        if self.duplicate_appends {
            values.push(value);
        }
        trace!(value, len = values.len(), "appended indicator value");
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// True once at least `n_values` values are stored.
    pub fn is_ready(&self) -> bool {
        self.len() >= self.n_values
    }

    /// Frequency `value` maps to given the currently stored values.
    pub fn frequency_of(&self, value: f64) -> f64 {
        let values = self.lock();
        self.freq_in(&values, value)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<f64>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Linear mapping over the trailing `n_values + 1` of `values`.
    ///
    /// Missing samples are ignored when computing the window's range.
    fn freq_in(&self, values: &[f64], value: f64) -> f64 {
        if values.len() <= self.n_values {
            return self.min_freq;
        }
        let window = values[values.len() - self.n_values - 1..]
            .iter()
            .copied()
            .filter(|v| !is_missing(*v));
        let (min_value, max_value) = window.fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), v| (lo.min(v), hi.max(v)),
        );
        let value_delta = max_value - min_value;
        if value_delta == 0.0 || !value_delta.is_finite() {
            return self.min_freq;
        }
        self.min_freq + (self.max_freq - self.min_freq) / value_delta * (value - min_value)
    }

    fn tone(&self, freq: f64) -> Result<AudioBuffer> {
        self.generator
            .generate(WaveForm::Triangle, freq, self.tone_duration, 0.0, 0.0)
    }
}

impl AudibleIndicator for PitchIndicator {
    fn ref_max(&self) -> Result<AudioBuffer> {
        self.tone(self.max_freq)
    }

    fn ref_min(&self) -> Result<AudioBuffer> {
        self.tone(self.min_freq)
    }

    fn render(&self) -> Result<Option<AudioBuffer>> {
        let freqs: Vec<Option<f64>> = {
            let values = self.lock();
            if values.len() < self.n_values {
                return Ok(None);
            }
            values[values.len() - self.n_values..]
                .iter()
                .map(|&v| (!is_missing(v)).then(|| self.freq_in(&values, v)))
                .collect()
        };

        let gap = self.generator.silence(self.silence_duration);
        let mut parts = Vec::with_capacity(freqs.len() * 2);
        for freq in &freqs {
            match freq {
                Some(freq) => parts.push(self.tone(*freq)?),
                None => parts.push(self.generator.silence(self.tone_duration)),
            }
            parts.push(gap.clone());
        }
        debug!(tones = freqs.len(), "rendered pitch indicator");
        Ok(Some(seq(self.generator.sample_rate(), &parts)))
    }
}
