//! Per-series rendering: values to pitches to a sequential tone stream.

use crate::combinators::seq;
use crate::range::{DynamicRange, FixedRange, ValueRange, is_missing};
use crate::{AudioBuffer, Result, ToneGenerator, WaveForm};
use std::time::Duration;
use tracing::{debug, warn};

/// Share of the band added beyond an edge for out-of-range values.
pub const OUT_OF_BAND_MARGIN: f64 = 0.05;

/// Linearly maps `v` from `[min_value, max_value]` onto `[min_freq, max_freq]`.
///
/// A flat range (`max_value == min_value`) maps every value to `min_freq`.
/// Values outside the range extrapolate; see [`limit_freq`].
///
/// # Examples
///
/// ```
/// use audible_series::series::calculate_freq;
///
/// assert_eq!(calculate_freq(4.0, 10.0, 200.0, 800.0, 7.0), 500.0);
/// assert_eq!(calculate_freq(4.0, 10.0, 200.0, 800.0, 3.5), 150.0);
/// assert_eq!(calculate_freq(5.0, 5.0, 200.0, 800.0, 42.0), 200.0);
/// ```
pub fn calculate_freq(min_value: f64, max_value: f64, min_freq: f64, max_freq: f64, v: f64) -> f64 {
    let value_delta = max_value - min_value;
    let freq_delta = max_freq - min_freq;
    if value_delta == 0.0 {
        return min_freq;
    }
    min_freq + (freq_delta / value_delta) * (v - min_value)
}

/// Replaces an out-of-band frequency with a fixed tone just past the edge.
///
/// Anything above `max_freq` becomes `max_freq + 5%` of the band and anything
/// below `min_freq` becomes `min_freq - 5%`, so excursions stay audible
/// without running off into extreme pitches.
///
/// # Examples
///
/// ```
/// use audible_series::series::limit_freq;
///
/// assert_eq!(limit_freq(200.0, 800.0, 150.0), 170.0);
/// assert_eq!(limit_freq(200.0, 800.0, 5000.0), 830.0);
/// assert_eq!(limit_freq(200.0, 800.0, 640.0), 640.0);
/// ```
pub fn limit_freq(min_freq: f64, max_freq: f64, freq: f64) -> f64 {
    let freq_delta = max_freq - min_freq;
    if freq > max_freq {
        max_freq + freq_delta * OUT_OF_BAND_MARGIN
    } else if freq < min_freq {
        min_freq - freq_delta * OUT_OF_BAND_MARGIN
    } else {
        freq
    }
}

/// One input series with its range policy and voice settings.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use audible_series::{SoundSeries, ToneGenerator, WaveForm};
///
/// let values = [1.0, 2.0, 3.0];
/// let series = SoundSeries::dynamic(&values, WaveForm::Sine, 0.0, 0.0);
/// let (min, max) = series.bounds(5).unwrap();
///
/// let generator = ToneGenerator::new(8000);
/// let audio = series
///     .render(200.0, 800.0, min, max, 5, Duration::from_millis(10), &generator)
///     .unwrap();
/// assert_eq!(audio.len(), 5 * 80);
/// ```
pub struct SoundSeries<'a> {
    range: Box<dyn ValueRange + Send + Sync + 'a>,
    pub pan: f64,
    pub volume: f64,
    pub wave: WaveForm,
}

impl<'a> SoundSeries<'a> {
    /// Creates a series from any range policy.
    pub fn new(
        range: impl ValueRange + Send + Sync + 'a,
        wave: WaveForm,
        pan: f64,
        volume: f64,
    ) -> Self {
        Self {
            range: Box::new(range),
            pan,
            volume,
            wave,
        }
    }

    /// A series normalized against its own trailing window.
    pub fn dynamic(values: &'a [f64], wave: WaveForm, pan: f64, volume: f64) -> Self {
        Self::new(DynamicRange::new(values), wave, pan, volume)
    }

    /// A series normalized against fixed bounds.
    pub fn fixed(
        values: &'a [f64],
        min_value: f64,
        max_value: f64,
        wave: WaveForm,
        pan: f64,
        volume: f64,
    ) -> Result<Self> {
        Ok(Self::new(
            FixedRange::new(values, min_value, max_value)?,
            wave,
            pan,
            volume,
        ))
    }

    pub fn range(&self) -> &dyn ValueRange {
        self.range.as_ref()
    }

    pub fn min_value(&self, window: usize) -> Result<f64> {
        self.range.minimum(window)
    }

    pub fn max_value(&self, window: usize) -> Result<f64> {
        self.range.maximum(window)
    }

    pub fn bounds(&self, window: usize) -> Result<(f64, f64)> {
        self.range.bounds(window)
    }

    /// True when the series has data but none of it falls in the trailing
    /// `window`, e.g. an indicator still warming up. Such a window renders
    /// as silence and takes no part in range computation.
    pub fn is_gap_window(&self, window: usize) -> bool {
        window > 0 && !self.range.values().is_empty() && !self.range.has_samples(window)
    }

    /// `window` silent tones of `duration`.
    pub fn silence(
        &self,
        window: usize,
        duration: Duration,
        generator: &ToneGenerator,
    ) -> AudioBuffer {
        AudioBuffer::silence(generator.sample_rate(), window * generator.frames(duration))
    }

    /// Frequency each of the last `window` values maps to; `None` for gaps.
    pub fn frequencies(
        &self,
        min_freq: f64,
        max_freq: f64,
        min_value: f64,
        max_value: f64,
        window: usize,
    ) -> Vec<Option<f64>> {
        self.range
            .windowed_values(window)
            .into_iter()
            .map(|v| {
                if is_missing(v) {
                    None
                } else {
                    let freq = calculate_freq(min_value, max_value, min_freq, max_freq, v);
                    Some(limit_freq(min_freq, max_freq, freq))
                }
            })
            .collect()
    }

    /// Renders the last `window` values as consecutive tones of `duration`.
    ///
    /// Gaps become silence. The first generator error aborts the render.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &self,
        min_freq: f64,
        max_freq: f64,
        min_value: f64,
        max_value: f64,
        window: usize,
        duration: Duration,
        generator: &ToneGenerator,
    ) -> Result<AudioBuffer> {
        if min_value == max_value {
            if self.range.is_fixed() {
                debug!(wave = %self.wave, min_value, "fixed range is a single value");
            } else {
                warn!(
                    wave = %self.wave,
                    min_value,
                    "flat value range, every tone sits at the band floor"
                );
            }
        }
        let freqs = self.frequencies(min_freq, max_freq, min_value, max_value, window);
        let tones = freqs
            .iter()
            .map(|freq| match freq {
                Some(freq) => {
                    generator.generate(self.wave, *freq, duration, self.pan, self.volume)
                }
                None => Ok(generator.silence(duration)),
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            wave = %self.wave,
            window,
            gaps = freqs.iter().filter(|f| f.is_none()).count(),
            min_value,
            max_value,
            "rendered series"
        );
        Ok(seq(generator.sample_rate(), &tones))
    }
}

impl std::fmt::Debug for SoundSeries<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundSeries")
            .field("len", &self.range.values().len())
            .field("pan", &self.pan)
            .field("volume", &self.volume)
            .field("wave", &self.wave)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SonifyError;
    use crate::range::MISSING;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_calculate_freq_regular_case() {
        assert_eq!(calculate_freq(4.0, 10.0, 200.0, 800.0, 7.0), 500.0);
    }

    #[test]
    fn test_calculate_freq_overflow_on_lower_bound() {
        assert_eq!(calculate_freq(4.0, 10.0, 200.0, 800.0, 3.5), 150.0);
        assert_eq!(limit_freq(200.0, 800.0, 150.0), 170.0);
    }

    #[test]
    fn test_calculate_freq_flat_range() {
        for v in [-1e9, 0.0, 3.0, 1e9] {
            assert_eq!(calculate_freq(3.0, 3.0, 200.0, 800.0, v), 200.0);
        }
    }

    #[test]
    fn test_calculate_freq_preserves_order() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let min_value: f64 = rng.gen_range(-1000.0..1000.0);
            let max_value = min_value + rng.gen_range(0.001..1000.0);
            let v1 = rng.gen_range(min_value..max_value);
            let v2 = rng.gen_range(min_value..max_value);
            let (lo, hi) = if v1 < v2 { (v1, v2) } else { (v2, v1) };
            let f_lo = calculate_freq(min_value, max_value, 200.0, 800.0, lo);
            let f_hi = calculate_freq(min_value, max_value, 200.0, 800.0, hi);
            assert!(f_lo <= f_hi, "{lo} -> {f_lo}, {hi} -> {f_hi}");
        }
    }

    #[test]
    fn test_frequencies_pad_and_clamp() {
        let values = [3.5, 7.0, 11.0];
        let series = SoundSeries::fixed(&values, 4.0, 10.0, WaveForm::Sine, 0.0, 0.0).unwrap();
        let freqs = series.frequencies(200.0, 800.0, 4.0, 10.0, 4);
        assert_eq!(freqs, vec![None, Some(170.0), Some(500.0), Some(830.0)]);
    }

    #[test]
    fn test_render_gaps_are_silent() {
        let values = [MISSING, 2.0];
        let series = SoundSeries::dynamic(&values, WaveForm::Square, 0.0, 0.0);
        let generator = ToneGenerator::new(1000);
        let audio = series
            .render(200.0, 400.0, 2.0, 2.0, 3, Duration::from_millis(10), &generator)
            .unwrap();
        assert_eq!(audio.len(), 30);
        assert!(audio.frames()[..20].iter().all(|f| *f == [0.0, 0.0]));
        assert_eq!(audio.frames()[20], [1.0, 1.0]);
    }

    #[test]
    fn test_gap_window_detection() {
        let warming_up = [MISSING, MISSING, 4.0];
        let series = SoundSeries::dynamic(&warming_up, WaveForm::Sine, 0.0, 0.0);
        assert!(series.is_gap_window(2));
        assert!(!series.is_gap_window(1));
        // Padding alone is still a gap window once data exists
        let short = [MISSING];
        assert!(SoundSeries::dynamic(&short, WaveForm::Sine, 0.0, 0.0).is_gap_window(4));
        let empty: [f64; 0] = [];
        assert!(!SoundSeries::dynamic(&empty, WaveForm::Sine, 0.0, 0.0).is_gap_window(4));
    }

    #[test]
    fn test_silence_matches_rendered_length() {
        let values = [1.0, 2.0];
        let series = SoundSeries::dynamic(&values, WaveForm::Sine, 0.0, 0.0);
        let generator = ToneGenerator::new(8000);
        let duration = Duration::from_millis(10);
        let rendered = series
            .render(200.0, 800.0, 1.0, 2.0, 3, duration, &generator)
            .unwrap();
        let silent = series.silence(3, duration, &generator);
        assert_eq!(silent.len(), rendered.len());
        assert!(silent.is_silent());
    }

    #[test]
    fn test_render_propagates_generator_errors() {
        // A wide band below a low base frequency pushes the lower limit negative
        let values = [0.0, 10.0];
        let series = SoundSeries::dynamic(&values, WaveForm::Sine, 0.0, 0.0);
        let generator = ToneGenerator::new(44100);
        let err = series
            .render(10.0, 1010.0, 5.0, 10.0, 2, Duration::from_millis(10), &generator)
            .unwrap_err();
        assert!(matches!(err, SonifyError::InvalidFrequency(f) if f == -40.0));
    }
}
