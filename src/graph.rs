//! Multi-series composition.

use crate::combinators::mix;
use crate::{AudioBuffer, Result, SonifyError, SoundSeries, ToneGenerator};
use std::time::Duration;
use tracing::{debug, info};

/// A set of series rendered together into one stream.
///
/// Primary `series` share a single value range so their pitches are directly
/// comparable (e.g. the two bands of a Bollinger channel). `side_series` are
/// normalized independently (e.g. an oscillator with its own scale). Every
/// series uses the band `[base_freq, base_freq + freq_range]`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use audible_series::{SoundGraph, SoundSeries, ToneGenerator, WaveForm};
///
/// let upper = [11.0, 12.0, 13.0];
/// let lower = [9.0, 8.0, 7.0];
/// let graph = SoundGraph {
///     series: vec![
///         SoundSeries::dynamic(&upper, WaveForm::Sine, 0.2, -4.0),
///         SoundSeries::dynamic(&lower, WaveForm::Sine, -0.2, -4.0),
///     ],
///     side_series: vec![],
///     base_freq: 200.0,
///     freq_range: 600.0,
/// };
///
/// let generator = ToneGenerator::new(8000);
/// let audio = graph.render(3, Duration::from_millis(50), &generator).unwrap();
/// assert_eq!(audio.len(), 3 * 400);
/// ```
#[derive(Debug, Default)]
pub struct SoundGraph<'a> {
    pub series: Vec<SoundSeries<'a>>,
    pub side_series: Vec<SoundSeries<'a>>,
    pub base_freq: f64,
    pub freq_range: f64,
}

impl<'a> SoundGraph<'a> {
    pub fn new(base_freq: f64, freq_range: f64) -> Self {
        Self {
            series: Vec::new(),
            side_series: Vec::new(),
            base_freq,
            freq_range,
        }
    }

    /// Adds a series sharing the common primary range.
    pub fn with_series(mut self, series: SoundSeries<'a>) -> Self {
        self.series.push(series);
        self
    }

    /// Adds an independently ranged series.
    pub fn with_side_series(mut self, series: SoundSeries<'a>) -> Self {
        self.side_series.push(series);
        self
    }

    /// `(min_freq, max_freq)` of the shared band.
    pub fn band(&self) -> (f64, f64) {
        (self.base_freq, self.base_freq + self.freq_range)
    }

    /// Primary series with data in the trailing `window`.
    fn ranged_series(&self, window: usize) -> impl Iterator<Item = &SoundSeries<'a>> {
        self.series.iter().filter(move |s| !s.is_gap_window(window))
    }

    /// Lowest minimum over the primary series with data in the window.
    ///
    /// Series whose window holds only gaps are skipped; if nothing is left
    /// the result is `EmptyRangeInput`.
    pub fn min_value(&self, window: usize) -> Result<f64> {
        let mut ranged = self.ranged_series(window).peekable();
        if ranged.peek().is_none() {
            return Err(SonifyError::EmptyRangeInput);
        }
        ranged
            .map(|s| s.min_value(window))
            .try_fold(f64::INFINITY, |acc, v| Ok(acc.min(v?)))
    }

    /// Highest maximum over the primary series with data in the window.
    pub fn max_value(&self, window: usize) -> Result<f64> {
        let mut ranged = self.ranged_series(window).peekable();
        if ranged.peek().is_none() {
            return Err(SonifyError::EmptyRangeInput);
        }
        ranged
            .map(|s| s.max_value(window))
            .try_fold(f64::NEG_INFINITY, |acc, v| Ok(acc.max(v?)))
    }

    /// Renders the last `window` values of every series as tones of
    /// `duration` and mixes them.
    ///
    /// Within a series tones play one after another; series play
    /// simultaneously. A series whose window holds only gaps is silent.
    /// A failure in any series aborts the whole render.
    pub fn render(
        &self,
        window: usize,
        duration: Duration,
        generator: &ToneGenerator,
    ) -> Result<AudioBuffer> {
        if window == 0 {
            return Err(SonifyError::InvalidWindow);
        }
        if self.series.is_empty() && self.side_series.is_empty() {
            return Err(SonifyError::EmptyGraph);
        }
        let (min_freq, max_freq) = self.band();
        let mut streams = Vec::with_capacity(self.series.len() + self.side_series.len());

        let primary_bounds = if self.ranged_series(window).next().is_some() {
            let min_value = self.min_value(window)?;
            let max_value = self.max_value(window)?;
            debug!(min_value, max_value, window, "shared primary range");
            Some((min_value, max_value))
        } else {
            None
        };
        for series in &self.series {
            let stream = match primary_bounds {
                Some((min_value, max_value)) if !series.is_gap_window(window) => series.render(
                    min_freq, max_freq, min_value, max_value, window, duration, generator,
                )?,
                _ => series.silence(window, duration, generator),
            };
            streams.push(stream);
        }
        for series in &self.side_series {
            if series.is_gap_window(window) {
                streams.push(series.silence(window, duration, generator));
                continue;
            }
            let (min_value, max_value) = series.bounds(window)?;
            streams.push(series.render(
                min_freq, max_freq, min_value, max_value, window, duration, generator,
            )?);
        }

        let mixed = mix(generator.sample_rate(), &streams);
        info!(
            primary = self.series.len(),
            side = self.side_series.len(),
            frames = mixed.len(),
            "rendered graph"
        );
        Ok(mixed)
    }
}
