//! TOML configuration for graphs and pitch indicators.
//!
//! The configuration only describes how to render; the series data itself
//! always comes from the caller and is bound to configured series by name.

use crate::series::OUT_OF_BAND_MARGIN;
use crate::{PitchIndicator, Result, SonifyError, SoundGraph, SoundSeries, ToneGenerator, WaveForm};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

fn default_sample_rate() -> u32 {
    44100
}

fn default_window() -> usize {
    300
}

fn default_tone_duration_ms() -> u64 {
    100
}

fn default_silence_duration_ms() -> u64 {
    50
}

/// Top-level configuration file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SonificationConfig {
    /// Output sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Number of trailing values rendered per graph render
    #[serde(default = "default_window")]
    pub window: usize,
    /// Length of each rendered value
    #[serde(default = "default_tone_duration_ms")]
    pub tone_duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph: Option<GraphConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<PitchConfig>,
}

impl Default for SonificationConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            window: default_window(),
            tone_duration_ms: default_tone_duration_ms(),
            graph: None,
            pitch: None,
        }
    }
}

/// Band and series layout of a [`SoundGraph`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    pub base_freq: f64,
    pub freq_range: f64,
    #[serde(default)]
    pub series: Vec<SeriesConfig>,
    #[serde(default)]
    pub side_series: Vec<SeriesConfig>,
}

/// Voice settings of one series, bound to caller data by `name`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub name: String,
    #[serde(default)]
    pub wave: WaveForm,
    #[serde(default)]
    pub pan: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub range: RangeConfig,
}

/// Which range policy a series uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeConfig {
    #[default]
    Dynamic,
    Fixed { min: f64, max: f64 },
}

/// Settings of a [`PitchIndicator`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PitchConfig {
    pub min_freq: f64,
    pub max_freq: f64,
    pub n_values: usize,
    #[serde(default = "default_tone_duration_ms")]
    pub tone_duration_ms: u64,
    #[serde(default = "default_silence_duration_ms")]
    pub silence_duration_ms: u64,
    #[serde(default)]
    pub duplicate_appends: bool,
}

impl SonificationConfig {
    /// Loads and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "loaded sonification config");
        Ok(config)
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| SonifyError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SonifyError::Config(e.to_string()))
    }

    /// Checks every value the renderers would otherwise reject later,
    /// including bands whose out-of-band tones fall outside `(0, sample_rate / 2)`.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(config_error("sample_rate must be positive"));
        }
        if self.window == 0 {
            return Err(config_error("window must be positive"));
        }
        if let Some(graph) = &self.graph {
            graph.validate(self.sample_rate)?;
        }
        if let Some(pitch) = &self.pitch {
            pitch.validate(self.sample_rate)?;
        }
        Ok(())
    }

    pub fn generator(&self) -> ToneGenerator {
        ToneGenerator::new(self.sample_rate)
    }

    pub fn tone_duration(&self) -> Duration {
        Duration::from_millis(self.tone_duration_ms)
    }
}

impl GraphConfig {
    /// Lowest and highest tone a render can produce, out-of-band limits included.
    pub fn audible_limits(&self) -> (f64, f64) {
        let margin = self.freq_range * OUT_OF_BAND_MARGIN;
        (
            self.base_freq - margin,
            self.base_freq + self.freq_range + margin,
        )
    }

    fn validate(&self, sample_rate: u32) -> Result<()> {
        if !(self.base_freq.is_finite() && self.base_freq > 0.0) {
            return Err(config_error("graph.base_freq must be positive"));
        }
        if !(self.freq_range.is_finite() && self.freq_range > 0.0) {
            return Err(config_error("graph.freq_range must be positive"));
        }
        let (lowest, highest) = self.audible_limits();
        if lowest <= 0.0 {
            return Err(config_error(format!(
                "graph band's out-of-band floor is {lowest} Hz; raise base_freq"
            )));
        }
        if highest >= f64::from(sample_rate) / 2.0 {
            return Err(config_error(format!(
                "graph band reaches {highest} Hz, at or above the Nyquist limit of {} Hz",
                f64::from(sample_rate) / 2.0
            )));
        }
        if self.series.is_empty() && self.side_series.is_empty() {
            return Err(config_error("graph needs at least one series"));
        }
        for series in self.series.iter().chain(&self.side_series) {
            series.validate()?;
        }
        Ok(())
    }

    /// Builds a graph, fetching each configured series' data by name.
    ///
    /// # Examples
    ///
    /// ```
    /// use audible_series::config::SonificationConfig;
    ///
    /// let config = SonificationConfig::from_toml_str(r#"
    ///     [graph]
    ///     base_freq = 200.0
    ///     freq_range = 600.0
    ///     [[graph.series]]
    ///     name = "close"
    /// "#).unwrap();
    ///
    /// let close = vec![1.0, 2.0, 3.0];
    /// let graph = config
    ///     .graph
    ///     .unwrap()
    ///     .build(|name| (name == "close").then_some(close.as_slice()))
    ///     .unwrap();
    /// assert_eq!(graph.series.len(), 1);
    /// ```
    pub fn build<'a, F>(&self, lookup: F) -> Result<SoundGraph<'a>>
    where
        F: Fn(&str) -> Option<&'a [f64]>,
    {
        let mut graph = SoundGraph::new(self.base_freq, self.freq_range);
        for series in &self.series {
            graph.series.push(series.build(&lookup)?);
        }
        for series in &self.side_series {
            graph.side_series.push(series.build(&lookup)?);
        }
        Ok(graph)
    }
}

impl SeriesConfig {
    fn validate(&self) -> Result<()> {
        if !(self.pan.is_finite() && (-1.0..=1.0).contains(&self.pan)) {
            return Err(config_error(format!(
                "series '{}': pan must be within [-1, 1]",
                self.name
            )));
        }
        if !self.volume.is_finite() {
            return Err(config_error(format!(
                "series '{}': volume must be finite",
                self.name
            )));
        }
        if let RangeConfig::Fixed { min, max } = self.range
            && !(min.is_finite() && max.is_finite() && min <= max)
        {
            return Err(config_error(format!(
                "series '{}': fixed range needs finite min <= max",
                self.name
            )));
        }
        Ok(())
    }

    fn build<'a, F>(&self, lookup: &F) -> Result<SoundSeries<'a>>
    where
        F: Fn(&str) -> Option<&'a [f64]>,
    {
        let values = lookup(&self.name)
            .ok_or_else(|| config_error(format!("no data bound to series '{}'", self.name)))?;
        match self.range {
            RangeConfig::Dynamic => Ok(SoundSeries::dynamic(
                values,
                self.wave,
                self.pan,
                self.volume,
            )),
            RangeConfig::Fixed { min, max } => {
                SoundSeries::fixed(values, min, max, self.wave, self.pan, self.volume)
            }
        }
    }
}

impl PitchConfig {
    fn validate(&self, sample_rate: u32) -> Result<()> {
        if !(self.min_freq.is_finite() && self.min_freq > 0.0) {
            return Err(config_error("pitch.min_freq must be positive"));
        }
        if !(self.max_freq.is_finite() && self.max_freq > self.min_freq) {
            return Err(config_error("pitch.max_freq must exceed pitch.min_freq"));
        }
        if self.max_freq >= f64::from(sample_rate) / 2.0 {
            return Err(config_error("pitch.max_freq must stay below half the sample rate"));
        }
        if self.n_values == 0 {
            return Err(config_error("pitch.n_values must be positive"));
        }
        Ok(())
    }

    pub fn build(&self, generator: ToneGenerator) -> Result<PitchIndicator> {
        Ok(
            PitchIndicator::new(self.min_freq, self.max_freq, generator, self.n_values)?
                .with_tone_duration(Duration::from_millis(self.tone_duration_ms))
                .with_silence_duration(Duration::from_millis(self.silence_duration_ms))
                .with_duplicate_appends(self.duplicate_appends),
        )
    }
}

fn config_error(msg: impl Into<String>) -> SonifyError {
    SonifyError::Config(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
        sample_rate = 8000
        window = 30
        tone_duration_ms = 300

        [graph]
        base_freq = 200.0
        freq_range = 600.0

        [[graph.series]]
        name = "upper"
        wave = "sine"
        pan = 0.2
        volume = -4.0

        [[graph.series]]
        name = "lower"
        pan = -0.2
        volume = -4.0

        [[graph.side_series]]
        name = "rsi"
        wave = "triangle"
        volume = -1.0
        range = { fixed = { min = 0.0, max = 100.0 } }

        [pitch]
        min_freq = 200.0
        max_freq = 800.0
        n_values = 10
        duplicate_appends = true
    "#;

    #[test]
    fn test_parse_full_config() {
        let config = SonificationConfig::from_toml_str(FULL).unwrap();
        assert_eq!(config.sample_rate, 8000);
        assert_eq!(config.tone_duration(), Duration::from_millis(300));
        let graph = config.graph.as_ref().unwrap();
        assert_eq!(graph.series.len(), 2);
        assert_eq!(graph.series[1].wave, WaveForm::Sine);
        assert_eq!(graph.series[1].range, RangeConfig::Dynamic);
        assert_eq!(
            graph.side_series[0].range,
            RangeConfig::Fixed {
                min: 0.0,
                max: 100.0
            }
        );
        let pitch = config.pitch.as_ref().unwrap();
        assert_eq!(pitch.silence_duration_ms, 50);
        assert!(pitch.duplicate_appends);
    }

    #[test]
    fn test_defaults() {
        let config = SonificationConfig::from_toml_str("").unwrap();
        assert_eq!(config, SonificationConfig::default());
        assert_eq!(config.generator().sample_rate(), 44100);
    }

    #[test]
    fn test_rejects_unknown_waveform() {
        let err = SonificationConfig::from_toml_str(
            r#"
            [graph]
            base_freq = 200.0
            freq_range = 600.0
            [[graph.series]]
            name = "a"
            wave = "noise"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SonifyError::Config(msg) if msg.contains("noise")));
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        for bad in [
            "sample_rate = 0",
            "window = 0",
            "[graph]\nbase_freq = 0.0\nfreq_range = 1.0\n[[graph.series]]\nname = \"a\"",
            "[graph]\nbase_freq = 1.0\nfreq_range = 1.0\n[[graph.series]]\nname = \"a\"\npan = 2.0",
            "[graph]\nbase_freq = 1.0\nfreq_range = 1.0",
            "[pitch]\nmin_freq = 800.0\nmax_freq = 200.0\nn_values = 3",
        ] {
            assert!(
                matches!(
                    SonificationConfig::from_toml_str(bad),
                    Err(SonifyError::Config(_))
                ),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_rejects_bands_outside_audible_limits() {
        let graph = |base: f64, range: f64| {
            format!(
                "sample_rate = 8000\n[graph]\nbase_freq = {base:?}\nfreq_range = {range:?}\n\
                 [[graph.series]]\nname = \"a\""
            )
        };
        // 10 - 5% of 1000 is -40 Hz
        let err = SonificationConfig::from_toml_str(&graph(10.0, 1000.0)).unwrap_err();
        assert!(matches!(err, SonifyError::Config(msg) if msg.contains("-40")));
        // 200 + 1.05 * 3700 is past 4 kHz
        assert!(SonificationConfig::from_toml_str(&graph(200.0, 3700.0)).is_err());
        assert!(SonificationConfig::from_toml_str(&graph(200.0, 600.0)).is_ok());

        let pitch =
            "sample_rate = 8000\n[pitch]\nmin_freq = 200.0\nmax_freq = 4000.0\nn_values = 3";
        assert!(matches!(
            SonificationConfig::from_toml_str(pitch),
            Err(SonifyError::Config(_))
        ));
    }

    #[test]
    fn test_audible_limits() {
        let config = SonificationConfig::from_toml_str(FULL).unwrap();
        assert_eq!(config.graph.unwrap().audible_limits(), (170.0, 830.0));
    }

    #[test]
    fn test_build_graph_binds_data() {
        let config = SonificationConfig::from_toml_str(FULL).unwrap();
        let upper = vec![3.0, 4.0];
        let lower = vec![1.0, 2.0];
        let rsi = vec![40.0, 60.0];
        let graph = config
            .graph
            .as_ref()
            .unwrap()
            .build(|name| match name {
                "upper" => Some(upper.as_slice()),
                "lower" => Some(lower.as_slice()),
                "rsi" => Some(rsi.as_slice()),
                _ => None,
            })
            .unwrap();
        assert_eq!(graph.min_value(2).unwrap(), 1.0);
        assert_eq!(graph.max_value(2).unwrap(), 4.0);
        assert_eq!(graph.side_series[0].bounds(2).unwrap(), (0.0, 100.0));
    }

    #[test]
    fn test_build_graph_missing_data() {
        let config = SonificationConfig::from_toml_str(FULL).unwrap();
        let err = config.graph.unwrap().build(|_| None).unwrap_err();
        assert!(matches!(err, SonifyError::Config(msg) if msg.contains("upper")));
    }

    #[test]
    fn test_build_pitch_indicator() {
        let config = SonificationConfig::from_toml_str(FULL).unwrap();
        let indicator = config
            .pitch
            .as_ref()
            .unwrap()
            .build(config.generator())
            .unwrap();
        indicator.update(1.0);
        assert_eq!(indicator.len(), 2);
        assert_eq!(indicator.n_values(), 10);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SonificationConfig::from_toml_str(FULL).unwrap();
        let text = config.to_toml().unwrap();
        assert_eq!(SonificationConfig::from_toml_str(&text).unwrap(), config);
    }
}
