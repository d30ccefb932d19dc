//! Tone generation: one waveform, one frequency, one finite stereo buffer.

use crate::combinators::BufferExt;
use crate::oscillators::{
    ReverseSawtoothOscillator, SawtoothOscillator, SineOscillator, SquareOscillator,
    TriangleOscillator,
};
use crate::{AudioBuffer, Result, Signal, SonifyError, frames_for};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::trace;

/// The waveforms a tone can be rendered with.
///
/// Integer codes follow declaration order (`Sine` = 0 ... `Silence` = 5).
///
/// # Examples
///
/// ```
/// use audible_series::WaveForm;
///
/// assert_eq!("triangle".parse::<WaveForm>().unwrap(), WaveForm::Triangle);
/// assert_eq!(WaveForm::try_from(4u8).unwrap(), WaveForm::ReverseSawtooth);
/// assert!(WaveForm::try_from(6u8).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WaveForm {
    #[default]
    Sine,
    Square,
    Triangle,
    Sawtooth,
    ReverseSawtooth,
    Silence,
}

impl WaveForm {
    pub const ALL: [WaveForm; 6] = [
        WaveForm::Sine,
        WaveForm::Square,
        WaveForm::Triangle,
        WaveForm::Sawtooth,
        WaveForm::ReverseSawtooth,
        WaveForm::Silence,
    ];

    /// Canonical lowercase name, as accepted by `FromStr` and configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            WaveForm::Sine => "sine",
            WaveForm::Square => "square",
            WaveForm::Triangle => "triangle",
            WaveForm::Sawtooth => "sawtooth",
            WaveForm::ReverseSawtooth => "reverse_sawtooth",
            WaveForm::Silence => "silence",
        }
    }

    /// True for every waveform except `Silence`.
    pub fn is_periodic(&self) -> bool {
        !matches!(self, WaveForm::Silence)
    }
}

impl fmt::Display for WaveForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for WaveForm {
    type Error = SonifyError;

    fn try_from(code: u8) -> Result<Self> {
        WaveForm::ALL
            .get(usize::from(code))
            .copied()
            .ok_or_else(|| SonifyError::UnsupportedWaveform(code.to_string()))
    }
}

impl FromStr for WaveForm {
    type Err = SonifyError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "sine" => Ok(WaveForm::Sine),
            "square" => Ok(WaveForm::Square),
            "triangle" => Ok(WaveForm::Triangle),
            "sawtooth" | "saw" => Ok(WaveForm::Sawtooth),
            "reverse_sawtooth" | "reverse_saw" => Ok(WaveForm::ReverseSawtooth),
            "silence" => Ok(WaveForm::Silence),
            _ => Err(SonifyError::UnsupportedWaveform(s.to_string())),
        }
    }
}

impl TryFrom<String> for WaveForm {
    type Error = SonifyError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<WaveForm> for String {
    fn from(wave: WaveForm) -> Self {
        wave.name().to_string()
    }
}

/// Produces finite stereo tones at a fixed sample rate.
///
/// Every call starts a fresh oscillator at phase 0, so generation is pure:
/// equal arguments always yield identical buffers.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use audible_series::{ToneGenerator, WaveForm};
///
/// let generator = ToneGenerator::new(44100);
/// let tone = generator
///     .generate(WaveForm::Sine, 440.0, Duration::from_millis(100), 0.0, -1.0)
///     .unwrap();
/// assert_eq!(tone.len(), 4410);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneGenerator {
    sample_rate: u32,
}

impl ToneGenerator {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of frames a tone of `duration` spans.
    pub fn frames(&self, duration: Duration) -> usize {
        frames_for(self.sample_rate, duration)
    }

    /// A silent buffer of `duration`.
    pub fn silence(&self, duration: Duration) -> AudioBuffer {
        AudioBuffer::silence(self.sample_rate, self.frames(duration))
    }

    /// Generates `duration` worth of `wave` at `freq`, then applies pan and
    /// base-2 volume.
    ///
    /// `Silence` ignores every other argument. Periodic waveforms fail with
    /// `InvalidFrequency` unless `0 < freq < sample_rate / 2`, and with
    /// `InvalidPan` unless `-1 <= pan <= 1`.
    pub fn generate(
        &self,
        wave: WaveForm,
        freq: f64,
        duration: Duration,
        pan: f64,
        volume: f64,
    ) -> Result<AudioBuffer> {
        let n = self.frames(duration);
        let Some(mut oscillator) = self.oscillator(wave, freq) else {
            return Ok(AudioBuffer::silence(self.sample_rate, n));
        };
        self.validate(freq, pan)?;
        let samples = oscillator.take_samples(n);
        trace!(%wave, freq, frames = n, pan, volume, "generated tone");

        Ok(AudioBuffer::from_mono(self.sample_rate, &samples)
            .pan(pan)
            .volume(volume))
    }

    /// A fresh oscillator at phase 0, or `None` for `Silence`.
    fn oscillator(&self, wave: WaveForm, freq: f64) -> Option<Box<dyn Signal>> {
        let sr = self.sample_rate;
        let oscillator: Box<dyn Signal> = match wave {
            WaveForm::Sine => Box::new(SineOscillator::new(freq, sr)),
            WaveForm::Square => Box::new(SquareOscillator::new(freq, sr)),
            WaveForm::Triangle => Box::new(TriangleOscillator::new(freq, sr)),
            WaveForm::Sawtooth => Box::new(SawtoothOscillator::new(freq, sr)),
            WaveForm::ReverseSawtooth => Box::new(ReverseSawtoothOscillator::new(freq, sr)),
            WaveForm::Silence => return None,
        };
        Some(oscillator)
    }

    fn validate(&self, freq: f64, pan: f64) -> Result<()> {
        let nyquist = f64::from(self.sample_rate) / 2.0;
        if !(freq.is_finite() && freq > 0.0 && freq < nyquist) {
            return Err(SonifyError::InvalidFrequency(freq));
        }
        if !(pan.is_finite() && (-1.0..=1.0).contains(&pan)) {
            return Err(SonifyError::InvalidPan(pan));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);

    #[test]
    fn test_silence_ignores_frequency() {
        let generator = ToneGenerator::new(1000);
        let tone = generator
            .generate(WaveForm::Silence, -5.0, MS_100, 0.0, 3.0)
            .unwrap();
        assert_eq!(tone.len(), 100);
        assert!(tone.is_silent());
    }

    #[test]
    fn test_exact_duration_for_every_periodic_wave() {
        let generator = ToneGenerator::new(44100);
        for wave in WaveForm::ALL.into_iter().filter(WaveForm::is_periodic) {
            let tone = generator.generate(wave, 440.0, MS_100, 0.0, 0.0).unwrap();
            assert_eq!(tone.len(), 4410, "{wave}");
            assert!(!tone.is_silent(), "{wave}");
        }
    }

    #[test]
    fn test_invalid_frequencies() {
        let generator = ToneGenerator::new(44100);
        for freq in [0.0, -10.0, f64::NAN, f64::INFINITY, 22050.0] {
            let err = generator
                .generate(WaveForm::Sine, freq, MS_100, 0.0, 0.0)
                .unwrap_err();
            assert!(matches!(err, SonifyError::InvalidFrequency(_)));
        }
    }

    #[test]
    fn test_invalid_pan() {
        let generator = ToneGenerator::new(44100);
        let err = generator
            .generate(WaveForm::Square, 440.0, MS_100, 1.5, 0.0)
            .unwrap_err();
        assert!(matches!(err, SonifyError::InvalidPan(p) if p == 1.5));
    }

    #[test]
    fn test_pan_and_volume_post_processing() {
        let generator = ToneGenerator::new(1000);
        // Square wave starts high, so the first frame shows the channel gains
        let tone = generator
            .generate(WaveForm::Square, 10.0, MS_100, -1.0, -1.0)
            .unwrap();
        assert_eq!(tone.frames()[0], [0.5, 0.0]);
        let tone = generator
            .generate(WaveForm::Square, 10.0, MS_100, 0.5, 1.0)
            .unwrap();
        assert_eq!(tone.frames()[0], [1.0, 2.0]);
    }

    #[test]
    fn test_generation_is_pure() {
        let generator = ToneGenerator::new(44100);
        let a = generator
            .generate(WaveForm::Triangle, 311.0, MS_100, 0.3, -2.0)
            .unwrap();
        let b = generator
            .generate(WaveForm::Triangle, 311.0, MS_100, 0.3, -2.0)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_waveform_names() {
        for wave in WaveForm::ALL {
            assert_eq!(wave.name().parse::<WaveForm>().unwrap(), wave);
        }
        assert_eq!(
            "Reverse-Sawtooth".parse::<WaveForm>().unwrap(),
            WaveForm::ReverseSawtooth
        );
        assert!(matches!(
            "noise".parse::<WaveForm>(),
            Err(SonifyError::UnsupportedWaveform(_))
        ));
    }
}
