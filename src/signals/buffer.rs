//! Finite stereo audio buffers.

use std::time::Duration;

/// One stereo frame: `[left, right]`.
pub type Frame = [f64; 2];

/// Number of frames covering `duration` at `sample_rate`, rounded down.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use audible_series::frames_for;
///
/// assert_eq!(frames_for(44100, Duration::from_millis(100)), 4410);
/// assert_eq!(frames_for(1000, Duration::from_micros(1500)), 1);
/// ```
pub fn frames_for(sample_rate: u32, duration: Duration) -> usize {
    (u128::from(sample_rate) * duration.as_nanos() / 1_000_000_000) as usize
}

/// A finite sequence of stereo frames at a fixed sample rate.
///
/// This is what every render produces and what playback or file encoding
/// consumes. Samples are nominally in [-1.0, 1.0] but mixing may exceed that
/// range; conversion to PCM clamps.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    frames: Vec<Frame>,
}

impl AudioBuffer {
    /// Creates an empty buffer.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            frames: Vec::new(),
        }
    }

    /// Creates a buffer from existing frames.
    pub fn from_frames(sample_rate: u32, frames: Vec<Frame>) -> Self {
        Self {
            sample_rate,
            frames,
        }
    }

    /// Creates a buffer with the same mono sample on both channels.
    pub fn from_mono(sample_rate: u32, samples: &[f64]) -> Self {
        Self {
            sample_rate,
            frames: samples.iter().map(|&s| [s, s]).collect(),
        }
    }

    /// Creates `len` frames of silence.
    pub fn silence(sample_rate: u32, len: usize) -> Self {
        Self {
            sample_rate,
            frames: vec![[0.0, 0.0]; len],
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut [Frame] {
        &mut self.frames
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    /// Number of stereo frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Playback length of the buffer.
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames.len() as f64 / f64::from(self.sample_rate))
    }

    /// Largest absolute sample value over both channels.
    pub fn peak(&self) -> f64 {
        self.frames
            .iter()
            .flat_map(|f| f.iter())
            .fold(0.0_f64, |acc, s| acc.max(s.abs()))
    }

    /// True when every sample is exactly zero.
    pub fn is_silent(&self) -> bool {
        self.frames.iter().all(|f| f[0] == 0.0 && f[1] == 0.0)
    }

    /// Appends another buffer's frames after this one's.
    pub fn extend_from(&mut self, other: &AudioBuffer) {
        self.frames.extend_from_slice(&other.frames);
    }

    /// Interleaved 16-bit PCM (`L R L R ...`), clamping out-of-range samples.
    pub fn to_i16_interleaved(&self) -> Vec<i16> {
        self.frames
            .iter()
            .flat_map(|f| f.iter())
            .map(|&s| (s.clamp(-1.0, 1.0) * f64::from(i16::MAX)) as i16)
            .collect()
    }
}
