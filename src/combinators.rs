//! Combinators for shaping and composing rendered audio.
//!
//! Two kinds of building blocks live here:
//! - post-processing stages applied to a finished buffer (`Pan`, `Volume`)
//! - stream combinators joining buffers in time (`seq`) or on top of each
//!   other (`mix`)

use crate::AudioBuffer;

/// A processing stage applied in place to every frame of a buffer.
pub trait Effect {
    /// Processes a single stereo frame.
    fn process_frame(&self, frame: &mut [f64; 2]);

    /// Processes a whole buffer.
    fn apply(&self, buffer: &mut AudioBuffer) {
        for frame in buffer.frames_mut() {
            self.process_frame(frame);
        }
    }
}

/// Linear stereo balance.
///
/// `-1.0` keeps only the left channel, `1.0` only the right, `0.0` leaves both
/// untouched. The opposite channel is attenuated linearly; the near channel is
/// never boosted.
///
/// # Examples
///
/// ```
/// use audible_series::combinators::{Effect, Pan};
///
/// let mut frame = [1.0, 1.0];
/// Pan::new(0.5).process_frame(&mut frame);
/// assert_eq!(frame, [0.5, 1.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pan {
    pub pan: f64,
}

impl Pan {
    pub fn new(pan: f64) -> Self {
        Self { pan }
    }

    /// Channel gains `(left, right)` for this pan position.
    pub fn gains(&self) -> (f64, f64) {
        ((1.0 - self.pan).min(1.0), (1.0 + self.pan).min(1.0))
    }
}

impl Effect for Pan {
    fn process_frame(&self, frame: &mut [f64; 2]) {
        let (left, right) = self.gains();
        frame[0] *= left;
        frame[1] *= right;
    }
}

/// Logarithmic volume: samples are multiplied by `base^volume`.
///
/// With base 2, a volume of `0` is unity, `-1` halves the amplitude and `1`
/// doubles it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    pub base: f64,
    pub volume: f64,
}

impl Volume {
    /// Base-2 volume, the unit used for every series and tone.
    pub fn new(volume: f64) -> Self {
        Self { base: 2.0, volume }
    }

    /// Linear multiplier applied to samples.
    pub fn multiplier(&self) -> f64 {
        self.base.powf(self.volume)
    }
}

impl Effect for Volume {
    fn process_frame(&self, frame: &mut [f64; 2]) {
        let gain = self.multiplier();
        frame[0] *= gain;
        frame[1] *= gain;
    }

    fn apply(&self, buffer: &mut AudioBuffer) {
        let gain = self.multiplier();
        if gain == 1.0 {
            return;
        }
        for frame in buffer.frames_mut() {
            frame[0] *= gain;
            frame[1] *= gain;
        }
    }
}

/// Fluent helpers for applying effects to owned buffers.
///
/// # Examples
///
/// ```
/// use audible_series::AudioBuffer;
/// use audible_series::combinators::BufferExt;
///
/// let buffer = AudioBuffer::from_mono(8, &[1.0]).pan(-1.0).volume(-1.0);
/// assert_eq!(buffer.frames(), &[[0.5, 0.0]]);
/// ```
pub trait BufferExt: Sized {
    /// Applies an arbitrary effect.
    fn effect(self, effect: impl Effect) -> Self;

    /// Applies a linear stereo balance.
    fn pan(self, pan: f64) -> Self {
        self.effect(Pan::new(pan))
    }

    /// Applies a base-2 logarithmic volume.
    fn volume(self, volume: f64) -> Self {
        self.effect(Volume::new(volume))
    }
}

impl BufferExt for AudioBuffer {
    fn effect(mut self, effect: impl Effect) -> Self {
        effect.apply(&mut self);
        self
    }
}

/// Plays buffers one after another.
///
/// The result is as long as all inputs combined. All inputs are expected to
/// share `sample_rate`.
pub fn seq<'a, I>(sample_rate: u32, buffers: I) -> AudioBuffer
where
    I: IntoIterator<Item = &'a AudioBuffer>,
{
    let mut out = AudioBuffer::new(sample_rate);
    for buffer in buffers {
        debug_assert_eq!(buffer.sample_rate(), sample_rate);
        out.extend_from(buffer);
    }
    out
}

/// Plays buffers simultaneously by summing them sample by sample.
///
/// The result is as long as the longest input; shorter inputs are treated as
/// silent once they run out. No normalization is applied.
pub fn mix<'a, I>(sample_rate: u32, buffers: I) -> AudioBuffer
where
    I: IntoIterator<Item = &'a AudioBuffer>,
{
    let mut frames: Vec<[f64; 2]> = Vec::new();
    for buffer in buffers {
        debug_assert_eq!(buffer.sample_rate(), sample_rate);
        if buffer.len() > frames.len() {
            frames.resize(buffer.len(), [0.0, 0.0]);
        }
        for (acc, frame) in frames.iter_mut().zip(buffer.frames()) {
            acc[0] += frame[0];
            acc[1] += frame[1];
        }
    }
    AudioBuffer::from_frames(sample_rate, frames)
}
