//! Sonifies a random walk "price" with Bollinger-style bands and an
//! RSI-style oscillator on a fixed 0..100 range, then plays the result.
//!
//! Run with `cargo run --example sonify_random_walk`; add `--features wav`
//! to also write `random_walk.wav`.

use anyhow::Result;
use audible_series::{AudioBuffer, Frame, SoundGraph, SoundSeries, ToneGenerator, WaveForm};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, StreamConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;

const POINTS: usize = 200;
const WINDOW: usize = 40;
const BAND_PERIOD: usize = 20;
const RSI_PERIOD: usize = 14;

fn random_walk(rng: &mut StdRng) -> Vec<f64> {
    let mut price = 100.0;
    (0..POINTS)
        .map(|_| {
            price += rng.gen_range(-1.0..1.0);
            price
        })
        .collect()
}

/// Moving average +/- two standard deviations; NaN until a full period exists.
fn bands(close: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut upper = vec![f64::NAN; close.len()];
    let mut lower = vec![f64::NAN; close.len()];
    for end in BAND_PERIOD..=close.len() {
        let period = &close[end - BAND_PERIOD..end];
        let mean = period.iter().sum::<f64>() / BAND_PERIOD as f64;
        let var = period.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / BAND_PERIOD as f64;
        upper[end - 1] = mean + 2.0 * var.sqrt();
        lower[end - 1] = mean - 2.0 * var.sqrt();
    }
    (upper, lower)
}

fn rsi(close: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; close.len()];
    for end in RSI_PERIOD + 1..=close.len() {
        let (mut gain, mut loss) = (0.0, 0.0);
        for pair in close[end - RSI_PERIOD - 1..end].windows(2) {
            let change = pair[1] - pair[0];
            if change > 0.0 {
                gain += change;
            } else {
                loss -= change;
            }
        }
        out[end - 1] = if loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + gain / loss)
        };
    }
    out
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow::anyhow!("No output device available"))?;
    let config = device.default_output_config()?;

    let mut rng = StdRng::seed_from_u64(7);
    let close = random_walk(&mut rng);
    let (upper, lower) = bands(&close);
    let rsi = rsi(&close);

    let graph = SoundGraph::new(200.0, 600.0)
        .with_series(SoundSeries::dynamic(&close, WaveForm::Sine, 0.0, -1.0))
        .with_series(SoundSeries::dynamic(&upper, WaveForm::Triangle, 0.6, -2.0))
        .with_series(SoundSeries::dynamic(&lower, WaveForm::Triangle, -0.6, -2.0))
        .with_side_series(SoundSeries::fixed(&rsi, 0.0, 100.0, WaveForm::Square, 0.0, -4.0)?);

    let generator = ToneGenerator::new(config.sample_rate().0);
    let audio = graph.render(WINDOW, Duration::from_millis(120), &generator)?;
    info!(frames = audio.len(), seconds = audio.duration().as_secs_f64(), "rendered");

    #[cfg(feature = "wav")]
    audible_series::wav::write_wav("random_walk.wav", &audio)?;

    let length = audio.duration();
    let player = Arc::new(Mutex::new(Player::new(audio)));
    let _stream = match config.sample_format() {
        SampleFormat::F32 => create_audio_stream::<f32>(&device, &config.into(), player)?,
        SampleFormat::I16 => create_audio_stream::<i16>(&device, &config.into(), player)?,
        SampleFormat::U16 => create_audio_stream::<u16>(&device, &config.into(), player)?,
        sample_format => {
            return Err(anyhow::anyhow!(
                "Unsupported sample format: {}",
                sample_format
            ));
        }
    };

    std::thread::sleep(length + Duration::from_millis(250));
    Ok(())
}

/// Plays a rendered buffer once, then silence.
struct Player {
    frames: Vec<Frame>,
    position: usize,
}

impl Player {
    fn new(audio: AudioBuffer) -> Self {
        Self {
            frames: audio.into_frames(),
            position: 0,
        }
    }

    fn next_frame(&mut self) -> Frame {
        let frame = self.frames.get(self.position).copied().unwrap_or([0.0, 0.0]);
        self.position += 1;
        frame
    }
}

fn create_audio_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    player: Arc<Mutex<Player>>,
) -> Result<cpal::Stream>
where
    T: Sample + FromSample<f64> + cpal::SizedSample,
{
    let channels = config.channels as usize;

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let mut player = player.lock().unwrap();
            for out in data.chunks_mut(channels) {
                let [left, right] = player.next_frame();
                match out {
                    [mono] => *mono = T::from_sample((left + right) / 2.0),
                    [l, r, rest @ ..] => {
                        *l = T::from_sample(left);
                        *r = T::from_sample(right);
                        for s in rest {
                            *s = T::EQUILIBRIUM;
                        }
                    }
                    [] => {}
                }
            }
        },
        |err| eprintln!("Audio stream error: {}", err),
        None,
    )?;

    stream.play()?;
    Ok(stream)
}
