//! 16-bit stereo WAV output for rendered buffers.

use crate::{AudioBuffer, Result, SonifyError};
use std::io::{Seek, Write};
use std::path::Path;
use tracing::info;

fn wav_spec(buffer: &AudioBuffer) -> hound::WavSpec {
    hound::WavSpec {
        channels: 2,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

fn wav_error(e: hound::Error) -> SonifyError {
    match e {
        hound::Error::IoError(io) => SonifyError::Io(io),
        other => SonifyError::Wav(other.to_string()),
    }
}

/// Encodes `buffer` into any seekable writer.
pub fn encode_wav<W: Write + Seek>(writer: W, buffer: &AudioBuffer) -> Result<()> {
    let mut wav = hound::WavWriter::new(writer, wav_spec(buffer)).map_err(wav_error)?;
    for sample in buffer.to_i16_interleaved() {
        wav.write_sample(sample).map_err(wav_error)?;
    }
    wav.finalize().map_err(wav_error)
}

/// Writes `buffer` to a WAV file at `path`, replacing any existing file.
pub fn write_wav(path: impl AsRef<Path>, buffer: &AudioBuffer) -> Result<()> {
    let path = path.as_ref();
    let mut wav = hound::WavWriter::create(path, wav_spec(buffer)).map_err(wav_error)?;
    for sample in buffer.to_i16_interleaved() {
        wav.write_sample(sample).map_err(wav_error)?;
    }
    wav.finalize().map_err(wav_error)?;
    info!(path = %path.display(), frames = buffer.len(), "wrote wav file");
    Ok(())
}
