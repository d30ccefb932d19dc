//! Error type shared by every rendering operation.

use std::fmt;

/// Errors produced while generating tones or rendering series.
///
/// Missing samples are never reported here: they are rendered as silence.
#[derive(Debug)]
pub enum SonifyError {
    /// A waveform code or name that does not map to any `WaveForm`
    UnsupportedWaveform(String),
    /// A non-positive, non-finite or above-Nyquist frequency for a periodic waveform
    InvalidFrequency(f64),
    /// A pan position outside [-1, 1]
    InvalidPan(f64),
    /// A dynamic range was asked for bounds of a window with no usable samples
    EmptyRangeInput,
    /// Fixed range bounds that are not finite or are reversed
    InvalidRange { min: f64, max: f64 },
    /// A window (or indicator size) of zero values
    InvalidWindow,
    /// A graph with neither primary nor side series
    EmptyGraph,
    /// Configuration that failed to parse or validate
    Config(String),
    /// Underlying I/O failure
    Io(std::io::Error),
    /// WAV encoder failure
    Wav(String),
}

impl fmt::Display for SonifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SonifyError::UnsupportedWaveform(s) => write!(f, "unsupported waveform: '{}'", s),
            SonifyError::InvalidFrequency(freq) => write!(f, "invalid frequency: {} Hz", freq),
            SonifyError::InvalidPan(pan) => write!(f, "pan {} is outside [-1, 1]", pan),
            SonifyError::EmptyRangeInput => {
                write!(f, "value range requested over a window with no samples")
            }
            SonifyError::InvalidRange { min, max } => {
                write!(f, "invalid value range: min {} max {}", min, max)
            }
            SonifyError::InvalidWindow => write!(f, "window size must be greater than zero"),
            SonifyError::EmptyGraph => write!(f, "graph has no series to render"),
            SonifyError::Config(s) => write!(f, "invalid configuration: {}", s),
            SonifyError::Io(e) => write!(f, "i/o error: {}", e),
            SonifyError::Wav(s) => write!(f, "wav encoding failed: {}", s),
        }
    }
}

impl std::error::Error for SonifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SonifyError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SonifyError {
    fn from(e: std::io::Error) -> Self {
        SonifyError::Io(e)
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SonifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            SonifyError::InvalidFrequency(-3.0).to_string(),
            "invalid frequency: -3 Hz"
        );
        assert_eq!(
            SonifyError::UnsupportedWaveform("9".into()).to_string(),
            "unsupported waveform: '9'"
        );
    }

    #[test]
    fn test_io_source() {
        use std::error::Error;
        let err: SonifyError = std::io::Error::other("disk gone").into();
        assert!(err.source().is_some());
        assert!(SonifyError::EmptyGraph.source().is_none());
    }
}
