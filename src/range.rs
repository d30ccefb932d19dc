//! Value ranges: what a sample is normalized against before becoming a pitch.
//!
//! A range policy answers three questions about a series for a trailing
//! window of `window` samples: its minimum, its maximum, and the window itself.
//! `DynamicRange` derives the bounds from the data; `FixedRange` uses bounds
//! supplied up front. Both share the same windowing, so every render sees
//! exactly `window` values.

use crate::{Result, SonifyError};

/// Sentinel for a sample with no data yet. Rendered as silence.
pub const MISSING: f64 = f64::NAN;

/// True for the missing-sample sentinel (any NaN).
#[inline]
pub fn is_missing(value: f64) -> bool {
    value.is_nan()
}

/// The last `window` samples, or the whole series if it is shorter.
pub fn trailing(values: &[f64], window: usize) -> &[f64] {
    &values[values.len().saturating_sub(window)..]
}

/// Exactly `window` values: the trailing samples, left-padded with [`MISSING`]
/// when the series is shorter than the window.
///
/// # Examples
///
/// ```
/// use audible_series::range::{is_missing, windowed_values};
///
/// let padded = windowed_values(&[1.0, 2.0], 4);
/// assert!(is_missing(padded[0]) && is_missing(padded[1]));
/// assert_eq!(&padded[2..], &[1.0, 2.0]);
///
/// assert_eq!(windowed_values(&[1.0, 2.0, 3.0], 2), vec![2.0, 3.0]);
/// ```
pub fn windowed_values(values: &[f64], window: usize) -> Vec<f64> {
    let tail = trailing(values, window);
    let mut out = Vec::with_capacity(window);
    out.resize(window - tail.len(), MISSING);
    out.extend_from_slice(tail);
    out
}

/// Common interface of range policies.
pub trait ValueRange {
    /// The whole underlying series.
    fn values(&self) -> &[f64];

    /// Lower bound used to normalize the trailing `window` samples.
    fn minimum(&self, window: usize) -> Result<f64>;

    /// Upper bound used to normalize the trailing `window` samples.
    fn maximum(&self, window: usize) -> Result<f64>;

    /// Exactly `window` samples to render, padded with [`MISSING`] on the left.
    fn windowed_values(&self, window: usize) -> Vec<f64> {
        windowed_values(self.values(), window)
    }

    /// `(minimum, maximum)` in one call.
    fn bounds(&self, window: usize) -> Result<(f64, f64)> {
        Ok((self.minimum(window)?, self.maximum(window)?))
    }

    /// True when the trailing `window` holds at least one present sample.
    fn has_samples(&self, window: usize) -> bool {
        trailing(self.values(), window)
            .iter()
            .any(|v| !is_missing(*v))
    }

    /// True when the bounds are caller-supplied rather than data-derived.
    fn is_fixed(&self) -> bool {
        false
    }
}

/// Bounds taken from the trailing window of the series itself.
///
/// Missing samples are skipped. Asking for bounds of a window without any
/// present sample (empty series, zero window, or only gaps) fails with
/// `EmptyRangeInput`.
///
/// # Examples
///
/// ```
/// use audible_series::range::{DynamicRange, ValueRange};
///
/// let values = [5.0, 1.0, 3.0, 2.0];
/// let range = DynamicRange::new(&values);
/// assert_eq!(range.bounds(2).unwrap(), (2.0, 3.0));
/// assert_eq!(range.bounds(10).unwrap(), (1.0, 5.0));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DynamicRange<'a> {
    values: &'a [f64],
}

impl<'a> DynamicRange<'a> {
    pub fn new(values: &'a [f64]) -> Self {
        Self { values }
    }

    fn present(&self, window: usize) -> impl Iterator<Item = f64> + '_ {
        trailing(self.values, window)
            .iter()
            .copied()
            .filter(|v| !is_missing(*v))
    }
}

impl ValueRange for DynamicRange<'_> {
    fn values(&self) -> &[f64] {
        self.values
    }

    fn minimum(&self, window: usize) -> Result<f64> {
        self.present(window)
            .reduce(f64::min)
            .ok_or(SonifyError::EmptyRangeInput)
    }

    fn maximum(&self, window: usize) -> Result<f64> {
        self.present(window)
            .reduce(f64::max)
            .ok_or(SonifyError::EmptyRangeInput)
    }
}

/// Caller-supplied bounds, independent of the data and of the window.
///
/// Useful for bounded indicators such as an oscillator ranging 0..100.
#[derive(Debug, Clone, Copy)]
pub struct FixedRange<'a> {
    values: &'a [f64],
    min: f64,
    max: f64,
}

impl<'a> FixedRange<'a> {
    /// Fails with `InvalidRange` for non-finite bounds or `min > max`.
    pub fn new(values: &'a [f64], min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(SonifyError::InvalidRange { min, max });
        }
        Ok(Self { values, min, max })
    }
}

impl ValueRange for FixedRange<'_> {
    fn values(&self) -> &[f64] {
        self.values
    }

    fn minimum(&self, _window: usize) -> Result<f64> {
        Ok(self.min)
    }

    fn maximum(&self, _window: usize) -> Result<f64> {
        Ok(self.max)
    }

    fn is_fixed(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_always_yields_window_len() {
        for len in 0..8 {
            let values: Vec<f64> = (0..len).map(f64::from).collect();
            for window in 0..8 {
                let out = windowed_values(&values, window as usize);
                assert_eq!(out.len(), window as usize);
                let pad = (window - len).max(0) as usize;
                assert!(out[..pad].iter().all(|v| is_missing(*v)));
                assert!(out[pad..].iter().all(|v| !is_missing(*v)));
            }
        }
    }

    #[test]
    fn test_truncation_keeps_last_samples() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(windowed_values(&values, 3), vec![3.0, 4.0, 5.0]);
        assert_eq!(windowed_values(&values, 5), values.to_vec());
    }

    #[test]
    fn test_dynamic_uses_trailing_window() {
        let values = [100.0, -100.0, 4.0, 7.0, 10.0];
        let range = DynamicRange::new(&values);
        assert_eq!(range.minimum(3).unwrap(), 4.0);
        assert_eq!(range.maximum(3).unwrap(), 10.0);
        assert_eq!(range.minimum(5).unwrap(), -100.0);
        assert_eq!(range.maximum(50).unwrap(), 100.0);
    }

    #[test]
    fn test_dynamic_skips_missing() {
        let values = [MISSING, 2.0, MISSING, 8.0];
        let range = DynamicRange::new(&values);
        assert_eq!(range.bounds(4).unwrap(), (2.0, 8.0));
    }

    #[test]
    fn test_dynamic_empty_inputs_fail() {
        let empty: [f64; 0] = [];
        assert!(matches!(
            DynamicRange::new(&empty).minimum(3),
            Err(SonifyError::EmptyRangeInput)
        ));
        let values = [1.0, 2.0];
        assert!(matches!(
            DynamicRange::new(&values).maximum(0),
            Err(SonifyError::EmptyRangeInput)
        ));
        let gaps = [1.0, MISSING, MISSING];
        assert!(matches!(
            DynamicRange::new(&gaps).minimum(2),
            Err(SonifyError::EmptyRangeInput)
        ));
    }

    #[test]
    fn test_fixed_ignores_data_and_window() {
        let values = [500.0, -3.0];
        let range = FixedRange::new(&values, 0.0, 100.0).unwrap();
        assert_eq!(range.bounds(1).unwrap(), (0.0, 100.0));
        assert_eq!(range.bounds(0).unwrap(), (0.0, 100.0));
        assert_eq!(range.windowed_values(3)[1..], [500.0, -3.0]);
    }

    #[test]
    fn test_has_samples() {
        let values = [1.0, MISSING, MISSING];
        let range = DynamicRange::new(&values);
        assert!(!range.has_samples(2));
        assert!(range.has_samples(3));
        assert!(!range.has_samples(0));
        assert!(!range.is_fixed());
        assert!(FixedRange::new(&values, 0.0, 1.0).unwrap().is_fixed());
    }

    #[test]
    fn test_fixed_rejects_bad_bounds() {
        let values = [1.0];
        assert!(FixedRange::new(&values, 10.0, 0.0).is_err());
        assert!(FixedRange::new(&values, f64::NAN, 1.0).is_err());
        assert!(FixedRange::new(&values, 3.0, 3.0).is_ok());
    }
}
