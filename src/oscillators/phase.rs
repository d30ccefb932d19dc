//! Phase accumulator shared by the oscillators.

/// Normalized phase in [0.0, 1.0) advancing by `frequency / sample_rate` per sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Phase {
    value: f64,
    increment: f64,
}

impl Phase {
    pub(crate) fn new(frequency: f64, sample_rate: u32) -> Self {
        Self {
            value: 0.0,
            increment: frequency / f64::from(sample_rate),
        }
    }

    /// Returns the current phase, then advances and wraps it.
    #[inline]
    pub(crate) fn advance(&mut self) -> f64 {
        let current = self.value;
        self.value += self.increment;
        if self.value >= 1.0 {
            self.value -= self.value.floor();
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_into_unit_interval() {
        let mut phase = Phase::new(1000.0, 44100);
        for _ in 0..100_000 {
            assert!((0.0..1.0).contains(&phase.advance()));
        }
    }

    #[test]
    fn test_starts_at_zero() {
        let mut phase = Phase::new(440.0, 44100);
        assert_eq!(phase.advance(), 0.0);
        assert!(phase.advance() > 0.0);
    }

    #[test]
    fn test_wraps_exactly_once_per_cycle() {
        // Quarter-cycle steps land back on 0 after four samples
        let mut phase = Phase::new(250.0, 1000);
        let steps: Vec<f64> = (0..5).map(|_| phase.advance()).collect();
        assert_eq!(steps, vec![0.0, 0.25, 0.5, 0.75, 0.0]);
    }
}
