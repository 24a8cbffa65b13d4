//! Vertical rescaling of sampled waveforms into the plot range.

use ndarray::Array1;

/// Affine map from a sample vector's `[min, max]` onto a plot range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalRescaler {
    y_min: f64,
    y_max: f64,
    plot_range: (f64, f64),
}

impl Default for VerticalRescaler {
    fn default() -> Self {
        Self {
            y_min: -1.0,
            y_max: 1.0,
            plot_range: (-1.0, 1.0),
        }
    }
}

impl VerticalRescaler {
    /// Measure `samples` against `plot_range`.
    pub fn new(samples: &Array1<f64>, plot_range: (f64, f64)) -> Self {
        let (y_min, y_max) = samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
                (min.min(v), max.max(v))
            });
        Self {
            y_min,
            y_max,
            plot_range,
        }
    }

    /// Whether the samples already fit inside the plot range.
    pub fn in_bounds(&self) -> bool {
        let (lo, hi) = self.plot_range;
        (lo..=hi).contains(&self.y_min) && (lo..=hi).contains(&self.y_max)
    }

    /// Map samples onto the plot range.
    ///
    /// A constant signal has no extent to stretch and lands on the middle
    /// of the range.
    pub fn apply(&self, samples: &Array1<f64>) -> Array1<f64> {
        let (lo, hi) = self.plot_range;
        let extent = self.y_max - self.y_min;
        if extent <= 0.0 || !extent.is_finite() {
            return Array1::from_elem(samples.len(), 0.5 * (lo + hi));
        }
        samples.mapv(|y| (hi - lo) * ((y - self.y_min) / extent) + lo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_signals_are_left_alone() {
        let samples = Array1::from(vec![-1.0, 0.0, 0.5, 1.0]);
        assert!(VerticalRescaler::new(&samples, (-1.0, 1.0)).in_bounds());
    }

    #[test]
    fn stretches_onto_range() {
        let samples = Array1::from(vec![0.0, 2.0, 4.0]);
        let rescaler = VerticalRescaler::new(&samples, (-1.0, 1.0));
        assert!(!rescaler.in_bounds());
        assert_eq!(rescaler.apply(&samples), Array1::from(vec![-1.0, 0.0, 1.0]));
    }

    #[test]
    fn constant_signal_goes_to_centre() {
        let samples = Array1::from(vec![5.0, 5.0]);
        let rescaler = VerticalRescaler::new(&samples, (-1.0, 3.0));
        assert_eq!(rescaler.apply(&samples), Array1::from(vec![1.0, 1.0]));
    }
}
