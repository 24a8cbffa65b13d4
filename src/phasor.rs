//! Rotating phasors.
//!
//! Each Fourier amplitude becomes a vector spinning at its frequency. The
//! vectors are placed head to tail; the tip of the last one traces the
//! partial sum. Plots put the imaginary part on the horizontal axis and the
//! real part on the vertical axis.

use std::f64::consts::PI;

use rustfft::num_complex::Complex64;

/// Points used to draw one circle.
pub const POINTS_PER_CIRCLE: usize = 50;

/// Radius under which circles are drawn as a point, for a plot range of
/// half height 1.
pub const DEFAULT_EPSILON: f64 = 1e-3;

/// One rotating vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phasor {
    /// Tail, which is the previous phasor's tip.
    pub centre: Complex64,
    /// Head.
    pub tip: Complex64,
    /// Length.
    pub radius: f64,
    /// Rotation rate in cycles per frame.
    pub frequency: f64,
}

impl Phasor {
    /// Polyline of the circle this phasor sweeps, closed at both ends.
    ///
    /// Circles below `epsilon` collapse onto the tip.
    pub fn outline(&self, points: usize, epsilon: f64) -> Vec<(f64, f64)> {
        if self.radius < epsilon || points == 0 {
            return vec![(self.tip.im, self.tip.re); points.max(1)];
        }
        let arm = self.tip - self.centre;
        (0..=points)
            .map(|m| {
                let turn = Complex64::from_polar(1.0, 2.0 * PI * m as f64 / points as f64);
                let p = self.centre + arm * turn;
                (p.im, p.re)
            })
            .collect()
    }

    /// The arm as a segment from centre to tip in plot coordinates.
    pub fn arm(&self) -> ((f64, f64), (f64, f64)) {
        ((self.centre.im, self.centre.re), (self.tip.im, self.tip.re))
    }
}

/// Head-to-tail chain of phasors.
#[derive(Debug, Clone)]
pub struct PhasorChain {
    circles: usize,
    available: usize,
    epsilon: f64,
    phasors: Vec<Phasor>,
}

impl PhasorChain {
    /// Create a chain drawing up to `circles` phasors.
    pub fn new(circles: usize) -> Self {
        Self {
            circles: circles.max(1),
            available: 0,
            epsilon: DEFAULT_EPSILON,
            phasors: Vec::new(),
        }
    }

    /// Number of phasors drawn, at most the number available.
    pub fn circles(&self) -> usize {
        if self.available == 0 {
            self.circles
        } else {
            self.circles.min(self.available)
        }
    }

    /// Request a number of phasors. Values of zero are ignored.
    pub fn set_circles(&mut self, circles: usize) {
        if circles > 0 {
            self.circles = circles;
        }
    }

    /// Radius under which circles are not drawn.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Set the radius under which circles are not drawn.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon.max(0.0);
    }

    /// Place every active phasor for frame `counts`.
    ///
    /// Phasor `j` is `amplitudes[j] * exp(-2πi * frequencies[j] * counts)`.
    pub fn update(&mut self, amplitudes: &[Complex64], frequencies: &[f64], counts: i64) -> &[Phasor] {
        self.available = amplitudes.len().min(frequencies.len());
        let active = self.circles();
        self.phasors.clear();

        let mut centre = Complex64::new(0.0, 0.0);
        for (a, &f) in amplitudes.iter().zip(frequencies).take(active) {
            let value = a * Complex64::from_polar(1.0, -2.0 * PI * f * counts as f64);
            let tip = centre + value;
            self.phasors.push(Phasor {
                centre,
                tip,
                radius: value.norm(),
                frequency: f,
            });
            centre = tip;
        }
        &self.phasors
    }

    /// Phasors of the last update.
    pub fn phasors(&self) -> &[Phasor] {
        &self.phasors
    }

    /// Tip of the last phasor.
    pub fn end_point(&self) -> Complex64 {
        self.phasors
            .last()
            .map(|p| p.tip)
            .unwrap_or_else(|| Complex64::new(0.0, 0.0))
    }

    /// Polyline of every visible circle.
    pub fn outlines(&self, points: usize) -> Vec<Vec<(f64, f64)>> {
        self.phasors
            .iter()
            .skip(1)
            .filter(|p| p.radius >= self.epsilon)
            .map(|p| p.outline(points, self.epsilon))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fourier::{FourierData, SamplingGrid, SpectrumMode};
    use crate::function::Waveform;

    fn fourier(text: &str, mode: SpectrumMode) -> FourierData {
        let w = Waveform::parse(text, "t").unwrap();
        FourierData::compute(&w, &w.default_params(), SamplingGrid::default(), mode, (-1.0, 1.0))
            .unwrap()
    }

    #[test]
    fn tip_follows_samples_with_all_circles() {
        for mode in [SpectrumMode::Real, SpectrumMode::Complex] {
            let data = fourier("abs(t)/2 - sin(2*t)/3", mode);
            let n = data.samples().len() as i64;
            let mut chain = PhasorChain::new(data.len());
            for counts in [-2_i64, 0, 5, 37, 300] {
                chain.update(data.amplitudes(), data.frequencies(), counts);
                let index = (-counts).rem_euclid(n) as usize;
                let tip = chain.end_point();
                assert!(
                    (tip.re - data.samples()[index]).abs() < 1e-9,
                    "{} mode, frame {}: {} vs {}",
                    mode,
                    counts,
                    tip.re,
                    data.samples()[index]
                );
            }
        }
    }

    #[test]
    fn phasors_are_chained_head_to_tail() {
        let data = fourier("sin(t)/2 + cos(3*t)/4", SpectrumMode::Real);
        let mut chain = PhasorChain::new(5);
        let phasors = chain.update(data.amplitudes(), data.frequencies(), 11);
        assert_eq!(phasors.len(), 5);
        assert_eq!(phasors[0].centre, Complex64::new(0.0, 0.0));
        for pair in phasors.windows(2) {
            assert_eq!(pair[0].tip, pair[1].centre);
        }
    }

    #[test]
    fn circle_count_is_capped_by_available_phasors() {
        let data = fourier("sin(t)", SpectrumMode::Real);
        let mut chain = PhasorChain::new(1000);
        chain.update(data.amplitudes(), data.frequencies(), 0);
        assert_eq!(chain.circles(), data.len());
        chain.set_circles(0);
        assert_eq!(chain.circles(), data.len());
        chain.set_circles(3);
        assert_eq!(chain.circles(), 3);
    }

    #[test]
    fn dc_phasor_does_not_rotate() {
        let data = fourier("0.5 + sin(t)/4", SpectrumMode::Real);
        let mut chain = PhasorChain::new(1);
        chain.update(data.amplitudes(), data.frequencies(), 0);
        let first = chain.end_point();
        chain.update(data.amplitudes(), data.frequencies(), 17);
        assert!((chain.end_point() - first).norm() < 1e-12);
    }

    #[test]
    fn epsilon_hides_small_circles() {
        let data = fourier("sin(t)/2 + cos(2*t)/100", SpectrumMode::Real);
        let mut chain = PhasorChain::new(3);
        chain.update(data.amplitudes(), data.frequencies(), 4);
        assert_eq!(chain.outlines(8).len(), 2);
        chain.set_epsilon(0.05);
        assert_eq!(chain.outlines(8).len(), 1);
        chain.set_epsilon(-1.0);
        assert_eq!(chain.epsilon(), 0.0);
    }

    #[test]
    fn outline_is_a_circle_around_centre() {
        let phasor = Phasor {
            centre: Complex64::new(1.0, 1.0),
            tip: Complex64::new(1.0, 1.5),
            radius: 0.5,
            frequency: 0.01,
        };
        let outline = phasor.outline(POINTS_PER_CIRCLE, DEFAULT_EPSILON);
        assert_eq!(outline.len(), POINTS_PER_CIRCLE + 1);
        for (x, y) in outline {
            let r = ((x - 1.0).powi(2) + (y - 1.0).powi(2)).sqrt();
            assert!((r - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn tiny_circles_collapse_to_tip() {
        let phasor = Phasor {
            centre: Complex64::new(0.0, 0.0),
            tip: Complex64::new(1e-5, 0.0),
            radius: 1e-5,
            frequency: 0.1,
        };
        let outline = phasor.outline(8, DEFAULT_EPSILON);
        assert!(outline.iter().all(|&p| p == (0.0, 1e-5)));
    }
}
