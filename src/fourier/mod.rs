//! Fourier coefficients of a sampled waveform.
//!
//! A waveform is sampled on one period, squeezed into the plot range when it
//! does not fit, and transformed with an FFT. The resulting amplitudes are
//! ordered so that truncating the list to its first `k` entries gives the
//! `k`-term partial sum drawn by the phasor chain.

mod rescale;

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use ndarray::Array1;
use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

use crate::error::{EpicycleError, Result};
use crate::function::Waveform;

pub use rescale::VerticalRescaler;

/// Where and how densely a waveform is sampled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingGrid {
    /// First sample position.
    pub start: f64,
    /// Length of one period.
    pub period: f64,
    /// Number of samples per period.
    pub points: usize,
}

impl Default for SamplingGrid {
    fn default() -> Self {
        Self {
            start: -PI,
            period: 2.0 * PI,
            points: 256,
        }
    }
}

impl SamplingGrid {
    /// Create a validated grid.
    pub fn new(start: f64, period: f64, points: usize) -> Result<Self> {
        let grid = Self {
            start,
            period,
            points,
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Check the grid can be sampled.
    pub fn validate(&self) -> Result<()> {
        if self.points < 2 {
            return Err(EpicycleError::invalid_setting(format!(
                "need at least 2 sample points, got {}",
                self.points
            )));
        }
        if !(self.period.is_finite() && self.period > 0.0) {
            return Err(EpicycleError::invalid_setting(format!(
                "period must be positive, got {}",
                self.period
            )));
        }
        if !self.start.is_finite() {
            return Err(EpicycleError::invalid_setting("start must be finite"));
        }
        Ok(())
    }

    /// Sample positions; the end of the period is excluded so the samples
    /// wrap around cleanly.
    pub fn times(&self) -> Array1<f64> {
        let step = self.period / self.points as f64;
        Array1::from_iter((0..self.points).map(|k| self.start + k as f64 * step))
    }
}

/// Which frequencies the phasor chain uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpectrumMode {
    /// Non-negative frequencies of a real FFT; the waveform is the real
    /// part of the phasor sum.
    #[default]
    Real,
    /// Positive and negative frequencies of a complex FFT; the phasor sum
    /// itself traces the waveform.
    Complex,
}

impl SpectrumMode {
    /// Get the other mode.
    pub fn next(self) -> Self {
        match self {
            SpectrumMode::Real => SpectrumMode::Complex,
            SpectrumMode::Complex => SpectrumMode::Real,
        }
    }

    /// Get display name.
    pub fn name(self) -> &'static str {
        match self {
            SpectrumMode::Real => "real",
            SpectrumMode::Complex => "complex",
        }
    }
}

impl FromStr for SpectrumMode {
    type Err = EpicycleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "real" => Ok(SpectrumMode::Real),
            "complex" => Ok(SpectrumMode::Complex),
            other => Err(EpicycleError::invalid_setting(format!(
                "unknown spectrum mode '{}' (expected real or complex)",
                other
            ))),
        }
    }
}

impl fmt::Display for SpectrumMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the coefficient table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficient {
    /// Cycles per period (negative in complex mode).
    pub harmonic: i64,
    /// Cycles per sample.
    pub frequency: f64,
    /// Phasor length.
    pub amplitude: f64,
    /// Phasor angle at frame zero, in radians.
    pub phase: f64,
}

/// Sampled waveform and its Fourier amplitudes.
#[derive(Clone)]
pub struct FourierData {
    grid: SamplingGrid,
    mode: SpectrumMode,
    plot_range: (f64, f64),
    samples: Array1<f64>,
    rescaled: bool,
    /// Full FFT of `samples`, unnormalised.
    spectrum: Vec<Complex64>,
    /// FFT bin of each phasor, in chain order.
    bins: Vec<usize>,
    amplitudes: Vec<Complex64>,
    frequencies: Vec<f64>,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl fmt::Debug for FourierData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FourierData")
            .field("grid", &self.grid)
            .field("mode", &self.mode)
            .field("plot_range", &self.plot_range)
            .field("rescaled", &self.rescaled)
            .field("phasors", &self.amplitudes.len())
            .field("fft", &"omitted")
            .finish()
    }
}

fn validate_plot_range(plot_range: (f64, f64)) -> Result<()> {
    let (lo, hi) = plot_range;
    if !(lo.is_finite() && hi.is_finite()) || lo >= hi {
        return Err(EpicycleError::invalid_setting(format!(
            "plot range [{}, {}] is empty",
            lo, hi
        )));
    }
    Ok(())
}

/// Phasor order for a spectrum of `n` bins.
///
/// Real mode uses bins `0..=n/2`. Complex mode interleaves signed
/// frequencies by magnitude: 0, +1, -1, +2, -2, ...
fn chain_bins(n: usize, mode: SpectrumMode) -> Vec<usize> {
    match mode {
        SpectrumMode::Real => (0..=n / 2).collect(),
        SpectrumMode::Complex => {
            let mut bins = Vec::with_capacity(n);
            bins.push(0);
            for k in 1..=n / 2 {
                bins.push(k);
                if n - k != k {
                    bins.push(n - k);
                }
            }
            bins
        },
    }
}

/// Signed harmonic number of FFT bin `k` out of `n`.
fn signed_harmonic(k: usize, n: usize, mode: SpectrumMode) -> i64 {
    match mode {
        SpectrumMode::Complex if k > n / 2 => k as i64 - n as i64,
        _ => k as i64,
    }
}

impl FourierData {
    /// Sample `waveform` and compute its amplitudes.
    pub fn compute(
        waveform: &Waveform,
        params: &[f64],
        grid: SamplingGrid,
        mode: SpectrumMode,
        plot_range: (f64, f64),
    ) -> Result<Self> {
        grid.validate()?;
        validate_plot_range(plot_range)?;
        let mut planner = FftPlanner::new();
        let mut data = Self {
            grid,
            mode,
            plot_range,
            samples: Array1::zeros(0),
            rescaled: false,
            spectrum: Vec::new(),
            bins: Vec::new(),
            amplitudes: Vec::new(),
            frequencies: Vec::new(),
            forward: planner.plan_fft_forward(grid.points),
            inverse: planner.plan_fft_inverse(grid.points),
        };
        data.update(waveform, params)?;
        Ok(data)
    }

    /// Resample after a function or parameter change.
    ///
    /// On error nothing is modified.
    pub fn update(&mut self, waveform: &Waveform, params: &[f64]) -> Result<()> {
        let raw = waveform.sample(&self.grid.times(), params)?;
        let rescaler = VerticalRescaler::new(&raw, self.plot_range);
        let rescaled = !rescaler.in_bounds();
        let samples = if rescaled {
            tracing::debug!("Rescaling samples into {:?}", self.plot_range);
            rescaler.apply(&raw)
        } else {
            raw
        };

        let n = self.grid.points;
        let mut spectrum: Vec<Complex64> =
            samples.iter().map(|&x| Complex64::new(x, 0.0)).collect();
        self.forward.process(&mut spectrum);

        let bins = chain_bins(n, self.mode);
        let scale = 1.0 / n as f64;
        let amplitudes = bins
            .iter()
            .map(|&k| match self.mode {
                // Positive and negative bins fold into one phasor, except the
                // DC and Nyquist bins which have no partner.
                SpectrumMode::Real if k == 0 || 2 * k == n => spectrum[k] * scale,
                SpectrumMode::Real => spectrum[k] * 2.0 * scale,
                SpectrumMode::Complex => spectrum[k] * scale,
            })
            .collect();
        let frequencies = bins
            .iter()
            .map(|&k| signed_harmonic(k, n, self.mode) as f64 / n as f64)
            .collect();

        self.samples = samples;
        self.rescaled = rescaled;
        self.spectrum = spectrum;
        self.bins = bins;
        self.amplitudes = amplitudes;
        self.frequencies = frequencies;
        tracing::debug!(
            "Computed {} amplitudes from {} samples ({} mode)",
            self.amplitudes.len(),
            n,
            self.mode
        );
        Ok(())
    }

    /// Change the sampling grid and recompute.
    pub fn set_grid(&mut self, waveform: &Waveform, params: &[f64], grid: SamplingGrid) -> Result<()> {
        grid.validate()?;
        let previous = (self.grid, self.forward.clone(), self.inverse.clone());
        if grid.points != self.grid.points {
            let mut planner = FftPlanner::new();
            self.forward = planner.plan_fft_forward(grid.points);
            self.inverse = planner.plan_fft_inverse(grid.points);
        }
        self.grid = grid;
        if let Err(e) = self.update(waveform, params) {
            (self.grid, self.forward, self.inverse) = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Change the spectrum mode and recompute.
    pub fn set_mode(&mut self, waveform: &Waveform, params: &[f64], mode: SpectrumMode) -> Result<()> {
        let previous = self.mode;
        self.mode = mode;
        if let Err(e) = self.update(waveform, params) {
            self.mode = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Change the plot range used for rescaling and recompute.
    pub fn set_plot_range(
        &mut self,
        waveform: &Waveform,
        params: &[f64],
        plot_range: (f64, f64),
    ) -> Result<()> {
        validate_plot_range(plot_range)?;
        let previous = self.plot_range;
        self.plot_range = plot_range;
        if let Err(e) = self.update(waveform, params) {
            self.plot_range = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Sampling grid.
    pub fn grid(&self) -> SamplingGrid {
        self.grid
    }

    /// Spectrum mode.
    pub fn mode(&self) -> SpectrumMode {
        self.mode
    }

    /// Range the samples are squeezed into.
    pub fn plot_range(&self) -> (f64, f64) {
        self.plot_range
    }

    /// Samples after rescaling.
    pub fn samples(&self) -> &Array1<f64> {
        &self.samples
    }

    /// Whether the samples had to be rescaled into the plot range.
    pub fn rescaled(&self) -> bool {
        self.rescaled
    }

    /// Raw FFT of the samples: bins `0..=n/2` in real mode, all `n` bins
    /// in complex mode.
    pub fn spectrum(&self) -> &[Complex64] {
        match self.mode {
            SpectrumMode::Real => &self.spectrum[..self.grid.points / 2 + 1],
            SpectrumMode::Complex => &self.spectrum,
        }
    }

    /// Phasor amplitudes in chain order.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Phasor frequencies in cycles per sample, in chain order.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Number of phasors available.
    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    /// Whether there are no phasors.
    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    /// Waveform rebuilt from the first `circles` phasors.
    pub fn partial_sum(&self, circles: usize) -> Array1<f64> {
        let n = self.grid.points;
        let mut buffer = vec![Complex64::new(0.0, 0.0); n];
        for &k in self.bins.iter().take(circles) {
            buffer[k] = self.spectrum[k];
            if self.mode == SpectrumMode::Real && k != 0 {
                buffer[n - k] = self.spectrum[n - k];
            }
        }
        self.inverse.process(&mut buffer);
        let scale = 1.0 / n as f64;
        Array1::from_iter(buffer.iter().map(|c| c.re * scale))
    }

    /// Amplitude, phase and frequency of every phasor.
    pub fn coefficient_table(&self) -> Vec<Coefficient> {
        let n = self.grid.points;
        self.bins
            .iter()
            .zip(self.amplitudes.iter().zip(&self.frequencies))
            .map(|(&k, (a, &frequency))| Coefficient {
                harmonic: signed_harmonic(k, n, self.mode),
                frequency,
                amplitude: a.norm(),
                phase: a.arg(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(text: &str, mode: SpectrumMode) -> FourierData {
        let waveform = Waveform::parse(text, "t").unwrap();
        let params = waveform.default_params();
        FourierData::compute(&waveform, &params, SamplingGrid::default(), mode, (-1.0, 1.0)).unwrap()
    }

    #[test]
    fn grid_excludes_period_end() {
        let grid = SamplingGrid::new(0.0, 1.0, 4).unwrap();
        assert_eq!(grid.times(), Array1::from(vec![0.0, 0.25, 0.5, 0.75]));
    }

    #[test]
    fn rejects_bad_grids() {
        assert!(SamplingGrid::new(0.0, 1.0, 1).is_err());
        assert!(SamplingGrid::new(0.0, 0.0, 16).is_err());
        assert!(SamplingGrid::new(0.0, f64::NAN, 16).is_err());
    }

    #[test]
    fn sine_has_a_single_harmonic() {
        let d = data("sin(t)", SpectrumMode::Real);
        assert_eq!(d.len(), 129);
        for (k, a) in d.amplitudes().iter().enumerate() {
            if k == 1 {
                assert!((a.norm() - 1.0).abs() < 1e-9, "|a1| = {}", a.norm());
            } else {
                assert!(a.norm() < 1e-9, "|a{}| = {}", k, a.norm());
            }
        }
        assert!((d.frequencies()[1] - 1.0 / 256.0).abs() < 1e-15);
    }

    #[test]
    fn constant_offset_is_not_doubled() {
        let d = data("0.25 + 0*t", SpectrumMode::Real);
        assert!((d.amplitudes()[0].re - 0.25).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_samples_are_rescaled() {
        let d = data("5*sin(t)", SpectrumMode::Real);
        assert!(d.rescaled());
        let max = d.samples().iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min = d.samples().iter().cloned().fold(f64::INFINITY, f64::min);
        assert!((max - 1.0).abs() < 1e-12 && (min + 1.0).abs() < 1e-12);
        assert!(!data("sin(t)/2", SpectrumMode::Real).rescaled());
    }

    #[test]
    fn full_partial_sum_reproduces_samples() {
        for mode in [SpectrumMode::Real, SpectrumMode::Complex] {
            let d = data("abs(t)/pi + sin(3*t)/4", mode);
            let rebuilt = d.partial_sum(d.len());
            for (a, b) in rebuilt.iter().zip(d.samples()) {
                assert!((a - b).abs() < 1e-9, "{} vs {} in {} mode", a, b, mode);
            }
        }
    }

    #[test]
    fn truncated_partial_sum_drops_high_harmonics() {
        let d = data("sin(t)/2 + sin(5*t)/4", SpectrumMode::Real);
        let low = d.partial_sum(2);
        let expected = SamplingGrid::default().times().mapv(|t| t.sin() / 2.0);
        for (a, b) in low.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn complex_mode_interleaves_signed_frequencies() {
        let d = data("cos(t)", SpectrumMode::Complex);
        assert_eq!(d.len(), 256);
        let table = d.coefficient_table();
        let harmonics: Vec<i64> = table.iter().take(5).map(|c| c.harmonic).collect();
        assert_eq!(harmonics, vec![0, 1, -1, 2, -2]);
        assert!((table[1].amplitude - 0.5).abs() < 1e-9);
        assert!((table[2].amplitude - 0.5).abs() < 1e-9);
    }

    #[test]
    fn grid_change_recomputes() {
        let waveform = Waveform::parse("sin(t)", "t").unwrap();
        let mut d = FourierData::compute(
            &waveform,
            &[],
            SamplingGrid::default(),
            SpectrumMode::Real,
            (-1.0, 1.0),
        )
        .unwrap();
        let grid = SamplingGrid::new(-PI, 2.0 * PI, 64).unwrap();
        d.set_grid(&waveform, &[], grid).unwrap();
        assert_eq!(d.samples().len(), 64);
        assert_eq!(d.len(), 33);
    }

    #[test]
    fn failed_update_keeps_previous_state() {
        let good = Waveform::parse("sin(t)", "t").unwrap();
        let bad = Waveform::parse("1/t", "t").unwrap();
        let mut d =
            FourierData::compute(&good, &[], SamplingGrid::default(), SpectrumMode::Real, (-1.0, 1.0))
                .unwrap();
        assert!(d.update(&bad, &[]).is_err());
        assert!((d.amplitudes()[1].norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn spectrum_length_follows_mode() {
        let real = data("sin(t)", SpectrumMode::Real);
        assert_eq!(real.spectrum().len(), 129);
        // X_1 of sin over 256 samples is -128i
        assert!((real.spectrum()[1].im + 128.0).abs() < 1e-6);
        assert_eq!(data("sin(t)", SpectrumMode::Complex).spectrum().len(), 256);
    }

    #[test]
    fn plot_range_changes_rescaling() {
        let waveform = Waveform::parse("5*sin(t)", "t").unwrap();
        let mut d = FourierData::compute(
            &waveform,
            &[],
            SamplingGrid::default(),
            SpectrumMode::Real,
            (-1.0, 1.0),
        )
        .unwrap();
        assert!(d.rescaled());

        d.set_plot_range(&waveform, &[], (-6.0, 6.0)).unwrap();
        assert!(!d.rescaled());
        assert_eq!(d.plot_range(), (-6.0, 6.0));
        assert!((d.amplitudes()[1].norm() - 5.0).abs() < 1e-9);

        assert!(d.set_plot_range(&waveform, &[], (1.0, 1.0)).is_err());
        assert!(d.set_plot_range(&waveform, &[], (0.0, f64::INFINITY)).is_err());
        assert_eq!(d.plot_range(), (-6.0, 6.0));
        assert!(!d.rescaled());
    }

    #[test]
    fn failed_plot_range_update_is_rolled_back() {
        let waveform = Waveform::parse("sin(t)/(1 - c)", "t").unwrap();
        let mut d = FourierData::compute(
            &waveform,
            &[0.0],
            SamplingGrid::default(),
            SpectrumMode::Real,
            (-1.0, 1.0),
        )
        .unwrap();
        // c = 1 makes every sample infinite
        assert!(d.set_plot_range(&waveform, &[1.0], (-2.0, 2.0)).is_err());
        assert_eq!(d.plot_range(), (-1.0, 1.0));
        assert!((d.amplitudes()[1].norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_plot_range_is_rejected_up_front() {
        let waveform = Waveform::parse("sin(t)", "t").unwrap();
        let result = FourierData::compute(
            &waveform,
            &[],
            SamplingGrid::default(),
            SpectrumMode::Real,
            (1.0, -1.0),
        );
        assert!(matches!(result, Err(EpicycleError::InvalidSetting(_))));
    }

    #[test]
    fn parses_mode_names() {
        assert_eq!("Complex".parse::<SpectrumMode>().unwrap(), SpectrumMode::Complex);
        assert!("both".parse::<SpectrumMode>().is_err());
    }
}
