//! Animation state: the waveform, its coefficients and the phasor chain.
//!
//! The plot has two halves. Left of `x = 2` the phasor chain spins; right of
//! it one period of the waveform scrolls past, with the value at the joint
//! always equal to the current height of the chain's tip.

use ndarray::Array1;
use rustfft::num_complex::Complex64;

use crate::config::{AnimationConfig, MAX_FREQUENCY_LIMIT, SPEED_LIMIT};
use crate::error::{EpicycleError, Result};
use crate::fourier::{Coefficient, FourierData, SamplingGrid, SpectrumMode};
use crate::function::Waveform;
use crate::phasor::{Phasor, PhasorChain, DEFAULT_EPSILON};
use crate::presets::Preset;
use crate::slider::{ParameterSliders, Slider, SliderEdit};

/// Frame counter value at startup.
pub const INITIAL_COUNTS: i64 = -2;

/// Horizontal extent of the scrolling waveform.
pub const TRACE_X: (f64, f64) = (2.0, 6.0);

/// Titles longer than this collapse to `f(t)`.
const MAX_TITLE_LEN: usize = 100;

const DOMAIN_NOTE: &str = "t = s (mod 2π) - π";

/// Smallest drawn circle radius, scaled to the plot's half height.
fn epsilon_for(plot_range: (f64, f64)) -> f64 {
    DEFAULT_EPSILON * (plot_range.1 - plot_range.0) / 2.0
}

/// Frame state of the visualization.
#[derive(Debug, Clone)]
pub struct FourierAnimation {
    waveform: Waveform,
    preset: Option<&'static Preset>,
    params: ParameterSliders,
    data: FourierData,
    chain: PhasorChain,
    counts: i64,
    speed: Slider,
    max_frequency: Slider,
    paused: bool,
}

impl FourierAnimation {
    /// Build the animation described by `config`.
    pub fn new(config: &AnimationConfig) -> Result<Self> {
        let (source, preset) = match &config.expression {
            Some(text) => (text.as_str(), None),
            None => {
                let preset = Preset::by_name(&config.preset).ok_or_else(|| {
                    EpicycleError::invalid_setting(format!(
                        "unknown preset '{}' (available: {})",
                        config.preset,
                        Preset::names()
                    ))
                })?;
                (preset.expression, Some(preset))
            },
        };

        let waveform = Waveform::parse(source, &config.variable)?;
        let mut params = ParameterSliders::new(&waveform.default_values());
        for (name, value) in &config.params {
            params
                .find_mut(name)
                .ok_or_else(|| EpicycleError::UnknownParameter { name: name.clone() })?
                .set_value(*value);
        }

        let data = FourierData::compute(
            &waveform,
            &params.values(),
            config.grid,
            config.mode,
            config.plot_range,
        )?;

        let limit = SPEED_LIMIT as f64;
        let speed = Slider::new("Speed", -limit, limit, 2 * SPEED_LIMIT as usize + 1, config.speed as f64)?;
        let max_frequency = Slider::new(
            "Maximum Frequency",
            1.0,
            MAX_FREQUENCY_LIMIT as f64,
            MAX_FREQUENCY_LIMIT,
            config.max_frequency as f64,
        )?;

        let mut chain = PhasorChain::new(1);
        chain.set_epsilon(epsilon_for(config.plot_range));

        let mut animation = Self {
            waveform,
            preset,
            params,
            data,
            chain,
            counts: INITIAL_COUNTS,
            speed,
            max_frequency,
            paused: false,
        };
        animation.sync_circles();
        tracing::info!("Animating {}", animation.waveform);
        Ok(animation)
    }

    /// Advance one frame.
    pub fn tick(&mut self) {
        if !self.paused {
            self.counts += self.speed();
        }
        self.refresh_chain();
    }

    fn refresh_chain(&mut self) {
        self.chain
            .update(self.data.amplitudes(), self.data.frequencies(), self.counts);
    }

    fn sync_circles(&mut self) {
        self.chain.set_circles(self.circles());
        self.refresh_chain();
    }

    /// Replace the waveform with a typed expression.
    ///
    /// On error the current waveform keeps playing.
    pub fn set_function(&mut self, text: &str) -> Result<()> {
        let waveform = Waveform::parse(text, self.waveform.variable())?;
        let params = ParameterSliders::new(&waveform.default_values());
        self.replace(waveform, params, None)
    }

    /// Switch to a preset.
    pub fn set_preset(&mut self, preset: &'static Preset) -> Result<()> {
        let waveform = Waveform::parse(preset.expression, self.waveform.variable())?;
        let params = ParameterSliders::new(&waveform.default_values());
        self.replace(waveform, params, Some(preset))
    }

    /// Replace the waveform with its derivative, keeping parameter values.
    pub fn differentiate(&mut self) -> Result<()> {
        let waveform = self.waveform.derivative()?;
        let mut params = ParameterSliders::new(&waveform.default_values());
        for slider in self.params.sliders() {
            if let Some(target) = params.find_mut(slider.label()) {
                target.set_value(slider.value());
            }
        }
        self.replace(waveform, params, None)
    }

    fn replace(
        &mut self,
        waveform: Waveform,
        params: ParameterSliders,
        preset: Option<&'static Preset>,
    ) -> Result<()> {
        let data = FourierData::compute(
            &waveform,
            &params.values(),
            self.data.grid(),
            self.data.mode(),
            self.data.plot_range(),
        )?;
        tracing::info!(
            "Waveform set to {} with parameters {:?}",
            waveform,
            waveform.parameters()
        );
        self.waveform = waveform;
        self.params = params;
        self.data = data;
        self.preset = preset;
        self.sync_circles();
        Ok(())
    }

    fn recompute_or_restore(&mut self, previous: ParameterSliders) -> Result<()> {
        if let Err(e) = self.data.update(&self.waveform, &self.params.values()) {
            tracing::warn!("Parameters rejected: {}", e);
            self.params = previous;
            return Err(e);
        }
        self.refresh_chain();
        Ok(())
    }

    /// Set every parameter at once, in parameter order.
    pub fn set_params(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.params.len() {
            return Err(EpicycleError::ParameterCount {
                expected: self.params.len(),
                got: values.len(),
            });
        }
        let previous = self.params.clone();
        for (i, &value) in values.iter().enumerate() {
            if let Some(slider) = self.params.get_mut(i) {
                slider.set_value(value);
            }
        }
        self.recompute_or_restore(previous)
    }

    /// Set one parameter by name.
    pub fn set_param(&mut self, name: &str, value: f64) -> Result<()> {
        let previous = self.params.clone();
        self.params
            .find_mut(name)
            .ok_or_else(|| EpicycleError::UnknownParameter {
                name: name.to_string(),
            })?
            .set_value(value);
        self.recompute_or_restore(previous)
    }

    /// Move a parameter slider by a number of ticks.
    pub fn step_param(&mut self, index: usize, ticks: i64) -> Result<()> {
        let previous = self.params.clone();
        let changed = match self.params.get_mut(index) {
            Some(slider) => slider.step_by(ticks),
            None => return Ok(()),
        };
        if !changed {
            return Ok(());
        }
        self.recompute_or_restore(previous)
    }

    /// Type in a parameter's value or its slider range.
    ///
    /// Rejected ranges, and values the waveform cannot be evaluated at,
    /// leave every slider as it was.
    pub fn edit_param(&mut self, index: usize, edit: SliderEdit) -> Result<()> {
        let previous = self.params.clone();
        self.params
            .get_mut(index)
            .ok_or_else(|| {
                EpicycleError::invalid_setting(format!("no parameter slider {}", index))
            })?
            .apply(edit)?;
        self.recompute_or_restore(previous)
    }

    /// Change the vertical range samples are squeezed into.
    pub fn set_plot_range(&mut self, plot_range: (f64, f64)) -> Result<()> {
        self.data
            .set_plot_range(&self.waveform, &self.params.values(), plot_range)?;
        self.chain.set_epsilon(epsilon_for(plot_range));
        self.refresh_chain();
        Ok(())
    }

    /// Change the sampling grid.
    pub fn set_grid(&mut self, grid: SamplingGrid) -> Result<()> {
        self.data.set_grid(&self.waveform, &self.params.values(), grid)?;
        self.sync_circles();
        Ok(())
    }

    /// Switch between real and complex spectra.
    pub fn set_mode(&mut self, mode: SpectrumMode) -> Result<()> {
        self.data.set_mode(&self.waveform, &self.params.values(), mode)?;
        self.sync_circles();
        Ok(())
    }

    /// Frames advanced per tick.
    pub fn speed(&self) -> i64 {
        self.speed.value().round() as i64
    }

    /// Set frames per tick, clamped to the speed range.
    pub fn set_speed(&mut self, speed: i64) {
        self.speed.set_value(speed as f64);
    }

    /// Nudge the speed by `delta`.
    pub fn step_speed(&mut self, delta: i64) {
        self.speed.step_by(delta);
    }

    /// Highest harmonic drawn.
    pub fn max_frequency(&self) -> usize {
        self.max_frequency.value().round() as usize
    }

    /// Set the highest harmonic drawn, clamped to the slider range.
    pub fn set_max_frequency(&mut self, value: usize) {
        self.max_frequency.set_value(value as f64);
        self.sync_circles();
    }

    /// Nudge the highest harmonic by `delta`.
    pub fn step_max_frequency(&mut self, delta: i64) {
        if self.max_frequency.step_by(delta) {
            self.sync_circles();
        }
    }

    /// Phasors in the chain: the DC term plus one per harmonic, and both
    /// signs of each harmonic in complex mode.
    pub fn circles(&self) -> usize {
        let harmonics = self.max_frequency();
        let wanted = match self.data.mode() {
            SpectrumMode::Real => harmonics + 1,
            SpectrumMode::Complex => 2 * harmonics + 1,
        };
        wanted.min(self.data.len())
    }

    /// Toggle pause.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Whether the animation is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Frame counter.
    pub fn counts(&self) -> i64 {
        self.counts
    }

    /// Current waveform.
    pub fn waveform(&self) -> &Waveform {
        &self.waveform
    }

    /// Active preset, if the waveform came from one.
    pub fn preset(&self) -> Option<&'static Preset> {
        self.preset
    }

    /// Parameter sliders.
    pub fn params(&self) -> &ParameterSliders {
        &self.params
    }

    /// Speed slider.
    pub fn speed_slider(&self) -> &Slider {
        &self.speed
    }

    /// Maximum-frequency slider.
    pub fn max_frequency_slider(&self) -> &Slider {
        &self.max_frequency
    }

    /// Coefficients.
    pub fn data(&self) -> &FourierData {
        &self.data
    }

    /// Phasors of the current frame.
    pub fn phasors(&self) -> &[Phasor] {
        self.chain.phasors()
    }

    /// Circle outlines of the current frame, `points` segments each.
    pub fn chain_outlines(&self, points: usize) -> Vec<Vec<(f64, f64)>> {
        self.chain.outlines(points)
    }

    /// Tip of the chain.
    pub fn end_point(&self) -> Complex64 {
        self.chain.end_point()
    }

    /// Coefficient rows of the chain, limited to the drawn phasors.
    pub fn coefficients(&self) -> Vec<Coefficient> {
        let mut table = self.data.coefficient_table();
        table.truncate(self.circles());
        table
    }

    fn trace(&self, values: &Array1<f64>) -> Vec<(f64, f64)> {
        let n = values.len();
        if n == 0 {
            return Vec::new();
        }
        let (x0, x1) = TRACE_X;
        let step = if n > 1 { (x1 - x0) / (n - 1) as f64 } else { 0.0 };
        let shift = self.counts.rem_euclid(n as i64) as usize;
        (0..n)
            .map(|i| {
                // Roll right by `counts` so index 0 holds the sample under the tip
                let source = (i + n - shift) % n;
                (x0 + i as f64 * step, values[source])
            })
            .collect()
    }

    /// The sampled waveform, scrolled to the current frame.
    pub fn waveform_trace(&self) -> Vec<(f64, f64)> {
        self.trace(self.data.samples())
    }

    /// The partial sum of the drawn phasors, scrolled to the current frame.
    pub fn partial_sum_trace(&self) -> Vec<(f64, f64)> {
        self.trace(&self.data.partial_sum(self.circles()))
    }

    /// Horizontal line from the chain's tip to the start of the traces.
    pub fn marker_line(&self) -> [(f64, f64); 2] {
        let tip = self.end_point();
        [(tip.im, tip.re), (TRACE_X.0, tip.re)]
    }

    /// Plot bounds `([x_min, x_max], [y_min, y_max])`.
    pub fn view_bounds(&self) -> ([f64; 2], [f64; 2]) {
        let (lo, hi) = self.data.plot_range();
        let maxval = lo.abs().max(hi.abs());
        let margin = 0.2 * maxval;
        (
            [-2.0 * maxval - margin, TRACE_X.1],
            [lo - margin, hi + margin],
        )
    }

    /// Plot title.
    pub fn title(&self) -> String {
        let function = match self.preset.and_then(|p| p.title) {
            Some(title) => title.to_string(),
            None => format!("f(t) = {}", self.waveform),
        };
        let title = format!("{},   {}", function, DOMAIN_NOTE);
        if title.chars().count() > MAX_TITLE_LEN {
            format!("f(t),   {}", DOMAIN_NOTE)
        } else {
            title
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animation() -> FourierAnimation {
        FourierAnimation::new(&AnimationConfig::default()).unwrap()
    }

    #[test]
    fn starts_with_default_preset() {
        let a = animation();
        assert_eq!(a.preset().map(|p| p.name), Some("rectangle"));
        assert_eq!(a.counts(), INITIAL_COUNTS);
        assert_eq!(a.speed(), 1);
        assert_eq!(a.max_frequency(), 80);
        assert_eq!(a.circles(), 81);
    }

    #[test]
    fn tick_advances_by_speed() {
        let mut a = animation();
        a.set_speed(3);
        a.tick();
        a.tick();
        assert_eq!(a.counts(), INITIAL_COUNTS + 6);
        a.set_speed(-9);
        assert_eq!(a.speed(), -5);
        a.toggle_pause();
        a.tick();
        assert_eq!(a.counts(), INITIAL_COUNTS + 6);
    }

    #[test]
    fn trace_joint_matches_tip_with_every_circle() {
        let mut config = AnimationConfig::default();
        config.expression = Some("abs(t)/4 + sin(3*t)/3".to_string());
        config.grid = SamplingGrid::new(-std::f64::consts::PI, 2.0 * std::f64::consts::PI, 64).unwrap();
        let mut a = FourierAnimation::new(&config).unwrap();
        assert_eq!(a.circles(), a.data().len());
        for _ in 0..7 {
            a.tick();
            let trace = a.waveform_trace();
            assert_eq!(trace[0].0, TRACE_X.0);
            assert!((trace[0].1 - a.end_point().re).abs() < 1e-9);
            let partial = a.partial_sum_trace();
            assert!((partial[0].1 - trace[0].1).abs() < 1e-9);
            assert_eq!(a.marker_line()[1], (TRACE_X.0, a.end_point().re));
        }
    }

    #[test]
    fn bad_function_keeps_previous_waveform() {
        let mut a = animation();
        assert!(a.set_function("sin(x)").is_err());
        assert!(a.set_function("1/t").is_err());
        assert!(a.set_function("t^").is_err());
        assert_eq!(a.waveform().source(), "3*rect(t)/2");
    }

    #[test]
    fn new_function_resets_parameters() {
        let mut a = animation();
        a.set_function("a*sin(k*t) + c").unwrap();
        let values = a.params().values();
        assert_eq!(values.len(), 3);
        for (value, expected) in values.iter().zip([1.0, 0.0, 1.0]) {
            assert!((value - expected).abs() < 1e-9);
        }
        assert!(a.preset().is_none());
        assert!(a.title().starts_with("f(t) = a*sin(k*t) + c"));
    }

    #[test]
    fn parameters_recompute_coefficients() {
        let mut a = animation();
        a.set_function("a*sin(t)").unwrap();
        let before = a.data().amplitudes()[1].norm();
        a.set_param("a", 0.5).unwrap();
        let after = a.data().amplitudes()[1].norm();
        assert!((before - 1.0).abs() < 1e-9);
        assert!((after - 0.5).abs() < 1e-9);
        assert!(a.set_param("b", 1.0).is_err());
        assert!(a.set_params(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn parameter_making_function_singular_is_rolled_back() {
        let mut a = animation();
        a.set_function("1/(t - c + 10)").unwrap();
        // c = 10 puts the pole at t = 0, which is a sample point
        assert!(a.set_param("c", 10.0).is_err());
        assert!(a.params().values()[0].abs() < 1e-9);
    }

    #[test]
    fn max_frequency_limits_circles() {
        let mut a = animation();
        a.set_max_frequency(3);
        assert_eq!(a.circles(), 4);
        assert_eq!(a.phasors().len(), 4);
        assert_eq!(a.coefficients().len(), 4);
        a.set_mode(SpectrumMode::Complex).unwrap();
        assert_eq!(a.circles(), 7);
        a.step_max_frequency(-10);
        assert_eq!(a.max_frequency(), 1);
    }

    #[test]
    fn preset_titles_override_expression() {
        let mut a = animation();
        a.set_preset(Preset::by_name("gaussian").unwrap()).unwrap();
        assert!(a.title().starts_with("f(t; σ)"));
        assert_eq!(a.params().sliders()[0].label(), "sigma");
    }

    #[test]
    fn long_titles_collapse() {
        let mut a = animation();
        let long = format!("t{}", " + t".repeat(40));
        a.set_function(&long).unwrap();
        assert!(a.title().starts_with("f(t),"));
    }

    #[test]
    fn differentiate_carries_parameter_values() {
        let mut a = animation();
        a.set_function("a*sin(k*t) + d").unwrap();
        a.set_param("a", 0.5).unwrap();
        a.differentiate().unwrap();
        assert_eq!(a.waveform().parameters(), ["a", "k"]);
        assert!((a.params().values()[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn bounds_cover_chain_and_traces() {
        let (x, y) = animation().view_bounds();
        assert!((x[0] + 2.2).abs() < 1e-12 && x[1] == 6.0);
        assert!((y[0] + 1.2).abs() < 1e-12 && (y[1] - 1.2).abs() < 1e-12);
    }

    #[test]
    fn typed_slider_edits_recompute_or_roll_back() {
        let mut a = animation();
        a.set_function("a*sin(t)").unwrap();
        a.edit_param(0, SliderEdit::Value(0.25)).unwrap();
        assert!((a.data().amplitudes()[1].norm() - 0.25).abs() < 1e-9);

        a.edit_param(0, SliderEdit::Range { min: 0.0, max: 0.2, ticks: 5 }).unwrap();
        let slider = &a.params().sliders()[0];
        assert_eq!((slider.min(), slider.max(), slider.ticks()), (0.0, 0.2, 5));
        assert!((slider.value() - 0.2).abs() < 1e-12);
        assert!((a.data().amplitudes()[1].norm() - 0.2).abs() < 1e-9);

        assert!(a.edit_param(0, SliderEdit::Range { min: 1.0, max: -1.0, ticks: 5 }).is_err());
        assert!(a.edit_param(3, SliderEdit::Value(1.0)).is_err());
        assert_eq!(a.params().sliders()[0].max(), 0.2);
    }

    #[test]
    fn singular_typed_value_is_rolled_back() {
        let mut a = animation();
        a.set_function("1/(t - c + 10)").unwrap();
        assert!(a.edit_param(0, SliderEdit::Range { min: 0.0, max: 20.0, ticks: 21 }).is_ok());
        assert!(a.edit_param(0, SliderEdit::Value(10.0)).is_err());
        assert!(a.params().values()[0].abs() < 1e-9);
    }

    #[test]
    fn plot_range_moves_bounds_and_epsilon() {
        let mut a = animation();
        a.set_function("2*sin(t)").unwrap();
        assert!(a.data().rescaled());
        a.set_plot_range((-3.0, 3.0)).unwrap();
        assert!(!a.data().rescaled());
        let (x, y) = a.view_bounds();
        assert!((x[0] + 6.6).abs() < 1e-12 && x[1] == 6.0);
        assert!((y[0] + 3.6).abs() < 1e-12 && (y[1] - 3.6).abs() < 1e-12);
        assert!(a.set_plot_range((2.0, 2.0)).is_err());
        assert_eq!(a.data().plot_range(), (-3.0, 3.0));

        // later waveforms keep the chosen range
        a.set_function("sin(t)").unwrap();
        assert_eq!(a.data().plot_range(), (-3.0, 3.0));
    }

    #[test]
    fn plot_range_comes_from_config() {
        let config = AnimationConfig {
            plot_range: (-2.0, 2.0),
            ..AnimationConfig::default()
        };
        let a = FourierAnimation::new(&config).unwrap();
        assert_eq!(a.data().plot_range(), (-2.0, 2.0));
        let bad = AnimationConfig {
            plot_range: (0.0, 0.0),
            ..AnimationConfig::default()
        };
        assert!(FourierAnimation::new(&bad).is_err());
    }

    #[test]
    fn unknown_preset_in_config_is_an_error() {
        let config = AnimationConfig {
            preset: "square".to_string(),
            ..AnimationConfig::default()
        };
        assert!(FourierAnimation::new(&config).is_err());
    }
}
