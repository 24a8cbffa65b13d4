//! Startup configuration.
//!
//! Built from command-line arguments in `main.rs`; every field has a default
//! so library users can start from `AnimationConfig::default()`.

use std::time::Duration;

use crate::fourier::{SamplingGrid, SpectrumMode};
use crate::function::DEFAULT_VARIABLE;
use crate::presets::DEFAULT_PRESET;

/// Highest value of the maximum-frequency slider.
pub const MAX_FREQUENCY_LIMIT: usize = 80;

/// Speed slider bound; speeds run from `-SPEED_LIMIT` to `SPEED_LIMIT`.
pub const SPEED_LIMIT: i64 = 5;

/// Default plot range the waveform is rescaled into.
pub const PLOT_RANGE: (f64, f64) = (-1.0, 1.0);

/// Configuration for [`FourierAnimation`](crate::animation::FourierAnimation).
#[derive(Debug, Clone)]
pub struct AnimationConfig {
    /// Initial expression; overrides `preset` when set.
    pub expression: Option<String>,
    /// Initial preset name.
    pub preset: String,
    /// Main variable of typed expressions.
    pub variable: String,
    /// Sampling grid.
    pub grid: SamplingGrid,
    /// Spectrum mode.
    pub mode: SpectrumMode,
    /// Highest harmonic drawn; the chain has one more phasor for DC.
    pub max_frequency: usize,
    /// Frames advanced per tick.
    pub speed: i64,
    /// Initial parameter values, overriding the defaults.
    pub params: Vec<(String, f64)>,
    /// Vertical range the waveform is squeezed into.
    pub plot_range: (f64, f64),
    /// Time between frames.
    pub interval: Duration,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            expression: None,
            preset: DEFAULT_PRESET.to_string(),
            variable: DEFAULT_VARIABLE.to_string(),
            grid: SamplingGrid::default(),
            mode: SpectrumMode::Real,
            max_frequency: MAX_FREQUENCY_LIMIT,
            speed: 1,
            params: Vec::new(),
            plot_range: PLOT_RANGE,
            interval: Duration::from_millis(15),
        }
    }
}
