//! Quantised sliders for speed, circle count and waveform parameters.

use std::str::FromStr;

use crate::error::{EpicycleError, Result};

/// Largest tick count a slider accepts.
pub const MAX_TICKS: usize = 65535;

/// Default parameter slider range.
pub const PARAMETER_RANGE: (f64, f64) = (-10.0, 10.0);

/// Default parameter slider resolution (a step of 0.01).
pub const PARAMETER_TICKS: usize = 2001;

/// A value restricted to evenly spaced ticks in `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    label: String,
    min: f64,
    max: f64,
    ticks: usize,
    tick: usize,
}

impl Slider {
    /// Create a slider positioned at `value`.
    pub fn new(label: impl Into<String>, min: f64, max: f64, ticks: usize, value: f64) -> Result<Self> {
        validate_range(min, max, ticks)?;
        let mut slider = Self {
            label: label.into(),
            min,
            max,
            ticks,
            tick: 0,
        };
        slider.set_value(value);
        Ok(slider)
    }

    /// Slider for a waveform parameter with the default range.
    pub fn parameter(name: &str, value: f64) -> Self {
        let (min, max) = PARAMETER_RANGE;
        Self {
            label: name.to_string(),
            min,
            max,
            ticks: PARAMETER_TICKS,
            tick: 0,
        }
        .with_value(value)
    }

    fn with_value(mut self, value: f64) -> Self {
        self.set_value(value);
        self
    }

    /// Label shown next to the slider.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Number of ticks.
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    fn step(&self) -> f64 {
        (self.max - self.min) / (self.ticks - 1) as f64
    }

    /// Current value.
    pub fn value(&self) -> f64 {
        if self.tick == self.ticks - 1 {
            return self.max;
        }
        self.min + self.tick as f64 * self.step()
    }

    /// Move to the tick nearest `value`, clamped to the range.
    pub fn set_value(&mut self, value: f64) {
        let position = ((value - self.min) / self.step()).clamp(0.0, (self.ticks - 1) as f64);
        // Round half up
        self.tick = (position + 0.5).floor() as usize;
        self.tick = self.tick.min(self.ticks - 1);
    }

    /// Move by a number of ticks. Returns whether the value changed.
    pub fn step_by(&mut self, delta: i64) -> bool {
        let target = (self.tick as i64 + delta).clamp(0, self.ticks as i64 - 1) as usize;
        let changed = target != self.tick;
        self.tick = target;
        changed
    }

    /// Position in `[0, 1]`, for drawing.
    pub fn ratio(&self) -> f64 {
        self.tick as f64 / (self.ticks - 1) as f64
    }

    /// Change range and resolution, keeping the value where possible.
    pub fn set_range(&mut self, min: f64, max: f64, ticks: usize) -> Result<()> {
        validate_range(min, max, ticks)?;
        let value = self.value().clamp(min, max);
        self.min = min;
        self.max = max;
        self.ticks = ticks;
        self.set_value(value);
        Ok(())
    }

    /// Apply a typed edit. A rejected range leaves the slider unchanged.
    pub fn apply(&mut self, edit: SliderEdit) -> Result<()> {
        match edit {
            SliderEdit::Value(value) => {
                self.set_value(value);
                Ok(())
            },
            SliderEdit::Range { min, max, ticks } => self.set_range(min, max, ticks),
        }
    }

    /// Current range as `min max ticks`, the form [`SliderEdit`] parses.
    pub fn range_text(&self) -> String {
        format!("{} {} {}", self.min, self.max, self.ticks)
    }
}

/// A change typed into a slider's entry line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SliderEdit {
    /// `=value`, or a lone number: jump to the nearest tick.
    Value(f64),
    /// `min max ticks`: new range and resolution.
    Range {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
        /// Number of ticks.
        ticks: usize,
    },
}

fn parse_number(text: &str) -> Result<f64> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| EpicycleError::invalid_setting(format!("'{}' is not a number", text.trim())))?;
    if !value.is_finite() {
        return Err(EpicycleError::invalid_setting(format!("'{}' is not finite", text.trim())));
    }
    Ok(value)
}

impl FromStr for SliderEdit {
    type Err = EpicycleError;

    fn from_str(text: &str) -> Result<Self> {
        let text = text.trim();
        if let Some(value) = text.strip_prefix('=') {
            return parse_number(value).map(SliderEdit::Value);
        }
        let fields: Vec<&str> = text
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|field| !field.is_empty())
            .collect();
        match fields.as_slice() {
            [value] => parse_number(value).map(SliderEdit::Value),
            [min, max, ticks] => Ok(SliderEdit::Range {
                min: parse_number(min)?,
                max: parse_number(max)?,
                ticks: ticks.parse().map_err(|_| {
                    EpicycleError::invalid_setting(format!("'{}' is not a tick count", ticks))
                })?,
            }),
            _ => Err(EpicycleError::invalid_setting(
                "expected '=value' or 'min max ticks'",
            )),
        }
    }
}

fn validate_range(min: f64, max: f64, ticks: usize) -> Result<()> {
    if !(min.is_finite() && max.is_finite()) || min >= max {
        return Err(EpicycleError::invalid_setting(format!(
            "slider range [{}, {}] is empty",
            min, max
        )));
    }
    if ticks <= 1 || ticks > MAX_TICKS {
        return Err(EpicycleError::invalid_setting(format!(
            "slider ticks must be in 2..={}, got {}",
            MAX_TICKS, ticks
        )));
    }
    Ok(())
}

/// One slider per waveform parameter.
#[derive(Debug, Clone, Default)]
pub struct ParameterSliders {
    sliders: Vec<Slider>,
    selected: usize,
}

impl ParameterSliders {
    /// Build sliders from `(name, value)` pairs.
    pub fn new(defaults: &[(String, f64)]) -> Self {
        Self {
            sliders: defaults
                .iter()
                .map(|(name, value)| Slider::parameter(name, *value))
                .collect(),
            selected: 0,
        }
    }

    /// All sliders.
    pub fn sliders(&self) -> &[Slider] {
        &self.sliders
    }

    /// Number of sliders.
    pub fn len(&self) -> usize {
        self.sliders.len()
    }

    /// Whether the waveform has no parameters.
    pub fn is_empty(&self) -> bool {
        self.sliders.is_empty()
    }

    /// Selected slider index.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Select a slider by index.
    pub fn select(&mut self, index: usize) {
        if index < self.sliders.len() {
            self.selected = index;
        }
    }

    /// Mutable access to a slider.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Slider> {
        self.sliders.get_mut(index)
    }

    /// Slider for a named parameter.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Slider> {
        self.sliders.iter_mut().find(|s| s.label == name)
    }

    /// Current values, in parameter order.
    pub fn values(&self) -> Vec<f64> {
        self.sliders.iter().map(Slider::value).collect()
    }
}
