//! Application state and logic.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::animation::FourierAnimation;
use crate::clipboard;
use crate::config::AnimationConfig;
use crate::error::{EpicycleError, Result};
use crate::input::ExpressionInput;
use crate::presets::Preset;
use crate::slider::SliderEdit;

/// Ticks moved by one Shift-adjust.
const COARSE_STEP: i64 = 10;

/// Help overlay text.
pub const INSTRUCTIONS: &str = "\
This program draws the discrete Fourier series of a real, periodic, \
well-behaved function, with one rotating circle per term.

Pick a preset waveform with [ and ] or the number keys, or press e to type \
a new one. The function must depend on t; any other names in it become \
parameters with their own sliders.

The Maximum Frequency slider sets how many circles are drawn and Speed sets \
how fast they turn. Use Tab to move between controls and the arrow keys to \
adjust them, holding Shift for larger steps. On a parameter slider, r edits its range as 'min max ticks' and = types an exact value.

d replaces the waveform with its derivative, m switches between the real and \
complex spectrum, f lists the coefficients and c copies them.

Press q to quit.";

/// Application theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Gruvbox dark theme.
    GruvboxDark,
    /// Gruvbox light theme.
    GruvboxLight,
}

impl Theme {
    /// Get the next theme in the cycle.
    pub fn next(self) -> Self {
        match self {
            Theme::GruvboxDark => Theme::GruvboxLight,
            Theme::GruvboxLight => Theme::GruvboxDark,
        }
    }

    /// Get the theme name.
    pub fn name(self) -> &'static str {
        match self {
            Theme::GruvboxDark => "Gruvbox Dark",
            Theme::GruvboxLight => "Gruvbox Light",
        }
    }
}

/// What keystrokes go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Controls and animation.
    Normal,
    /// Typing an expression.
    Editing,
    /// Typing a value or range for the nth parameter slider.
    SliderEdit(usize),
    /// Instructions overlay.
    Help,
    /// Coefficient table overlay.
    Coefficients,
}

impl Mode {
    /// Whether keystrokes go to the entry line.
    pub fn is_editing(self) -> bool {
        matches!(self, Mode::Editing | Mode::SliderEdit(_))
    }
}

/// A control the arrow keys can adjust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Preset menu.
    Preset,
    /// Maximum frequency slider.
    MaxFrequency,
    /// Speed slider.
    Speed,
    /// Slider of the nth waveform parameter.
    Parameter(usize),
}

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Animation being shown.
    pub animation: FourierAnimation,
    /// Expression entry line.
    pub input: ExpressionInput,
    /// Input mode.
    pub mode: Mode,
    /// Index of the focused control.
    pub focus: usize,
    /// Status message.
    pub status: String,
    /// Current theme.
    pub theme: Theme,
    /// Time between frames.
    pub interval: Duration,
    /// First row shown in the coefficient overlay.
    pub coefficient_scroll: usize,
    /// Set when the user asked to quit.
    pub should_quit: bool,
}

impl App {
    /// Create a new application instance.
    pub fn new(config: &AnimationConfig) -> Result<Self> {
        let animation = FourierAnimation::new(config)?;
        let status = format!("Showing f(t) = {}", animation.waveform());
        Ok(Self {
            animation,
            input: ExpressionInput::new(),
            mode: Mode::Normal,
            focus: 0,
            status,
            theme: Theme::GruvboxDark,
            interval: config.interval,
            coefficient_scroll: 0,
            should_quit: false,
        })
    }

    /// Controls in focus order.
    pub fn controls(&self) -> Vec<Control> {
        let mut controls = vec![Control::Preset, Control::MaxFrequency, Control::Speed];
        controls.extend((0..self.animation.params().len()).map(Control::Parameter));
        controls
    }

    /// The focused control.
    pub fn focused(&self) -> Control {
        self.controls()
            .get(self.focus)
            .copied()
            .unwrap_or(Control::Preset)
    }

    /// Focus the next control.
    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.controls().len();
    }

    /// Focus the previous control.
    pub fn focus_prev(&mut self) {
        let count = self.controls().len();
        self.focus = (self.focus + count - 1) % count;
    }

    /// Advance the animation one frame.
    pub fn tick(&mut self) {
        self.animation.tick();
    }

    /// Move the focused control by `ticks`.
    pub fn adjust(&mut self, ticks: i64) {
        match self.focused() {
            Control::Preset => {
                if ticks > 0 {
                    self.next_preset();
                } else {
                    self.prev_preset();
                }
            },
            Control::MaxFrequency => {
                self.animation.step_max_frequency(ticks);
                self.status = format!(
                    "Maximum frequency: {} ({} circles)",
                    self.animation.max_frequency(),
                    self.animation.circles()
                );
            },
            Control::Speed => {
                self.animation.step_speed(ticks);
                self.status = format!("Speed: {}", self.animation.speed());
            },
            Control::Parameter(index) => match self.animation.step_param(index, ticks) {
                Ok(()) => {
                    if let Some(slider) = self.animation.params().sliders().get(index) {
                        self.status = format!("{} = {:.2}", slider.label(), slider.value());
                    }
                },
                Err(e) => self.report_error("Parameter rejected", &e),
            },
        }
    }

    fn report_error(&mut self, context: &str, e: &EpicycleError) {
        tracing::warn!("{}: {}", context, e);
        self.status = format!("{}: {}", context, e);
    }

    /// Switch to the preset at menu position `index`.
    pub fn select_preset(&mut self, index: usize) {
        if let Some(preset) = Preset::by_index(index) {
            self.apply_preset(preset);
        }
    }

    /// Switch to the next preset.
    pub fn next_preset(&mut self) {
        let preset = match self.animation.preset() {
            Some(current) => current.next(),
            None => &Preset::all()[0],
        };
        self.apply_preset(preset);
    }

    /// Switch to the previous preset.
    pub fn prev_preset(&mut self) {
        let preset = match self.animation.preset() {
            Some(current) => current.prev(),
            None => &Preset::all()[Preset::all().len() - 1],
        };
        self.apply_preset(preset);
    }

    fn apply_preset(&mut self, preset: &'static Preset) {
        match self.animation.set_preset(preset) {
            Ok(()) => {
                self.clamp_focus();
                self.status = format!("Preset: {}", preset.name);
            },
            Err(e) => self.report_error("Preset failed", &e),
        }
    }

    fn clamp_focus(&mut self) {
        self.focus = self.focus.min(self.controls().len() - 1);
    }

    /// Open the expression entry line on the current waveform.
    pub fn start_editing(&mut self) {
        let current = self.animation.waveform().source().to_string();
        self.input.start(&current);
        self.mode = Mode::Editing;
        self.status = "Enter waveform f(t)".to_string();
    }

    /// Apply the typed expression.
    ///
    /// A rejected expression leaves the animation untouched.
    pub fn submit_edit(&mut self) {
        let text = self.input.submit();
        self.mode = Mode::Normal;
        if text.trim().is_empty() {
            self.status = "Ready".to_string();
            return;
        }
        match self.animation.set_function(&text) {
            Ok(()) => {
                self.clamp_focus();
                self.status = format!("Showing f(t) = {}", self.animation.waveform());
            },
            Err(e) => self.report_error("Unable to recognize input", &e),
        }
    }

    /// Open the entry line on the focused parameter slider.
    ///
    /// With `range` the line is prefilled with `min max ticks`, otherwise
    /// with `=value`.
    pub fn start_slider_edit(&mut self, range: bool) {
        let Control::Parameter(index) = self.focused() else {
            self.status = "Focus a parameter slider first".to_string();
            return;
        };
        let Some(slider) = self.animation.params().sliders().get(index) else {
            return;
        };
        let (text, prompt) = if range {
            (slider.range_text(), "min max ticks")
        } else {
            (format!("={}", slider.value()), "=value")
        };
        self.status = format!("{}: enter {}", slider.label(), prompt);
        self.input.start(&text);
        self.mode = Mode::SliderEdit(index);
    }

    /// Apply the typed value or range to parameter slider `index`.
    pub fn submit_slider_edit(&mut self, index: usize) {
        let text = self.input.submit();
        self.mode = Mode::Normal;
        let result = text
            .parse::<SliderEdit>()
            .and_then(|edit| self.animation.edit_param(index, edit));
        match result {
            Ok(()) => {
                if let Some(slider) = self.animation.params().sliders().get(index) {
                    self.status = format!(
                        "{} = {:.2} in [{}, {}], {} ticks",
                        slider.label(),
                        slider.value(),
                        slider.min(),
                        slider.max(),
                        slider.ticks()
                    );
                }
            },
            Err(e) => self.report_error("Slider edit rejected", &e),
        }
    }

    /// Abandon the expression entry line.
    pub fn cancel_edit(&mut self) {
        self.input.cancel();
        self.mode = Mode::Normal;
        self.status = "Ready".to_string();
    }

    /// Replace the waveform with its derivative.
    pub fn differentiate(&mut self) {
        match self.animation.differentiate() {
            Ok(()) => {
                self.clamp_focus();
                self.status = format!("Derivative: f(t) = {}", self.animation.waveform());
            },
            Err(e) => self.report_error("Derivative failed", &e),
        }
    }

    /// Toggle between real and complex spectra.
    pub fn toggle_spectrum(&mut self) {
        let mode = self.animation.data().mode().next();
        match self.animation.set_mode(mode) {
            Ok(()) => self.status = format!("Spectrum: {}", mode),
            Err(e) => self.report_error("Spectrum change failed", &e),
        }
    }

    /// Pause or resume.
    pub fn toggle_pause(&mut self) {
        self.status = if self.animation.toggle_pause() {
            "Paused".to_string()
        } else {
            "Running".to_string()
        };
    }

    /// Cycle through available themes.
    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.status = format!("Theme: {}", self.theme.name());
    }

    /// Show or hide the instructions.
    pub fn toggle_help(&mut self) {
        self.mode = if self.mode == Mode::Help {
            Mode::Normal
        } else {
            Mode::Help
        };
    }

    /// Show or hide the coefficient table.
    pub fn toggle_coefficients(&mut self) {
        self.coefficient_scroll = 0;
        self.mode = if self.mode == Mode::Coefficients {
            Mode::Normal
        } else {
            Mode::Coefficients
        };
    }

    /// Scroll the coefficient table.
    pub fn scroll_coefficients(&mut self, delta: isize) {
        let rows = self.animation.coefficients().len();
        let next = self.coefficient_scroll.saturating_add_signed(delta);
        self.coefficient_scroll = next.min(rows.saturating_sub(1));
    }

    /// Copy the coefficient table to the clipboard.
    pub fn copy_coefficients(&mut self) {
        match clipboard::copy_coefficients(&self.animation) {
            Ok(rows) => self.status = format!("Copied {} coefficients!", rows),
            Err(e) => self.report_error("Copy failed", &e),
        }
    }

    /// Dispatch a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.mode {
            Mode::Editing | Mode::SliderEdit(_) => self.handle_editing_key(key),
            Mode::Help => match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter => {
                    self.mode = Mode::Normal;
                },
                _ => {},
            },
            Mode::Coefficients => match (key.modifiers, key.code) {
                (_, KeyCode::Esc) | (_, KeyCode::Char('q')) | (_, KeyCode::Char('f')) => {
                    self.mode = Mode::Normal;
                },
                (_, KeyCode::Up) | (_, KeyCode::Char('k')) => self.scroll_coefficients(-1),
                (_, KeyCode::Down) | (_, KeyCode::Char('j')) => self.scroll_coefficients(1),
                (_, KeyCode::PageUp) | (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
                    self.scroll_coefficients(-(COARSE_STEP as isize))
                },
                (_, KeyCode::PageDown) | (KeyModifiers::CONTROL, KeyCode::Char('d')) => {
                    self.scroll_coefficients(COARSE_STEP as isize)
                },
                (_, KeyCode::Char('c')) => self.copy_coefficients(),
                _ => {},
            },
            Mode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => match self.mode {
                Mode::SliderEdit(index) => self.submit_slider_edit(index),
                _ => self.submit_edit(),
            },
            KeyCode::Esc => self.cancel_edit(),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => self.input.left(),
            KeyCode::Right => self.input.right(),
            KeyCode::Home => self.input.home(),
            KeyCode::End => self.input.end(),
            KeyCode::Char(c) => self.input.input(c),
            _ => {},
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            // Quit
            (KeyModifiers::NONE, KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c')) => self.should_quit = true,

            // Expression entry
            (KeyModifiers::NONE, KeyCode::Char('e'))
            | (KeyModifiers::NONE, KeyCode::Char('i')) => self.start_editing(),
            (KeyModifiers::NONE, KeyCode::Char('r')) => self.start_slider_edit(true),
            (_, KeyCode::Char('=')) => self.start_slider_edit(false),

            // Focus
            (KeyModifiers::NONE, KeyCode::Tab)
            | (KeyModifiers::NONE, KeyCode::Down)
            | (KeyModifiers::NONE, KeyCode::Char('j')) => self.focus_next(),
            (_, KeyCode::BackTab)
            | (KeyModifiers::NONE, KeyCode::Up)
            | (KeyModifiers::NONE, KeyCode::Char('k')) => self.focus_prev(),

            // Adjust
            (KeyModifiers::NONE, KeyCode::Right) | (KeyModifiers::NONE, KeyCode::Char('l')) => {
                self.adjust(1)
            },
            (KeyModifiers::NONE, KeyCode::Left) | (KeyModifiers::NONE, KeyCode::Char('h')) => {
                self.adjust(-1)
            },
            (KeyModifiers::SHIFT, KeyCode::Right) | (KeyModifiers::SHIFT, KeyCode::Char('L')) => {
                self.adjust(COARSE_STEP)
            },
            (KeyModifiers::SHIFT, KeyCode::Left) | (KeyModifiers::SHIFT, KeyCode::Char('H')) => {
                self.adjust(-COARSE_STEP)
            },

            // Presets
            (KeyModifiers::NONE, KeyCode::Char(']')) => self.next_preset(),
            (KeyModifiers::NONE, KeyCode::Char('[')) => self.prev_preset(),
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                self.select_preset(c as usize - '1' as usize)
            },

            // Features
            (KeyModifiers::NONE, KeyCode::Char(' ')) => self.toggle_pause(),
            (KeyModifiers::NONE, KeyCode::Char('d')) => self.differentiate(),
            (KeyModifiers::NONE, KeyCode::Char('m')) => self.toggle_spectrum(),
            (KeyModifiers::SHIFT, KeyCode::Char('T')) | (KeyModifiers::NONE, KeyCode::Char('T')) => {
                self.cycle_theme()
            },
            (_, KeyCode::Char('?')) => self.toggle_help(),
            (KeyModifiers::NONE, KeyCode::Char('f')) => self.toggle_coefficients(),
            (KeyModifiers::NONE, KeyCode::Char('c')) => self.copy_coefficients(),

            _ => {},
        }
    }
}
