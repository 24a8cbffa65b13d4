//! Epicycle - Fourier series drawn as rotating circles in the terminal.
//!
//! A real, periodic function is sampled over one period and transformed with
//! an FFT. Each Fourier term becomes a rotating phasor; chained head to tail,
//! their tip retraces the function while it scrolls past on the right.
//!
//! # Features
//!
//! - Expressions in `t` with free parameters driven by sliders
//! - Preset waveforms (sine, gaussian, sinc, rectangle, ...)
//! - Real or complex (signed frequency) spectra
//! - Symbolic derivatives of the current waveform
//! - Gruvbox color themes
//! - Coefficient tables on stdout, in a file or on the clipboard
//!
//! # Example
//!
//! ```no_run
//! use epicycle::animation::FourierAnimation;
//! use epicycle::config::AnimationConfig;
//!
//! let config = AnimationConfig {
//!     expression: Some("a*sin(k*t)".to_string()),
//!     ..AnimationConfig::default()
//! };
//! let mut animation = FourierAnimation::new(&config)?;
//! animation.set_param("k", 3.0)?;
//! animation.tick();
//! println!("tip at {}", animation.end_point());
//! # Ok::<(), epicycle::EpicycleError>(())
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod animation;
pub mod app;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod expr;
pub mod fourier;
pub mod function;
pub mod input;
pub mod phasor;
pub mod presets;
pub mod report;
pub mod slider;
pub mod ui;

pub use error::{EpicycleError, Result};
