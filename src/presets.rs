//! Preset waveforms.

/// A named waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    /// Menu name.
    pub name: &'static str,
    /// Expression text.
    pub expression: &'static str,
    /// Title override shown instead of the expression.
    pub title: Option<&'static str>,
}

/// Every preset, in menu order.
pub const PRESETS: &[Preset] = &[
    Preset {
        name: "sine",
        expression: "sin(t)",
        title: None,
    },
    Preset {
        name: "cosine",
        expression: "cos(t)",
        title: None,
    },
    Preset {
        name: "gaussian",
        expression: "3*exp(-t**2/(2*sigma**2))/2 - 1/2",
        title: Some("f(t; σ) = exp(-t²/2σ²)"),
    },
    Preset {
        name: "sinc",
        expression: "3*sinc(k*(6.5)*t)/2 - 1/2",
        title: Some("f(t; k) = sinc(kt)"),
    },
    Preset {
        name: "rectangle",
        expression: "3*rect(t)/2",
        title: None,
    },
    Preset {
        name: "sawtooth",
        expression: "t/pi",
        title: None,
    },
    Preset {
        name: "triangle",
        expression: "abs(t)",
        title: None,
    },
];

/// Preset shown at startup.
pub const DEFAULT_PRESET: &str = "rectangle";

impl Preset {
    /// All presets.
    pub fn all() -> &'static [Preset] {
        PRESETS
    }

    /// Find a preset by name, ignoring case.
    pub fn by_name(name: &str) -> Option<&'static Preset> {
        PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Find a preset by menu position.
    pub fn by_index(index: usize) -> Option<&'static Preset> {
        PRESETS.get(index)
    }

    /// Menu position of this preset.
    pub fn index(&self) -> usize {
        PRESETS.iter().position(|p| p.name == self.name).unwrap_or(0)
    }

    /// Next preset, wrapping around.
    pub fn next(&self) -> &'static Preset {
        &PRESETS[(self.index() + 1) % PRESETS.len()]
    }

    /// Previous preset, wrapping around.
    pub fn prev(&self) -> &'static Preset {
        &PRESETS[(self.index() + PRESETS.len() - 1) % PRESETS.len()]
    }

    /// Comma separated preset names, for help text.
    pub fn names() -> String {
        PRESETS.iter().map(|p| p.name).collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::Waveform;

    #[test]
    fn every_preset_parses() {
        for preset in Preset::all() {
            let w = Waveform::parse(preset.expression, "t");
            assert!(w.is_ok(), "{} failed: {:?}", preset.name, w.err());
        }
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(Preset::by_name("Gaussian").map(|p| p.name), Some("gaussian"));
        assert!(Preset::by_name("square").is_none());
        assert!(Preset::by_name(DEFAULT_PRESET).is_some());
    }

    #[test]
    fn cycling_wraps() {
        let first = &PRESETS[0];
        let last = &PRESETS[PRESETS.len() - 1];
        assert_eq!(last.next(), first);
        assert_eq!(first.prev(), last);
    }
}
