//! Layout configuration constants.

/// Configuration for the side panel holding the controls.
#[derive(Debug, Clone)]
pub struct ControlPanelConfig {
    /// Width of the panel in columns.
    pub width: u16,
    /// Width of a slider bar in characters.
    pub slider_width: usize,
    /// The panel is hidden when it would leave the canvas narrower than this.
    pub min_canvas_width: u16,
}

impl Default for ControlPanelConfig {
    fn default() -> Self {
        Self {
            width: 36,
            slider_width: 24,
            min_canvas_width: 40,
        }
    }
}

/// Configuration for the phasor canvas.
#[derive(Debug, Clone)]
pub struct CanvasConfig {
    /// Points per circle outline.
    pub circle_points: usize,
    /// Length of each dash of the marker line, in plot units.
    pub dash_length: f64,
    /// Radius of the dot marking the chain's tip, in plot units.
    pub tip_radius: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            circle_points: crate::phasor::POINTS_PER_CIRCLE,
            dash_length: 0.08,
            tip_radius: 0.03,
        }
    }
}

/// Configuration for the overlays.
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    /// Width as a percentage of the screen.
    pub percent_x: u16,
    /// Height as a percentage of the screen.
    pub percent_y: u16,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            percent_x: 70,
            percent_y: 70,
        }
    }
}

/// Combined layout configuration.
#[derive(Debug, Clone, Default)]
pub struct LayoutConfig {
    /// Control panel.
    pub controls: ControlPanelConfig,
    /// Phasor canvas.
    pub canvas: CanvasConfig,
    /// Overlays.
    pub overlay: OverlayConfig,
}
