//! Shared formatting utilities for UI components.

/// Format a slider value with smart precision.
pub fn format_value(val: f64) -> String {
    if !val.is_finite() {
        return if val.is_nan() {
            "NaN".to_string()
        } else if val.is_sign_positive() {
            "+Inf".to_string()
        } else {
            "-Inf".to_string()
        };
    }
    let abs_val = val.abs();
    if abs_val < 5e-13 {
        "0".to_string()
    } else if !(1e-3..1e6).contains(&abs_val) {
        format!("{:.3e}", val)
    } else if val.fract().abs() < 1e-9 {
        format!("{:.0}", val)
    } else {
        format!("{:.2}", val)
    }
}

/// Draw a slider track such as `━━━━●────`.
pub fn slider_bar(ratio: f64, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let knob = (ratio.clamp(0.0, 1.0) * (width - 1) as f64).round() as usize;
    let mut bar = String::with_capacity(width * 3);
    for i in 0..width {
        bar.push(match i.cmp(&knob) {
            std::cmp::Ordering::Less => '━',
            std::cmp::Ordering::Equal => '●',
            std::cmp::Ordering::Greater => '─',
        });
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_integers_without_decimals() {
        assert_eq!(format_value(80.0), "80");
        assert_eq!(format_value(-5.0), "-5");
        assert_eq!(format_value(0.25), "0.25");
        assert_eq!(format_value(1e-15), "0");
        assert_eq!(format_value(f64::NAN), "NaN");
    }

    #[test]
    fn slider_bar_places_knob() {
        assert_eq!(slider_bar(0.0, 5), "●────");
        assert_eq!(slider_bar(1.0, 5), "━━━━●");
        assert_eq!(slider_bar(0.5, 5), "━━●──");
        assert_eq!(slider_bar(0.5, 0), "");
    }
}
