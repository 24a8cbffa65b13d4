//! Plain-text coefficient tables.

use std::path::Path;

use crate::animation::FourierAnimation;
use crate::error::Result;

/// Render the drawn phasors of `animation` as a commented text table.
pub fn coefficient_report(animation: &FourierAnimation) -> String {
    let data = animation.data();
    let grid = data.grid();
    let mut out = String::new();

    out.push_str(&format!("# {}\n", animation.title()));
    out.push_str(&format!(
        "# start = {}, period = {}, points = {}, spectrum = {}\n",
        grid.start,
        grid.period,
        grid.points,
        data.mode()
    ));
    if !animation.params().is_empty() {
        let params: Vec<String> = animation
            .params()
            .sliders()
            .iter()
            .map(|s| format!("{} = {}", s.label(), s.value()))
            .collect();
        out.push_str(&format!("# {}\n", params.join(", ")));
    }
    if data.rescaled() {
        let (lo, hi) = data.plot_range();
        out.push_str(&format!("# samples rescaled into [{}, {}]\n", lo, hi));
    }
    out.push_str(&format!(
        "{:>6}  {:>12}  {:>12}  {:>10}\n",
        "k", "frequency", "amplitude", "phase"
    ));
    for c in animation.coefficients() {
        out.push_str(&format!(
            "{:>6}  {:>12.8}  {:>12.8}  {:>10.6}\n",
            c.harmonic, c.frequency, c.amplitude, c.phase
        ));
    }
    out
}

/// Write the coefficient table to `path`. Returns the number of rows.
pub fn save_report(animation: &FourierAnimation, path: &Path) -> Result<usize> {
    std::fs::write(path, coefficient_report(animation))?;
    Ok(animation.coefficients().len())
}
