//! Clipboard integration.

use arboard::Clipboard;

use crate::animation::FourierAnimation;
use crate::error::Result;
use crate::report::coefficient_report;

/// Copy the coefficient table of `animation` to the clipboard.
///
/// Returns the number of rows copied.
pub fn copy_coefficients(animation: &FourierAnimation) -> Result<usize> {
    let report = coefficient_report(animation);
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(report)?;
    Ok(animation.coefficients().len())
}
