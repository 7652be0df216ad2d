//! Lenient numeric parsing for form text.
//!
//! Form fields hold whatever the user typed. Values are only interpreted when
//! they are committed; until then they stay raw text.

/// Parse form text into a finite number.
///
/// Surrounding whitespace is ignored. Empty text, non-numeric text, `NaN` and
/// infinities all yield `None`.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Treat non-finite values as zero when summing.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
