//! Color and label helpers shared by the chart code.

use chrono::NaiveDate;
use plotters::style::RGBColor;

/// Parse a `#RRGGBB` color, falling back to black.
pub fn parse_color(color_str: &str) -> RGBColor {
    if let Some(hex) = color_str.strip_prefix('#') {
        if hex.len() == 6 && hex.is_ascii() {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return RGBColor(r, g, b);
            }
        }
    }
    RGBColor(0, 0, 0)
}

/// Short x-axis label, `MM-DD`.
pub fn day_label(date: NaiveDate) -> String {
    date.format("%m-%d").to_string()
}

/// Label for the bar centered at `x`, empty between bars and outside the data.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn label_at(labels: &[String], x: f64) -> String {
    let nearest = x.round();
    if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    labels.get(nearest as usize).cloned().unwrap_or_default()
}
