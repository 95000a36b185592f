//! Field-level validation helpers used by [`Config::validate`](crate::Config::validate).

use crate::schema::AxisRange;
use ozon_report_common::ReportError;
use url::Url;

/// Validates that `value` is an absolute `http` or `https` URL.
pub fn validate_url(value: &str, field: &str) -> Result<(), ReportError> {
    let url = Url::parse(value).map_err(|e| {
        ReportError::validation_field(format!("invalid URL '{value}': {e}"), field)
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ReportError::validation_field(
            format!("unsupported URL scheme '{other}'"),
            field,
        )),
    }
}

/// Validates that a value is present after trimming.
pub fn validate_non_empty(value: &str, field: &str) -> Result<(), ReportError> {
    if value.trim().is_empty() {
        Err(ReportError::validation_field(
            format!("{field} must not be empty"),
            field,
        ))
    } else {
        Ok(())
    }
}

/// Validates that `value` lies within `min..=max`.
pub fn validate_range(value: u64, min: u64, max: u64, field: &str) -> Result<(), ReportError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ReportError::validation_field(
            format!("{field} must be between {min} and {max}, got {value}"),
            field,
        ))
    }
}

/// Validates a `#RRGGBB` color.
pub fn validate_hex_color(value: &str, field: &str) -> Result<(), ReportError> {
    let valid = value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit());

    if valid {
        Ok(())
    } else {
        Err(ReportError::validation_field(
            format!("invalid hex color '{value}', expected #RRGGBB"),
            field,
        ))
    }
}

/// Validates that an axis is non-empty and has a positive step.
pub fn validate_axis(axis: &AxisRange, field: &str) -> Result<(), ReportError> {
    if !axis.min.is_finite() || !axis.max.is_finite() || !axis.step.is_finite() {
        return Err(ReportError::validation_field(
            "axis bounds must be finite",
            field,
        ));
    }
    if axis.max <= axis.min {
        return Err(ReportError::validation_field(
            format!("axis max {} must be greater than min {}", axis.max, axis.min),
            field,
        ));
    }
    if axis.step <= 0.0 {
        return Err(ReportError::validation_field(
            format!("axis step must be positive, got {}", axis.step),
            field,
        ));
    }
    Ok(())
}
