//! Axis range helpers.

use ozon_report_config::AxisRange;

/// Tick steps tried in order by [`nice_step`].
const NICE_STEPS: [f64; 9] = [
    1.0, 5.0, 10.0, 50.0, 100.0, 500.0, 1000.0, 5000.0, 10000.0,
];

/// Largest step returned by [`nice_step`].
const MAX_STEP: f64 = 20000.0;

/// First step from `1, 5, 10, 50, ..., 10000` giving at most ten intervals up
/// to `max`, 20000 beyond that and 1 for non-positive input.
pub fn nice_step(max: f64) -> f64 {
    if max <= 0.0 || !max.is_finite() {
        return 1.0;
    }
    NICE_STEPS
        .iter()
        .copied()
        .find(|step| max / step <= 10.0)
        .unwrap_or(MAX_STEP)
}

/// Returns `axis`, or a copy whose max is raised to fit `data_max`.
///
/// The new max is the next multiple of `nice_step(data_max)`; the tick step
/// grows to that step when it is coarser than the configured one.
pub fn fit_axis(axis: AxisRange, data_max: f64) -> AxisRange {
    if !data_max.is_finite() || data_max <= axis.max {
        return axis;
    }
    let step = nice_step(data_max);
    let max = (data_max / step).ceil() * step;
    AxisRange::new(axis.min, max, axis.step.max(step))
}

/// Number of ticks from `min` to `max` inclusive.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn tick_count(axis: &AxisRange) -> usize {
    if axis.step <= 0.0 {
        return 2;
    }
    ((axis.max - axis.min) / axis.step).round().max(1.0) as usize + 1
}

/// Largest finite value of a series, 0 for an empty one.
pub fn series_max(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}
