//! Test utilities and shared fixtures for the report workspace.
//!
//! Enabled for dependants through the `testing` feature.

use crate::types::{AdSpendByDay, DailySales};
use chrono::{Duration, NaiveDate};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Shorthand for a calendar date in fixtures.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Sales fixtures shaped like a real two-week seller report.
pub mod report_fixtures {
    use super::*;

    /// Deterministic sales for `days` consecutive days starting at `start`.
    ///
    /// Units hover around 300 and the average check around 750 roubles, which
    /// keeps every series inside the default chart ranges.
    #[allow(clippy::cast_precision_loss)]
    pub fn sample_sales(start: NaiveDate, days: u32) -> Vec<DailySales> {
        (0..days)
            .map(|i| {
                let units = 280 + u64::from(i * 7 % 40);
                let aov = 700.0 + f64::from(i * 13 % 90);
                DailySales::new(start + Duration::days(i64::from(i)), aov * units as f64, units)
            })
            .collect()
    }

    /// Ad spend for every sales day, roughly 40 roubles per order.
    #[allow(clippy::cast_precision_loss)]
    pub fn sample_ad_spend(sales: &[DailySales]) -> AdSpendByDay {
        sales
            .iter()
            .enumerate()
            .map(|(i, day)| (day.date, day.units as f64 * (35.0 + (i % 5) as f64 * 2.5)))
            .collect()
    }

    /// Two days with round numbers, convenient for checking message text.
    pub fn two_day_sales() -> Vec<DailySales> {
        vec![
            DailySales::new(date(2026, 1, 18), 75_000.0, 100),
            DailySales::new(date(2026, 1, 19), 96_000.0, 120),
        ]
    }
}
