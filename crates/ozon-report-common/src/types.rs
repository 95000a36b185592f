//! Domain records shared by the API clients, the chart and the summary.

use crate::error::{ReportError, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Sales for one calendar day as reported by the seller analytics endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailySales {
    /// Calendar day
    pub date: NaiveDate,
    /// Revenue in roubles
    pub revenue: f64,
    /// Ordered units
    pub units: u64,
}

impl DailySales {
    /// Creates a new daily record.
    pub const fn new(date: NaiveDate, revenue: f64, units: u64) -> Self {
        Self {
            date,
            revenue,
            units,
        }
    }

    /// Average order value (revenue per unit), 0 when nothing was ordered.
    pub fn average_order_value(&self) -> f64 {
        per_unit(self.revenue, self.units)
    }

    /// Cost per order for the given ad spend, 0 when nothing was ordered.
    pub fn cost_per_order(&self, spend: f64) -> f64 {
        per_unit(spend, self.units)
    }
}

/// Divides `amount` by `units`, yielding 0 for zero units.
#[allow(clippy::cast_precision_loss)]
pub fn per_unit(amount: f64, units: u64) -> f64 {
    if units == 0 {
        0.0
    } else {
        amount / units as f64
    }
}

/// Advertising spend accumulated per calendar day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdSpendByDay(BTreeMap<NaiveDate, f64>);

impl AdSpendByDay {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to the spend recorded for `date`.
    pub fn add(&mut self, date: NaiveDate, amount: f64) {
        *self.0.entry(date).or_insert(0.0) += amount;
    }

    /// Spend for `date`, 0 when the day is unknown.
    pub fn get(&self, date: NaiveDate) -> f64 {
        self.0.get(&date).copied().unwrap_or(0.0)
    }

    /// Number of distinct days with recorded spend.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no spend was recorded at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates days in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.0.iter().map(|(date, spend)| (*date, *spend))
    }

    /// Sum over all days.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }
}

impl FromIterator<(NaiveDate, f64)> for AdSpendByDay {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, f64)>>(iter: I) -> Self {
        let mut spend = Self::new();
        for (date, amount) in iter {
            spend.add(date, amount);
        }
        spend
    }
}

/// Inclusive range of calendar days covered by one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    /// First day (inclusive)
    pub date_from: NaiveDate,
    /// Last day (inclusive)
    pub date_to: NaiveDate,
}

impl ReportWindow {
    /// Creates a window, rejecting ranges that end before they start.
    pub fn new(date_from: NaiveDate, date_to: NaiveDate) -> Result<Self> {
        if date_from > date_to {
            return Err(ReportError::validation(format!(
                "report window starts after it ends: {date_from} > {date_to}"
            )));
        }
        Ok(Self { date_from, date_to })
    }

    /// Window of `days` days ending yesterday relative to `today`.
    pub fn trailing(today: NaiveDate, days: u32) -> Self {
        let date_to = today - Duration::days(1);
        let date_from = date_to - Duration::days(i64::from(days.max(1) - 1));
        Self { date_from, date_to }
    }

    /// Window spanned by the first and last fetched rows.
    pub fn from_sales(rows: &[DailySales]) -> Option<Self> {
        let first = rows.first()?;
        let last = rows.last()?;
        Some(Self {
            date_from: first.date.min(last.date),
            date_to: first.date.max(last.date),
        })
    }

    /// Every date in the window, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let date_to = self.date_to;
        self.date_from
            .iter_days()
            .take_while(move |date| *date <= date_to)
    }

    /// Number of days in the window.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn len(&self) -> usize {
        (self.date_to - self.date_from).num_days() as usize + 1
    }

    /// A window always covers at least one day.
    pub const fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for ReportWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.date_from, self.date_to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_trailing_window_ends_yesterday() {
        let window = ReportWindow::trailing(date(2026, 1, 20), 14);
        assert_eq!(window.date_to, date(2026, 1, 19));
        assert_eq!(window.date_from, date(2026, 1, 6));
        assert_eq!(window.len(), 14);
        assert_eq!(window.days().count(), 14);
        assert_eq!(window.to_string(), "2026-01-06..2026-01-19");
    }

    #[test]
    fn test_trailing_window_crosses_year_boundary() {
        let window = ReportWindow::trailing(date(2026, 1, 3), 14);
        assert_eq!(window.date_from, date(2025, 12, 20));
        assert_eq!(window.date_to, date(2026, 1, 2));
    }

    #[test]
    fn test_window_rejects_inverted_range() {
        assert!(ReportWindow::new(date(2026, 1, 2), date(2026, 1, 1)).is_err());
        assert!(ReportWindow::new(date(2026, 1, 1), date(2026, 1, 1)).is_ok());
    }

    #[test]
    fn test_window_from_sales() {
        assert!(ReportWindow::from_sales(&[]).is_none());

        let rows = [
            DailySales::new(date(2026, 1, 5), 100.0, 1),
            DailySales::new(date(2026, 1, 9), 200.0, 2),
        ];
        let window = ReportWindow::from_sales(&rows).unwrap();
        assert_eq!(window.date_from, date(2026, 1, 5));
        assert_eq!(window.date_to, date(2026, 1, 9));
    }

    #[test]
    fn test_ad_spend_accumulates_per_day() {
        let mut spend = AdSpendByDay::new();
        spend.add(date(2026, 1, 1), 100.5);
        spend.add(date(2026, 1, 1), 50.25);
        spend.add(date(2026, 1, 2), 10.0);

        assert_eq!(spend.len(), 2);
        assert!((spend.get(date(2026, 1, 1)) - 150.75).abs() < 1e-9);
        assert!(spend.get(date(2026, 1, 3)).abs() < f64::EPSILON);
        assert!((spend.total() - 160.75).abs() < 1e-9);
    }

    #[test]
    fn test_ad_spend_from_iterator_sums_duplicates() {
        let spend: AdSpendByDay = vec![
            (date(2026, 1, 2), 1.0),
            (date(2026, 1, 1), 2.0),
            (date(2026, 1, 2), 3.0),
        ]
        .into_iter()
        .collect();

        let days: Vec<_> = spend.iter().collect();
        assert_eq!(days, vec![(date(2026, 1, 1), 2.0), (date(2026, 1, 2), 4.0)]);
    }

    #[test]
    fn test_derived_metrics_guard_zero_units() {
        let day = DailySales::new(date(2026, 1, 1), 1500.0, 0);
        assert!(day.average_order_value().abs() < f64::EPSILON);
        assert!(day.cost_per_order(300.0).abs() < f64::EPSILON);

        let day = DailySales::new(date(2026, 1, 1), 1500.0, 3);
        assert!((day.average_order_value() - 500.0).abs() < 1e-9);
        assert!((day.cost_per_order(300.0) - 100.0).abs() < 1e-9);
    }
}
