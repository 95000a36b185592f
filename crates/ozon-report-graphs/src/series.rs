//! Per-day series plotted by the sales overview chart.

use crate::utils::day_label;
use ozon_report_common::{AdSpendByDay, DailySales};

/// Aligned per-day values, one entry per sales day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    /// `MM-DD` labels.
    pub labels: Vec<String>,
    /// Average order value.
    pub aov: Vec<f64>,
    /// Ordered units.
    pub units: Vec<f64>,
    /// Ad spend; 0 for days without spend.
    pub spend: Vec<f64>,
    /// Cost per order.
    pub cpo: Vec<f64>,
}

impl ChartSeries {
    /// Builds the series from sales rows and the spend recorded for them.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_data(sales: &[DailySales], spend: &AdSpendByDay) -> Self {
        let mut series = Self::default();
        for day in sales {
            let day_spend = spend.get(day.date);
            series.labels.push(day_label(day.date));
            series.aov.push(day.average_order_value());
            series.units.push(day.units as f64);
            series.spend.push(day_spend);
            series.cpo.push(day.cost_per_order(day_spend));
        }
        series
    }

    /// Number of days.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether there is nothing to plot.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
