//! Yesterday-versus-day-before summary sent as the report message.

use chrono::NaiveDate;
use ozon_report_common::{
    format_delta, format_int, format_money, trend_icon, AdSpendByDay, DailySales,
};

/// A metric for the latest day next to the day before.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    /// Latest day.
    pub current: f64,
    /// Day before.
    pub previous: f64,
}

impl Comparison {
    /// Creates a comparison.
    pub const fn new(current: f64, previous: f64) -> Self {
        Self { current, previous }
    }

    /// `current - previous`.
    pub fn delta(&self) -> f64 {
        self.current - self.previous
    }

    /// Trend arrow.
    pub fn icon(&self) -> &'static str {
        trend_icon(self.current, self.previous)
    }
}

/// Metrics of the last two reported days.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailySummary {
    /// Latest reported day ("yesterday").
    pub date: NaiveDate,
    /// The day before.
    pub previous_date: NaiveDate,
    /// Ordered units.
    pub units: Comparison,
    /// Average order value.
    pub aov: Comparison,
    /// Ad spend.
    pub spend: Comparison,
    /// Cost per order.
    pub cpo: Comparison,
}

impl DailySummary {
    /// Summarizes the last two days, `None` with fewer than two days.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_data(sales: &[DailySales], spend: &AdSpendByDay) -> Option<Self> {
        let [.., previous, latest] = sales else {
            return None;
        };

        let latest_spend = spend.get(latest.date);
        let previous_spend = spend.get(previous.date);

        Some(Self {
            date: latest.date,
            previous_date: previous.date,
            units: Comparison::new(latest.units as f64, previous.units as f64),
            aov: Comparison::new(latest.average_order_value(), previous.average_order_value()),
            spend: Comparison::new(latest_spend, previous_spend),
            cpo: Comparison::new(
                latest.cost_per_order(latest_spend),
                previous.cost_per_order(previous_spend),
            ),
        })
    }

    /// Telegram Markdown message for marketplace `label`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_markdown(&self, label: &str) -> String {
        format!(
            "*Отчет за {date} (вчера)*\n\n\
             *{label}*\n\
             *Штуки:* *{units}* {units_icon} {units_delta}\n\
             Средний чек: {aov} {aov_icon} ({aov_delta:+.0} ₽)\n\
             Реклама: {spend} {spend_icon} {spend_delta}\n\
             CPO: {cpo:.1} ₽ {cpo_icon} ({cpo_delta:+.1} ₽)",
            date = self.date.format("%Y-%m-%d"),
            units = format_int(self.units.current as i64),
            units_icon = self.units.icon(),
            units_delta = format_delta(self.units.current, self.units.previous, false),
            aov = format_money(self.aov.current),
            aov_icon = self.aov.icon(),
            aov_delta = self.aov.delta(),
            spend = format_money(self.spend.current),
            spend_icon = self.spend.icon(),
            spend_delta = format_delta(self.spend.current, self.spend.previous, true),
            cpo = self.cpo.current,
            cpo_icon = self.cpo.icon(),
            cpo_delta = self.cpo.delta(),
        )
    }
}

/// Plain-text message sent when fewer than two days of sales are available.
pub fn insufficient_data_message(label: &str) -> String {
    format!("{label}: мало данных для отчёта")
}
