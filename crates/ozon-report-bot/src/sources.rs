//! Trait seams between the report job and the outside world.

use async_trait::async_trait;
use ozon_report_api::{PerformanceClient, SellerClient};
use ozon_report_common::{AdSpendByDay, DailySales, ReportWindow, Result};
use ozon_report_config::ChartConfig;
use ozon_report_graphs::{GraphRenderer, SalesOverviewChart};
use std::path::Path;

#[cfg(test)]
use mockall::automock;

/// Source of daily sales rows.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SalesSource: Send + Sync {
    /// Daily sales within `window`, ascending by date.
    async fn fetch_daily_sales(&self, window: &ReportWindow) -> Result<Vec<DailySales>>;
}

/// Source of advertising spend per day.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AdSpendSource: Send + Sync {
    /// Spend per day within `window`.
    async fn fetch_spend_by_day(&self, window: &ReportWindow) -> Result<AdSpendByDay>;
}

/// Renders the report chart to a file.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChartRenderer: Send + Sync {
    /// Draws `sales` and `spend` under `title` into `path`.
    async fn render(
        &self,
        title: &str,
        sales: &[DailySales],
        spend: &AdSpendByDay,
        path: &Path,
    ) -> Result<()>;
}

#[async_trait]
impl SalesSource for SellerClient {
    async fn fetch_daily_sales(&self, window: &ReportWindow) -> Result<Vec<DailySales>> {
        Self::fetch_daily_sales(self, window).await
    }
}

#[async_trait]
impl AdSpendSource for PerformanceClient {
    async fn fetch_spend_by_day(&self, window: &ReportWindow) -> Result<AdSpendByDay> {
        Self::fetch_spend_by_day(self, window).await
    }
}

/// [`ChartRenderer`] drawing the two-panel sales overview.
#[derive(Debug, Clone)]
pub struct SalesChartRenderer {
    config: ChartConfig,
}

impl SalesChartRenderer {
    /// Renderer using the given chart settings.
    pub const fn new(config: ChartConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ChartRenderer for SalesChartRenderer {
    async fn render(
        &self,
        title: &str,
        sales: &[DailySales],
        spend: &AdSpendByDay,
        path: &Path,
    ) -> Result<()> {
        SalesOverviewChart::new(&self.config, title, sales, spend)
            .render_to_file(path)
            .await
    }
}
