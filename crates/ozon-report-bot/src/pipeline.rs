//! The daily report job: fetch, summarize, render, deliver.

use crate::error::{BotError, BotResult};
use crate::sources::{AdSpendSource, ChartRenderer, SalesChartRenderer, SalesSource};
use crate::summary::{insufficient_data_message, DailySummary};
use crate::telegram::{DryRunNotifier, Notifier, ParseMode, TelegramClient};
use chrono::NaiveDate;
use ozon_report_api::{PerformanceClient, SellerClient};
use ozon_report_common::{AdSpendByDay, DailySales, ReportWindow};
use ozon_report_config::{Config, ReportConfig};
use ozon_report_graphs::SalesOverviewChart;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

/// Report settings the job needs at run time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    /// Length of the trailing window.
    pub days: u32,
    /// Marketplace label used in the message and chart title.
    pub label: String,
    /// Where the chart is written.
    pub chart_path: PathBuf,
}

impl From<&ReportConfig> for ReportSettings {
    fn from(config: &ReportConfig) -> Self {
        Self {
            days: config.days,
            label: config.marketplace_label.clone(),
            chart_path: config.chart_path(),
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Fewer than two days of sales; only a notice was sent.
    InsufficientData {
        /// Days actually returned.
        days: usize,
    },
    /// Summary and chart were delivered.
    Delivered {
        /// Path of the rendered chart.
        chart: PathBuf,
    },
}

/// One execution of the daily report.
pub struct ReportJob {
    sales: Box<dyn SalesSource>,
    ads: Option<Box<dyn AdSpendSource>>,
    notifier: Box<dyn Notifier>,
    renderer: Box<dyn ChartRenderer>,
    settings: ReportSettings,
}

impl ReportJob {
    /// Assembles a job from its stages. `ads == None` disables ad spend.
    pub fn new(
        sales: Box<dyn SalesSource>,
        ads: Option<Box<dyn AdSpendSource>>,
        notifier: Box<dyn Notifier>,
        renderer: Box<dyn ChartRenderer>,
        settings: ReportSettings,
    ) -> Self {
        Self {
            sales,
            ads,
            notifier,
            renderer,
            settings,
        }
    }

    /// Builds the production job. With `dry_run` nothing is sent to Telegram.
    pub fn from_config(config: &Config, dry_run: bool) -> BotResult<Self> {
        let sales = Box::new(SellerClient::new(&config.seller)?);

        let ads: Option<Box<dyn AdSpendSource>> = if config.ads.enabled {
            Some(Box::new(PerformanceClient::new(&config.ads)?))
        } else {
            info!("Ad spend disabled");
            None
        };

        let notifier: Box<dyn Notifier> = if dry_run {
            Box::new(DryRunNotifier)
        } else {
            Box::new(TelegramClient::new(&config.telegram)?)
        };

        Ok(Self::new(
            sales,
            ads,
            notifier,
            Box::new(SalesChartRenderer::new(config.chart.clone())),
            ReportSettings::from(&config.report),
        ))
    }

    /// Settings in use.
    pub const fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    /// Runs the report for the window ending the day before `today`.
    #[instrument(skip(self))]
    pub async fn run(&self, today: NaiveDate) -> BotResult<RunOutcome> {
        let window = ReportWindow::trailing(today, self.settings.days);
        info!("Building report for {}", window);

        let sales = self
            .sales
            .fetch_daily_sales(&window)
            .await
            .map_err(BotError::Sales)?;
        info!("Fetched {} days of sales", sales.len());

        let spend = self.fetch_spend(&sales).await;

        let Some(summary) = DailySummary::from_data(&sales, &spend) else {
            warn!("Only {} days of sales, sending notice", sales.len());
            self.notifier
                .send_text(&insufficient_data_message(&self.settings.label), None)
                .await
                .map_err(BotError::Delivery)?;
            return Ok(RunOutcome::InsufficientData { days: sales.len() });
        };

        self.notifier
            .send_text(
                &summary.to_markdown(&self.settings.label),
                Some(ParseMode::Markdown),
            )
            .await
            .map_err(BotError::Delivery)?;

        let chart = self.settings.chart_path.clone();
        let title = SalesOverviewChart::title_for(&self.settings.label, self.settings.days as usize);
        self.renderer
            .render(&title, &sales, &spend, &chart)
            .await
            .map_err(BotError::Chart)?;
        debug!("Chart written to {}", chart.display());

        self.notifier
            .send_image(&chart, "")
            .await
            .map_err(BotError::Delivery)?;

        info!("Report delivered");
        Ok(RunOutcome::Delivered { chart })
    }

    async fn fetch_spend(&self, sales: &[DailySales]) -> AdSpendByDay {
        let (Some(ads), Some(window)) = (&self.ads, ReportWindow::from_sales(sales)) else {
            return AdSpendByDay::new();
        };

        match ads.fetch_spend_by_day(&window).await {
            Ok(spend) => {
                info!("Fetched ad spend for {} days", spend.len());
                spend
            }
            Err(e) => {
                warn!("Ad spend unavailable, continuing without it: {}", e);
                AdSpendByDay::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{MockAdSpendSource, MockChartRenderer, MockSalesSource};
    use crate::telegram::MockNotifier;
    use ozon_report_common::test_utils::date;
    use ozon_report_common::test_utils::report_fixtures::{
        sample_ad_spend, sample_sales, two_day_sales,
    };
    use ozon_report_common::ReportError;

    fn settings() -> ReportSettings {
        ReportSettings {
            days: 14,
            label: "OZON".to_string(),
            chart_path: PathBuf::from("out/charts/ozon_14d.png"),
        }
    }

    fn sales_source(rows: Vec<DailySales>) -> MockSalesSource {
        let mut source = MockSalesSource::new();
        source
            .expect_fetch_daily_sales()
            .withf(|window| {
                window.date_from == date(2026, 1, 6) && window.date_to == date(2026, 1, 19)
            })
            .times(1)
            .returning(move |_| Ok(rows.clone()));
        source
    }

    fn rendering_ok() -> MockChartRenderer {
        let mut renderer = MockChartRenderer::new();
        renderer
            .expect_render()
            .times(1)
            .returning(|_, _, _, _| Ok(()));
        renderer
    }

    #[tokio::test]
    async fn test_full_report_delivered() {
        let rows = two_day_sales();
        let spend = sample_ad_spend(&rows);

        let mut ads = MockAdSpendSource::new();
        ads.expect_fetch_spend_by_day()
            .withf(|window| {
                window.date_from == date(2026, 1, 18) && window.date_to == date(2026, 1, 19)
            })
            .times(1)
            .returning(move |_| Ok(spend.clone()));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_send_text()
            .withf(|text, mode| {
                text.starts_with("*Отчет за 2026-01-19 (вчера)*") && *mode == Some(ParseMode::Markdown)
            })
            .times(1)
            .returning(|_, _| Ok(()));
        notifier
            .expect_send_image()
            .withf(|path, caption| path.ends_with("ozon_14d.png") && caption.is_empty())
            .times(1)
            .returning(|_, _| Ok(()));

        let mut renderer = MockChartRenderer::new();
        renderer
            .expect_render()
            .withf(|title, sales, spend, _| {
                title == "OZON — 14 дней" && sales.len() == 2 && spend.len() == 2
            })
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let job = ReportJob::new(
            Box::new(sales_source(rows)),
            Some(Box::new(ads)),
            Box::new(notifier),
            Box::new(renderer),
            settings(),
        );

        let outcome = job.run(date(2026, 1, 20)).await.unwrap();
        assert_eq!(
            outcome,
            RunOutcome::Delivered {
                chart: PathBuf::from("out/charts/ozon_14d.png")
            }
        );
    }

    #[tokio::test]
    async fn test_ads_failure_is_not_fatal() {
        let mut ads = MockAdSpendSource::new();
        ads.expect_fetch_spend_by_day()
            .times(1)
            .returning(|_| Err(ReportError::ads("token request failed")));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_send_text()
            .withf(|text, _| text.contains("Реклама: 0 ₽"))
            .times(1)
            .returning(|_, _| Ok(()));
        notifier.expect_send_image().times(1).returning(|_, _| Ok(()));

        let job = ReportJob::new(
            Box::new(sales_source(sample_sales(date(2026, 1, 6), 14))),
            Some(Box::new(ads)),
            Box::new(notifier),
            Box::new(rendering_ok()),
            settings(),
        );

        assert!(matches!(
            job.run(date(2026, 1, 20)).await.unwrap(),
            RunOutcome::Delivered { .. }
        ));
    }

    #[tokio::test]
    async fn test_insufficient_data_sends_notice_only() {
        let mut ads = MockAdSpendSource::new();
        ads.expect_fetch_spend_by_day()
            .times(1)
            .returning(|_| Ok(AdSpendByDay::new()));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_send_text()
            .withf(|text, mode| text == "OZON: мало данных для отчёта" && mode.is_none())
            .times(1)
            .returning(|_, _| Ok(()));
        notifier.expect_send_image().never();

        let mut renderer = MockChartRenderer::new();
        renderer.expect_render().never();

        let job = ReportJob::new(
            Box::new(sales_source(sample_sales(date(2026, 1, 19), 1))),
            Some(Box::new(ads)),
            Box::new(notifier),
            Box::new(renderer),
            settings(),
        );

        assert_eq!(
            job.run(date(2026, 1, 20)).await.unwrap(),
            RunOutcome::InsufficientData { days: 1 }
        );
    }

    #[tokio::test]
    async fn test_no_sales_skips_ads() {
        let mut ads = MockAdSpendSource::new();
        ads.expect_fetch_spend_by_day().never();

        let mut notifier = MockNotifier::new();
        notifier.expect_send_text().times(1).returning(|_, _| Ok(()));
        notifier.expect_send_image().never();

        let mut renderer = MockChartRenderer::new();
        renderer.expect_render().never();

        let job = ReportJob::new(
            Box::new(sales_source(Vec::new())),
            Some(Box::new(ads)),
            Box::new(notifier),
            Box::new(renderer),
            settings(),
        );

        assert_eq!(
            job.run(date(2026, 1, 20)).await.unwrap(),
            RunOutcome::InsufficientData { days: 0 }
        );
    }

    #[tokio::test]
    async fn test_sales_failure_is_fatal() {
        let mut sales = MockSalesSource::new();
        sales
            .expect_fetch_daily_sales()
            .times(1)
            .returning(|_| Err(ReportError::seller_with_status("HTTP 403", 403)));

        let mut notifier = MockNotifier::new();
        notifier.expect_send_text().never();
        notifier.expect_send_image().never();

        let job = ReportJob::new(
            Box::new(sales),
            None,
            Box::new(notifier),
            Box::new(MockChartRenderer::new()),
            settings(),
        );

        let err = job.run(date(2026, 1, 20)).await.unwrap_err();
        assert!(matches!(err, BotError::Sales(ref e) if e.status_code() == Some(403)));
    }

    #[tokio::test]
    async fn test_chart_failure_stops_before_photo() {
        let mut notifier = MockNotifier::new();
        notifier.expect_send_text().times(1).returning(|_, _| Ok(()));
        notifier.expect_send_image().never();

        let mut renderer = MockChartRenderer::new();
        renderer
            .expect_render()
            .times(1)
            .returning(|_, _, _, _| Err(ReportError::graph("no fonts")));

        let job = ReportJob::new(
            Box::new(sales_source(two_day_sales())),
            None,
            Box::new(notifier),
            Box::new(renderer),
            settings(),
        );

        let err = job.run(date(2026, 1, 20)).await.unwrap_err();
        assert!(matches!(err, BotError::Chart(_)));
    }

    #[tokio::test]
    async fn test_photo_delivery_failure() {
        let mut notifier = MockNotifier::new();
        notifier.expect_send_text().times(1).returning(|_, _| Ok(()));
        notifier
            .expect_send_image()
            .times(1)
            .returning(|_, _| Err(ReportError::telegram_with_code("Bad Request", 400)));

        let job = ReportJob::new(
            Box::new(sales_source(two_day_sales())),
            None,
            Box::new(notifier),
            Box::new(rendering_ok()),
            settings(),
        );

        let err = job.run(date(2026, 1, 20)).await.unwrap_err();
        assert!(matches!(err, BotError::Delivery(_)));
    }

    #[test]
    fn test_settings_from_report_config() {
        let settings = ReportSettings::from(&ReportConfig::default());
        assert_eq!(settings.days, 14);
        assert_eq!(settings.label, "OZON");
        assert_eq!(settings.chart_path, PathBuf::from("out/charts/ozon_14d.png"));
    }
}
