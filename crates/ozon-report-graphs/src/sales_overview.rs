//! Two-panel sales overview chart
//!
//! The top panel shows the average order value as translucent bars on the left
//! axis and ordered units as a line on the right axis. The bottom panel shows
//! daily ad spend as wide bars on the left axis and cost per order as narrow
//! bars on the right axis. Both panels share the `MM-DD` day axis.

use crate::axis::{fit_axis, series_max, tick_count};
use crate::series::ChartSeries;
use crate::traits::GraphRenderer;
use crate::utils::{label_at, parse_color};
use async_trait::async_trait;
use ozon_report_common::{format_int, AdSpendByDay, DailySales, ReportError, Result};
use ozon_report_config::{AxisRange, ChartConfig};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontStyle};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Half width of the AOV and ad spend bars, in day units.
const WIDE_BAR: f64 = 0.4;

/// Half width of the CPO bars.
const NARROW_BAR: f64 = 0.175;

/// Height of the reference layout the font sizes are tuned for.
const REFERENCE_HEIGHT: f64 = 1080.0;

/// Axis ranges after fitting them to the data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartAxes {
    /// Average order value axis.
    pub aov: AxisRange,
    /// Units axis.
    pub units: AxisRange,
    /// Ad spend axis.
    pub spend: AxisRange,
    /// Cost per order axis.
    pub cpo: AxisRange,
}

/// Sales and ad spend overview for the report period.
#[derive(Debug, Clone)]
pub struct SalesOverviewChart {
    config: ChartConfig,
    title: String,
    series: ChartSeries,
}

impl SalesOverviewChart {
    /// Creates the chart from already fetched sales and ad spend.
    pub fn new(
        config: &ChartConfig,
        title: impl Into<String>,
        sales: &[DailySales],
        spend: &AdSpendByDay,
    ) -> Self {
        Self {
            config: config.clone(),
            title: title.into(),
            series: ChartSeries::from_data(sales, spend),
        }
    }

    /// Chart title, e.g. `"OZON — 14 дней"`.
    pub fn title_for(label: &str, days: usize) -> String {
        format!("{label} — {days} дней")
    }

    /// The chart title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The plotted series.
    pub const fn series(&self) -> &ChartSeries {
        &self.series
    }

    /// Configured axis ranges, raised where the data exceeds them.
    pub fn axes(&self) -> ChartAxes {
        ChartAxes {
            aov: fit_axis(self.config.aov_range, series_max(&self.series.aov)),
            units: fit_axis(self.config.units_range, series_max(&self.series.units)),
            spend: fit_axis(self.config.spend_range, series_max(&self.series.spend)),
            cpo: fit_axis(self.config.cpo_range, series_max(&self.series.cpo)),
        }
    }

    fn scaled(&self, px: f64) -> f64 {
        px * f64::from(self.config.height) / REFERENCE_HEIGHT
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn scaled_u32(&self, px: f64) -> u32 {
        self.scaled(px).round().max(1.0) as u32
    }

    #[allow(clippy::cast_precision_loss)]
    fn x_range(&self) -> std::ops::Range<f64> {
        -0.5..(self.series.len() as f64 - 0.5)
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        root.fill(&parse_color(&self.config.background_color))?;

        let family = self.config.font_family.as_str();
        let root = root.titled(&self.title, (family, self.scaled(40.0)))?;
        let (_, height) = root.dim_in_pixel();
        let (upper, lower) = root.split_vertically(height * 3 / 5);

        let axes = self.axes();
        debug!("Chart axes: {:?}", axes);

        self.draw_sales_panel(&upper, &axes)?;
        self.draw_ads_panel(&lower, &axes)?;

        root.present()?;
        Ok(())
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn draw_sales_panel<DB>(&self, area: &DrawingArea<DB, Shift>, axes: &ChartAxes) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        let family = self.config.font_family.as_str();
        let label_font = (family, self.scaled(18.0));
        let desc_font = (family, self.scaled(22.0));
        let aov_axis = axes.aov;
        let units_axis = axes.units;

        let mut chart = ChartBuilder::on(area)
            .margin(self.scaled_u32(12.0))
            .x_label_area_size(self.scaled_u32(8.0))
            .y_label_area_size(self.scaled_u32(110.0))
            .right_y_label_area_size(self.scaled_u32(90.0))
            .build_cartesian_2d(self.x_range(), aov_axis.min..aov_axis.max)?
            .set_secondary_coord(self.x_range(), units_axis.min..units_axis.max);

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|_| String::new())
            .y_labels(tick_count(&aov_axis))
            .y_label_formatter(&|v| format_int(v.round() as i64))
            .y_desc("Средний чек (₽)")
            .label_style(label_font)
            .axis_desc_style(desc_font)
            .bold_line_style(BLACK.mix(0.15).stroke_width(1))
            .light_line_style(WHITE.mix(0.0).stroke_width(0))
            .draw()?;

        chart
            .configure_secondary_axes()
            .y_labels(tick_count(&units_axis))
            .y_label_formatter(&|v| format_int(v.round() as i64))
            .y_desc("Штуки")
            .label_style(label_font)
            .axis_desc_style(desc_font)
            .draw()?;

        let aov_color = parse_color(&self.config.aov_color);
        chart
            .draw_series(self.series.aov.iter().enumerate().map(|(i, v)| {
                let x = i as f64;
                let top = v.clamp(aov_axis.min, aov_axis.max);
                Rectangle::new(
                    [(x - WIDE_BAR, aov_axis.min), (x + WIDE_BAR, top)],
                    aov_color.mix(0.3).filled(),
                )
            }))?
            .label("Средний чек")
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 6), (x + 16, y + 6)], aov_color.mix(0.3).filled())
            });

        let units_color = parse_color(&self.config.units_color);
        let line_width = self.scaled_u32(3.0);
        let points: Vec<(f64, f64)> = self
            .series
            .units
            .iter()
            .enumerate()
            .map(|(i, u)| (i as f64, *u))
            .collect();

        chart
            .draw_secondary_series(LineSeries::new(
                points.iter().copied(),
                units_color.stroke_width(line_width),
            ))?
            .label("Штуки")
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 16, y)], units_color.stroke_width(line_width))
            });

        let marker = self.scaled_u32(6.0);
        chart.draw_secondary_series(
            points
                .iter()
                .map(|p| Circle::new(*p, marker, units_color.filled())),
        )?;

        if let Some(&(x, y)) = points.last() {
            let style = FontDesc::new(family.into(), self.scaled(18.0), FontStyle::Bold)
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            let offset = self.scaled(14.0) as i32;
            chart.draw_secondary_series(std::iter::once(
                EmptyElement::at((x, y)) + Text::new(format_int(y as i64), (0, -offset), style),
            ))?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font(label_font)
            .background_style(WHITE.mix(0.8).filled())
            .border_style(BLACK.mix(0.3).stroke_width(1))
            .draw()?;

        Ok(())
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn draw_ads_panel<DB>(&self, area: &DrawingArea<DB, Shift>, axes: &ChartAxes) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        let family = self.config.font_family.as_str();
        let label_font = (family, self.scaled(18.0));
        let desc_font = (family, self.scaled(22.0));
        let spend_axis = axes.spend;
        let cpo_axis = axes.cpo;
        let labels = &self.series.labels;

        let mut chart = ChartBuilder::on(area)
            .margin(self.scaled_u32(12.0))
            .x_label_area_size(self.scaled_u32(40.0))
            .y_label_area_size(self.scaled_u32(110.0))
            .right_y_label_area_size(self.scaled_u32(90.0))
            .build_cartesian_2d(self.x_range(), spend_axis.min..spend_axis.max)?
            .set_secondary_coord(self.x_range(), cpo_axis.min..cpo_axis.max);

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len() + 1)
            .x_label_formatter(&|x| label_at(labels, *x))
            .y_labels(tick_count(&spend_axis))
            .y_label_formatter(&|v| format_int(v.round() as i64))
            .y_desc("Реклама (₽)")
            .label_style(label_font)
            .axis_desc_style(desc_font)
            .bold_line_style(BLACK.mix(0.15).stroke_width(1))
            .light_line_style(WHITE.mix(0.0).stroke_width(0))
            .draw()?;

        chart
            .configure_secondary_axes()
            .y_labels(tick_count(&cpo_axis))
            .y_label_formatter(&|v| format_int(v.round() as i64))
            .y_desc("CPO (₽/шт)")
            .label_style(label_font)
            .axis_desc_style(desc_font)
            .draw()?;

        let spend_color = parse_color(&self.config.spend_color);
        chart
            .draw_series(self.series.spend.iter().enumerate().map(|(i, v)| {
                let x = i as f64;
                let top = v.clamp(spend_axis.min, spend_axis.max);
                Rectangle::new(
                    [(x - WIDE_BAR, spend_axis.min), (x + WIDE_BAR, top)],
                    spend_color.filled(),
                )
            }))?
            .label("Реклама (₽)")
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 16, y + 6)], spend_color.filled()));

        let spend_label = FontDesc::new(family.into(), self.scaled(15.0), FontStyle::Bold)
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(
            self.series
                .spend
                .iter()
                .enumerate()
                .filter(|(_, v)| **v > 0.0)
                .map(|(i, v)| {
                    let y = (v * 0.85).clamp(spend_axis.min, spend_axis.max);
                    Text::new(
                        format_int(v.round_ties_even() as i64),
                        (i as f64, y),
                        spend_label.clone(),
                    )
                }),
        )?;

        let cpo_color = parse_color(&self.config.cpo_color);
        chart
            .draw_secondary_series(self.series.cpo.iter().enumerate().map(|(i, v)| {
                let x = i as f64;
                let top = v.clamp(cpo_axis.min, cpo_axis.max);
                Rectangle::new(
                    [(x - NARROW_BAR, cpo_axis.min), (x + NARROW_BAR, top)],
                    cpo_color.mix(0.95).filled(),
                )
            }))?
            .label("CPO (₽/шт)")
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 8, y + 6)], cpo_color.filled()));

        let cpo_label = FontDesc::new(family.into(), self.scaled(13.0), FontStyle::Bold)
            .color(&WHITE)
            .pos(Pos::new(HPos::Center, VPos::Center));
        chart.draw_secondary_series(
            self.series
                .cpo
                .iter()
                .enumerate()
                .filter(|(_, v)| **v > 0.0)
                .map(|(i, v)| {
                    let y = (v * 0.95).clamp(cpo_axis.min, cpo_axis.max);
                    Text::new(format!("{v:.1}"), (i as f64, y), cpo_label.clone())
                }),
        )?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font(label_font)
            .background_style(WHITE.mix(0.8).filled())
            .border_style(BLACK.mix(0.3).stroke_width(1))
            .draw()?;

        Ok(())
    }
}

#[async_trait]
impl GraphRenderer for SalesOverviewChart {
    #[instrument(skip(self), fields(days = self.series.len()))]
    async fn render_to_file(&self, path: &Path) -> Result<()> {
        if self.series.is_empty() {
            return Err(ReportError::graph("No sales data to render"));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        {
            let root =
                BitMapBackend::new(path, (self.config.width, self.config.height)).into_drawing_area();
            self.draw(&root)?;
        }

        info!("Rendered sales overview chart to {}", path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sales_overview"
    }

    fn description(&self) -> &'static str {
        "Average order value and units on top, ad spend and cost per order below"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ozon_report_common::test_utils::{date, report_fixtures::two_day_sales};

    #[test]
    fn test_title_for() {
        assert_eq!(SalesOverviewChart::title_for("OZON", 14), "OZON — 14 дней");
    }

    #[test]
    fn test_axes_use_configured_defaults() {
        let sales = two_day_sales();
        let spend: AdSpendByDay = [(date(2026, 1, 19), 4800.0)].into_iter().collect();
        let chart = SalesOverviewChart::new(&ChartConfig::default(), "OZON", &sales, &spend);

        let axes = chart.axes();
        assert_eq!(axes.aov, AxisRange::new(500.0, 1000.0, 100.0));
        assert_eq!(axes.units, AxisRange::new(0.0, 500.0, 50.0));
        assert_eq!(axes.spend, AxisRange::new(0.0, 20000.0, 5000.0));
        assert_eq!(axes.cpo, AxisRange::new(20.0, 80.0, 10.0));
    }

    #[test]
    fn test_axes_expand_for_large_values() {
        let sales = vec![
            DailySales::new(date(2026, 1, 18), 1_500_000.0, 1200),
            DailySales::new(date(2026, 1, 19), 1_200_000.0, 1000),
        ];
        let spend: AdSpendByDay = [(date(2026, 1, 18), 150_000.0)].into_iter().collect();
        let chart = SalesOverviewChart::new(&ChartConfig::default(), "OZON", &sales, &spend);

        let axes = chart.axes();
        assert_eq!(axes.aov.max, 1500.0);
        assert_eq!(axes.units.max, 1500.0);
        assert_eq!(axes.spend.max, 160_000.0);
        assert_eq!(axes.cpo.max, 150.0);
    }

    #[test]
    fn test_renderer_metadata() {
        let chart = SalesOverviewChart::new(
            &ChartConfig::default(),
            "OZON",
            &two_day_sales(),
            &AdSpendByDay::new(),
        );
        assert_eq!(chart.name(), "sales_overview");
        assert!(!chart.description().is_empty());
        assert_eq!(chart.title(), "OZON");
        assert_eq!(chart.series().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_chart_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        let chart = SalesOverviewChart::new(&ChartConfig::default(), "OZON", &[], &AdSpendByDay::new());

        let err = chart.render_to_file(&path).await.unwrap_err();
        assert!(matches!(err, ReportError::Graph { .. }));
        assert!(!path.exists());
    }
}
