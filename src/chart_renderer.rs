use anyhow::{bail, Result};
use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use series_core::{DualAxisSeries, Point};
use std::ops::Range;
use std::path::{Path, PathBuf};

/// One line on a chart, with its legend entry and axis description.
#[derive(Debug, Clone)]
pub struct LabeledSeries {
    pub label: String,
    pub axis_label: String,
    pub points: Vec<Point>,
}

/// Indicator on the left y-axis, crypto close on the right, shared dates.
#[derive(Debug, Clone)]
pub struct DualAxisChart {
    pub title: String,
    pub file_stem: String,
    pub left: LabeledSeries,
    pub right: LabeledSeries,
}

impl DualAxisChart {
    pub fn from_series(series: DualAxisSeries, coin: &str) -> Self {
        let indicator = series.indicator;
        Self {
            title: format!("{} vs {} Close Price", indicator.legend_label(), coin),
            file_stem: format!("{}_{}", coin.to_lowercase(), indicator.slug()),
            left: LabeledSeries {
                label: indicator.legend_label().to_string(),
                axis_label: indicator.axis_label().to_string(),
                points: series.indicator_points,
            },
            right: LabeledSeries {
                label: format!("{} Close", coin),
                axis_label: "Close Price (USD)".to_string(),
                points: series.close_points,
            },
        }
    }

    pub fn date_range(&self) -> Option<Range<NaiveDate>> {
        let dates = self
            .left
            .points
            .iter()
            .chain(self.right.points.iter())
            .map(|(date, _)| *date);
        let min = dates.clone().min()?;
        let max = dates.max()?;
        if min == max {
            Some(min..max + Duration::days(1))
        } else {
            Some(min..max)
        }
    }
}

/// Padded y range so flat series still get a visible axis.
pub fn value_range(points: &[Point]) -> Range<f64> {
    let min = points.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    if min == max {
        return (min - 1.0)..(max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}

pub trait ChartRenderer {
    /// Draw the chart and return where it was written.
    fn render(&self, chart: &DualAxisChart) -> Result<PathBuf>;
}

pub struct PngChartRenderer {
    output_dir: PathBuf,
    size: (u32, u32),
}

impl PngChartRenderer {
    pub fn new(output_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            size: (1200, 600),
        })
    }

    fn draw(&self, output_path: &Path, chart: &DualAxisChart, dates: Range<NaiveDate>) -> Result<()> {
        let root = BitMapBackend::new(output_path, self.size).into_drawing_area();
        root.fill(&WHITE)?;

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, ("sans-serif", 30).into_font())
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .right_y_label_area_size(80)
            .build_cartesian_2d(dates.clone(), value_range(&chart.left.points))?
            .set_secondary_coord(dates, value_range(&chart.right.points));

        ctx.configure_mesh()
            .x_desc("Date")
            .y_desc(chart.left.axis_label.as_str())
            .draw()?;

        ctx.configure_secondary_axes()
            .y_desc(chart.right.axis_label.as_str())
            .draw()?;

        ctx.draw_series(LineSeries::new(chart.left.points.iter().copied(), BLUE.stroke_width(2)))?
            .label(chart.left.label.as_str())
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], &BLUE));

        ctx.draw_secondary_series(LineSeries::new(chart.right.points.iter().copied(), &RED))?
            .label(chart.right.label.as_str())
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], &RED));

        ctx.configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }
}

impl ChartRenderer for PngChartRenderer {
    fn render(&self, chart: &DualAxisChart) -> Result<PathBuf> {
        if chart.left.points.is_empty() || chart.right.points.is_empty() {
            bail!("Nothing to plot for '{}': a series has no points", chart.title);
        }
        let Some(dates) = chart.date_range() else {
            bail!("Nothing to plot for '{}'", chart.title);
        };

        let output_path = self.output_dir.join(format!("{}.png", chart.file_stem));
        self.draw(&output_path, chart, dates)?;
        Ok(output_path)
    }
}
