use crate::error::{Result, SeriesError};
use crate::models::{IndicatorKind, SourceConfig, CLOSE_COLUMN};
use chrono::NaiveDate;
use polars::prelude::*;

pub type Point = (NaiveDate, f64);

/// Non-null (date, value) pairs of `value_column`, in table order.
pub fn extract_points(df: &DataFrame, date_column: &str, value_column: &str) -> Result<Vec<Point>> {
    for column in [date_column, value_column] {
        if df.get_column_index(column).is_none() {
            return Err(SeriesError::MissingColumn {
                column: column.to_string(),
                table: "chart source".to_string(),
            });
        }
    }

    let selected = df
        .clone()
        .lazy()
        .select([
            col(date_column),
            col(value_column).cast(DataType::Float64).alias("__value"),
        ])
        .collect()?;

    let dates = selected.column(date_column)?.date()?;
    let values = selected.column("__value")?.f64()?;
    Ok(dates
        .as_date_iter()
        .zip(values.into_iter())
        .filter_map(|(date, value)| Some((date?, value?)))
        .collect())
}

/// The two series of an indicator-vs-price comparison.
#[derive(Debug, Clone)]
pub struct DualAxisSeries {
    pub indicator: IndicatorKind,
    pub indicator_points: Vec<Point>,
    pub close_points: Vec<Point>,
}

impl DualAxisSeries {
    /// Pull both series out of a table produced by `IndicatorJoiner::join`.
    pub fn from_joined(df: &DataFrame, indicator: IndicatorKind, config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            indicator,
            indicator_points: extract_points(df, &config.date_column, &config.value_column)?,
            close_points: extract_points(df, &config.date_column, CLOSE_COLUMN)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.indicator_points.is_empty() || self.close_points.is_empty()
    }
}
