use crate::error::{Result, SeriesError};
use crate::models::{DateInterval, SourceConfig, DATE_COLUMN};
use log::{debug, info};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Loads a single CSV source into a date-sorted table.
pub struct DatasetLoader {
    config: SourceConfig,
}

impl DatasetLoader {
    pub fn new(config: SourceConfig) -> Self {
        Self { config }
    }

    pub fn crypto() -> Self {
        Self::new(SourceConfig::crypto())
    }

    /// Read `path`, rename its date column to `Date`, keep rows inside
    /// `interval` and sort ascending by date.
    pub fn load(&self, path: impl AsRef<Path>, interval: &DateInterval) -> Result<DataFrame> {
        let path = validate_source_path(path.as_ref())?;
        let mut df = read_source(path, &self.config)?;
        // Rename in place so `Date` keeps the source column's position
        if self.config.date_column != DATE_COLUMN {
            df.rename(&self.config.date_column, DATE_COLUMN.into())?;
        }

        let mut lf = df.lazy().with_column(
            parse_date_expr(DATE_COLUMN, &self.config.date_format).alias(DATE_COLUMN),
        );
        if let Some(predicate) = interval_predicate(DATE_COLUMN, interval) {
            lf = lf.filter(predicate);
        }

        let df = lf
            .sort_by_exprs(
                [col(DATE_COLUMN)],
                SortMultipleOptions::default()
                    .with_maintain_order(true)
                    .with_nulls_last(true),
            )
            .collect()?;

        let df = ensure_rows(df, interval)?;
        info!(
            "Loaded {} rows from {} ({})",
            df.height(),
            path,
            self.config.name
        );
        Ok(df)
    }
}

/// Rejects non-text paths before touching the filesystem, then checks the
/// file exists and can be opened.
pub(crate) fn validate_source_path(path: &Path) -> Result<&str> {
    let text = path
        .to_str()
        .ok_or_else(|| SeriesError::NonTextualPath(path.to_path_buf()))?;
    if !path.is_file() {
        return Err(SeriesError::FileNotFound(text.to_string()));
    }
    File::open(path).map_err(|source| SeriesError::Unreadable {
        path: text.to_string(),
        source,
    })?;
    Ok(text)
}

/// Raw read: skip the preamble, then drop configured columns that exist.
pub(crate) fn read_source(path: &str, config: &SourceConfig) -> Result<DataFrame> {
    debug!(
        "Reading {} (skip {} preamble rows)",
        path, config.preamble_rows
    );
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_skip_rows(config.preamble_rows)
        .try_into_reader_with_file_path(Some(path.into()))?
        .finish()?;

    if df.get_column_index(&config.date_column).is_none() {
        return Err(SeriesError::MissingColumn {
            column: config.date_column.clone(),
            table: path.to_string(),
        });
    }

    check_date_cells(&df, &config.date_column, &config.date_format, path)?;

    for column in &config.drop_columns {
        if df.get_column_index(column).is_some() {
            df = df.drop(column)?;
        }
    }
    Ok(df)
}

pub(crate) fn parse_date_expr(column: &str, format: &str) -> Expr {
    col(column)
        .cast(DataType::String)
        .str()
        .to_date(StrptimeOptions {
            format: Some(format.into()),
            ..Default::default()
        })
}

/// Reports the first non-null cell of `column` that does not match `format`.
fn check_date_cells(df: &DataFrame, column: &str, format: &str, path: &str) -> Result<()> {
    let lenient = col(column)
        .cast(DataType::String)
        .str()
        .to_date(StrptimeOptions {
            format: Some(format.into()),
            strict: false,
            ..Default::default()
        });
    let bad = df
        .clone()
        .lazy()
        .filter(col(column).is_not_null().and(lenient.is_null()))
        .select([col(column).cast(DataType::String)])
        .limit(1)
        .collect()?;

    if let Some(value) = bad.column(column)?.str()?.get(0) {
        return Err(SeriesError::InvalidDate {
            value: format!("{} (column {} in {})", value, column, path),
            format: format.to_string(),
        });
    }
    Ok(())
}

/// One predicate for every combination of bounds; `None` when unbounded.
pub(crate) fn interval_predicate(column: &str, interval: &DateInterval) -> Option<Expr> {
    let lower = interval.start.map(|start| col(column).gt_eq(lit(start)));
    let upper = interval.end.map(|end| col(column).lt_eq(lit(end)));
    match (lower, upper) {
        (Some(lower), Some(upper)) => Some(lower.and(upper)),
        (lower, upper) => lower.or(upper),
    }
}

pub(crate) fn ensure_rows(df: DataFrame, interval: &DateInterval) -> Result<DataFrame> {
    if df.height() == 0 {
        return Err(SeriesError::EmptyResult {
            interval: *interval,
        });
    }
    Ok(df)
}
