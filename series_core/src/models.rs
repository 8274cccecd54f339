use crate::error::{Result, SeriesError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Name of the date column every loaded table carries.
pub const DATE_COLUMN: &str = "Date";

/// Name of the crypto closing-price column.
pub const CLOSE_COLUMN: &str = "Close";

/// Date format used for interval bounds given on the command line.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive date range. A missing bound leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInterval {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateInterval {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(Some(start), Some(end))
    }

    /// Parse optional `YYYY-MM-DD` bounds.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        Ok(Self::new(
            start.map(parse_iso_date).transpose()?,
            end.map(parse_iso_date).transpose()?,
        ))
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// True when the two ranges share at least one day.
    pub fn overlaps(&self, other: &DateInterval) -> bool {
        let starts_before_other_ends = match (self.start, other.end) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        };
        let ends_after_other_starts = match (self.end, other.start) {
            (Some(end), Some(start)) => end >= start,
            _ => true,
        };
        starts_before_other_ends && ends_after_other_starts
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn bound(date: Option<NaiveDate>) -> String {
            date.map(|d| d.format(ISO_DATE_FORMAT).to_string())
                .unwrap_or_else(|| "None".to_string())
        }
        write!(f, "{} to {}", bound(self.start), bound(self.end))
    }
}

fn parse_iso_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT).map_err(|_| SeriesError::InvalidDate {
        value: value.to_string(),
        format: ISO_DATE_FORMAT.to_string(),
    })
}

/// Describes how one CSV source is laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub date_column: String,
    pub date_format: String,
    #[serde(default)]
    pub drop_columns: Vec<String>,
    /// Metadata lines before the header row.
    #[serde(default)]
    pub preamble_rows: usize,
    pub value_column: String,
}

impl SourceConfig {
    /// CoinMarketCap-style export: `Start,End,Open,High,Low,Close,Volume,Market Cap`.
    pub fn crypto() -> Self {
        Self {
            name: "crypto".to_string(),
            date_column: "Start".to_string(),
            date_format: ISO_DATE_FORMAT.to_string(),
            drop_columns: vec!["End".to_string()],
            preamble_rows: 0,
            value_column: CLOSE_COLUMN.to_string(),
        }
    }

    pub fn unemployment() -> Self {
        Self {
            name: "unemployment".to_string(),
            date_column: "DATE".to_string(),
            date_format: ISO_DATE_FORMAT.to_string(),
            drop_columns: vec![],
            preamble_rows: 0,
            value_column: "UNRATE".to_string(),
        }
    }

    pub fn inflation() -> Self {
        Self {
            name: "inflation".to_string(),
            date_column: "Date".to_string(),
            date_format: ISO_DATE_FORMAT.to_string(),
            drop_columns: vec![],
            preamble_rows: 4,
            value_column: "Inflation Rate".to_string(),
        }
    }

    pub fn federal_rate() -> Self {
        Self {
            name: "federal_rate".to_string(),
            date_column: "DATE".to_string(),
            date_format: ISO_DATE_FORMAT.to_string(),
            drop_columns: vec![],
            preamble_rows: 0,
            value_column: "FEDFUNDS".to_string(),
        }
    }

    /// Investing.com export: `"Date","Price","Open","High","Low","Change %"`.
    pub fn dollar_index() -> Self {
        Self {
            name: "dollar_index".to_string(),
            date_column: "Date".to_string(),
            date_format: "%m/%d/%Y".to_string(),
            drop_columns: vec![],
            preamble_rows: 0,
            value_column: "Price".to_string(),
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| SeriesError::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| SeriesError::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// Macroeconomic series that can be joined against a crypto table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorKind {
    Unemployment,
    Inflation,
    FederalRate,
    DollarIndex,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 4] = [
        IndicatorKind::Unemployment,
        IndicatorKind::Inflation,
        IndicatorKind::FederalRate,
        IndicatorKind::DollarIndex,
    ];

    pub fn source_config(&self) -> SourceConfig {
        match self {
            IndicatorKind::Unemployment => SourceConfig::unemployment(),
            IndicatorKind::Inflation => SourceConfig::inflation(),
            IndicatorKind::FederalRate => SourceConfig::federal_rate(),
            IndicatorKind::DollarIndex => SourceConfig::dollar_index(),
        }
    }

    pub fn axis_label(&self) -> &'static str {
        match self {
            IndicatorKind::Unemployment => "Unemployment Rate (%)",
            IndicatorKind::Inflation => "Inflation Rate (%)",
            IndicatorKind::FederalRate => "Federal Funds Rate (%)",
            IndicatorKind::DollarIndex => "US Dollar Index",
        }
    }

    pub fn legend_label(&self) -> &'static str {
        match self {
            IndicatorKind::Unemployment => "Unemployment Rate",
            IndicatorKind::Inflation => "Inflation Rate",
            IndicatorKind::FederalRate => "Federal Interest Rate",
            IndicatorKind::DollarIndex => "DXY Price",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            IndicatorKind::Unemployment => "unemployment",
            IndicatorKind::Inflation => "inflation",
            IndicatorKind::FederalRate => "federal_rate",
            IndicatorKind::DollarIndex => "dollar_index",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }
}
