use crate::data_loader::{
    ensure_rows, interval_predicate, parse_date_expr, read_source, validate_source_path,
};
use crate::error::{Result, SeriesError};
use crate::models::{DateInterval, IndicatorKind, SourceConfig, DATE_COLUMN};
use log::info;
use polars::prelude::*;
use std::path::Path;

/// Left-joins an indicator file onto an already loaded crypto table.
pub struct IndicatorJoiner {
    config: SourceConfig,
}

impl IndicatorJoiner {
    pub fn new(config: SourceConfig) -> Self {
        Self { config }
    }

    pub fn for_indicator(kind: IndicatorKind) -> Self {
        Self::new(kind.source_config())
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Every indicator row is kept; crypto columns are null where no crypto
    /// row shares its date. The interval applies to the indicator's date
    /// column after the join.
    pub fn join(
        &self,
        indicator_path: impl AsRef<Path>,
        crypto: &DataFrame,
        interval: &DateInterval,
    ) -> Result<DataFrame> {
        let path = validate_source_path(indicator_path.as_ref())?;
        if crypto.get_column_index(DATE_COLUMN).is_none() {
            return Err(SeriesError::MissingColumn {
                column: DATE_COLUMN.to_string(),
                table: "crypto table".to_string(),
            });
        }

        let key = self.config.date_column.as_str();
        let indicator = read_source(path, &self.config)?;

        let mut lf = indicator
            .lazy()
            .with_column(parse_date_expr(key, &self.config.date_format).alias(key))
            .join(
                crypto.clone().lazy(),
                [col(key)],
                [col(DATE_COLUMN)],
                JoinArgs::new(JoinType::Left),
            );
        if let Some(predicate) = interval_predicate(key, interval) {
            lf = lf.filter(predicate);
        }

        let joined = ensure_rows(lf.collect()?, interval)?;
        info!(
            "Joined {} {} rows onto crypto table ({} crypto rows)",
            joined.height(),
            self.config.name,
            crypto.height()
        );
        Ok(joined)
    }
}
