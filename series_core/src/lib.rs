pub mod data_loader;
pub mod error;
pub mod joiner;
pub mod models;
pub mod series;

pub use data_loader::DatasetLoader;
pub use error::{Result, SeriesError};
pub use joiner::IndicatorJoiner;
pub use models::{DateInterval, IndicatorKind, SourceConfig, CLOSE_COLUMN, DATE_COLUMN};
pub use series::{extract_points, DualAxisSeries, Point};
