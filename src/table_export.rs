use anyhow::{bail, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Parquet,
    Ipc,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("csv") => Ok(ExportFormat::Csv),
            Some("parquet") => Ok(ExportFormat::Parquet),
            Some("arrow") | Some("ipc") => Ok(ExportFormat::Ipc),
            _ => bail!(
                "Unsupported export file {}: expected .csv, .parquet, .arrow or .ipc",
                path.display()
            ),
        }
    }
}

/// Write `df` to `path`, choosing the format from the extension.
pub fn export_table(df: &DataFrame, path: &Path) -> Result<ExportFormat> {
    let format = ExportFormat::from_path(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut df = df.clone();
    let file = File::create(path)?;
    match format {
        ExportFormat::Csv => {
            CsvWriter::new(file).finish(&mut df)?;
        }
        ExportFormat::Parquet => {
            ParquetWriter::new(file).finish(&mut df)?;
        }
        ExportFormat::Ipc => {
            IpcWriter::new(file).finish(&mut df)?;
        }
    }
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use series_core::{DatasetLoader, DateInterval};

    fn bitcoin() -> DataFrame {
        let path = format!(
            "{}/series_core/test_data/bitcoin_2021-12-28_2024-04-22.csv",
            env!("CARGO_MANIFEST_DIR")
        );
        DatasetLoader::crypto()
            .load(path, &DateInterval::parse(Some("2022-01-01"), Some("2022-01-04")).unwrap())
            .unwrap()
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("out/btc.CSV")).unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("btc.parquet")).unwrap(), ExportFormat::Parquet);
        assert_eq!(ExportFormat::from_path(Path::new("btc.arrow")).unwrap(), ExportFormat::Ipc);
        assert!(ExportFormat::from_path(Path::new("btc.xlsx")).is_err());
        assert!(ExportFormat::from_path(Path::new("btc")).is_err());
    }

    #[test]
    fn test_parquet_export_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/bitcoin.parquet");
        let df = bitcoin();

        export_table(&df, &path).unwrap();
        let read_back = ParquetReader::new(File::open(&path).unwrap()).finish().unwrap();
        assert!(df.equals_missing(&read_back));
    }

    #[test]
    fn test_csv_export_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bitcoin.csv");

        export_table(&bitcoin(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("Date"));
        assert!(!lines[0].contains("End"));
        assert!(lines[1].contains("2022-01-01"));
    }
}
