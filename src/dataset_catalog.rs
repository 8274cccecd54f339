use anyhow::Result;
use chrono::NaiveDate;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::*;
use rayon::prelude::*;
use regex::Regex;
use series_core::{DatasetLoader, DateInterval, CLOSE_COLUMN, DATE_COLUMN};
use std::path::{Path, PathBuf};

/// A price history file named `<coin>_<first-date>_<last-date>.csv`.
#[derive(Debug, Clone, PartialEq)]
pub struct CryptoFile {
    pub coin: String,
    pub coverage: DateInterval,
    pub path: PathBuf,
}

impl CryptoFile {
    pub fn from_path(path: &Path, pattern: &Regex) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let caps = pattern.captures(file_name)?;
        let start = NaiveDate::parse_from_str(&caps["start"], "%Y-%m-%d").ok()?;
        let end = NaiveDate::parse_from_str(&caps["end"], "%Y-%m-%d").ok()?;

        Some(Self {
            coin: caps["coin"].to_string(),
            coverage: DateInterval::between(start, end),
            path: path.to_path_buf(),
        })
    }

    /// False when the file name already says no row can fall in `interval`.
    pub fn covers(&self, interval: &DateInterval) -> bool {
        self.coverage.overlaps(interval)
    }
}

pub fn file_name_pattern() -> Result<Regex> {
    Ok(Regex::new(
        r"^(?P<coin>[A-Za-z0-9\-]+)_(?P<start>\d{4}-\d{2}-\d{2})_(?P<end>\d{4}-\d{2}-\d{2})\.csv$",
    )?)
}

pub fn discover(dir: &Path) -> Result<Vec<CryptoFile>> {
    let pattern = file_name_pattern()?;
    let search = dir.join("*.csv");
    let mut files: Vec<CryptoFile> = glob(&search.to_string_lossy())?
        .filter_map(|entry| entry.ok())
        .filter_map(|path| CryptoFile::from_path(&path, &pattern))
        .collect();
    files.sort_by(|a, b| a.coin.cmp(&b.coin));
    Ok(files)
}

#[derive(Debug, Clone)]
pub struct CoinSummary {
    pub coin: String,
    pub rows: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub last_close: Option<f64>,
}

impl CoinSummary {
    fn from_table(coin: &str, df: &DataFrame) -> Result<Self> {
        let dates = df.column(DATE_COLUMN)?.date()?;
        let closes = df.column(CLOSE_COLUMN)?.cast(&DataType::Float64)?;
        let closes = closes.f64()?;
        let last = df.height().saturating_sub(1);

        Ok(Self {
            coin: coin.to_string(),
            rows: df.height(),
            first_date: dates.as_date_iter().next().flatten(),
            last_date: dates.as_date_iter().last().flatten(),
            last_close: closes.get(last),
        })
    }
}

/// Per-file outcome of a catalog load.
pub struct CatalogLoad {
    pub summaries: Vec<CoinSummary>,
    pub failures: Vec<(PathBuf, String)>,
}

/// Load every catalogued file in parallel. A failing file is reported in
/// `failures` and does not stop the others.
pub fn load_all(dir: &Path, interval: &DateInterval) -> Result<CatalogLoad> {
    let files = discover(dir)?;
    println!("Found {} crypto files in {}", files.len(), dir.display());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({msg})")?,
    );

    let results: Vec<(CryptoFile, Result<CoinSummary>)> = files
        .into_par_iter()
        .map(|file| {
            pb.set_message(file.coin.clone());
            let summary = if file.covers(interval) {
                DatasetLoader::crypto()
                    .load(&file.path, interval)
                    .map_err(anyhow::Error::from)
                    .and_then(|df| CoinSummary::from_table(&file.coin, &df))
            } else {
                Err(anyhow::anyhow!(
                    "coverage {} does not reach {}",
                    file.coverage,
                    interval
                ))
            };
            pb.inc(1);
            (file, summary)
        })
        .collect();

    pb.finish_with_message("Files loaded");

    let mut summaries = Vec::new();
    let mut failures = Vec::new();
    for (file, result) in results {
        match result {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                log::warn!("Failed to load {}: {}", file.path.display(), e);
                failures.push((file.path, e.to_string()));
            }
        }
    }
    summaries.sort_by(|a, b| a.coin.cmp(&b.coin));

    Ok(CatalogLoad { summaries, failures })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const HEADER: &str = "Start,End,Open,High,Low,Close,Volume,Market Cap\n";

    fn write_prices(dir: &Path, name: &str, rows: &[(&str, f64)]) {
        let mut body = HEADER.to_string();
        for (day, close) in rows {
            body.push_str(&format!("{},{},{},{},{},{},1000,{}\n", day, day, close, close, close, close, close));
        }
        std::fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_file_name_parsing() {
        let pattern = file_name_pattern().unwrap();
        let file = CryptoFile::from_path(
            Path::new("Crypto Dataset/bitcoin_2013-01-01_2024-04-22.csv"),
            &pattern,
        )
        .unwrap();
        assert_eq!(file.coin, "bitcoin");
        assert_eq!(file.coverage, DateInterval::between(date(2013, 1, 1), date(2024, 4, 22)));

        assert!(CryptoFile::from_path(Path::new("UNRATE.csv"), &pattern).is_none());
        assert!(CryptoFile::from_path(Path::new("bitcoin_2013-13-01_2024-04-22.csv"), &pattern).is_none());
    }

    #[test]
    fn test_covers_uses_file_name_dates() {
        let file = CryptoFile::from_path(
            Path::new("ethereum_2016-01-01_2024-04-22.csv"),
            &file_name_pattern().unwrap(),
        )
        .unwrap();
        assert!(file.covers(&DateInterval::between(date(2022, 1, 1), date(2022, 1, 4))));
        assert!(!file.covers(&DateInterval::between(date(2025, 1, 1), date(2025, 1, 4))));
    }

    #[test]
    fn test_load_all_reports_failures_separately() {
        let dir = tempfile::tempdir().unwrap();
        write_prices(
            dir.path(),
            "ethereum_2022-01-01_2022-01-03.csv",
            &[("2022-01-03", 3769.7), ("2022-01-02", 3829.56), ("2022-01-01", 3682.63)],
        );
        write_prices(
            dir.path(),
            "bitcoin_2022-01-01_2022-01-02.csv",
            &[("2022-01-02", 47345.22), ("2022-01-01", 47686.81)],
        );
        write_prices(dir.path(), "solana_2020-04-10_2020-04-11.csv", &[("2020-04-10", 0.95)]);
        std::fs::write(dir.path().join("notes.csv"), "a,b\n1,2\n").unwrap();

        let interval = DateInterval::between(date(2022, 1, 1), date(2022, 1, 31));
        let load = load_all(dir.path(), &interval).unwrap();

        assert_eq!(load.summaries.len(), 2);
        let bitcoin = &load.summaries[0];
        assert_eq!(bitcoin.coin, "bitcoin");
        assert_eq!(bitcoin.rows, 2);
        assert_eq!(bitcoin.first_date, Some(date(2022, 1, 1)));
        assert_eq!(bitcoin.last_close, Some(47345.22));

        assert_eq!(load.failures.len(), 1);
        assert!(load.failures[0].0.ends_with("solana_2020-04-10_2020-04-11.csv"));
    }
}
