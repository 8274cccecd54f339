use anyhow::Result;
use chrono::NaiveDate;
use polars::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct DateGap {
    pub after: NaiveDate,
    pub before: NaiveDate,
    pub missing_days: i64,
}

/// Integrity checks on a loaded table, keyed on its date column.
#[derive(Debug, Clone)]
pub struct QualityReport {
    pub rows: usize,
    pub is_sorted: bool,
    pub duplicate_dates: usize,
    pub gaps: Vec<DateGap>,
    pub null_counts: Vec<(String, usize)>,
}

impl QualityReport {
    pub fn for_table(df: &DataFrame, date_column: &str) -> Result<Self> {
        let dates: Vec<NaiveDate> = df
            .column(date_column)?
            .date()?
            .as_date_iter()
            .flatten()
            .collect();

        let is_sorted = dates.windows(2).all(|w| w[0] <= w[1]);

        let duplicate_check = df
            .clone()
            .lazy()
            .group_by([col(date_column)])
            .agg([col(date_column).count().alias("count")])
            .filter(col("count").gt(lit(1)))
            .collect()?;

        // Gaps only make sense in date order
        let mut ordered = dates.clone();
        ordered.sort();
        ordered.dedup();
        let gaps = ordered
            .windows(2)
            .filter_map(|w| {
                let days = (w[1] - w[0]).num_days();
                (days > 1).then(|| DateGap {
                    after: w[0],
                    before: w[1],
                    missing_days: days - 1,
                })
            })
            .collect();

        let null_counts = df
            .get_columns()
            .iter()
            .filter(|s| s.null_count() > 0)
            .map(|s| (s.name().to_string(), s.null_count()))
            .collect();

        Ok(Self {
            rows: df.height(),
            is_sorted,
            duplicate_dates: duplicate_check.height(),
            gaps,
            null_counts,
        })
    }

    pub fn issue_count(&self) -> usize {
        usize::from(!self.is_sorted) + self.duplicate_dates + self.gaps.len()
    }

    pub fn print(&self) {
        println!("    📊 Total records: {}", self.rows);
        if self.is_sorted {
            println!("    ✅ Data is properly sorted");
        } else {
            println!("    ⚠️  Data is not sorted by date");
        }
        if self.duplicate_dates > 0 {
            println!("    ❌ Found {} duplicate dates", self.duplicate_dates);
        } else {
            println!("    ✅ No duplicates found");
        }
        if self.gaps.is_empty() {
            println!("    ✅ No gaps in daily series");
        } else {
            println!("    ⚠️  Found {} gaps in daily series", self.gaps.len());
            for gap in self.gaps.iter().take(5) {
                println!(
                    "       {} → {} ({} days missing)",
                    gap.after, gap.before, gap.missing_days
                );
            }
        }
        for (column, nulls) in &self.null_counts {
            println!("    ⚠️  {} nulls in {}", nulls, column);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use series_core::{DatasetLoader, DateInterval, IndicatorJoiner, IndicatorKind, DATE_COLUMN};

    fn fixture(name: &str) -> String {
        format!("{}/series_core/test_data/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_loaded_table_passes_sort_and_duplicate_checks() {
        let df = DatasetLoader::crypto()
            .load(fixture("bitcoin_2021-12-28_2024-04-22.csv"), &DateInterval::unbounded())
            .unwrap();
        let report = QualityReport::for_table(&df, DATE_COLUMN).unwrap();

        assert_eq!(report.rows, 15);
        assert!(report.is_sorted);
        assert_eq!(report.duplicate_dates, 0);
        assert!(report.null_counts.is_empty());
        // 2022-01-09 → 2024-04-21
        assert_eq!(report.gaps.len(), 1);
        assert_eq!(report.gaps[0].after, date(2022, 1, 9));
        assert_eq!(report.gaps[0].before, date(2024, 4, 21));
        assert_eq!(report.issue_count(), 1);
    }

    #[test]
    fn test_joined_table_reports_nulls_and_unsorted_rows() {
        let crypto = DatasetLoader::crypto()
            .load(fixture("bitcoin_2021-12-28_2024-04-22.csv"), &DateInterval::unbounded())
            .unwrap();
        let joined = IndicatorJoiner::for_indicator(IndicatorKind::DollarIndex)
            .join(fixture("dollar_index_sample.csv"), &crypto, &DateInterval::unbounded())
            .unwrap();

        let report = QualityReport::for_table(&joined, "Date").unwrap();
        assert!(!report.is_sorted);
        // 12/31 → 01/03
        assert_eq!(report.gaps.len(), 1);
        assert_eq!(report.gaps[0].missing_days, 2);
        assert!(report.null_counts.is_empty());
    }
}
