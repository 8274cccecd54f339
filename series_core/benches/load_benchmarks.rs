use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use series_core::{DatasetLoader, DateInterval, IndicatorJoiner, IndicatorKind};
use std::io::Write;
use std::path::Path;

fn write_daily_prices(path: &Path, days: i64) {
    let base = NaiveDate::from_ymd_opt(2013, 1, 1).unwrap();
    let mut file = std::fs::File::create(path).unwrap();
    writeln!(file, "Start,End,Open,High,Low,Close,Volume,Market Cap").unwrap();

    // Newest first, like the exchange exports
    for offset in (0..days).rev() {
        let day = base + Duration::days(offset);
        let close = 100.0 + (offset % 365) as f64;
        writeln!(
            file,
            "{},{},{:.2},{:.2},{:.2},{:.2},{},{:.2}",
            day,
            day + Duration::days(1),
            close - 1.0,
            close + 2.0,
            close - 2.0,
            close,
            1_000_000 + offset,
            close * 19_000_000.0
        )
        .unwrap();
    }
}

fn write_monthly_rates(path: &Path, months: u32) {
    let mut file = std::fs::File::create(path).unwrap();
    writeln!(file, "DATE,UNRATE").unwrap();
    for month in 0..months {
        let date = NaiveDate::from_ymd_opt(2013 + (month / 12) as i32, month % 12 + 1, 1).unwrap();
        writeln!(file, "{},{:.1}", date, 3.5 + (month % 20) as f64 / 10.0).unwrap();
    }
}

fn benchmark_crypto_load(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bitcoin_2013-01-01_2024-04-22.csv");
    write_daily_prices(&path, 4_130);

    let loader = DatasetLoader::crypto();
    let interval = DateInterval::parse(Some("2020-01-01"), Some("2022-12-31")).unwrap();

    c.bench_function("load_crypto_filtered", |b| {
        b.iter(|| black_box(loader.load(&path, &interval).unwrap()));
    });

    c.bench_function("load_crypto_unbounded", |b| {
        b.iter(|| black_box(loader.load(&path, &DateInterval::unbounded()).unwrap()));
    });
}

fn benchmark_indicator_join(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let crypto_path = dir.path().join("bitcoin.csv");
    let rates_path = dir.path().join("UNRATE.csv");
    write_daily_prices(&crypto_path, 4_130);
    write_monthly_rates(&rates_path, 136);

    let crypto = DatasetLoader::crypto()
        .load(&crypto_path, &DateInterval::unbounded())
        .unwrap();
    let joiner = IndicatorJoiner::for_indicator(IndicatorKind::Unemployment);

    c.bench_function("join_unemployment", |b| {
        b.iter(|| black_box(joiner.join(&rates_path, &crypto, &DateInterval::unbounded()).unwrap()));
    });
}

criterion_group!(benches, benchmark_crypto_load, benchmark_indicator_join);
criterion_main!(benches);
