use anyhow::{bail, Result};
use series_core::{
    DatasetLoader, DateInterval, DualAxisSeries, IndicatorJoiner, IndicatorKind, DATE_COLUMN,
};
use std::path::{Path, PathBuf};

mod chart_renderer;
mod dataset_catalog;
mod quality_check;
mod table_export;

use chart_renderer::{ChartRenderer, DualAxisChart, PngChartRenderer};
use dataset_catalog::{file_name_pattern, CryptoFile};
use quality_check::QualityReport;

fn interval_from_args(args: &[String], first: usize) -> Result<DateInterval> {
    Ok(DateInterval::parse(
        args.get(first).map(String::as_str),
        args.get(first + 1).map(String::as_str),
    )?)
}

/// "bitcoin_2013-01-01_2024-04-22.csv" → "Bitcoin"
fn coin_label(path: &Path) -> Result<String> {
    let coin = match CryptoFile::from_path(path, &file_name_pattern()?) {
        Some(file) => file.coin,
        None => path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("crypto")
            .to_string(),
    };
    let mut chars = coin.chars();
    Ok(match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => coin,
    })
}

fn render_comparison(
    renderer: &dyn ChartRenderer,
    kind: IndicatorKind,
    crypto_path: &Path,
    indicator_path: &Path,
    interval: &DateInterval,
) -> Result<PathBuf> {
    println!("\n📈 {} vs {}", kind.legend_label(), crypto_path.display());
    println!("{}", "=".repeat(60));

    let crypto = DatasetLoader::crypto().load(crypto_path, interval)?;
    println!("  📊 Loaded {} crypto rows", crypto.height());

    let joiner = IndicatorJoiner::for_indicator(kind);
    let joined = joiner.join(indicator_path, &crypto, interval)?;
    println!("  🔗 Joined {} indicator rows", joined.height());

    let series = DualAxisSeries::from_joined(&joined, kind, joiner.config())?;
    let chart = DualAxisChart::from_series(series, &coin_label(crypto_path)?);
    let output = renderer.render(&chart)?;
    println!("  ✅ Saved chart to {}", output.display());
    Ok(output)
}

fn verify_data_quality(files: &[String]) -> Result<()> {
    println!("\n🔍 Data Quality Verification");
    println!("{}", "=".repeat(60));

    let loader = DatasetLoader::crypto();
    let mut total_issues = 0;

    for file in files {
        println!("\n  Verifying: {}", file);
        let df = loader.load(file, &DateInterval::unbounded())?;
        let report = QualityReport::for_table(&df, DATE_COLUMN)?;
        report.print();
        total_issues += report.issue_count();
    }

    println!("\n{}", "=".repeat(60));
    if total_issues == 0 {
        println!("✅ Data quality verification passed! No issues found.");
    } else {
        println!("⚠️  Data quality verification found {} issues", total_issues);
    }

    Ok(())
}

fn print_catalog(dir: &Path, interval: &DateInterval) -> Result<()> {
    println!("🚀 Crypto Dataset Catalog");
    println!("Using {} threads", rayon::current_num_threads());
    println!("{}", "=".repeat(60));

    let start = std::time::Instant::now();
    let load = dataset_catalog::load_all(dir, interval)?;

    println!(
        "\n{:<16} {:>8} {:>12} {:>12} {:>14}",
        "Coin", "Rows", "First", "Last", "Last Close"
    );
    println!("{}", "-".repeat(66));
    for summary in &load.summaries {
        println!(
            "{:<16} {:>8} {:>12} {:>12} {:>14}",
            summary.coin,
            summary.rows,
            summary.first_date.map(|d| d.to_string()).unwrap_or_default(),
            summary.last_date.map(|d| d.to_string()).unwrap_or_default(),
            summary
                .last_close
                .map(|c| format!("${:.2}", c))
                .unwrap_or_default(),
        );
    }

    for (path, reason) in &load.failures {
        println!("  ❌ {}: {}", path.display(), reason);
    }

    println!("\n✅ Catalog loaded in {:?}", start.elapsed());
    Ok(())
}

fn print_usage() {
    println!("Usage:");
    println!("  --chart <indicator> <crypto.csv> <indicator.csv> [start] [end]");
    println!("      indicator: unemployment | inflation | federal_rate | dollar_index");
    println!("  --catalog <directory> [start] [end]");
    println!("  --verify <crypto.csv>...");
    println!("  --export <crypto.csv> <output.csv|.parquet|.arrow> [start] [end]");
    println!("Example: --chart unemployment \"Crypto Dataset/bitcoin_2013-01-01_2024-04-22.csv\" UNRATE.csv 2020-01-01 2024-04-01");
}

fn main() -> Result<()> {
    env_logger::init();

    rayon::ThreadPoolBuilder::new()
        .num_threads(num_cpus::get())
        .build_global()?;

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 4 && args[1] == "--chart" {
        let Some(kind) = IndicatorKind::from_slug(&args[2]) else {
            bail!("Unknown indicator '{}'", args[2]);
        };
        let interval = interval_from_args(&args, 5)?;
        let renderer = PngChartRenderer::new(PathBuf::from("charts"))?;
        render_comparison(
            &renderer,
            kind,
            Path::new(&args[3]),
            Path::new(&args[4]),
            &interval,
        )?;
    } else if args.len() > 2 && args[1] == "--catalog" {
        let interval = interval_from_args(&args, 3)?;
        print_catalog(Path::new(&args[2]), &interval)?;
    } else if args.len() > 2 && args[1] == "--verify" {
        verify_data_quality(&args[2..])?;
    } else if args.len() > 3 && args[1] == "--export" {
        let interval = interval_from_args(&args, 4)?;
        let df = DatasetLoader::crypto().load(&args[2], &interval)?;
        let format = table_export::export_table(&df, Path::new(&args[3]))?;
        println!("💾 Wrote {} rows to {} ({:?})", df.height(), args[3], format);
    } else {
        print_usage();
    }

    Ok(())
}
