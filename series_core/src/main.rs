use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::info;
use polars::prelude::*;
use series_core::{DatasetLoader, DateInterval, IndicatorJoiner, IndicatorKind, SourceConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "series_core")]
#[command(about = "Load a crypto price history and join macro indicators onto it by date")]
struct Args {
    /// Crypto price CSV (Start,End,Open,High,Low,Close,Volume,Market Cap)
    #[arg(short, long)]
    crypto: PathBuf,

    /// Indicator to join onto the crypto table
    #[arg(short, long, value_enum, requires = "indicator_path")]
    indicator: Option<Indicator>,

    /// Indicator CSV path
    #[arg(long)]
    indicator_path: Option<PathBuf>,

    /// JSON source config overriding the indicator preset
    #[arg(long)]
    source_config: Option<PathBuf>,

    /// Start date (YYYY-MM-DD), inclusive
    #[arg(long)]
    start_date: Option<String>,

    /// End date (YYYY-MM-DD), inclusive
    #[arg(long)]
    end_date: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    output: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum Indicator {
    Unemployment,
    Inflation,
    FederalRate,
    DollarIndex,
}

impl From<Indicator> for IndicatorKind {
    fn from(value: Indicator) -> Self {
        match value {
            Indicator::Unemployment => IndicatorKind::Unemployment,
            Indicator::Inflation => IndicatorKind::Inflation,
            Indicator::FederalRate => IndicatorKind::FederalRate,
            Indicator::DollarIndex => IndicatorKind::DollarIndex,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Summary,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let interval = DateInterval::parse(args.start_date.as_deref(), args.end_date.as_deref())?;
    info!("Loading {} for {}", args.crypto.display(), interval);

    let crypto = DatasetLoader::crypto().load(&args.crypto, &interval)?;

    let mut table = match (args.indicator, &args.indicator_path) {
        (Some(indicator), Some(indicator_path)) => {
            let kind = IndicatorKind::from(indicator);
            let config = match &args.source_config {
                Some(path) => SourceConfig::from_json_file(path)?,
                None => kind.source_config(),
            };
            info!("Joining {} from {}", config.name, indicator_path.display());
            IndicatorJoiner::new(config).join(indicator_path, &crypto, &interval)?
        }
        _ => crypto,
    };

    match args.output {
        OutputFormat::Json => {
            JsonWriter::new(std::io::stdout().lock())
                .with_json_format(JsonFormat::Json)
                .finish(&mut table)?;
            println!();
        }
        OutputFormat::Csv => {
            CsvWriter::new(std::io::stdout().lock()).finish(&mut table)?;
        }
        OutputFormat::Summary => {
            println!("Time Series Summary");
            println!("===================");
            println!("Source: {}", args.crypto.display());
            if interval.is_unbounded() {
                println!("Period: full history");
            } else {
                println!("Period: {}", interval);
            }
            println!("Rows: {}", table.height());
            println!();
            println!("{}", table);
        }
    }

    Ok(())
}
