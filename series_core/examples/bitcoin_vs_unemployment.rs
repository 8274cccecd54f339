use series_core::{DatasetLoader, DateInterval, DualAxisSeries, IndicatorJoiner, IndicatorKind};

fn main() -> series_core::Result<()> {
    let data_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/test_data");

    // Four days of bitcoin history
    let interval = DateInterval::parse(Some("2022-01-01"), Some("2022-01-04"))?;
    let bitcoin = DatasetLoader::crypto().load(
        format!("{}/bitcoin_2021-12-28_2024-04-22.csv", data_dir),
        &interval,
    )?;
    println!("Bitcoin {}:\n{}", interval, bitcoin);

    // Monthly unemployment with the matching bitcoin close attached
    let kind = IndicatorKind::Unemployment;
    let joiner = IndicatorJoiner::for_indicator(kind);
    let joined = joiner.join(
        format!("{}/unemployment_sample.csv", data_dir),
        &bitcoin,
        &DateInterval::unbounded(),
    )?;
    println!("\n{} joined:\n{}", kind.legend_label(), joined);

    let series = DualAxisSeries::from_joined(&joined, kind, joiner.config())?;
    println!("\n=== Chart Series ===");
    for (date, value) in &series.indicator_points {
        println!("  {} {}: {:.1}", date, kind.axis_label(), value);
    }
    for (date, close) in &series.close_points {
        println!("  {} Close: ${:.2}", date, close);
    }

    Ok(())
}
