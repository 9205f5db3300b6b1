use std::error::Error;
use std::path::Path;

use clap::Parser;
use fredash::config::AppConfig;
use fredash::db::series_archive::SeriesArchive;
use fredash::fred::FredClient;
use fredash::metrics::MetricSnapshot;
use fredash::series::{EconSeries, SeriesTable};
use log::info;
use tabled::{builder::Builder, settings::Style};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Environment name, e.g., test, prod
    #[arg(short, long, default_value = "prod")]
    env: String,
}

/// Make an ASCII table from the metric snapshots
fn ascii_table(snapshots: &[MetricSnapshot]) -> tabled::Table {
    let mut builder = Builder::new();
    builder.push_record(vec![
        "Series",
        "Reference Date",
        "Reference Value",
        "Latest Date",
        "Latest Value",
        "Change",
    ]);
    for snapshot in snapshots {
        builder.push_record(vec![
            snapshot.series.title().to_string(),
            snapshot.reference_date.to_string(),
            snapshot.reference_value.to_string(),
            snapshot.current_date.to_string(),
            snapshot.current_value.to_string(),
            format!("{}%", snapshot.percent_delta),
        ]);
    }
    let mut table = builder.build();
    table.with(Style::empty());
    table
}

/// Run this job after each monthly FRED release.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    dotenvy::from_path(Path::new(format!(".env/{}.env", args.env).as_str())).unwrap();
    let config = AppConfig::from_env()?;

    let client = FredClient::new(config.fred_api_key.clone());
    let archive = SeriesArchive {
        duckdb_path: config.duckdb_path.clone(),
    };
    let conn = archive.open()?;

    let mut snapshots = Vec::new();
    for series in EconSeries::ALL {
        let observations = client.observations(series)?;
        let table = SeriesTable::from_observations(series, observations);
        archive.replace_table(&conn, &table)?;
        snapshots.push(MetricSnapshot::compute(
            &table,
            config.reference_date(series),
        )?);
    }
    info!("Data successfully inserted into the database.");

    println!("{}", ascii_table(&snapshots));

    Ok(())
}
