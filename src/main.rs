use std::sync::Arc;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use bcra_monitor::api::{
    build_http_client, BcraClient, BlueRateSource, BluelyticsClient, IndicatorSource,
    OfficialRateSource,
};
use bcra_monitor::models::{CombinedRow, Config};
use bcra_monitor::pipeline;

#[derive(Parser)]
#[command(
    name = "bcra-monitor",
    about = "Compare a BCRA monetary indicator against the official and blue USD rates"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the supported monetary indicators
    Catalog,
    /// Fetch the indicator and USD-rate series, reconcile them onto a common
    /// daily timeline and print the combined table
    Compare {
        /// Indicator id (see `catalog`)
        #[arg(long)]
        indicator: i64,
        /// Start date (YYYY-MM-DD)
        #[arg(long, default_value = "2024-01-01")]
        from: NaiveDate,
        /// End date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bcra_monitor=info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let http = build_http_client(&config)?;
    let bcra = Arc::new(BcraClient::new(http.clone(), &config));

    match cli.command {
        Command::Catalog => {
            let catalog = bcra.get_indicator_catalog().await?;
            for info in catalog {
                println!("{:>4}  {}", info.id, info.description);
            }
        }
        Command::Compare {
            indicator,
            from,
            to,
            format,
        } => {
            let to = to.unwrap_or_else(|| Utc::now().date_naive());

            let indicator_source = IndicatorSource::new(Arc::clone(&bcra), indicator)?;
            let official_source = OfficialRateSource::new(Arc::clone(&bcra));
            let blue_source = BlueRateSource::new(BluelyticsClient::new(http, &config));

            let rows = match pipeline::run_comparison(
                &indicator_source,
                &official_source,
                &blue_source,
                from,
                to,
            )
            .await
            {
                Ok(rows) => rows,
                Err(e) => {
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            };

            match format {
                OutputFormat::Table => print_table(&rows),
                OutputFormat::Csv => print_csv(&rows),
            }
        }
    }

    Ok(())
}

fn print_table(rows: &[CombinedRow]) {
    println!(
        "{:<10}  {:>16}  {:>14}  {:>14}",
        "date", "indicator", "official", "blue"
    );
    for row in rows {
        let blue = row
            .blue_rate
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<10}  {:>16.2}  {:>14.2}  {:>14}",
            row.date, row.indicator_value, row.official_rate, blue
        );
    }
}

fn print_csv(rows: &[CombinedRow]) {
    println!("date,indicator_value,official_rate,blue_rate");
    for row in rows {
        let blue = row
            .blue_rate
            .map(|v| v.to_string())
            .unwrap_or_default();
        println!(
            "{},{},{},{}",
            row.date, row.indicator_value, row.official_rate, blue
        );
    }
}
