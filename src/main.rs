//! Builds the yearly price + headline CSV for one company.
//!
//! Configured through environment variables:
//!
//! | variable         | default                          |
//! |------------------|----------------------------------|
//! | `SG_TICKER`      | `AMZN`                           |
//! | `SG_COMPANY`     | `Amazon.com Inc.`                |
//! | `SG_START_YEAR`  | `2021`                           |
//! | `SG_END_YEAR`    | `2024`                           |
//! | `SG_KEYWORDS`    | built-in Amazon list (comma-separated to override) |
//! | `SG_OUTPUT`      | `<TICKER>_stock_gdelt_final.csv` |
//! | `SG_LOG_FILE`    | `stock_gdelt.log`                |
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::env;
use std::fs::File;
use std::sync::Mutex;

use stock_gdelt::{DatasetBuilder, SgClient, YearStatus};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_KEYWORDS: &[&str] = &[
    "AMZN",
    "Amazon",
    "Amazon.com",
    "Amazon.com Inc",
    "Jeff Bezos",
    "Andy Jassy",
    "Prime",
    "Prime Video",
    "Amazon Prime",
    "AWS",
    "Amazon Web Services",
    "Kindle",
    "Echo",
    "Alexa",
    "Fulfillment",
    "Marketplace",
    "Whole Foods",
    "retail",
    "e-commerce",
    "logistics",
    "delivery",
    "seller",
];

struct Settings {
    ticker: String,
    company: String,
    start_year: i32,
    end_year: i32,
    keywords: Vec<String>,
    output: String,
    log_file: String,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn year_var(name: &str, default: i32) -> Result<i32, String> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .map_err(|e| format!("{name}={v:?} is not a year: {e}")),
        _ => Ok(default),
    }
}

impl Settings {
    fn from_env() -> Result<Self, String> {
        let ticker = var_or("SG_TICKER", "AMZN");
        let keywords = match env::var("SG_KEYWORDS") {
            Ok(list) if !list.trim().is_empty() => list
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect(),
            _ => DEFAULT_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
        };
        let default_output = format!("{ticker}_stock_gdelt_final.csv");
        Ok(Self {
            company: var_or("SG_COMPANY", "Amazon.com Inc."),
            start_year: year_var("SG_START_YEAR", 2021)?,
            end_year: year_var("SG_END_YEAR", 2024)?,
            keywords,
            output: var_or("SG_OUTPUT", &default_output),
            log_file: var_or("SG_LOG_FILE", "stock_gdelt.log"),
            ticker,
        })
    }
}

fn init_logging(log_file: &str) -> std::io::Result<()> {
    let file = File::create(log_file)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    init_logging(&settings.log_file)?;

    let client = SgClient::builder().build()?;
    let summary = DatasetBuilder::new(&client, &settings.ticker, &settings.company)
        .keywords(settings.keywords)
        .years(settings.start_year, settings.end_year)
        .output(&settings.output)
        .run()
        .await?;

    for year in &summary.years {
        match &year.status {
            YearStatus::Written => tracing::info!(
                year = year.year,
                rows = year.rows,
                days_with_news = year.days_with_news,
                "year written"
            ),
            YearStatus::Skipped(reason) => {
                tracing::warn!(year = year.year, %reason, "year skipped");
            }
        }
    }
    tracing::info!(
        rows = summary.rows_written(),
        output = %summary.output.display(),
        "dataset complete"
    );
    Ok(())
}
