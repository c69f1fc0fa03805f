use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand};

use covid_tracker::models::{DashboardData, SkipCounts};
use covid_tracker::{aggregate, ingest, report};

#[derive(Parser)]
#[command(name = "covid-tracker")]
#[command(about = "Weekly COVID-19 behavior survey aggregation for the dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the survey CSV and emit dashboard JSON
    Fetch {
        #[arg(long, default_value = ingest::CSV_URL)]
        url: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Aggregate a local survey CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate a markdown report
    #[command(group(
        ArgGroup::new("source")
            .args(["url", "csv"])
            .multiple(false)
    ))]
    Report {
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch { url, out } => {
            let (data, skips) = load_remote(&url).await?;
            print_skips(&skips);
            emit_json(&data, out.as_deref())?;
        }
        Commands::Import { csv, out } => {
            let (data, skips) = load_local(&csv)?;
            print_skips(&skips);
            emit_json(&data, out.as_deref())?;
        }
        Commands::Report { url, csv, out } => {
            let (data, skips, source) = match csv {
                Some(path) => {
                    let (data, skips) = load_local(&path)?;
                    (data, skips, path.display().to_string())
                }
                None => {
                    let url = url.unwrap_or_else(|| ingest::CSV_URL.to_string());
                    let (data, skips) = load_remote(&url).await?;
                    (data, skips, url)
                }
            };

            let report = report::build_report(&data, &skips, &source);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

async fn load_remote(url: &str) -> anyhow::Result<(DashboardData, SkipCounts)> {
    let client = ingest::http_client().context("failed to build HTTP client")?;
    let text = ingest::fetch_csv(&client, url)
        .await
        .context("failed to fetch survey CSV")?;

    let records = ingest::parse_records(&text);
    println!("Parsed {} records from {}.", records.len(), url);
    Ok(aggregate::build_dashboard(&records))
}

fn load_local(csv: &Path) -> anyhow::Result<(DashboardData, SkipCounts)> {
    let text = std::fs::read_to_string(csv)
        .with_context(|| format!("failed to read {}", csv.display()))?;

    let records = ingest::parse_records(&text);
    println!("Parsed {} records from {}.", records.len(), csv.display());
    Ok(aggregate::build_dashboard(&records))
}

fn print_skips(skips: &SkipCounts) {
    if skips.total() > 0 {
        println!(
            "Skipped {} rows without a usable timestamp ({} missing, {} unparseable).",
            skips.total(),
            skips.missing_timestamp,
            skips.unparseable_timestamp
        );
    }
}

fn emit_json(data: &DashboardData, out: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(data)?;

    match out {
        Some(path) => {
            std::fs::write(path, json)?;
            println!("Dashboard data written to {}.", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
