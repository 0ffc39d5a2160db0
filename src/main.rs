use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};

use crate::models::{DataQuality, ReportRow};

mod aggregate;
mod distribution;
mod error;
mod models;
mod parser;
mod pipeline;
mod report;
mod scoring;

#[derive(Parser)]
#[command(name = "deal-score-ranker")]
#[command(about = "Rank sales deals by composite Deal Score and forecast per-business revenue", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every deal and write the all-data and stale-deal CSV reports
    Rank {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Reference time for days since last deal (defaults to now)
        #[arg(long, value_parser = parse_as_of)]
        as_of: Option<NaiveDateTime>,
    },
    /// Print the highest scoring deals
    Score {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Reference time for days since last deal (defaults to now)
        #[arg(long, value_parser = parse_as_of)]
        as_of: Option<NaiveDateTime>,
        /// Emit report rows and data-quality counts as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn parse_as_of(raw: &str) -> Result<NaiveDateTime, String> {
    parser::parse_date(raw).ok_or_else(|| format!("unrecognised date '{raw}'"))
}

fn json_payload(quality: &DataQuality, deals: &[ReportRow]) -> serde_json::Value {
    serde_json::json!({
        "quality": quality,
        "deals": deals,
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank {
            csv,
            out_dir,
            as_of,
        } => {
            let rows = parser::read_rows(&csv)
                .with_context(|| format!("failed to load deals from {}", csv.display()))?;
            let output = pipeline::run(rows, as_of.unwrap_or_else(|| Local::now().naive_local()));
            let written = report::write_reports(&out_dir, &output.reports)?;

            println!(
                "Ranked {} deals across {} businesses.",
                output.reports.all.len(),
                output.business_count
            );
            for (path, count) in written
                .iter()
                .zip([output.reports.all.len(), output.reports.filtered.len()])
            {
                println!("Report written to {} ({count} rows).", path.display());
            }
            if !output.quality.is_clean() {
                println!(
                    "Warning: {} rows had non-numeric metrics and {} had unparseable dates; their scores may be NaN.",
                    output.quality.non_numeric_rows, output.quality.invalid_date_rows
                );
            }
        }
        Commands::Score {
            csv,
            limit,
            as_of,
            json,
        } => {
            let rows = parser::read_rows(&csv)
                .with_context(|| format!("failed to load deals from {}", csv.display()))?;
            let output = pipeline::run(rows, as_of.unwrap_or_else(|| Local::now().naive_local()));
            let top: Vec<_> = output.reports.all.iter().take(limit).cloned().collect();

            if json {
                let payload = json_payload(&output.quality, &top);
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                print!("{}", report::render_top(&top, limit));
            }
        }
    }

    Ok(())
}
