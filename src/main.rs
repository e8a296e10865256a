use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod classify;
mod dataset;
mod models;
mod report;
mod signals;
mod summary;
mod trends;

use models::CompositeRow;

#[derive(Parser)]
#[command(name = "labor-market-signals")]
#[command(about = "Composite labor market condition signals from public series", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute composite signal rows from a long-form series CSV
    Signals {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value = "2019-12-01")]
        baseline: NaiveDate,
        #[arg(long, default_value_t = 12)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Scan recent months for trend signals and alerts
    Trends {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value = "2019-12-01")]
        baseline: NaiveDate,
        #[arg(long, default_value_t = trends::DEFAULT_TREND_WINDOW)]
        window: usize,
    },
    /// Executive summary of the latest month
    Summary {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value = "2019-12-01")]
        baseline: NaiveDate,
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value = "2019-12-01")]
        baseline: NaiveDate,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn load_composites(csv: &Path, baseline: NaiveDate) -> anyhow::Result<Vec<CompositeRow>> {
    let observations = dataset::load_observations(csv)
        .with_context(|| format!("failed to read observations from {}", csv.display()))?;
    let rows = dataset::build_period_rows(&observations, baseline);
    let composites = signals::compute_signals(&rows)?;
    Ok(composites)
}

fn fmt_score(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.2}"),
        None => "n/a".to_string(),
    }
}

fn fmt_label<T: std::fmt::Display>(value: Option<T>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "UNCLASSIFIED".to_string(),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Signals {
            csv,
            baseline,
            limit,
            json,
        } => {
            let composites = load_composites(&csv, baseline)?;
            let start = composites.len().saturating_sub(limit.max(1));
            if json {
                println!("{}", serde_json::to_string_pretty(&composites[start..])?);
            } else {
                for row in composites[start..].iter() {
                    println!(
                        "- {}: EPI {}, velocity {}, {}",
                        row.row.date.format("%Y-%m"),
                        fmt_score(row.employer_power_index),
                        fmt_score(row.talent_velocity),
                        fmt_label(row.market_state)
                    );
                }
            }
        }
        Commands::Trends {
            csv,
            baseline,
            window,
        } => {
            let composites = load_composites(&csv, baseline)?;
            let trend_signals = trends::detect_trends(&composites, window);
            println!("{}", trend_signals.summary);

            let alerts = trends::latest_alerts(&composites);
            if alerts.is_empty() {
                println!("No significant market disruptions detected.");
            } else {
                for alert in alerts.iter() {
                    println!("- {alert}");
                }
            }
        }
        Commands::Summary {
            csv,
            baseline,
            json,
        } => {
            let composites = load_composites(&csv, baseline)?;
            let market_summary = summary::summarize(&composites)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&market_summary)?);
            } else {
                println!("Market summary for {}", market_summary.date.format("%B %Y"));
                println!(
                    "State: {} (hiring {}, retention {})",
                    fmt_label(market_summary.market_state),
                    fmt_label(market_summary.hiring_outlook),
                    fmt_label(market_summary.retention_risk)
                );
                let epi = &market_summary.employer_power_index;
                println!(
                    "EPI {} (MoM {:+.1}%, YoY {:+.1}%)",
                    fmt_score(epi.value),
                    epi.mom_change,
                    epi.yoy_change
                );
                let velocity = &market_summary.talent_velocity;
                println!(
                    "Velocity {} (MoM {:+.1}%, YoY {:+.1}%)",
                    fmt_score(velocity.value),
                    velocity.mom_change,
                    velocity.yoy_change
                );
                let unemp = &market_summary.unemployment_rate;
                println!(
                    "Unemployment {} (MoM {:+.1}pp, YoY {:+.1}pp)",
                    match unemp.value {
                        Some(value) => format!("{value:.1}%"),
                        None => "n/a".to_string(),
                    },
                    unemp.mom_change,
                    unemp.yoy_change
                );
            }
        }
        Commands::Report { csv, baseline, out } => {
            let composites = load_composites(&csv, baseline)?;
            let market_summary = summary::summarize(&composites)?;
            let trend_signals = trends::detect_trends(&composites, trends::DEFAULT_TREND_WINDOW);
            let alerts = trends::latest_alerts(&composites);
            let report = report::build_report(&market_summary, &composites, &trend_signals, &alerts);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
