use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use hpge_chains::analysis::{compute_significance, process_reports, PairKey};
use hpge_chains::data::{loader, writer};
use hpge_chains::Config;

/// Extract one activity per decay chain from HPGe reports and compare
/// a/b replicates.
#[derive(Parser, Debug)]
#[command(name = "hpge-chains")]
#[command(version)]
#[command(about, long_about = None)]
struct Cli {
    /// Zip archive, directory, or single report file
    #[arg(default_value = "nids.zip")]
    input: PathBuf,

    /// Per-sample activity table (.csv, .json or .parquet)
    #[arg(
        short = 'a',
        long = "activities",
        value_name = "PATH",
        default_value = "sample_activities_one_line_updated.csv"
    )]
    activities: PathBuf,

    /// Replicate significance table (.csv, .json or .parquet)
    #[arg(
        short = 's',
        long = "significance",
        value_name = "PATH",
        default_value = "sample_ab_significance_one_line.csv"
    )]
    significance: PathBuf,

    /// JSON file overriding selection constants and file-name suffixes
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only entries ending with this suffix are read as reports
    #[arg(long = "report-suffix", value_name = "SUFFIX")]
    report_suffix: Option<String>,

    /// File-name tail after the replicate letter
    #[arg(long = "pair-suffix", value_name = "SUFFIX")]
    pair_suffix: Option<String>,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => Config::default(),
        };
        if let Some(suffix) = &self.report_suffix {
            config.report_suffix = suffix.clone();
        }
        if let Some(suffix) = &self.pair_suffix {
            config.pair_suffix = suffix.clone();
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.config()?;
    log::debug!("{config:?}");

    let reports = loader::load_reports(&cli.input, &config)
        .with_context(|| format!("reading reports from {}", cli.input.display()))?;
    if reports.is_empty() {
        log::warn!(
            "no entries ending in {} found in {}",
            config.report_suffix,
            cli.input.display()
        );
    }

    let rows = process_reports(&reports, &config);
    writer::write_sample_rows(&cli.activities, &rows)
        .with_context(|| format!("writing {}", cli.activities.display()))?;

    let key = PairKey::new(&config.pair_suffix).context("building pair pattern")?;
    let significance = compute_significance(&rows, &key);
    writer::write_significance(&cli.significance, &significance)
        .with_context(|| format!("writing {}", cli.significance.display()))?;

    log::info!(
        "{} samples, {} activity rows, {} replicate comparisons",
        reports.len(),
        rows.len(),
        significance.len()
    );
    Ok(())
}
