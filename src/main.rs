use std::path::PathBuf;

use anyhow::{Context, bail};
use log::info;
use loyalty_insights::{AnalysisConfig, report::render_report, run, write_artifacts};

const USAGE: &str = "usage: loyalty-insights <customers> <transactions> [output-dir]";

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args_os().skip(1);
    let (Some(customers), Some(transactions)) = (args.next(), args.next()) else {
        bail!(USAGE);
    };
    let output_dir = args.next().map(PathBuf::from);
    if args.next().is_some() {
        bail!(USAGE);
    }

    let mut config = AnalysisConfig::from_env().context("Failed to load analysis configuration")?;
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }

    let (customers, transactions) = (PathBuf::from(customers), PathBuf::from(transactions));
    let report = run(&customers, &transactions, &config).with_context(|| {
        format!(
            "Analysis of {} and {} failed",
            customers.display(),
            transactions.display()
        )
    })?;

    println!("{}", render_report(&report));

    let written = write_artifacts(&report, &config).with_context(|| {
        format!("Failed to write report to {}", config.output_dir.display())
    })?;
    info!(
        "Wrote {} report files to {}",
        written.len(),
        config.output_dir.display()
    );
    Ok(())
}
