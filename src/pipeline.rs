//! End-to-end analysis run
//!
//! Load, clean, join, resolve dates, aggregate, report. Each stage takes the
//! previous stage's output by reference and returns a new value.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::aggregate::{
    evaluate_segments, premium_distribution, sales_by_day_of_week, sales_by_lifestage,
    sales_by_month, sales_by_premium, total_sales,
};
use crate::cleaner::{clean_customers, clean_transactions};
use crate::config::AnalysisConfig;
use crate::dates::{date_range, resolve_dates};
use crate::error::Result;
use crate::join::left_join;
use crate::loader::{LoadOptions, load_sources};
use crate::report::AnalysisReport;
use crate::utils::logging::{StageSpinner, log_stage_complete, log_stage_start};

/// Run the whole analysis over a customer and a transaction source
///
/// # Errors
/// Loader errors abort the run. Empty segments do not; they are reported as
/// undefined.
pub fn run(
    customers_path: &Path,
    transactions_path: &Path,
    config: &AnalysisConfig,
) -> Result<AnalysisReport> {
    config.validate()?;
    let spinner = StageSpinner::start("Loading sources");

    log_stage_start("load");
    let start = Instant::now();
    let options = LoadOptions {
        infer_records: config.infer_records,
    };
    let (customers, transactions) = load_sources(customers_path, transactions_path, options)?;
    let customer_preview = customers.head(config.preview_rows)?;
    let transaction_preview = transactions.head(config.preview_rows)?;
    log_stage_complete(
        "load",
        customers.num_rows() + transactions.num_rows(),
        start.elapsed(),
    );

    spinner.stage("Cleaning");
    log_stage_start("clean");
    let start = Instant::now();
    let customers = clean_customers(&customers)?;
    let transactions = clean_transactions(&transactions)?;
    log_stage_complete(
        "clean",
        customers.records.len() + transactions.records.len(),
        start.elapsed(),
    );

    spinner.stage("Joining");
    log_stage_start("join");
    let start = Instant::now();
    let (joined, join) = left_join(&customers.records, &transactions.records);
    log_stage_complete("join", joined.len(), start.elapsed());

    spinner.stage("Resolving dates");
    log_stage_start("dates");
    let start = Instant::now();
    let resolved = resolve_dates(&joined);
    log_stage_complete("dates", resolved.len(), start.elapsed());

    spinner.stage("Aggregating");
    log_stage_start("aggregate");
    let start = Instant::now();
    let segments = evaluate_segments(&resolved, &config.segments)?;
    let report = AnalysisReport {
        customer_preview,
        transaction_preview,
        customer_cleaning: customers.report,
        transaction_cleaning: transactions.report,
        join,
        premium_distribution: premium_distribution(&resolved),
        total_sales: total_sales(&resolved),
        by_lifestage: sales_by_lifestage(&resolved),
        by_premium: sales_by_premium(&resolved),
        by_day_of_week: sales_by_day_of_week(&resolved),
        by_month: sales_by_month(&resolved),
        segments,
        date_range: date_range(&resolved),
    };
    log_stage_complete("aggregate", resolved.len(), start.elapsed());

    spinner.finish("Analysis complete");
    Ok(report)
}

/// Write the configured artifacts of a report into the configured output directory
///
/// Returns the paths written.
pub fn write_artifacts(report: &AnalysisReport, config: &AnalysisConfig) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    if config.write_charts {
        written.extend(report.write_charts(&config.output_dir, &config.chart)?);
    }
    if config.write_json {
        written.push(report.write_summary(&config.output_dir)?);
    }
    for path in &written {
        log::info!("Wrote {}", path.display());
    }
    Ok(written)
}
