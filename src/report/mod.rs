//! Analysis report and its artifacts
//!
//! The report is built from aggregator output only. It renders to console
//! text, to one SVG bar chart per grouped sum, and to `summary.json`.

pub mod chart;
pub mod console;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::aggregate::{SalesBreakdown, SegmentOutcome};
use crate::cleaner::CleaningReport;
use crate::config::ChartConfig;
use crate::dates::DateRange;
use crate::error::Result;
use crate::error::util::ensure_directory;
use crate::join::JoinSummary;
use crate::models::{DayOfWeek, Lifestage, MonthName, PremiumTier};

pub use chart::BarChart;
pub use console::render_report;

/// File name of the machine-readable summary
pub const SUMMARY_FILE: &str = "summary.json";

/// Everything the pipeline reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    #[serde(skip)]
    pub customer_preview: String,
    #[serde(skip)]
    pub transaction_preview: String,
    pub customer_cleaning: CleaningReport,
    pub transaction_cleaning: CleaningReport,
    pub join: JoinSummary,
    pub premium_distribution: Vec<(PremiumTier, usize)>,
    pub total_sales: f64,
    pub by_lifestage: SalesBreakdown<Lifestage>,
    pub by_premium: SalesBreakdown<PremiumTier>,
    pub by_day_of_week: SalesBreakdown<DayOfWeek>,
    pub by_month: SalesBreakdown<MonthName>,
    pub segments: Vec<SegmentOutcome>,
    pub date_range: Option<DateRange>,
}

impl AnalysisReport {
    /// One chart per grouped sum, paired with its file name
    #[must_use]
    pub fn charts(&self) -> Vec<(&'static str, BarChart)> {
        vec![
            (
                "sales_by_lifestage.svg",
                BarChart::from_groups(
                    &self.by_lifestage.title,
                    &self.by_lifestage.category,
                    &self.by_lifestage.sorted_descending(),
                ),
            ),
            (
                "sales_by_premium.svg",
                BarChart::from_groups(
                    &self.by_premium.title,
                    &self.by_premium.category,
                    &self.by_premium.sorted_ascending(),
                ),
            ),
            (
                "sales_by_day_of_week.svg",
                BarChart::from_breakdown(&self.by_day_of_week),
            ),
            ("sales_by_month.svg", BarChart::from_breakdown(&self.by_month)),
        ]
    }

    /// Write every chart into `dir`, returning the written paths
    pub fn write_charts(&self, dir: &Path, config: &ChartConfig) -> Result<Vec<PathBuf>> {
        ensure_directory(dir)?;
        self.charts()
            .into_iter()
            .map(|(file_name, chart)| chart.write_svg(&dir.join(file_name), config))
            .collect()
    }

    /// Write the report as pretty-printed JSON into `dir`
    pub fn write_summary(&self, dir: &Path) -> Result<PathBuf> {
        ensure_directory(dir)?;
        let path = dir.join(SUMMARY_FILE);
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, self)?;
        log::debug!("Wrote report summary to {}", path.display());
        Ok(path)
    }
}
