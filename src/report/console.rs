//! Console rendering of the analysis report

use std::fmt::Display;

use itertools::Itertools;

use crate::aggregate::{GroupTotal, SegmentOutcome};
use crate::cleaner::CleaningReport;
use crate::dates::DateRange;
use crate::join::JoinSummary;
use crate::models::PremiumTier;

use super::AnalysisReport;

/// Width in characters of the longest text bar
pub const BAR_WIDTH: usize = 40;

/// A horizontal bar of `#` proportional to `value / max`
#[must_use]
pub fn text_bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 || !value.is_finite() {
        return String::new();
    }
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = ((value / max).min(1.0) * width as f64).round() as usize;
    "#".repeat(filled)
}

fn heading(title: &str) -> String {
    format!("\n{title}\n{}", "=".repeat(title.chars().count()))
}

/// Grouped sums as an aligned table with a text bar per group
#[must_use]
pub fn render_groups<K: Display>(title: &str, groups: &[GroupTotal<K>]) -> String {
    let labels: Vec<String> = groups.iter().map(|g| g.key.to_string()).collect();
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let max = groups.iter().map(|g| g.total_sales).fold(0.0_f64, f64::max);

    let rows = groups.iter().zip(&labels).map(|(group, label)| {
        format!(
            "{label:<label_width$}  {:>12.2}  {}",
            group.total_sales,
            text_bar(group.total_sales, max, BAR_WIDTH)
        )
    });
    std::iter::once(heading(title)).chain(rows).join("\n")
}

/// Missing-value and duplicate counts of one relation
#[must_use]
pub fn render_cleaning(report: &CleaningReport) -> String {
    let mut lines = vec![heading(&format!("Missing values in {} data", report.relation))];
    lines.extend(
        report
            .null_counts
            .iter()
            .map(|(column, nulls)| format!("{column}: {nulls}")),
    );
    lines.push(format!("Rows dropped for missing values: {}", report.rows_with_nulls));
    lines.push(format!(
        "Duplicate rows in {} data: {}",
        report.relation, report.duplicates_removed
    ));

    let unparsed: Vec<String> = report
        .value_parse_failures
        .iter()
        .filter(|(_, failures)| *failures > 0)
        .map(|(column, failures)| format!("{column}: {failures}"))
        .collect();
    if report.key_parse_failures > 0 {
        lines.push(format!(
            "Rows dropped for an unreadable card number: {}",
            report.key_parse_failures
        ));
    }
    if !unparsed.is_empty() {
        lines.push(format!("Unparseable values: {}", unparsed.join(", ")));
    }
    if report.conflicting_keys > 0 {
        lines.push(format!(
            "Customer rows dropped for a repeated card number: {}",
            report.conflicting_keys
        ));
    }
    lines.push(format!("Rows after cleaning: {} of {}", report.rows_out, report.rows_in));
    lines.join("\n")
}

/// Shape of the joined relation
#[must_use]
pub fn render_join(summary: &JoinSummary) -> String {
    [
        heading("Merged data"),
        format!("Merged data shape: {} rows", summary.rows),
        format!("Customers with transactions: {}", summary.matched_customers),
        format!("Customers without transactions: {}", summary.unmatched_customers),
        format!("Transactions without a customer: {}", summary.orphan_transactions),
    ]
    .join("\n")
}

/// Record counts per premium tier
#[must_use]
pub fn render_distribution(distribution: &[(PremiumTier, usize)]) -> String {
    std::iter::once(heading("Premium customer distribution"))
        .chain(
            distribution
                .iter()
                .map(|(tier, count)| format!("{tier}: {count}")),
        )
        .join("\n")
}

/// Metrics of each configured segment, or why it is undefined
#[must_use]
pub fn render_segments(segments: &[SegmentOutcome]) -> String {
    let mut lines = vec![heading("Segments")];
    for outcome in segments {
        match outcome {
            SegmentOutcome::Metrics(m) => {
                lines.push(format!("{} {}", m.name, m.predicate));
                lines.push(format!("  Total Sales: {:.2}", m.total_sales));
                lines.push(format!("  Average Sales per Transaction: {:.2}", m.mean_sales));
                lines.push(format!(
                    "  Purchase Frequency: {:.2} ({} purchases across {} customers)",
                    m.purchase_frequency, m.purchases, m.customers
                ));
            }
            SegmentOutcome::Undefined { name, reason } => {
                lines.push(format!("{name}: undefined, {reason}"));
            }
        }
    }
    lines.join("\n")
}

/// Span of the transaction dates
#[must_use]
pub fn render_date_range(range: Option<&DateRange>) -> String {
    let body = match range {
        Some(range) => format!(
            "Date range: {} to {}\nNumber of unique dates: {}",
            range.min, range.max, range.unique_dates
        ),
        None => "No transaction carries a usable date".to_string(),
    };
    format!("{}\n{body}", heading("Dates"))
}

/// Full console report
#[must_use]
pub fn render_report(report: &AnalysisReport) -> String {
    let mut sections = vec![
        format!("{}\n{}", heading("Customer data preview"), report.customer_preview),
        format!("{}\n{}", heading("Transaction data preview"), report.transaction_preview),
        render_cleaning(&report.customer_cleaning),
        render_cleaning(&report.transaction_cleaning),
        render_join(&report.join),
        render_distribution(&report.premium_distribution),
        format!("{}\nTotal Sales: {:.2}", heading("Overall"), report.total_sales),
        render_groups(
            &report.by_lifestage.title,
            &report.by_lifestage.sorted_descending(),
        ),
        render_groups(
            &report.by_premium.title,
            &report.by_premium.sorted_ascending(),
        ),
        render_groups(&report.by_day_of_week.title, &report.by_day_of_week.groups),
        render_groups(&report.by_month.title, &report.by_month.groups),
        render_segments(&report.segments),
    ];
    sections.push(render_date_range(report.date_range.as_ref()));
    sections.join("\n")
}
