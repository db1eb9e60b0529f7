//! Metrics for predicate-selected customer segments

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::config::SegmentDefinition;
use crate::error::{AnalysisError, Result};
use crate::filter::{Expr, filter_records};
use crate::models::ResolvedRecord;

/// Sales metrics of one segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentMetrics {
    pub name: String,
    /// Rendered predicate selecting the segment
    pub predicate: String,
    /// Selected records carrying a sale
    pub purchases: usize,
    /// Distinct loyalty cards in the segment, with or without a purchase
    pub customers: usize,
    pub total_sales: f64,
    /// Mean sale per purchase
    pub mean_sales: f64,
    /// Purchases per distinct customer in the segment
    pub purchase_frequency: f64,
}

/// Result of evaluating a configured segment
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SegmentOutcome {
    Metrics(SegmentMetrics),
    /// No record with a sale matched; carries the segment name and reason
    Undefined { name: String, reason: String },
}

impl SegmentOutcome {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Metrics(metrics) => &metrics.name,
            Self::Undefined { name, .. } => name,
        }
    }

    #[must_use]
    pub const fn metrics(&self) -> Option<&SegmentMetrics> {
        match self {
            Self::Metrics(metrics) => Some(metrics),
            Self::Undefined { .. } => None,
        }
    }
}

/// Compute total, mean and purchase frequency over the records matching `expr`
///
/// Only records with a non-null sale count as purchases. Every selected card
/// counts as a customer, including customers who never bought anything.
///
/// # Errors
/// `EmptySegment` when no purchase matches.
pub fn segment_metrics(
    records: &[ResolvedRecord],
    name: &str,
    expr: &Expr,
) -> Result<SegmentMetrics> {
    let selected = filter_records(records, expr);

    let mut cards = FxHashSet::default();
    let mut purchases = 0usize;
    let mut total_sales = 0.0;
    for record in selected {
        cards.insert(record.loyalty_card_number());
        if let Some(sales) = record.total_sales() {
            purchases += 1;
            total_sales += sales;
        }
    }

    if purchases == 0 {
        return Err(AnalysisError::EmptySegment(format!(
            "no purchases match segment '{name}' ({expr})"
        )));
    }

    #[allow(clippy::cast_precision_loss)]
    let (mean_sales, purchase_frequency) = (
        total_sales / purchases as f64,
        purchases as f64 / cards.len() as f64,
    );

    Ok(SegmentMetrics {
        name: name.to_string(),
        predicate: expr.to_string(),
        purchases,
        customers: cards.len(),
        total_sales,
        mean_sales,
        purchase_frequency,
    })
}

/// Evaluate every configured segment, turning empty segments into `Undefined`
///
/// # Errors
/// Any error other than `EmptySegment`.
pub fn evaluate_segments(
    records: &[ResolvedRecord],
    segments: &[SegmentDefinition],
) -> Result<Vec<SegmentOutcome>> {
    segments
        .iter()
        .map(
            |segment| match segment_metrics(records, &segment.name, &segment.expr) {
                Ok(metrics) => Ok(SegmentOutcome::Metrics(metrics)),
                Err(AnalysisError::EmptySegment(reason)) => {
                    log::warn!("Segment '{}' is undefined: {reason}", segment.name);
                    Ok(SegmentOutcome::Undefined {
                        name: segment.name.clone(),
                        reason,
                    })
                }
                Err(e) => Err(e),
            },
        )
        .collect()
}
