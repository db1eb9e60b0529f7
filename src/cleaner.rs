//! Cleaning of source relations
//!
//! Cleaning runs in a fixed order:
//!
//! 1. rows holding a null in any column are removed;
//! 2. exact duplicate rows are removed, keeping the first occurrence;
//! 3. the required columns are coerced to their typed form.
//!
//! Coercion happens after the null pass, so a value that fails to parse
//! becomes `None` in the typed record and is not retracted. The join key is
//! the exception: a row whose `LYLTY_CARD_NBR` cannot be read as an integer
//! is dropped. Customer rows must also carry valid categories, and only the
//! first row per loyalty card is kept.

use arrow::array::{Array, BooleanArray};
use arrow::compute::{and, filter_record_batch, is_not_null};
use arrow::row::{RowConverter, SortField};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::models::{CustomerRecord, Lifestage, PremiumTier, TransactionRecord};
use crate::relation::Relation;
use crate::schema::conversions::{ColumnCoercion, coerce_to_target};
use crate::schema::{LIFESTAGE, PREMIUM_CUSTOMER, RelationKind};
use crate::utils::logging::log_warning;

/// Diagnostics emitted while cleaning one relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub relation: String,
    /// Rows before cleaning
    pub rows_in: usize,
    /// Missing values per column before cleaning
    pub null_counts: Vec<(String, usize)>,
    /// Rows removed because they held at least one null
    pub rows_with_nulls: usize,
    /// Exact duplicate rows removed
    pub duplicates_removed: usize,
    /// Rows removed because the loyalty card number was not an integer
    pub key_parse_failures: usize,
    /// Values per column that failed coercion
    pub value_parse_failures: Vec<(String, usize)>,
    /// Customer rows removed because their card was already seen
    pub conflicting_keys: usize,
    /// Typed records produced
    pub rows_out: usize,
}

impl CleaningReport {
    fn new(relation: &Relation) -> Self {
        Self {
            relation: relation.kind().to_string(),
            rows_in: relation.num_rows(),
            null_counts: relation.null_counts(),
            rows_with_nulls: 0,
            duplicates_removed: 0,
            key_parse_failures: 0,
            value_parse_failures: Vec::new(),
            conflicting_keys: 0,
            rows_out: 0,
        }
    }

    /// Total number of missing values found before cleaning
    #[must_use]
    pub fn total_nulls(&self) -> usize {
        self.null_counts.iter().map(|(_, n)| n).sum()
    }

    fn log(&self) {
        log::info!(
            "Missing values in {} data: {} across {} rows",
            self.relation,
            self.total_nulls(),
            self.rows_with_nulls
        );
        for (column, count) in self.null_counts.iter().filter(|(_, n)| *n > 0) {
            log::debug!("  {column}: {count} missing");
        }
        log::info!(
            "Duplicates in {} data: {}",
            self.relation,
            self.duplicates_removed
        );
        for (column, count) in self.value_parse_failures.iter().filter(|(_, n)| *n > 0) {
            log_warning(
                &format!(
                    "{count} values in column '{column}' of the {} data could not be parsed",
                    self.relation
                ),
                None,
            );
        }
        if self.conflicting_keys > 0 {
            log_warning(
                &format!(
                    "{} customer rows repeat an earlier loyalty card with different attributes and were dropped",
                    self.conflicting_keys
                ),
                None,
            );
        }
    }
}

/// Typed records together with the report of how they were cleaned
#[derive(Debug, Clone)]
pub struct Cleaned<T> {
    pub records: Vec<T>,
    pub report: CleaningReport,
}

/// Remove every row holding a null in any column
///
/// Returns the filtered relation and the number of rows removed.
pub fn drop_nulls(relation: &Relation) -> Result<(Relation, usize)> {
    let batch = relation.batch();
    let mut mask = BooleanArray::from(vec![true; batch.num_rows()]);
    for column in batch.columns() {
        if column.null_count() > 0 {
            mask = and(&mask, &is_not_null(column.as_ref())?)?;
        }
    }

    let kept = mask.true_count();
    let removed = batch.num_rows() - kept;
    if removed == 0 {
        return Ok((relation.clone(), 0));
    }
    let filtered = filter_record_batch(batch, &mask)?;
    Ok((relation.with_batch(filtered), removed))
}

/// Remove exact duplicate rows, keeping the first occurrence of each
///
/// Rows are compared across all columns. Returns the filtered relation and
/// the number of rows removed.
pub fn drop_duplicates(relation: &Relation) -> Result<(Relation, usize)> {
    let batch = relation.batch();
    let fields = batch
        .schema()
        .fields()
        .iter()
        .map(|f| SortField::new(f.data_type().clone()))
        .collect();
    let converter = RowConverter::new(fields)?;
    let rows = converter.convert_columns(batch.columns())?;

    let mut seen = FxHashSet::default();
    let first_seen: Vec<bool> = rows.iter().map(|row| seen.insert(row)).collect();
    let mask = BooleanArray::from(first_seen);

    let removed = batch.num_rows() - mask.true_count();
    if removed == 0 {
        return Ok((relation.clone(), 0));
    }
    let filtered = filter_record_batch(batch, &mask)?;
    Ok((relation.with_batch(filtered), removed))
}

/// Run the null and duplicate passes over a relation
pub fn clean_relation(relation: &Relation) -> Result<(Relation, CleaningReport)> {
    let mut report = CleaningReport::new(relation);

    let (without_nulls, rows_with_nulls) = drop_nulls(relation)?;
    let (deduplicated, duplicates_removed) = drop_duplicates(&without_nulls)?;

    report.rows_with_nulls = rows_with_nulls;
    report.duplicates_removed = duplicates_removed;
    report.rows_out = deduplicated.num_rows();
    Ok((deduplicated, report))
}

fn failures_by_column(coercions: &[ColumnCoercion]) -> Vec<(String, usize)> {
    coercions
        .iter()
        .map(|c| {
            if let Some(value) = &c.first_failure {
                log::debug!("First unparseable value in {}: '{value}'", c.column);
            }
            (c.column.clone(), c.failures)
        })
        .collect()
}

fn ensure_kind(relation: &Relation, expected: RelationKind) -> Result<()> {
    if relation.kind() == expected {
        Ok(())
    } else {
        Err(AnalysisError::Schema(format!(
            "expected {expected} data, got {} data",
            relation.kind()
        )))
    }
}

#[derive(Debug, Deserialize)]
struct RawCustomerRow {
    #[serde(rename = "LYLTY_CARD_NBR")]
    card: Option<i64>,
    #[serde(rename = "LIFESTAGE")]
    lifestage: Option<String>,
    #[serde(rename = "PREMIUM_CUSTOMER")]
    premium: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTransactionRow {
    #[serde(rename = "LYLTY_CARD_NBR")]
    card: Option<i64>,
    #[serde(rename = "DATE")]
    date: Option<i64>,
    #[serde(rename = "TOT_SALES")]
    sales: Option<f64>,
}

/// Clean the customer relation into one typed record per loyalty card
pub fn clean_customers(relation: &Relation) -> Result<Cleaned<CustomerRecord>> {
    ensure_kind(relation, RelationKind::Customer)?;
    let (cleaned, mut report) = clean_relation(relation)?;
    let (coerced, coercions) = coerce_to_target(cleaned.batch(), RelationKind::Customer)?;

    let rows: Vec<RawCustomerRow> = serde_arrow::from_record_batch(&coerced)
        .map_err(|e| AnalysisError::Conversion(format!("customer rows: {e}")))?;

    let mut lifestage_failures = 0;
    let mut premium_failures = 0;
    let mut seen_cards = FxHashSet::default();
    let mut records = Vec::with_capacity(rows.len());

    for row in rows {
        let Some(card) = row.card else {
            report.key_parse_failures += 1;
            continue;
        };
        let lifestage = row.lifestage.as_deref().map(str::parse::<Lifestage>);
        let premium = row.premium.as_deref().map(str::parse::<PremiumTier>);

        let (lifestage, premium_tier) = match (lifestage, premium) {
            (Some(Ok(lifestage)), Some(Ok(premium_tier))) => (lifestage, premium_tier),
            (lifestage, premium) => {
                if !matches!(lifestage, Some(Ok(_))) {
                    lifestage_failures += 1;
                }
                if !matches!(premium, Some(Ok(_))) {
                    premium_failures += 1;
                }
                continue;
            }
        };

        if !seen_cards.insert(card) {
            report.conflicting_keys += 1;
            continue;
        }
        records.push(CustomerRecord {
            loyalty_card_number: card,
            lifestage,
            premium_tier,
        });
    }

    let mut failures = failures_by_column(&coercions);
    for (column, count) in &mut failures {
        match column.as_str() {
            LIFESTAGE => *count += lifestage_failures,
            PREMIUM_CUSTOMER => *count += premium_failures,
            _ => {}
        }
    }
    report.value_parse_failures = failures;
    report.rows_out = records.len();
    report.log();

    Ok(Cleaned { records, report })
}

/// Clean the transaction relation into typed records
///
/// Dates and sales that fail to parse are kept as `None`.
pub fn clean_transactions(relation: &Relation) -> Result<Cleaned<TransactionRecord>> {
    ensure_kind(relation, RelationKind::Transaction)?;
    let (cleaned, mut report) = clean_relation(relation)?;
    let (coerced, coercions) = coerce_to_target(cleaned.batch(), RelationKind::Transaction)?;

    let rows: Vec<RawTransactionRow> = serde_arrow::from_record_batch(&coerced)
        .map_err(|e| AnalysisError::Conversion(format!("transaction rows: {e}")))?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(card) = row.card else {
            report.key_parse_failures += 1;
            continue;
        };
        records.push(TransactionRecord {
            loyalty_card_number: card,
            date: row.date,
            total_sales: row.sales,
        });
    }

    report.value_parse_failures = failures_by_column(&coercions);
    report.rows_out = records.len();
    report.log();

    Ok(Cleaned { records, report })
}
