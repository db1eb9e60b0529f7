//! Expected layouts of the customer and transaction sources
//!
//! Column names, the Arrow types each column is coerced to after cleaning,
//! and the checks the loader runs against an inferred schema.

pub mod conversions;

use std::fmt;
use std::sync::Arc;

use arrow_schema::{DataType, Field, Schema, SchemaRef};

use crate::error::{AnalysisError, Result};

/// Loyalty card number, the join key of both sources
pub const LOYALTY_CARD_NUMBER: &str = "LYLTY_CARD_NBR";
/// Customer lifestage segment
pub const LIFESTAGE: &str = "LIFESTAGE";
/// Customer premium tier
pub const PREMIUM_CUSTOMER: &str = "PREMIUM_CUSTOMER";
/// Transaction date as a day offset from 1900-01-01
pub const DATE: &str = "DATE";
/// Transaction sales amount
pub const TOTAL_SALES: &str = "TOT_SALES";

/// The two kinds of source relation the pipeline reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// Customer profiles (one row per loyalty card)
    Customer,
    /// Purchase transactions
    Transaction,
}

impl RelationKind {
    /// Columns that must be present in the source
    #[must_use]
    pub const fn required_columns(self) -> &'static [&'static str] {
        match self {
            Self::Customer => &[LOYALTY_CARD_NUMBER, LIFESTAGE, PREMIUM_CUSTOMER],
            Self::Transaction => &[LOYALTY_CARD_NUMBER, DATE, TOTAL_SALES],
        }
    }

    /// Columns holding closed categorical values
    #[must_use]
    pub const fn categorical_columns(self) -> &'static [&'static str] {
        match self {
            Self::Customer => &[LIFESTAGE, PREMIUM_CUSTOMER],
            Self::Transaction => &[],
        }
    }

    /// Schema of the required columns after type coercion
    #[must_use]
    pub fn target_schema(self) -> SchemaRef {
        let fields = match self {
            Self::Customer => vec![
                Field::new(LOYALTY_CARD_NUMBER, DataType::Int64, true),
                Field::new(LIFESTAGE, DataType::Utf8, true),
                Field::new(PREMIUM_CUSTOMER, DataType::Utf8, true),
            ],
            Self::Transaction => vec![
                Field::new(LOYALTY_CARD_NUMBER, DataType::Int64, true),
                Field::new(DATE, DataType::Int64, true),
                Field::new(TOTAL_SALES, DataType::Float64, true),
            ],
        };
        Arc::new(Schema::new(fields))
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer => f.write_str("customer"),
            Self::Transaction => f.write_str("transaction"),
        }
    }
}

/// Check that every required column of `kind` is present in `schema`
///
/// All missing columns are reported in one error.
pub fn check_required_columns(schema: &Schema, kind: RelationKind) -> Result<()> {
    let missing: Vec<&str> = kind
        .required_columns()
        .iter()
        .copied()
        .filter(|name| schema.index_of(name).is_err())
        .collect();

    match missing.as_slice() {
        [] => Ok(()),
        [column] => Err(AnalysisError::missing_column(&kind.to_string(), column)),
        columns => Err(AnalysisError::Schema(format!(
            "expected columns {} are absent from the {kind} data",
            columns.join(", ")
        ))),
    }
}
