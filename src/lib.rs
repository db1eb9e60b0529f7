//! Exploratory analysis of loyalty-program purchase data.
//!
//! Loads a customer table and a transaction table, cleans them, joins them on
//! the loyalty card number, resolves day-offset dates and reports sales
//! totals by customer segment and by calendar period.

pub mod aggregate;
pub mod cleaner;
pub mod config;
pub mod dates;
pub mod error;
pub mod filter;
pub mod join;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod relation;
pub mod report;
pub mod schema;
pub mod utils;

// Re-export the most common types for easier use
pub use config::{AnalysisConfig, SegmentDefinition};
pub use error::{AnalysisError, Result};
pub use filter::{Expr, RecordFilter};
pub use models::{
    CustomerRecord, DayOfWeek, JoinedRecord, Lifestage, MonthName, PremiumTier, ResolvedRecord,
    TransactionRecord,
};
pub use pipeline::{run, write_artifacts};
pub use relation::Relation;
pub use report::AnalysisReport;

// Arrow types
pub use arrow::record_batch::RecordBatch;
