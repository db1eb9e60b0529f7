//! Domain models for loyalty-program analysis
//!
//! Typed records for each relation of the pipeline and the closed
//! categorical enumerations they carry.

pub mod records;
pub mod types;

pub use records::{
    CustomerRecord, JoinedRecord, ResolvedRecord, TransactionFields, TransactionRecord,
};
pub use types::{DayOfWeek, Lifestage, MonthName, PremiumTier};
