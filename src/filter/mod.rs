//! Record selection
//!
//! Predicates used to carve segments out of the resolved, joined relation.

pub mod expr;

pub use expr::{Expr, RecordFilter, filter_records};
