//! Expression-based segment selection
//!
//! A segment is the subset of resolved records matching an `Expr`. Expressions
//! are serializable so that segments can be declared in a configuration file.

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::models::{DayOfWeek, Lifestage, MonthName, PremiumTier, ResolvedRecord};

/// Represents a predicate over the categorical attributes of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Expr {
    /// Lifestage equals a value
    Lifestage(Lifestage),

    /// Premium tier equals a value
    Premium(PremiumTier),

    /// Lifestage is one of a set of values
    LifestageIn(Vec<Lifestage>),

    /// Premium tier is one of a set of values
    PremiumIn(Vec<PremiumTier>),

    /// Purchase fell on a day of the week
    DayOfWeek(DayOfWeek),

    /// Purchase fell in a month
    Month(MonthName),

    /// Logical AND of expressions
    And(Vec<Expr>),

    /// Logical OR of expressions
    Or(Vec<Expr>),

    /// Logical NOT of an expression
    Not(Box<Expr>),

    /// Always evaluates to true
    AlwaysTrue,

    /// Always evaluates to false
    AlwaysFalse,
}

impl Expr {
    /// Lifestage equals `stage` AND premium tier equals `tier`
    #[must_use]
    pub fn lifestage_and_premium(stage: Lifestage, tier: PremiumTier) -> Self {
        Self::And(vec![Self::Lifestage(stage), Self::Premium(tier)])
    }

    /// Evaluate the expression against one record
    ///
    /// Calendar predicates never match a record whose date is unknown.
    #[must_use]
    pub fn evaluate(&self, record: &ResolvedRecord) -> bool {
        match self {
            Self::Lifestage(stage) => record.lifestage() == *stage,
            Self::Premium(tier) => record.premium_tier() == *tier,
            Self::LifestageIn(stages) => stages.contains(&record.lifestage()),
            Self::PremiumIn(tiers) => tiers.contains(&record.premium_tier()),
            Self::DayOfWeek(day) => record.day_of_week == Some(*day),
            Self::Month(month) => record.month == Some(*month),
            Self::And(exprs) => exprs.iter().all(|e| e.evaluate(record)),
            Self::Or(exprs) => exprs.iter().any(|e| e.evaluate(record)),
            Self::Not(expr) => !expr.evaluate(record),
            Self::AlwaysTrue => true,
            Self::AlwaysFalse => false,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lifestage(stage) => write!(f, "LIFESTAGE = '{stage}'"),
            Self::Premium(tier) => write!(f, "PREMIUM_CUSTOMER = '{tier}'"),
            Self::LifestageIn(stages) => write!(
                f,
                "LIFESTAGE IN ({})",
                stages.iter().map(|s| format!("'{s}'")).join(", ")
            ),
            Self::PremiumIn(tiers) => write!(
                f,
                "PREMIUM_CUSTOMER IN ({})",
                tiers.iter().map(|t| format!("'{t}'")).join(", ")
            ),
            Self::DayOfWeek(day) => write!(f, "DAY_OF_WEEK = '{day}'"),
            Self::Month(month) => write!(f, "MONTH = '{month}'"),
            Self::And(exprs) => write!(f, "({})", exprs.iter().join(" AND ")),
            Self::Or(exprs) => write!(f, "({})", exprs.iter().join(" OR ")),
            Self::Not(expr) => write!(f, "NOT {expr}"),
            Self::AlwaysTrue => f.write_str("TRUE"),
            Self::AlwaysFalse => f.write_str("FALSE"),
        }
    }
}

/// Trait for objects that select records
pub trait RecordFilter: fmt::Debug {
    /// Whether `record` belongs to the selection
    fn matches(&self, record: &ResolvedRecord) -> bool;
}

impl RecordFilter for Expr {
    fn matches(&self, record: &ResolvedRecord) -> bool {
        self.evaluate(record)
    }
}

/// Keep the records accepted by `filter`, preserving order
#[must_use]
pub fn filter_records<'a, F: RecordFilter + ?Sized>(
    records: &'a [ResolvedRecord],
    filter: &F,
) -> Vec<&'a ResolvedRecord> {
    records.iter().filter(|r| filter.matches(r)).collect()
}
