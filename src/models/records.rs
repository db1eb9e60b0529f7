//! Typed rows of the customer, transaction and joined relations

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::types::{DayOfWeek, Lifestage, MonthName, PremiumTier};

/// One loyalty-card holder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CustomerRecord {
    pub loyalty_card_number: i64,
    pub lifestage: Lifestage,
    pub premium_tier: PremiumTier,
}

/// One purchase made with a loyalty card
///
/// `date` is a day offset from 1900-01-01. `date` and `total_sales` are only
/// `None` when the raw value could not be coerced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub loyalty_card_number: i64,
    pub date: Option<i64>,
    pub total_sales: Option<f64>,
}

/// Transaction columns carried by a joined row
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransactionFields {
    pub date: Option<i64>,
    pub total_sales: Option<f64>,
}

impl From<&TransactionRecord> for TransactionFields {
    fn from(tx: &TransactionRecord) -> Self {
        Self {
            date: tx.date,
            total_sales: tx.total_sales,
        }
    }
}

/// A customer left-joined with one of their transactions
///
/// Customers without any transaction appear once with `transaction: None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JoinedRecord {
    pub customer: CustomerRecord,
    pub transaction: Option<TransactionFields>,
}

impl JoinedRecord {
    #[must_use]
    pub const fn loyalty_card_number(&self) -> i64 {
        self.customer.loyalty_card_number
    }

    #[must_use]
    pub const fn lifestage(&self) -> Lifestage {
        self.customer.lifestage
    }

    #[must_use]
    pub const fn premium_tier(&self) -> PremiumTier {
        self.customer.premium_tier
    }

    /// Sales amount, `None` for unmatched customers and uncoercible amounts
    #[must_use]
    pub fn total_sales(&self) -> Option<f64> {
        self.transaction.and_then(|tx| tx.total_sales)
    }

    /// Raw day offset, `None` for unmatched customers and uncoercible dates
    #[must_use]
    pub fn date_offset(&self) -> Option<i64> {
        self.transaction.and_then(|tx| tx.date)
    }
}

/// A joined row with its calendar attributes resolved
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedRecord {
    pub joined: JoinedRecord,
    pub calendar_date: Option<NaiveDate>,
    pub day_of_week: Option<DayOfWeek>,
    pub month: Option<MonthName>,
}

impl ResolvedRecord {
    #[must_use]
    pub const fn loyalty_card_number(&self) -> i64 {
        self.joined.loyalty_card_number()
    }

    #[must_use]
    pub const fn lifestage(&self) -> Lifestage {
        self.joined.lifestage()
    }

    #[must_use]
    pub const fn premium_tier(&self) -> PremiumTier {
        self.joined.premium_tier()
    }

    #[must_use]
    pub fn total_sales(&self) -> Option<f64> {
        self.joined.total_sales()
    }
}
