//! Grouped sales totals

use std::fmt::Display;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::models::{DayOfWeek, Lifestage, MonthName, PremiumTier, ResolvedRecord};

/// Sales summed over one group
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupTotal<K> {
    pub key: K,
    /// Sum of the non-null sales in the group
    pub total_sales: f64,
    /// Rows in the group, with or without sales
    pub records: usize,
}

/// Sales totals for every group of one categorical attribute, in a fixed order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesBreakdown<K> {
    /// Human readable title, e.g. "Total Sales by Lifestage"
    pub title: String,
    /// Name of the grouping attribute, used as the category axis label
    pub category: String,
    pub groups: Vec<GroupTotal<K>>,
}

impl<K: Copy + PartialEq + Display> SalesBreakdown<K> {
    /// Sum over all groups
    #[must_use]
    pub fn total(&self) -> f64 {
        self.groups.iter().map(|g| g.total_sales).sum()
    }

    /// Total of one group, `None` if the group is not part of the breakdown
    #[must_use]
    pub fn get(&self, key: K) -> Option<f64> {
        self.groups
            .iter()
            .find(|g| g.key == key)
            .map(|g| g.total_sales)
    }

    /// Groups ordered by descending sales
    #[must_use]
    pub fn sorted_descending(&self) -> Vec<GroupTotal<K>> {
        let mut groups = self.groups.clone();
        groups.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales));
        groups
    }

    /// Groups ordered by ascending sales
    #[must_use]
    pub fn sorted_ascending(&self) -> Vec<GroupTotal<K>> {
        let mut groups = self.groups.clone();
        groups.sort_by(|a, b| a.total_sales.total_cmp(&b.total_sales));
        groups
    }

    /// `(label, value)` pairs in breakdown order
    #[must_use]
    pub fn labelled_totals(&self) -> Vec<(String, f64)> {
        self.groups
            .iter()
            .map(|g| (g.key.to_string(), g.total_sales))
            .collect()
    }
}

/// Sum sales per key, reporting groups in the order of `order`
///
/// Records for which `key_of` returns `None` belong to no group. With
/// `include_empty` every key of `order` is reported, zero when no record falls
/// in it; otherwise only keys with at least one record are.
pub fn sales_by<K, F>(
    records: &[ResolvedRecord],
    key_of: F,
    order: &[K],
    include_empty: bool,
) -> Vec<GroupTotal<K>>
where
    K: Copy + Eq + Hash,
    F: Fn(&ResolvedRecord) -> Option<K>,
{
    let mut sums: FxHashMap<K, (f64, usize)> = FxHashMap::default();
    for record in records {
        if let Some(key) = key_of(record) {
            let entry = sums.entry(key).or_insert((0.0, 0));
            entry.0 += record.total_sales().unwrap_or(0.0);
            entry.1 += 1;
        }
    }

    order
        .iter()
        .filter_map(|key| match sums.get(key) {
            Some(&(total_sales, records)) => Some(GroupTotal {
                key: *key,
                total_sales,
                records,
            }),
            None if include_empty => Some(GroupTotal {
                key: *key,
                total_sales: 0.0,
                records: 0,
            }),
            None => None,
        })
        .collect()
}

/// Sum of sales by lifestage, observed lifestages only
#[must_use]
pub fn sales_by_lifestage(records: &[ResolvedRecord]) -> SalesBreakdown<Lifestage> {
    SalesBreakdown {
        title: "Total Sales by Lifestage".to_string(),
        category: "Lifestage".to_string(),
        groups: sales_by(records, |r| Some(r.lifestage()), &Lifestage::ALL, false),
    }
}

/// Sum of sales by premium tier, observed tiers only
#[must_use]
pub fn sales_by_premium(records: &[ResolvedRecord]) -> SalesBreakdown<PremiumTier> {
    SalesBreakdown {
        title: "Total Sales by Premium Customer".to_string(),
        category: "Customer Type".to_string(),
        groups: sales_by(records, |r| Some(r.premium_tier()), &PremiumTier::ALL, false),
    }
}

/// Sum of sales by day of week, Monday to Sunday, all seven days present
#[must_use]
pub fn sales_by_day_of_week(records: &[ResolvedRecord]) -> SalesBreakdown<DayOfWeek> {
    SalesBreakdown {
        title: "Total Sales by Day of the Week".to_string(),
        category: "Day of Week".to_string(),
        groups: sales_by(records, |r| r.day_of_week, &DayOfWeek::ALL, true),
    }
}

/// Sum of sales by month, January to December, all twelve months present
#[must_use]
pub fn sales_by_month(records: &[ResolvedRecord]) -> SalesBreakdown<MonthName> {
    SalesBreakdown {
        title: "Total Sales by Month".to_string(),
        category: "Month".to_string(),
        groups: sales_by(records, |r| r.month, &MonthName::ALL, true),
    }
}

/// Number of joined rows per premium tier, most frequent first
#[must_use]
pub fn premium_distribution(records: &[ResolvedRecord]) -> Vec<(PremiumTier, usize)> {
    let mut counts: Vec<(PremiumTier, usize)> =
        sales_by(records, |r| Some(r.premium_tier()), &PremiumTier::ALL, false)
            .into_iter()
            .map(|g| (g.key, g.records))
            .collect();
    // stable sort keeps declaration order among ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Sum of all non-null sales
#[must_use]
pub fn total_sales(records: &[ResolvedRecord]) -> f64 {
    records.iter().filter_map(ResolvedRecord::total_sales).sum()
}
