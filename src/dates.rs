//! Day-offset date resolution
//!
//! Transaction dates are stored as a count of days since 1900-01-01. The
//! conversion to a calendar date is a pure function applied once per record;
//! `date_to_offset` is its exact inverse.

use chrono::{NaiveDate, TimeDelta};
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::models::{DayOfWeek, JoinedRecord, MonthName, ResolvedRecord};

/// Origin of the day-offset encoding
pub const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1900, 1, 1) {
    Some(date) => date,
    None => panic!("1900-01-01 is a valid date"),
};

/// Calendar date `offset` days after 1900-01-01
///
/// Returns `None` when the result falls outside the representable range.
#[must_use]
pub fn offset_to_date(offset: i64) -> Option<NaiveDate> {
    EPOCH.checked_add_signed(TimeDelta::try_days(offset)?)
}

/// Number of days from 1900-01-01 to `date`
#[must_use]
pub fn date_to_offset(date: NaiveDate) -> i64 {
    date.signed_duration_since(EPOCH).num_days()
}

/// Resolve the calendar attributes of one joined record
///
/// A missing offset, or one that cannot be represented, yields a record
/// without calendar attributes.
#[must_use]
pub fn resolve_record(record: &JoinedRecord) -> ResolvedRecord {
    let calendar_date = record.date_offset().and_then(offset_to_date);
    ResolvedRecord {
        joined: *record,
        calendar_date,
        day_of_week: calendar_date.map(DayOfWeek::of),
        month: calendar_date.map(MonthName::of),
    }
}

/// Resolve every joined record, keeping order
#[must_use]
pub fn resolve_dates(records: &[JoinedRecord]) -> Vec<ResolvedRecord> {
    let resolved: Vec<ResolvedRecord> = records.iter().map(resolve_record).collect();

    let unresolved = resolved
        .iter()
        .filter(|r| r.joined.transaction.is_some() && r.calendar_date.is_none())
        .count();
    if unresolved > 0 {
        log::warn!("{unresolved} transactions have no usable date");
    }
    resolved
}

/// Span of the resolved transaction dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub min: NaiveDate,
    pub max: NaiveDate,
    /// Number of distinct dates seen
    pub unique_dates: usize,
}

/// Date range over all records with a calendar date, `None` if there is none
#[must_use]
pub fn date_range(records: &[ResolvedRecord]) -> Option<DateRange> {
    let dates: FxHashSet<NaiveDate> = records.iter().filter_map(|r| r.calendar_date).collect();
    let min = dates.iter().min().copied()?;
    let max = dates.iter().max().copied()?;
    Some(DateRange {
        min,
        max,
        unique_dates: dates.len(),
    })
}
