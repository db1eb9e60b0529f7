use chrono::{Datelike, NaiveDate};
use loyalty_insights::dates::{EPOCH, date_to_offset, offset_to_date};
use loyalty_insights::{DayOfWeek, MonthName};
use proptest::prelude::*;

proptest! {
    #[test]
    fn offset_round_trips(offset in -700_000i64..2_000_000i64) {
        let date = offset_to_date(offset).unwrap();
        prop_assert_eq!(date_to_offset(date), offset);
    }

    #[test]
    fn consecutive_offsets_are_consecutive_weekdays(offset in 0i64..100_000i64) {
        let today = DayOfWeek::of(offset_to_date(offset).unwrap());
        let tomorrow = DayOfWeek::of(offset_to_date(offset + 1).unwrap());
        let index = |d: DayOfWeek| DayOfWeek::ALL.iter().position(|x| *x == d).unwrap();
        prop_assert_eq!((index(today) + 1) % 7, index(tomorrow));
    }
}

#[test]
fn test_known_dates() {
    assert_eq!(offset_to_date(0), Some(EPOCH));
    assert_eq!(DayOfWeek::of(EPOCH), DayOfWeek::Monday);

    let date = offset_to_date(43200).unwrap();
    assert_eq!(date, NaiveDate::from_ymd_opt(2018, 4, 12).unwrap());
    assert_eq!(DayOfWeek::of(date), DayOfWeek::Thursday);
    assert_eq!(MonthName::of(date), MonthName::April);
    assert_eq!(MonthName::of(date).label(), "April");
    assert_eq!(date.year(), 2018);
}

#[test]
fn test_out_of_range_offset() {
    assert_eq!(offset_to_date(i64::MAX), None);
    assert_eq!(offset_to_date(i64::MIN), None);
}
