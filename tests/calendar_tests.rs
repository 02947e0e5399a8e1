use chrono::{Datelike, NaiveDate, Weekday};
use pert_schedule::{BusinessCalendar, add_business_days};
use rstest::rstest;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[rstest]
#[case::monday_plus_week(d(2025, 1, 6), 5, d(2025, 1, 13))]
#[case::friday_plus_one(d(2025, 1, 10), 1, d(2025, 1, 13))]
#[case::saturday_plus_one(d(2025, 1, 11), 1, d(2025, 1, 13))]
#[case::sunday_plus_one(d(2025, 1, 12), 1, d(2025, 1, 13))]
#[case::wednesday_plus_three(d(2025, 1, 8), 3, d(2025, 1, 13))]
#[case::two_weeks(d(2025, 1, 8), 10, d(2025, 1, 22))]
#[case::across_year_end(d(2024, 12, 30), 4, d(2025, 1, 3))]
fn adds_business_days(#[case] from: NaiveDate, #[case] days: i64, #[case] expected: NaiveDate) {
    assert_eq!(add_business_days(from, days), Some(expected));
}

#[rstest]
#[case::weekday(d(2025, 1, 8))]
#[case::saturday(d(2025, 1, 11))]
fn non_positive_offsets_return_input(#[case] from: NaiveDate) {
    assert_eq!(add_business_days(from, 0), Some(from));
    assert_eq!(add_business_days(from, -3), Some(from));
}

#[test]
fn positive_offsets_never_land_on_weekends() {
    let cal = BusinessCalendar::new();
    let mut from = d(2025, 1, 1);
    for _ in 0..14 {
        for days in 1..30 {
            let result = cal.add_business_days(from, days).unwrap();
            assert!(
                !matches!(result.weekday(), Weekday::Sat | Weekday::Sun),
                "{from} + {days} landed on {result}"
            );
        }
        from = from.succ_opt().unwrap();
    }
}

#[test]
fn offsets_compose() {
    let start = d(2025, 2, 14);
    for a in 0..12 {
        for b in 0..12 {
            assert_eq!(
                add_business_days(add_business_days(start, a).unwrap(), b),
                add_business_days(start, a + b),
                "a={a} b={b}"
            );
        }
    }
}

#[test]
fn business_days_between_inverts_addition() {
    let cal = BusinessCalendar::new();
    let start = d(2025, 1, 6);
    for days in 0..25 {
        let end = cal.add_business_days(start, days).unwrap();
        assert_eq!(cal.business_days_between(start, end), days);
    }
}

#[rstest]
#[case::billion_days(d(2025, 1, 6), 1_000_000_000)]
#[case::max_offset(d(2025, 1, 11), i64::MAX)]
#[case::last_date(NaiveDate::MAX, 1)]
fn offsets_past_the_date_range_are_none(#[case] from: NaiveDate, #[case] days: i64) {
    assert_eq!(add_business_days(from, days), None);
}
