use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use timestack_core::{
    component_diff, describe, describe_from_now, time_description, Calendar, CalendarUnit, Offset,
};

fn instant() -> impl Strategy<Value = DateTime<Utc>> {
    // 1900-01-01 .. roughly 2119, any second of the day
    (0i64..80_000, 0i64..86_400).prop_map(|(days, secs)| {
        let day = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap() + Duration::days(days);
        Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0).unwrap()) + Duration::seconds(secs)
    })
}

fn flip(phrase: &str) -> String {
    phrase.replace("before", "<>").replace("after", "before").replace("<>", "after")
}

proptest! {
    #[test]
    fn same_instant_is_same_time(date in instant()) {
        prop_assert_eq!(describe(&Calendar::utc(), date, date), "same time");
        prop_assert_eq!(describe_from_now(&Calendar::utc(), date, date), "now");
    }

    #[test]
    fn same_day_reports_earlier_or_later(date in instant(), secs in 1i64..86_400) {
        let cal = Calendar::utc();
        let other = cal.start_of_day(date) + Duration::seconds(secs);
        prop_assume!((other - date).num_seconds().abs() >= 1);
        let phrase = describe(&cal, other, date);
        if other < date {
            prop_assert_eq!(phrase, "earlier that day");
        } else {
            prop_assert_eq!(phrase, "later that day");
        }
    }

    #[test]
    fn describe_is_symmetric(a in instant(), b in instant()) {
        let cal = Calendar::utc();
        prop_assume!(!cal.is_same_day(a, b));
        let forward = describe(&cal, a, b);
        let backward = describe(&cal, b, a);
        prop_assert_eq!(flip(&forward), backward.clone());
        if a < b {
            prop_assert!(forward.ends_with("before"), "got: {}", forward);
            prop_assert!(backward.ends_with("after"), "got: {}", backward);
        } else {
            prop_assert!(forward.ends_with("after"), "got: {}", forward);
            prop_assert!(backward.ends_with("before"), "got: {}", backward);
        }
    }

    #[test]
    fn month_round_trip_recovers_year_and_month(date in instant(), n in -600i32..600) {
        let cal = Calendar::utc();
        let there = cal.add_unit(date, CalendarUnit::Month, n);
        let back = cal.add_unit(there, CalendarUnit::Month, -n);
        prop_assert_eq!((back.year(), back.month()), (date.year(), date.month()));
        prop_assert!(back.day() <= date.day());
    }

    #[test]
    fn seven_day_gap_is_a_week(date in instant()) {
        let cal = Calendar::utc();
        let earlier = cal.add_unit(date, CalendarUnit::Day, -7);
        let later = cal.add_unit(date, CalendarUnit::Day, 7);
        prop_assert_eq!(describe(&cal, earlier, date), "the week before");
        prop_assert_eq!(describe(&cal, later, date), "the week after");
        prop_assert_eq!(describe_from_now(&cal, earlier, date), "last week");
        prop_assert_eq!(describe_from_now(&cal, later, date), "next week");
    }

    #[test]
    fn only_the_dominant_unit_is_reported(a in instant(), b in instant()) {
        let cal = Calendar::utc();
        prop_assume!(!cal.is_same_day(a, b));
        let diff = component_diff(cal.local_date(a), cal.local_date(b));
        let phrase = describe(&cal, a, b);
        let mentions = |word: &str| phrase.contains(word);
        if diff.years > 0 {
            prop_assert!(mentions("year") && !mentions("month") && !mentions("day"), "got: {}", phrase);
        } else if diff.months > 0 {
            prop_assert!(mentions("month") && !mentions("year") && !mentions("day"), "got: {}", phrase);
        } else {
            prop_assert!(mentions("day") || mentions("week"), "got: {}", phrase);
        }
    }

    #[test]
    fn time_description_mentions_each_non_zero_field(
        days in -400i32..400,
        months in -30i32..30,
        years in -10i32..10,
    ) {
        let phrase = time_description(Offset::new(days, months, years));
        let fields = [days, months, years].iter().filter(|v| **v != 0).count();
        match fields {
            0 => prop_assert_eq!(phrase, "now"),
            1 => prop_assert!(!phrase.contains(" and ") && !phrase.contains(", "), "got: {}", phrase),
            2 => prop_assert!(phrase.contains(" and ") && !phrase.contains(", "), "got: {}", phrase),
            _ => prop_assert!(phrase.contains(" and ") && phrase.contains(", "), "got: {}", phrase),
        }
    }
}
