//! Dashboard aggregation tests
//!
//! Covers reporting period bucketing and pagination arithmetic.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use shared::{Pagination, PaginationMeta, Period};

// ============================================================================
// Period Bucketing Tests
// ============================================================================

mod periods {
    use super::*;

    #[test]
    fn default_period_is_month() {
        assert_eq!(Period::default(), Period::Month);
    }

    #[test]
    fn day_starts_at_midnight() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 15, 9, 26).unwrap();
        let start = Period::Day.start_from(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap());
    }

    #[test]
    fn week_starts_on_monday() {
        // 2025-03-14 is a Friday; the week began Monday 2025-03-10.
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 15, 9, 26).unwrap();
        let start = Period::Week.start_from(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap());
    }

    #[test]
    fn week_start_on_a_monday_is_that_monday() {
        let monday = Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap();
        let start = Period::Week.start_from(monday);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap());
    }

    #[test]
    fn month_starts_on_the_first() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 15, 9, 26).unwrap();
        let start = Period::Month.start_from(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn year_starts_on_january_first() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 15, 9, 26).unwrap();
        let start = Period::Year.start_from(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn period_parses_from_query_values() {
        assert_eq!("day".parse::<Period>().unwrap(), Period::Day);
        assert_eq!("week".parse::<Period>().unwrap(), Period::Week);
        assert_eq!("month".parse::<Period>().unwrap(), Period::Month);
        assert_eq!("year".parse::<Period>().unwrap(), Period::Year);
        assert!("quarter".parse::<Period>().is_err());
    }
}

// ============================================================================
// Pagination Tests
// ============================================================================

mod pagination {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_fifteen() {
        let p = Pagination::default();
        assert_eq!(p.page, 1);
        assert_eq!(p.per_page, 15);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.limit(), 15);
    }

    #[test]
    fn offset_skips_previous_pages() {
        let p = Pagination {
            page: 3,
            per_page: 20,
        };
        assert_eq!(p.offset(), 40);
    }

    #[test]
    fn total_pages_rounds_up() {
        let p = Pagination {
            page: 1,
            per_page: 15,
        };
        assert_eq!(PaginationMeta::new(&p, 0).total_pages, 0);
        assert_eq!(PaginationMeta::new(&p, 15).total_pages, 1);
        assert_eq!(PaginationMeta::new(&p, 16).total_pages, 2);
        assert_eq!(PaginationMeta::new(&p, 45).total_pages, 3);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod properties {
    use super::*;
    use chrono::{DateTime, Datelike, Timelike, Weekday};

    fn datetime_strategy() -> impl Strategy<Value = DateTime<chrono::Utc>> {
        // 2001-09-09 to 2033-05-18, any second.
        (1_000_000_000i64..2_000_000_000i64)
            .prop_map(|ts| Utc.timestamp_opt(ts, 0).unwrap())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Every period start is at midnight, at or before the input instant.
        #[test]
        fn period_start_is_midnight_before_now(now in datetime_strategy()) {
            for period in [Period::Day, Period::Week, Period::Month, Period::Year] {
                let start = period.start_from(now);
                prop_assert!(start <= now);
                prop_assert_eq!(start.hour(), 0);
                prop_assert_eq!(start.minute(), 0);
                prop_assert_eq!(start.second(), 0);
            }
        }

        /// Week starts fall on Monday, month starts on the 1st, year starts
        /// on January 1st.
        #[test]
        fn period_starts_land_on_boundaries(now in datetime_strategy()) {
            prop_assert_eq!(Period::Week.start_from(now).weekday(), Weekday::Mon);
            prop_assert_eq!(Period::Month.start_from(now).day(), 1);
            let year_start = Period::Year.start_from(now);
            prop_assert_eq!(year_start.month(), 1);
            prop_assert_eq!(year_start.day(), 1);
        }

        /// Longer periods never start later than shorter ones.
        #[test]
        fn period_starts_are_nested(now in datetime_strategy()) {
            prop_assert!(Period::Week.start_from(now) <= Period::Day.start_from(now));
            prop_assert!(Period::Year.start_from(now) <= Period::Month.start_from(now));
        }

        /// Pagination windows tile the result set without gaps or overlap.
        #[test]
        fn pagination_windows_tile(
            page in 1u32..1_000,
            per_page in 1u32..100,
        ) {
            let p = Pagination { page, per_page };
            let next = Pagination { page: page + 1, per_page };
            prop_assert_eq!(p.offset() + p.limit(), next.offset());
        }

        /// total_pages is the smallest page count covering every row.
        #[test]
        fn total_pages_covers_all_rows(
            per_page in 1u32..100,
            total in 0i64..100_000,
        ) {
            let p = Pagination { page: 1, per_page };
            let meta = PaginationMeta::new(&p, total);
            let capacity = meta.total_pages as i64 * per_page as i64;
            prop_assert!(capacity >= total);
            if meta.total_pages > 0 {
                let previous_capacity = (meta.total_pages as i64 - 1) * per_page as i64;
                prop_assert!(previous_capacity < total);
            }
        }
    }
}
