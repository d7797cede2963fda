//! Weather series tests
//!
//! "Today" is the series day matching the location's local calendar date,
//! whatever the UTC offset, and a day with a missing reading never
//! produces an observation.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{DailyWeather, WeatherSeries};

/// Series of consecutive days starting at `start` where day `i` has `i` mm of rain
fn series(offset_seconds: i32, start: NaiveDate, len: i64) -> WeatherSeries {
    WeatherSeries {
        latitude: Decimal::ZERO,
        longitude: Decimal::ZERO,
        utc_offset_seconds: offset_seconds,
        days: (0..len)
            .map(|i| DailyWeather {
                date: start + Duration::days(i),
                rainfall_mm: Some(Decimal::from(i)),
                humidity_percent: Some(Decimal::from(50)),
            })
            .collect(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// With 14 past and 14 forecast days, today is always inside the
    /// series and is the day at index 14
    #[test]
    fn prop_today_is_local_date_inside_window(
        // 2020-01-01 .. 2030-01-01
        now_secs in 1_577_836_800i64..1_893_456_000,
        // UTC-12 .. UTC+14 in quarter hours
        quarter_hours in -48i32..=56,
    ) {
        let offset = quarter_hours * 900;
        let now = DateTime::from_timestamp(now_secs, 0).unwrap();
        let local = (now + Duration::seconds(i64::from(offset))).date_naive();
        let s = series(offset, local - Duration::days(14), 28);

        prop_assert_eq!(s.local_today(now), local);
        let observation = s.today_observation(now).unwrap();
        prop_assert_eq!(observation.rainfall_mm, Decimal::from(14));
    }

    /// A null reading on today's date means no observation
    #[test]
    fn prop_null_reading_is_never_filled_in(
        now_secs in 1_577_836_800i64..1_893_456_000,
        drop_rain in any::<bool>(),
    ) {
        let now = DateTime::from_timestamp(now_secs, 0).unwrap();
        let today = now.date_naive();
        let mut s = series(0, today - Duration::days(1), 3);
        if drop_rain {
            s.days[1].rainfall_mm = None;
        } else {
            s.days[1].humidity_percent = None;
        }

        prop_assert!(s.today_observation(now).is_none());
        prop_assert!(s.observation_on(today - Duration::days(1)).is_some());
    }
}

#[test]
fn today_outside_series_has_no_observation() {
    let now: DateTime<Utc> = DateTime::from_timestamp(1_718_020_800, 0).unwrap();
    let s = series(0, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), 5);
    assert!(s.today_observation(now).is_none());
}
