//! Weather data models

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One day's rainfall and humidity reading, the input of the health scorer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WeatherObservation {
    /// Rainfall for the day in millimeters
    pub rainfall_mm: Decimal,
    /// Mean relative humidity for the day in percent
    pub humidity_percent: Decimal,
}

impl WeatherObservation {
    pub fn new(rainfall_mm: Decimal, humidity_percent: Decimal) -> Self {
        Self {
            rainfall_mm,
            humidity_percent,
        }
    }
}

/// A single calendar day of a weather series. Readings the provider
/// could not supply are `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyWeather {
    pub date: NaiveDate,
    pub rainfall_mm: Option<Decimal>,
    pub humidity_percent: Option<Decimal>,
}

impl DailyWeather {
    pub fn observation(&self) -> Option<WeatherObservation> {
        Some(WeatherObservation::new(
            self.rainfall_mm?,
            self.humidity_percent?,
        ))
    }
}

/// Daily weather around today for one location, past days followed by
/// forecast days, ordered by date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSeries {
    pub latitude: Decimal,
    pub longitude: Decimal,
    /// Offset of the location's local time from UTC
    pub utc_offset_seconds: i32,
    pub days: Vec<DailyWeather>,
}

impl WeatherSeries {
    /// Calendar date at the series location for the given instant
    pub fn local_today(&self, now: DateTime<Utc>) -> NaiveDate {
        (now + Duration::seconds(i64::from(self.utc_offset_seconds))).date_naive()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DailyWeather> {
        self.days.iter().find(|d| d.date == date)
    }

    /// Observation for a date; `None` when the day is outside the series
    /// or one of its readings is missing
    pub fn observation_on(&self, date: NaiveDate) -> Option<WeatherObservation> {
        self.day(date).and_then(DailyWeather::observation)
    }

    pub fn today_observation(&self, now: DateTime<Utc>) -> Option<WeatherObservation> {
        self.observation_on(self.local_today(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn series(offset: i32, start: NaiveDate, readings: &[(Option<i64>, Option<i64>)]) -> WeatherSeries {
        WeatherSeries {
            latitude: Decimal::from(41),
            longitude: Decimal::from(29),
            utc_offset_seconds: offset,
            days: readings
                .iter()
                .enumerate()
                .map(|(i, (rain, hum))| DailyWeather {
                    date: start + Duration::days(i as i64),
                    rainfall_mm: rain.map(Decimal::from),
                    humidity_percent: hum.map(Decimal::from),
                })
                .collect(),
        }
    }

    #[test]
    fn test_local_today_applies_offset() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let ahead = series(3 * 3600, start, &[]);
        let behind = series(-5 * 3600, start, &[]);
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 22, 30, 0).unwrap();

        assert_eq!(ahead.local_today(now), NaiveDate::from_ymd_opt(2024, 6, 11).unwrap());
        assert_eq!(behind.local_today(now), NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
    }

    #[test]
    fn test_today_observation_picks_matching_day() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let s = series(0, start, &[(Some(1), Some(40)), (Some(7), Some(65)), (Some(0), Some(90))]);
        let now = Utc.with_ymd_and_hms(2024, 6, 2, 12, 0, 0).unwrap();

        let obs = s.today_observation(now).unwrap();
        assert_eq!(obs.rainfall_mm, Decimal::from(7));
        assert_eq!(obs.humidity_percent, Decimal::from(65));
    }

    #[test]
    fn test_missing_reading_yields_no_observation() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let s = series(0, start, &[(None, Some(40)), (Some(2), None)]);

        assert!(s.observation_on(start).is_none());
        assert!(s.observation_on(start + Duration::days(1)).is_none());
        assert!(s.observation_on(start + Duration::days(5)).is_none());
    }
}
