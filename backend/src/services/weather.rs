//! Weather signal for plants: resolves a plant's location to its daily
//! series and picks the reading for the local day

use chrono::{DateTime, NaiveDate, Utc};
use shared::{Plant, WeatherObservation, WeatherSeries};

use crate::error::{AppError, AppResult};
use crate::external::WeatherClient;

/// Weather service wrapping the forecast client
#[derive(Clone)]
pub struct WeatherService {
    client: WeatherClient,
}

impl WeatherService {
    pub fn new(client: WeatherClient) -> Self {
        Self { client }
    }

    /// Full daily series around today for a plant's location
    pub async fn series_for(&self, plant: &Plant) -> AppResult<WeatherSeries> {
        let coordinates = plant.coordinates().ok_or(AppError::MissingLocation)?;

        self.client
            .get_daily_series(&coordinates)
            .await
            .map_err(|e| {
                tracing::warn!(plant_id = %plant.id, error = %e, "Weather lookup failed");
                e
            })
    }

    /// Today's observation at the plant's location along with the local date
    pub async fn observation_for(
        &self,
        plant: &Plant,
        now: DateTime<Utc>,
    ) -> AppResult<(NaiveDate, WeatherObservation)> {
        let series = self.series_for(plant).await?;
        today_from_series(&series, now)
    }
}

/// Select the local day's reading; a missing day or null reading is an error
pub fn today_from_series(
    series: &WeatherSeries,
    now: DateTime<Utc>,
) -> AppResult<(NaiveDate, WeatherObservation)> {
    let today = series.local_today(now);
    series
        .observation_on(today)
        .map(|obs| (today, obs))
        .ok_or_else(|| AppError::NoObservation(today.to_string()))
}
