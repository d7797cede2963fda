//! Weather API client for fetching daily rainfall and humidity
//!
//! Integrates with the Open-Meteo forecast API. One request returns a
//! window of past and forecast days; each day's timestamp is shifted by the
//! location's UTC offset before its calendar date is taken.

use chrono::DateTime;
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{DailyWeather, GpsCoordinates, WeatherSeries};

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

const DAILY_VARIABLES: &str = "rain_sum,relative_humidity_2m_mean";

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    past_days: u32,
    forecast_days: u32,
}

/// Open-Meteo forecast response
#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    latitude: f64,
    longitude: f64,
    utc_offset_seconds: i32,
    daily: Option<OpenMeteoDaily>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoDaily {
    /// Unix seconds of each day's local midnight
    time: Vec<i64>,
    rain_sum: Vec<Option<f64>>,
    relative_humidity_2m_mean: Vec<Option<f64>>,
}

/// Open-Meteo error body
#[derive(Debug, Deserialize)]
struct OpenMeteoError {
    reason: String,
}

impl WeatherClient {
    /// Create a new WeatherClient from configuration
    pub fn new(config: &WeatherConfig) -> AppResult<Self> {
        Self::with_base_url(config, config.forecast_endpoint.clone())
    }

    /// Create a new WeatherClient with custom base URL (for testing)
    pub fn with_base_url(config: &WeatherConfig, base_url: String) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            past_days: config.past_days,
            forecast_days: config.forecast_days,
        })
    }

    /// Fetch the daily rainfall/humidity series around today
    pub async fn get_daily_series(&self, coordinates: &GpsCoordinates) -> AppResult<WeatherSeries> {
        let past_days = self.past_days.to_string();
        let forecast_days = self.forecast_days.to_string();
        let latitude = coordinates.latitude.to_string();
        let longitude = coordinates.longitude.to_string();

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("daily", DAILY_VARIABLES),
                ("past_days", past_days.as_str()),
                ("forecast_days", forecast_days.as_str()),
                ("timezone", "auto"),
                ("timeformat", "unixtime"),
            ])
            .send()
            .await
            .map_err(|e| AppError::WeatherProvider(format!("Weather API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<OpenMeteoError>(&body)
                .map(|e| e.reason)
                .unwrap_or(body);
            return Err(AppError::WeatherProvider(format!(
                "Weather API error: {} - {}",
                status, reason
            )));
        }

        let data: OpenMeteoResponse = response.json().await.map_err(|e| {
            AppError::WeatherProvider(format!("Failed to parse weather response: {}", e))
        })?;

        convert_response(data)
    }
}

/// Convert an Open-Meteo response into a date-aligned series
fn convert_response(data: OpenMeteoResponse) -> AppResult<WeatherSeries> {
    let daily = data
        .daily
        .ok_or_else(|| AppError::WeatherProvider("Weather response has no daily data".to_string()))?;

    if daily.time.is_empty() {
        return Err(AppError::WeatherProvider(
            "Weather response has an empty daily series".to_string(),
        ));
    }
    if daily.rain_sum.len() != daily.time.len()
        || daily.relative_humidity_2m_mean.len() != daily.time.len()
    {
        return Err(AppError::WeatherProvider(format!(
            "Weather response arrays differ in length: time={}, rain={}, humidity={}",
            daily.time.len(),
            daily.rain_sum.len(),
            daily.relative_humidity_2m_mean.len()
        )));
    }

    let offset = i64::from(data.utc_offset_seconds);
    let days = daily
        .time
        .iter()
        .zip(daily.rain_sum)
        .zip(daily.relative_humidity_2m_mean)
        .map(|((&t, rain), humidity)| {
            let date = t
                .checked_add(offset)
                .and_then(|local| DateTime::from_timestamp(local, 0))
                .ok_or_else(|| {
                    AppError::WeatherProvider(format!("Invalid timestamp in weather response: {}", t))
                })?
                .date_naive();
            Ok(DailyWeather {
                date,
                rainfall_mm: rain.and_then(Decimal::from_f64),
                humidity_percent: humidity.and_then(Decimal::from_f64),
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(WeatherSeries {
        latitude: Decimal::from_f64(data.latitude).unwrap_or_default(),
        longitude: Decimal::from_f64(data.longitude).unwrap_or_default(),
        utc_offset_seconds: data.utc_offset_seconds,
        days,
    })
}
