//! Geocoding client for location autocomplete (Open-Meteo geocoding API)

use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{GpsCoordinates, LocationSuggestion};

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    admin1: Option<String>,
}

impl GeocodingClient {
    pub fn new(config: &WeatherConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.geocoding_endpoint.clone(),
        })
    }

    /// Search places by name. A blank query returns no suggestions without
    /// calling the provider.
    pub async fn search(&self, query: &str, count: u32) -> AppResult<Vec<LocationSuggestion>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let count = count.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("name", query),
                ("count", count.as_str()),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| AppError::WeatherProvider(format!("Geocoding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::WeatherProvider(format!(
                "Geocoding API error: {} - {}",
                status, body
            )));
        }

        let data: GeocodingResponse = response.json().await.map_err(|e| {
            AppError::WeatherProvider(format!("Failed to parse geocoding response: {}", e))
        })?;

        Ok(convert_results(data))
    }
}

fn convert_results(data: GeocodingResponse) -> Vec<LocationSuggestion> {
    data.results
        .into_iter()
        .filter_map(|r| {
            let coordinates = GpsCoordinates::new(
                Decimal::from_f64(r.latitude)?,
                Decimal::from_f64(r.longitude)?,
            );
            Some(LocationSuggestion {
                name: r.name,
                country: r.country,
                admin_area: r.admin1,
                coordinates,
            })
        })
        .collect()
}
