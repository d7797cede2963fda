//! Configuration management for the Plant Care Dashboard
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with PLANT_CARE_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Weather provider configuration
    pub weather: WeatherConfig,

    /// Location autocomplete configuration
    pub location_search: LocationSearchConfig,

    /// CORS configuration
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Open-Meteo forecast endpoint
    pub forecast_endpoint: String,

    /// Open-Meteo geocoding endpoint
    pub geocoding_endpoint: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Days of history before today
    pub past_days: u32,

    /// Days of forecast including today
    pub forecast_days: u32,
}

impl WeatherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocationSearchConfig {
    /// Quiet period after the last keystroke before searching
    pub debounce_ms: u64,

    /// Maximum suggestions per search
    pub max_results: u32,
}

impl LocationSearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins, "*" allows any
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("PLANT_CARE_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("weather.forecast_endpoint", "https://api.open-meteo.com/v1/forecast")?
            .set_default(
                "weather.geocoding_endpoint",
                "https://geocoding-api.open-meteo.com/v1/search",
            )?
            .set_default("weather.timeout_secs", 5)?
            .set_default("weather.past_days", 14)?
            .set_default("weather.forecast_days", 14)?
            .set_default("location_search.debounce_ms", 300)?
            .set_default("location_search.max_results", 5)?
            .set_default("cors.allowed_origins", vec!["http://localhost:5173"])?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (PLANT_CARE_ prefix)
            .add_source(
                Environment::with_prefix("PLANT_CARE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            forecast_endpoint: "https://api.open-meteo.com/v1/forecast".to_string(),
            geocoding_endpoint: "https://geocoding-api.open-meteo.com/v1/search".to_string(),
            timeout_secs: 5,
            past_days: 14,
            forecast_days: 14,
        }
    }
}

impl Default for LocationSearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            max_results: 5,
        }
    }
}
