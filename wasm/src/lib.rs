//! WebAssembly module for the Plant Care Dashboard
//!
//! Lets the browser score plants locally:
//! - health score from a care plan and one day's weather
//! - health banding, labels and indicator colours
//! - care plan validation before submitting a plant

use rust_decimal::Decimal;
use std::str::FromStr;
use shared::{CarePlan, HealthBand, WeatherObservation, WeatherSeries};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

// Goes through the shortest decimal text so 14.1 stays 14.1
fn to_decimal(name: &str, value: f64) -> Result<Decimal, String> {
    if !value.is_finite() {
        return Err(format!("{} is not a finite number", name));
    }
    Decimal::from_str(&value.to_string()).map_err(|_| format!("{} is out of range", name))
}

fn score_plant(
    weekly_water_need: f64,
    expected_humidity: f64,
    rainfall_mm: f64,
    humidity_percent: f64,
) -> Result<u8, String> {
    let care = CarePlan::new(
        to_decimal("weekly_water_need", weekly_water_need)?,
        to_decimal("expected_humidity", expected_humidity)?,
    );
    let observation = WeatherObservation::new(
        to_decimal("rainfall_mm", rainfall_mm)?,
        to_decimal("humidity_percent", humidity_percent)?,
    );

    shared::evaluate(&care, &observation)
        .map(|score| score.value())
        .map_err(|e| e.to_string())
}

fn check_care_plan(weekly_water_need: f64, expected_humidity: f64) -> Result<(), String> {
    validate_weekly_water_need(to_decimal("weekly_water_need", weekly_water_need)?)?;
    validate_expected_humidity(to_decimal("expected_humidity", expected_humidity)?)?;
    Ok(())
}

fn today_from_json(series_json: &str, now_millis: f64) -> Result<Option<WeatherObservation>, String> {
    let series: WeatherSeries =
        serde_json::from_str(series_json).map_err(|e| format!("Invalid series JSON: {}", e))?;
    let now = chrono::DateTime::from_timestamp_millis(now_millis as i64)
        .ok_or_else(|| "Invalid current time".to_string())?;
    Ok(series.today_observation(now))
}

/// Health score (0-100) for a care plan and one day's weather
#[wasm_bindgen]
pub fn evaluate_health_score(
    weekly_water_need: f64,
    expected_humidity: f64,
    rainfall_mm: f64,
    humidity_percent: f64,
) -> Result<u8, JsValue> {
    score_plant(weekly_water_need, expected_humidity, rainfall_mm, humidity_percent).map_err(|e| {
        web_sys::console::warn_1(&JsValue::from_str(&e));
        JsValue::from_str(&e)
    })
}

/// "Healthy", "Needs Attention" or "Unhealthy"
#[wasm_bindgen]
pub fn classify_health(score: u8) -> String {
    shared::classify(score).to_string()
}

/// "Excellent", "Fair" or "Poor"
#[wasm_bindgen]
pub fn health_grade_label(score: u8) -> String {
    HealthBand::from_score(score).grade_label().to_string()
}

#[wasm_bindgen]
pub fn health_color(score: u8) -> String {
    HealthBand::from_score(score).color_hex().to_string()
}

/// Display label and icon for a stored plant type, e.g. `["Fern", "🌿"]`
#[wasm_bindgen]
pub fn plant_type_display(plant_type: &str) -> Result<js_sys::Array, JsValue> {
    let plant_type: PlantType = plant_type.parse().map_err(JsValue::from_str)?;
    let display = js_sys::Array::new();
    display.push(&JsValue::from_str(plant_type.label()));
    display.push(&JsValue::from_str(plant_type.icon()));
    Ok(display)
}

/// Validate a care plan; throws the first problem found
#[wasm_bindgen]
pub fn validate_care_plan(weekly_water_need: f64, expected_humidity: f64) -> Result<(), JsValue> {
    check_care_plan(weekly_water_need, expected_humidity).map_err(|e| JsValue::from_str(&e))
}

/// Today's observation from a serialized weather series, as JSON, or
/// `undefined` when the provider has no reading for today
#[wasm_bindgen]
pub fn today_observation_from_series(series_json: &str) -> Result<Option<String>, JsValue> {
    let observation =
        today_from_json(series_json, js_sys::Date::now()).map_err(|e| JsValue::from_str(&e))?;

    observation
        .map(|o| serde_json::to_string(&o).map_err(|e| JsValue::from_str(&e.to_string())))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_plant() {
        assert_eq!(score_plant(70.0, 50.0, 5.0, 50.0), Ok(70));
        assert_eq!(score_plant(140.0, 60.0, 20.0, 60.0), Ok(100));
        assert_eq!(score_plant(70.0, 80.0, 0.0, 20.0), Ok(16));
    }

    #[test]
    fn test_score_plant_rejects_bad_input() {
        assert!(score_plant(0.0, 50.0, 5.0, 50.0).is_err());
        assert!(score_plant(70.0, 50.0, -1.0, 50.0).is_err());
        assert!(score_plant(f64::NAN, 50.0, 5.0, 50.0).is_err());
    }

    #[test]
    fn test_classify_health() {
        assert_eq!(classify_health(85), "Healthy");
        assert_eq!(classify_health(70), "Needs Attention");
        assert_eq!(classify_health(16), "Unhealthy");
        assert_eq!(health_grade_label(85), "Excellent");
        assert_eq!(health_color(16), "#dc2626");
    }

    #[test]
    fn test_check_care_plan() {
        assert!(check_care_plan(14.0, 60.0).is_ok());
        assert!(check_care_plan(0.0, 60.0).is_err());
        assert!(check_care_plan(14.0, 101.0).is_err());
        assert!(check_care_plan(14.1, 55.25).is_ok());
        assert!(check_care_plan(0.001, 60.0).is_err());
        assert!(check_care_plan(14.125, 60.0).is_err());
    }

    #[test]
    fn test_today_from_json() {
        let json = r#"{
            "latitude": "41.0",
            "longitude": "29.0",
            "utc_offset_seconds": 10800,
            "days": [
                {"date": "2024-06-09", "rainfall_mm": "9", "humidity_percent": "90"},
                {"date": "2024-06-10", "rainfall_mm": "1.5", "humidity_percent": "62"}
            ]
        }"#;
        // 2024-06-09T22:00:00Z, already June 10 at UTC+3
        let now = 1_717_970_400_000.0;

        let observation = today_from_json(json, now).unwrap().unwrap();
        assert_eq!(observation.rainfall_mm, Decimal::new(15, 1));
        assert_eq!(observation.humidity_percent, Decimal::from(62));
    }
}
