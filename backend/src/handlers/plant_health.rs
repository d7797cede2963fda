//! Plant health HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::services::{HealthService, PlantService};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct HealthHistoryQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

fn health_service(state: &AppState) -> HealthService {
    HealthService::new(
        state.db.clone(),
        PlantService::new(state.db.clone()),
        state.weather_service(),
    )
}

/// Current health of a plant with the weather reading behind it
pub async fn get_plant_health(
    State(state): State<AppState>,
    Path(plant_id): Path<Uuid>,
) -> impl IntoResponse {
    let plant = match PlantService::new(state.db.clone()).get_plant(plant_id).await {
        Ok(plant) => plant,
        Err(e) => return e.into_response(),
    };

    // Read only; POST .../health/calculate records and caches the score
    match health_service(&state).evaluate_report(&plant).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Evaluate a plant, record the result and cache it on the plant
pub async fn calculate_plant_health(
    State(state): State<AppState>,
    Path(plant_id): Path<Uuid>,
) -> impl IntoResponse {
    match health_service(&state).calculate_and_record(plant_id).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Recorded health history of a plant
pub async fn get_health_history(
    State(state): State<AppState>,
    Path(plant_id): Path<Uuid>,
    Query(query): Query<HealthHistoryQuery>,
) -> impl IntoResponse {
    match health_service(&state)
        .history(plant_id, query.start_date, query.end_date)
        .await
    {
        Ok(records) => {
            (StatusCode::OK, Json(serde_json::json!({ "records": records }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Health of every plant for the dashboard
pub async fn get_dashboard_health(State(state): State<AppState>) -> impl IntoResponse {
    let plants = match PlantService::new(state.db.clone()).list_plants(None).await {
        Ok(plants) => plants,
        Err(e) => return e.into_response(),
    };

    let health = health_service(&state).evaluate_all(plants).await;
    (StatusCode::OK, Json(serde_json::json!({ "plants": health }))).into_response()
}
