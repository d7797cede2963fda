//! Weather HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::services::PlantService;
use crate::AppState;

/// Daily rainfall and humidity around today at a plant's location
pub async fn get_plant_weather(
    State(state): State<AppState>,
    Path(plant_id): Path<Uuid>,
) -> impl IntoResponse {
    let plant = match PlantService::new(state.db.clone()).get_plant(plant_id).await {
        Ok(plant) => plant,
        Err(e) => return e.into_response(),
    };

    match state.weather_service().series_for(&plant).await {
        Ok(series) => (StatusCode::OK, Json(series)).into_response(),
        Err(e) => e.into_response(),
    }
}
