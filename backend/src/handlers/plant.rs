//! Plant management HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::services::plant::{CreatePlantInput, PlantService, UpdatePlantInput};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PlantListQuery {
    /// Case-insensitive name or type search
    pub q: Option<String>,
}

/// List plants, optionally filtered by search term
pub async fn list_plants(
    State(state): State<AppState>,
    Query(query): Query<PlantListQuery>,
) -> impl IntoResponse {
    let service = PlantService::new(state.db.clone());

    match service.list_plants(query.q.as_deref()).await {
        Ok(plants) => (StatusCode::OK, Json(serde_json::json!({ "plants": plants }))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a specific plant
pub async fn get_plant(
    State(state): State<AppState>,
    Path(plant_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = PlantService::new(state.db.clone());

    match service.get_plant(plant_id).await {
        Ok(plant) => (StatusCode::OK, Json(plant)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a new plant
pub async fn create_plant(
    State(state): State<AppState>,
    Json(input): Json<CreatePlantInput>,
) -> impl IntoResponse {
    let service = PlantService::new(state.db.clone());

    match service.create_plant(input).await {
        Ok(plant) => (StatusCode::CREATED, Json(plant)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update a plant (PUT and PATCH both apply only the provided fields)
pub async fn update_plant(
    State(state): State<AppState>,
    Path(plant_id): Path<Uuid>,
    Json(input): Json<UpdatePlantInput>,
) -> impl IntoResponse {
    let service = PlantService::new(state.db.clone());

    match service.update_plant(plant_id, input).await {
        Ok(plant) => (StatusCode::OK, Json(plant)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a plant
pub async fn delete_plant(
    State(state): State<AppState>,
    Path(plant_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = PlantService::new(state.db.clone());

    match service.delete_plant(plant_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
