//! Route definitions for the Plant Care Dashboard

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/plants", plant_routes())
        .nest("/dashboard", dashboard_routes())
        .nest("/locations", location_routes())
}

/// Plant management, weather and health routes
fn plant_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_plants).post(handlers::create_plant))
        .route(
            "/:plant_id",
            get(handlers::get_plant)
                .put(handlers::update_plant)
                .patch(handlers::update_plant)
                .delete(handlers::delete_plant),
        )
        .route("/:plant_id/weather", get(handlers::get_plant_weather))
        .route("/:plant_id/health", get(handlers::get_plant_health))
        .route(
            "/:plant_id/health/calculate",
            post(handlers::calculate_plant_health),
        )
        .route("/:plant_id/health/history", get(handlers::get_health_history))
}

/// Dashboard routes
fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::get_dashboard_health))
}

/// Location autocomplete routes
fn location_routes() -> Router<AppState> {
    Router::new().route("/search", get(handlers::search_locations))
}
