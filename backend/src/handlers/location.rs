//! Location autocomplete handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LocationSearchQuery {
    #[serde(default)]
    pub q: String,
    /// Client session used to debounce keystrokes
    pub session: Option<String>,
}

/// Search places by name. Answers 204 when a newer query from the same
/// session superseded this one.
pub async fn search_locations(
    State(state): State<AppState>,
    Query(query): Query<LocationSearchQuery>,
) -> impl IntoResponse {
    match state
        .locations
        .search(query.session.as_deref(), &query.q)
        .await
    {
        Ok(Some(suggestions)) => (
            StatusCode::OK,
            Json(serde_json::json!({ "locations": suggestions })),
        )
            .into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
