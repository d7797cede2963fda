//! Plant management service for the plant record store

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use shared::{CarePlan, GpsCoordinates, HealthScore, Plant, PlantLocation, PlantType};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};

const PLANT_COLUMNS: &str = "id, name, plant_type, weekly_water_need, expected_humidity, \
     location_name, latitude, longitude, current_health, last_checked, created_at, updated_at";

/// Plant service for managing plant records
#[derive(Clone)]
pub struct PlantService {
    db: PgPool,
}

/// Plant row as stored in the database
#[derive(Debug, Clone, sqlx::FromRow)]
struct PlantRow {
    id: Uuid,
    name: String,
    plant_type: String,
    weekly_water_need: Decimal,
    expected_humidity: Decimal,
    location_name: Option<String>,
    latitude: Option<Decimal>,
    longitude: Option<Decimal>,
    current_health: Option<i16>,
    last_checked: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PlantRow> for Plant {
    fn from(row: PlantRow) -> Self {
        let location = match (row.latitude, row.longitude) {
            (Some(latitude), Some(longitude)) => Some(PlantLocation {
                name: row.location_name.unwrap_or_default(),
                coordinates: GpsCoordinates::new(latitude, longitude),
            }),
            _ => None,
        };

        Plant {
            id: row.id,
            name: row.name,
            plant_type: row.plant_type.parse().unwrap_or(PlantType::Other),
            care: CarePlan::new(row.weekly_water_need, row.expected_humidity),
            location,
            current_health: row
                .current_health
                .and_then(|h| u8::try_from(h).ok())
                .and_then(HealthScore::new)
                .map(|h| h.value()),
            last_checked: row.last_checked,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for creating a plant
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlantInput {
    #[validate(custom = "check_plant_name")]
    pub name: String,
    #[serde(rename = "type")]
    pub plant_type: PlantType,
    #[validate(custom = "check_weekly_water_need")]
    pub weekly_water_need: Decimal,
    #[validate(custom = "check_expected_humidity")]
    pub expected_humidity: Decimal,
    #[validate(custom = "check_location")]
    pub location: Option<PlantLocation>,
}

/// Input for updating a plant. Absent fields are left unchanged; an
/// explicit `"location": null` removes the location.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePlantInput {
    #[validate(custom = "check_plant_name")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub plant_type: Option<PlantType>,
    #[validate(custom = "check_weekly_water_need")]
    pub weekly_water_need: Option<Decimal>,
    #[validate(custom = "check_expected_humidity")]
    pub expected_humidity: Option<Decimal>,
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<PlantLocation>>,
}

impl UpdatePlantInput {
    /// Apply the provided fields onto an existing plant
    pub fn apply_to(self, plant: &mut Plant) {
        if let Some(name) = self.name {
            plant.name = name.trim().to_string();
        }
        if let Some(plant_type) = self.plant_type {
            plant.plant_type = plant_type;
        }
        if let Some(weekly_water_need) = self.weekly_water_need {
            plant.care.weekly_water_need = weekly_water_need;
        }
        if let Some(expected_humidity) = self.expected_humidity {
            plant.care.expected_humidity = expected_humidity;
        }
        if let Some(location) = self.location {
            plant.location = location;
        }
    }
}

fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn check_plant_name(name: &str) -> Result<(), ValidationError> {
    shared::validate_plant_name(name).map_err(|m| validation_error("plant_name", m))
}

fn check_weekly_water_need(value: &Decimal) -> Result<(), ValidationError> {
    shared::validate_weekly_water_need(*value).map_err(|m| validation_error("weekly_water_need", m))
}

fn check_expected_humidity(value: &Decimal) -> Result<(), ValidationError> {
    shared::validate_expected_humidity(*value).map_err(|m| validation_error("expected_humidity", m))
}

fn check_location(location: &PlantLocation) -> Result<(), ValidationError> {
    shared::validate_coordinates(&location.coordinates).map_err(|m| validation_error("location", m))
}

impl PlantService {
    /// Create a new PlantService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get all plants, optionally filtered by a name/type search term
    pub async fn list_plants(&self, search: Option<&str>) -> AppResult<Vec<Plant>> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")));

        let rows = sqlx::query_as::<_, PlantRow>(&format!(
            r#"
            SELECT {PLANT_COLUMNS}
            FROM plants
            WHERE $1::TEXT IS NULL OR name ILIKE $1 OR plant_type ILIKE $1
            ORDER BY created_at ASC
            "#
        ))
        .bind(pattern)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Plant::from).collect())
    }

    /// Get a plant by ID
    pub async fn get_plant(&self, plant_id: Uuid) -> AppResult<Plant> {
        let row = sqlx::query_as::<_, PlantRow>(&format!(
            "SELECT {PLANT_COLUMNS} FROM plants WHERE id = $1"
        ))
        .bind(plant_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Plant".to_string()))?;

        Ok(row.into())
    }

    /// Create a new plant
    pub async fn create_plant(&self, input: CreatePlantInput) -> AppResult<Plant> {
        input.validate()?;

        let (location_name, latitude, longitude) = location_columns(input.location.as_ref());

        let row = sqlx::query_as::<_, PlantRow>(&format!(
            r#"
            INSERT INTO plants (name, plant_type, weekly_water_need, expected_humidity,
                                location_name, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PLANT_COLUMNS}
            "#
        ))
        .bind(input.name.trim())
        .bind(input.plant_type.as_str())
        .bind(input.weekly_water_need)
        .bind(input.expected_humidity)
        .bind(location_name)
        .bind(latitude)
        .bind(longitude)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(plant_id = %row.id, "Plant created");
        Ok(row.into())
    }

    /// Update a plant
    pub async fn update_plant(&self, plant_id: Uuid, input: UpdatePlantInput) -> AppResult<Plant> {
        input.validate()?;
        if let Some(Some(location)) = &input.location {
            shared::validate_coordinates(&location.coordinates).map_err(|m| AppError::Validation {
                field: "location".to_string(),
                message: m.to_string(),
            })?;
        }

        // Check if plant exists
        let mut plant = self.get_plant(plant_id).await?;
        input.apply_to(&mut plant);

        let (location_name, latitude, longitude) = location_columns(plant.location.as_ref());

        let row = sqlx::query_as::<_, PlantRow>(&format!(
            r#"
            UPDATE plants
            SET name = $1, plant_type = $2, weekly_water_need = $3, expected_humidity = $4,
                location_name = $5, latitude = $6, longitude = $7, updated_at = NOW()
            WHERE id = $8
            RETURNING {PLANT_COLUMNS}
            "#
        ))
        .bind(&plant.name)
        .bind(plant.plant_type.as_str())
        .bind(plant.care.weekly_water_need)
        .bind(plant.care.expected_humidity)
        .bind(location_name)
        .bind(latitude)
        .bind(longitude)
        .bind(plant_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Plant".to_string()))?;

        Ok(row.into())
    }

    /// Delete a plant (cascade deletes its health records)
    pub async fn delete_plant(&self, plant_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM plants WHERE id = $1")
            .bind(plant_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Plant".to_string()));
        }

        tracing::info!(plant_id = %plant_id, "Plant deleted");
        Ok(())
    }

    /// Cache the latest health score on the plant. Takes a connection so
    /// the write can share a transaction with the history insert.
    pub async fn record_health(
        conn: &mut PgConnection,
        plant_id: Uuid,
        score: HealthScore,
        checked_at: DateTime<Utc>,
    ) -> AppResult<Plant> {
        let row = sqlx::query_as::<_, PlantRow>(&format!(
            r#"
            UPDATE plants
            SET current_health = $1, last_checked = $2
            WHERE id = $3
            RETURNING {PLANT_COLUMNS}
            "#
        ))
        .bind(i16::from(score.value()))
        .bind(checked_at)
        .bind(plant_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Plant".to_string()))?;

        tracing::debug!(plant_id = %plant_id, score = score.value(), "Cached health score");
        Ok(row.into())
    }
}

fn location_columns(
    location: Option<&PlantLocation>,
) -> (Option<String>, Option<Decimal>, Option<Decimal>) {
    match location {
        Some(l) => (
            Some(l.name.clone()),
            Some(l.coordinates.latitude),
            Some(l.coordinates.longitude),
        ),
        None => (None, None, None),
    }
}
