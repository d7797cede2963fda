//! Plant health evaluation and history

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{
    HealthBreakdown, HealthError, HealthRecord, HealthScore, HealthStatus, Plant,
    UnavailableReason, WeatherObservation,
};
use sqlx::{FromRow, PgPool};
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::{PlantService, WeatherService};

/// Health service combining plant records with the weather signal
#[derive(Clone)]
pub struct HealthService {
    db: PgPool,
    plants: PlantService,
    weather: WeatherService,
}

/// Full result of evaluating one plant for its local day
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub plant_id: Uuid,
    pub day: NaiveDate,
    pub observation: WeatherObservation,
    pub breakdown: HealthBreakdown,
    pub status: HealthStatus,
}

/// Health status of one plant on the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct PlantHealth {
    pub plant_id: Uuid,
    pub status: HealthStatus,
}

#[derive(Debug, FromRow)]
struct HealthRecordRow {
    id: Uuid,
    plant_id: Uuid,
    recorded_on: NaiveDate,
    actual_rainfall_mm: Decimal,
    actual_humidity_percent: Decimal,
    health_score: i16,
    created_at: DateTime<Utc>,
}

impl TryFrom<HealthRecordRow> for HealthRecord {
    type Error = AppError;

    fn try_from(row: HealthRecordRow) -> Result<Self, Self::Error> {
        let health_score = u8::try_from(row.health_score)
            .ok()
            .and_then(HealthScore::new)
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Stored health score out of range: {}",
                    row.health_score
                ))
            })?;

        Ok(HealthRecord {
            id: row.id,
            plant_id: row.plant_id,
            recorded_on: row.recorded_on,
            actual_rainfall_mm: row.actual_rainfall_mm,
            actual_humidity_percent: row.actual_humidity_percent,
            health_score,
            created_at: row.created_at,
        })
    }
}

/// Map an evaluation failure to what the dashboard shows instead of a score
pub fn unavailable_reason(err: &AppError) -> UnavailableReason {
    match err {
        AppError::MissingLocation => UnavailableReason::MissingLocation,
        AppError::NoObservation(_) => UnavailableReason::NoObservation,
        AppError::DegenerateCarePlan(_) => UnavailableReason::DegenerateCarePlan,
        _ => UnavailableReason::ProviderUnavailable,
    }
}

/// Join every evaluation task and list results in `order`. A plant whose
/// task died without reporting is shown as unavailable.
async fn gather_in_order(order: Vec<Uuid>, mut tasks: JoinSet<PlantHealth>) -> Vec<PlantHealth> {
    let mut finished = HashMap::with_capacity(order.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(health) => {
                finished.insert(health.plant_id, health.status);
            }
            Err(e) => tracing::error!(error = %e, "Health evaluation task failed"),
        }
    }

    order
        .into_iter()
        .map(|plant_id| PlantHealth {
            plant_id,
            status: finished.remove(&plant_id).unwrap_or_else(|| {
                HealthStatus::unavailable(UnavailableReason::ProviderUnavailable)
            }),
        })
        .collect()
}

impl HealthService {
    pub fn new(db: PgPool, plants: PlantService, weather: WeatherService) -> Self {
        Self { db, plants, weather }
    }

    /// Evaluate a plant's health for today. Never fails: anything that
    /// prevents scoring becomes an unavailable status.
    pub async fn evaluate(&self, plant: &Plant) -> HealthStatus {
        match self.evaluate_report(plant).await {
            Ok(report) => report.status,
            Err(e) => {
                let reason = unavailable_reason(&e);
                if reason == UnavailableReason::ProviderUnavailable {
                    tracing::warn!(plant_id = %plant.id, error = %e, "Health unavailable");
                } else {
                    tracing::debug!(plant_id = %plant.id, %reason, "Health unavailable");
                }
                HealthStatus::unavailable(reason)
            }
        }
    }

    /// Evaluate a plant's health for today with the inputs behind the score
    pub async fn evaluate_report(&self, plant: &Plant) -> AppResult<HealthReport> {
        // Reject a bad plan before spending a provider call on it
        if plant.care.daily_water_need() <= Decimal::ZERO {
            return Err(HealthError::DegenerateCarePlan {
                weekly_water_need: plant.care.weekly_water_need,
            }
            .into());
        }

        let (day, observation) = self.weather.observation_for(plant, Utc::now()).await?;
        let breakdown = shared::evaluate_breakdown(&plant.care, &observation)?;

        Ok(HealthReport {
            plant_id: plant.id,
            day,
            observation,
            breakdown,
            status: HealthStatus::scored(breakdown.score),
        })
    }

    /// Evaluate every plant concurrently, one task per plant
    pub async fn evaluate_all(&self, plants: Vec<Plant>) -> Vec<PlantHealth> {
        let order: Vec<Uuid> = plants.iter().map(|p| p.id).collect();
        let mut tasks = JoinSet::new();

        for plant in plants {
            let service = self.clone();
            tasks.spawn(async move {
                let status = service.evaluate(&plant).await;
                PlantHealth {
                    plant_id: plant.id,
                    status,
                }
            });
        }

        gather_in_order(order, tasks).await
    }

    /// Evaluate a plant, store the result in its history and cache it on
    /// the plant
    pub async fn calculate_and_record(&self, plant_id: Uuid) -> AppResult<HealthRecord> {
        let plant = self.plants.get_plant(plant_id).await?;
        let report = self.evaluate_report(&plant).await?;
        let checked_at = Utc::now();
        let score = report.breakdown.score;

        let mut tx = self.db.begin().await?;

        // The plant may have been deleted while the weather call was in flight
        PlantService::record_health(&mut *tx, plant_id, score, checked_at).await?;

        let row = sqlx::query_as::<_, HealthRecordRow>(
            r#"
            INSERT INTO health_records (plant_id, recorded_on, actual_rainfall_mm,
                                        actual_humidity_percent, health_score, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, plant_id, recorded_on, actual_rainfall_mm,
                      actual_humidity_percent, health_score, created_at
            "#,
        )
        .bind(plant_id)
        .bind(report.day)
        .bind(report.observation.rainfall_mm)
        .bind(report.observation.humidity_percent)
        .bind(i16::from(score.value()))
        .bind(checked_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(plant_id = %plant_id, score = score.value(), "Health recorded");
        row.try_into()
    }

    /// Recorded health for a plant, newest first
    pub async fn history(
        &self,
        plant_id: Uuid,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AppResult<Vec<HealthRecord>> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(AppError::Validation {
                    field: "start_date".to_string(),
                    message: "start_date must not be after end_date".to_string(),
                });
            }
        }

        // Check if plant exists
        self.plants.get_plant(plant_id).await?;

        let rows = sqlx::query_as::<_, HealthRecordRow>(
            r#"
            SELECT id, plant_id, recorded_on, actual_rainfall_mm,
                   actual_humidity_percent, health_score, created_at
            FROM health_records
            WHERE plant_id = $1
              AND ($2::DATE IS NULL OR recorded_on >= $2)
              AND ($3::DATE IS NULL OR recorded_on <= $3)
            ORDER BY recorded_on DESC, created_at DESC
            "#,
        )
        .bind(plant_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(HealthRecord::try_from).collect()
    }
}
