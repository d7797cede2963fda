//! Plant health scoring
//!
//! Fuses two signals into one bounded score:
//! - water sufficiency: observed daily rain against the daily share of the
//!   weekly need, saturating at 1 (excess rain is not penalized)
//! - humidity closeness: distance between expected and observed humidity
//!   over the full 0-100 range, penalized in both directions
//!
//! score = round((water × 0.6 + humidity × 0.4) × 100)

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::models::{CarePlan, HealthBand, HealthBreakdown, HealthScore, WeatherObservation};

pub const DAYS_PER_WEEK: Decimal = Decimal::from_parts(7, 0, 0, false, 0);

/// 0.6
pub const WATER_WEIGHT: Decimal = Decimal::from_parts(6, 0, 0, false, 1);

/// 0.4
pub const HUMIDITY_WEIGHT: Decimal = Decimal::from_parts(4, 0, 0, false, 1);

pub const HEALTHY_THRESHOLD: u8 = 80;
pub const NEEDS_ATTENTION_THRESHOLD: u8 = 50;

/// Inputs outside the scorer's domain
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HealthError {
    #[error("weekly water need must be positive, got {weekly_water_need}")]
    DegenerateCarePlan { weekly_water_need: Decimal },

    #[error("observed rainfall cannot be negative, got {rainfall_mm}")]
    NegativeRainfall { rainfall_mm: Decimal },
}

/// Score a plant's care plan against one day's observation
pub fn evaluate(care: &CarePlan, observation: &WeatherObservation) -> Result<HealthScore, HealthError> {
    evaluate_breakdown(care, observation).map(|b| b.score)
}

/// Same as [`evaluate`] but keeps the component scores
pub fn evaluate_breakdown(
    care: &CarePlan,
    observation: &WeatherObservation,
) -> Result<HealthBreakdown, HealthError> {
    if care.weekly_water_need <= Decimal::ZERO {
        return Err(HealthError::DegenerateCarePlan {
            weekly_water_need: care.weekly_water_need,
        });
    }
    if observation.rainfall_mm < Decimal::ZERO {
        return Err(HealthError::NegativeRainfall {
            rainfall_mm: observation.rainfall_mm,
        });
    }

    let daily_need = care.daily_water_need();
    // A need this small underflows to zero once spread over the week
    if daily_need.is_zero() {
        return Err(HealthError::DegenerateCarePlan {
            weekly_water_need: care.weekly_water_need,
        });
    }

    let water_score = water_score(daily_need, observation.rainfall_mm);
    let humidity_score = humidity_score(care.expected_humidity, observation.humidity_percent);
    let raw_score = water_score * WATER_WEIGHT + humidity_score * HUMIDITY_WEIGHT;

    Ok(HealthBreakdown {
        water_score,
        humidity_score,
        raw_score,
        score: scale(raw_score),
    })
}

/// Band a score: 80 and above is healthy, 50 and above needs attention
pub fn classify(score: u8) -> HealthBand {
    HealthBand::from_score(score)
}

fn water_score(daily_need: Decimal, rainfall_mm: Decimal) -> Decimal {
    // Divisor is non-zero here, so None means overflow past saturation
    rainfall_mm
        .checked_div(daily_need)
        .map_or(Decimal::ONE, |ratio| ratio.min(Decimal::ONE))
}

fn humidity_score(expected: Decimal, observed: Decimal) -> Decimal {
    let deviation = expected
        .checked_sub(observed)
        .map_or(Decimal::ONE, |d| (d.abs() / Decimal::ONE_HUNDRED).min(Decimal::ONE));
    Decimal::ONE - deviation
}

fn scale(raw_score: Decimal) -> HealthScore {
    let percent = (raw_score * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);

    percent
        .to_u8()
        .and_then(HealthScore::new)
        .unwrap_or(HealthScore::MAX)
}
