//! Health score models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::health::{HEALTHY_THRESHOLD, NEEDS_ATTENTION_THRESHOLD};

/// Integer health score, always within 0..=100
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct HealthScore(u8);

impl HealthScore {
    pub const MAX: HealthScore = HealthScore(100);

    pub fn new(value: u8) -> Option<Self> {
        (value <= 100).then_some(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn band(&self) -> HealthBand {
        HealthBand::from_score(self.0)
    }
}

impl TryFrom<u8> for HealthScore {
    type Error = &'static str;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        HealthScore::new(value).ok_or("Health score must be between 0 and 100")
    }
}

impl From<HealthScore> for u8 {
    fn from(score: HealthScore) -> Self {
        score.0
    }
}

impl std::fmt::Display for HealthScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Qualitative band of a health score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HealthBand {
    /// Score of 80 or more
    Healthy,
    /// Score from 50 up to 79
    NeedsAttention,
    /// Score below 50
    Unhealthy,
}

impl HealthBand {
    pub fn from_score(score: u8) -> Self {
        if score >= HEALTHY_THRESHOLD {
            HealthBand::Healthy
        } else if score >= NEEDS_ATTENTION_THRESHOLD {
            HealthBand::NeedsAttention
        } else {
            HealthBand::Unhealthy
        }
    }

    /// Alternate wording shown next to the score bar
    pub fn grade_label(&self) -> &'static str {
        match self {
            HealthBand::Healthy => "Excellent",
            HealthBand::NeedsAttention => "Fair",
            HealthBand::Unhealthy => "Poor",
        }
    }

    pub fn color_hex(&self) -> &'static str {
        match self {
            HealthBand::Healthy => "#16a34a",
            HealthBand::NeedsAttention => "#f97316",
            HealthBand::Unhealthy => "#dc2626",
        }
    }
}

impl std::fmt::Display for HealthBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthBand::Healthy => write!(f, "Healthy"),
            HealthBand::NeedsAttention => write!(f, "Needs Attention"),
            HealthBand::Unhealthy => write!(f, "Unhealthy"),
        }
    }
}

/// Component scores behind a health score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HealthBreakdown {
    /// Water sufficiency in 0..=1, saturates once the daily need is met
    pub water_score: Decimal,
    /// Humidity closeness in 0..=1
    pub humidity_score: Decimal,
    /// Weighted sum before scaling and rounding
    pub raw_score: Decimal,
    pub score: HealthScore,
}

/// Why a plant has no health score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    MissingLocation,
    ProviderUnavailable,
    NoObservation,
    DegenerateCarePlan,
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnavailableReason::MissingLocation => write!(f, "Plant has no location"),
            UnavailableReason::ProviderUnavailable => write!(f, "Weather data unavailable"),
            UnavailableReason::NoObservation => write!(f, "No weather reading for today"),
            UnavailableReason::DegenerateCarePlan => write!(f, "Care plan is invalid"),
        }
    }
}

/// What a dashboard card shows for a plant's health
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HealthStatus {
    Scored {
        score: HealthScore,
        band: HealthBand,
    },
    Unavailable {
        reason: UnavailableReason,
    },
}

impl HealthStatus {
    pub fn scored(score: HealthScore) -> Self {
        HealthStatus::Scored {
            score,
            band: score.band(),
        }
    }

    pub fn unavailable(reason: UnavailableReason) -> Self {
        HealthStatus::Unavailable { reason }
    }

    pub fn score(&self) -> Option<HealthScore> {
        match self {
            HealthStatus::Scored { score, .. } => Some(*score),
            HealthStatus::Unavailable { .. } => None,
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Scored { score, band } => write!(f, "{} ({}%)", band, score),
            HealthStatus::Unavailable { .. } => write!(f, "N/A"),
        }
    }
}

/// Persisted result of one health calculation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthRecord {
    pub id: Uuid,
    pub plant_id: Uuid,
    /// Local calendar day the observation belongs to
    pub recorded_on: NaiveDate,
    pub actual_rainfall_mm: Decimal,
    pub actual_humidity_percent: Decimal,
    pub health_score: HealthScore,
    pub created_at: DateTime<Utc>,
}
