//! Plant records and their care plans

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::health::DAYS_PER_WEEK;
use crate::types::GpsCoordinates;

/// A plant tracked on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plant {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub plant_type: PlantType,
    #[serde(flatten)]
    pub care: CarePlan,
    pub location: Option<PlantLocation>,
    /// Cached health score (0-100) from the last evaluation
    pub current_health: Option<u8>,
    pub last_checked: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Plant {
    /// Coordinates used for weather lookups, if the plant has a location
    pub fn coordinates(&self) -> Option<GpsCoordinates> {
        self.location.as_ref().map(|l| l.coordinates)
    }
}

/// Watering and humidity requirements of a plant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CarePlan {
    /// Millimeters of water per week, must be positive
    pub weekly_water_need: Decimal,
    /// Ideal relative humidity in percent (0-100)
    pub expected_humidity: Decimal,
}

impl CarePlan {
    pub fn new(weekly_water_need: Decimal, expected_humidity: Decimal) -> Self {
        Self {
            weekly_water_need,
            expected_humidity,
        }
    }

    pub fn daily_water_need(&self) -> Decimal {
        self.weekly_water_need / DAYS_PER_WEEK
    }
}

/// Named location of a plant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantLocation {
    pub name: String,
    #[serde(flatten)]
    pub coordinates: GpsCoordinates,
}

/// Plant categories offered when registering a plant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlantType {
    Succulent,
    Cactus,
    Flowering,
    Fern,
    Tree,
    Palm,
    Herb,
    Vine,
    Other,
}

impl PlantType {
    pub const ALL: [PlantType; 9] = [
        PlantType::Succulent,
        PlantType::Cactus,
        PlantType::Flowering,
        PlantType::Fern,
        PlantType::Tree,
        PlantType::Palm,
        PlantType::Herb,
        PlantType::Vine,
        PlantType::Other,
    ];

    /// Value stored in the database and used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            PlantType::Succulent => "succulent",
            PlantType::Cactus => "cactus",
            PlantType::Flowering => "flowering",
            PlantType::Fern => "fern",
            PlantType::Tree => "tree",
            PlantType::Palm => "palm",
            PlantType::Herb => "herb",
            PlantType::Vine => "vine",
            PlantType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlantType::Succulent => "Succulent",
            PlantType::Cactus => "Cactus",
            PlantType::Flowering => "Flowering Plant",
            PlantType::Fern => "Fern",
            PlantType::Tree => "Tree",
            PlantType::Palm => "Palm",
            PlantType::Herb => "Herb",
            PlantType::Vine => "Vine",
            PlantType::Other => "Other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PlantType::Succulent => "🪴",
            PlantType::Cactus => "🌵",
            PlantType::Flowering => "🌸",
            PlantType::Fern => "🌿",
            PlantType::Tree => "🌳",
            PlantType::Palm => "🌴",
            PlantType::Herb => "🌱",
            PlantType::Vine => "🍃",
            PlantType::Other => "🌲",
        }
    }
}

impl std::fmt::Display for PlantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for PlantType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        PlantType::ALL
            .into_iter()
            .find(|t| t.as_str() == needle)
            .ok_or("Unknown plant type")
    }
}
