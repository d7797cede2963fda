//! Dashboard state store
//!
//! All view state (plant list, loading flags, modal, per-plant health) lives
//! in one [`DashboardState`] mutated only through [`DashboardAction`]s.
//! Health results arrive asynchronously, so they are accepted only for
//! plants still on the dashboard and only for the day last requested.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{HealthStatus, Plant};

/// Health of one plant for one evaluation day. `status` is `None` while
/// the evaluation is in flight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthEntry {
    pub day: NaiveDate,
    pub status: Option<HealthStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardState {
    pub plants: Vec<Plant>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub modal_open: bool,
    pub current_plant: Option<Uuid>,
    pub health: HashMap<Uuid, HealthEntry>,
    pub search_term: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum DashboardAction {
    FetchPlantsStart,
    FetchPlantsSuccess(Vec<Plant>),
    FetchPlantsError(String),
    AddPlant(Plant),
    UpdatePlant(Plant),
    DeletePlant(Uuid),
    SetModalOpen(bool),
    SetCurrentPlant(Option<Uuid>),
    SetSearchTerm(String),
    HealthRequested {
        plant_id: Uuid,
        day: NaiveDate,
    },
    HealthEvaluated {
        plant_id: Uuid,
        day: NaiveDate,
        status: HealthStatus,
    },
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&mut self, action: DashboardAction) {
        match action {
            DashboardAction::FetchPlantsStart => {
                self.is_loading = true;
                self.error = None;
            }
            DashboardAction::FetchPlantsSuccess(plants) => {
                self.plants = plants;
                self.is_loading = false;
                let plants = &self.plants;
                self.health.retain(|id, _| plants.iter().any(|p| p.id == *id));
                if let Some(id) = self.current_plant {
                    if self.plant(id).is_none() {
                        self.current_plant = None;
                    }
                }
            }
            DashboardAction::FetchPlantsError(message) => {
                self.error = Some(message);
                self.is_loading = false;
            }
            DashboardAction::AddPlant(plant) => {
                self.plants.push(plant);
            }
            DashboardAction::UpdatePlant(plant) => {
                if let Some(existing) = self.plants.iter_mut().find(|p| p.id == plant.id) {
                    if existing.care != plant.care || existing.location != plant.location {
                        self.health.remove(&plant.id);
                    }
                    *existing = plant;
                }
            }
            DashboardAction::DeletePlant(id) => {
                self.plants.retain(|p| p.id != id);
                self.health.remove(&id);
                if self.current_plant == Some(id) {
                    self.current_plant = None;
                }
            }
            DashboardAction::SetModalOpen(open) => {
                self.modal_open = open;
            }
            DashboardAction::SetCurrentPlant(id) => {
                self.current_plant = id;
            }
            DashboardAction::SetSearchTerm(term) => {
                self.search_term = term;
            }
            DashboardAction::HealthRequested { plant_id, day } => {
                if self.plant(plant_id).is_some() {
                    self.health.insert(plant_id, HealthEntry { day, status: None });
                }
            }
            DashboardAction::HealthEvaluated {
                plant_id,
                day,
                status,
            } => {
                if self.plant(plant_id).is_none() {
                    return;
                }
                match self.health.get_mut(&plant_id) {
                    Some(entry) if entry.day == day => entry.status = Some(status),
                    _ => {}
                }
            }
        }
    }

    pub fn plant(&self, id: Uuid) -> Option<&Plant> {
        self.plants.iter().find(|p| p.id == id)
    }

    pub fn current(&self) -> Option<&Plant> {
        self.current_plant.and_then(|id| self.plant(id))
    }

    /// Health to show for a plant; `None` while nothing has been evaluated
    pub fn health_of(&self, id: Uuid) -> Option<HealthStatus> {
        self.health.get(&id).and_then(|entry| entry.status)
    }

    pub fn is_evaluating(&self, id: Uuid) -> bool {
        matches!(self.health.get(&id), Some(HealthEntry { status: None, .. }))
    }

    /// Plants matching the search term by name or type, case-insensitive
    pub fn visible_plants(&self) -> Vec<&Plant> {
        let term = self.search_term.trim().to_lowercase();
        if term.is_empty() {
            return self.plants.iter().collect();
        }
        self.plants
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&term)
                    || p.plant_type.as_str().contains(&term)
                    || p.plant_type.label().to_lowercase().contains(&term)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CarePlan, HealthScore, PlantLocation, PlantType, UnavailableReason,
    };
    use crate::types::GpsCoordinates;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn plant(name: &str, plant_type: PlantType) -> Plant {
        let now = Utc::now();
        Plant {
            id: Uuid::new_v4(),
            name: name.to_string(),
            plant_type,
            care: CarePlan::new(Decimal::from(70), Decimal::from(50)),
            location: Some(PlantLocation {
                name: "Izmir".to_string(),
                coordinates: GpsCoordinates::new(Decimal::new(3842, 2), Decimal::new(2714, 2)),
            }),
            current_health: None,
            last_checked: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn scored(value: u8) -> HealthStatus {
        HealthStatus::scored(HealthScore::new(value).unwrap())
    }

    #[test]
    fn test_fetch_lifecycle() {
        let mut state = DashboardState::new();
        state.dispatch(DashboardAction::FetchPlantsStart);
        assert!(state.is_loading);

        state.dispatch(DashboardAction::FetchPlantsError("timeout".to_string()));
        assert!(!state.is_loading);
        assert_eq!(state.error.as_deref(), Some("timeout"));

        state.dispatch(DashboardAction::FetchPlantsStart);
        assert!(state.error.is_none());
        state.dispatch(DashboardAction::FetchPlantsSuccess(vec![plant("Fern", PlantType::Fern)]));
        assert!(!state.is_loading);
        assert_eq!(state.plants.len(), 1);
    }

    #[test]
    fn test_health_result_is_applied_for_requested_day() {
        let p = plant("Aloe", PlantType::Succulent);
        let id = p.id;
        let mut state = DashboardState::new();
        state.dispatch(DashboardAction::AddPlant(p));

        state.dispatch(DashboardAction::HealthRequested { plant_id: id, day: day(3) });
        assert!(state.is_evaluating(id));
        assert_eq!(state.health_of(id), None);

        state.dispatch(DashboardAction::HealthEvaluated {
            plant_id: id,
            day: day(3),
            status: scored(70),
        });
        assert!(!state.is_evaluating(id));
        assert_eq!(state.health_of(id), Some(scored(70)));
    }

    #[test]
    fn test_result_for_deleted_plant_is_discarded() {
        let p = plant("Basil", PlantType::Herb);
        let id = p.id;
        let mut state = DashboardState::new();
        state.dispatch(DashboardAction::AddPlant(p));
        state.dispatch(DashboardAction::HealthRequested { plant_id: id, day: day(3) });
        state.dispatch(DashboardAction::DeletePlant(id));

        state.dispatch(DashboardAction::HealthEvaluated {
            plant_id: id,
            day: day(3),
            status: scored(90),
        });
        assert!(state.plants.is_empty());
        assert!(state.health.is_empty());
    }

    #[test]
    fn test_stale_day_result_is_discarded() {
        let p = plant("Palm", PlantType::Palm);
        let id = p.id;
        let mut state = DashboardState::new();
        state.dispatch(DashboardAction::AddPlant(p));
        state.dispatch(DashboardAction::HealthRequested { plant_id: id, day: day(3) });
        state.dispatch(DashboardAction::HealthRequested { plant_id: id, day: day(4) });

        state.dispatch(DashboardAction::HealthEvaluated {
            plant_id: id,
            day: day(3),
            status: scored(40),
        });
        assert!(state.is_evaluating(id));

        state.dispatch(DashboardAction::HealthEvaluated {
            plant_id: id,
            day: day(4),
            status: HealthStatus::unavailable(UnavailableReason::ProviderUnavailable),
        });
        assert_eq!(state.health_of(id).unwrap().to_string(), "N/A");
    }

    #[test]
    fn test_unrequested_result_is_ignored() {
        let p = plant("Ivy", PlantType::Vine);
        let id = p.id;
        let mut state = DashboardState::new();
        state.dispatch(DashboardAction::AddPlant(p));
        state.dispatch(DashboardAction::HealthEvaluated {
            plant_id: id,
            day: day(3),
            status: scored(85),
        });
        assert_eq!(state.health_of(id), None);
    }

    #[test]
    fn test_care_plan_change_invalidates_health() {
        let p = plant("Cactus", PlantType::Cactus);
        let id = p.id;
        let mut state = DashboardState::new();
        state.dispatch(DashboardAction::AddPlant(p.clone()));
        state.dispatch(DashboardAction::HealthRequested { plant_id: id, day: day(3) });
        state.dispatch(DashboardAction::HealthEvaluated {
            plant_id: id,
            day: day(3),
            status: scored(85),
        });

        let mut renamed = p.clone();
        renamed.name = "Saguaro".to_string();
        state.dispatch(DashboardAction::UpdatePlant(renamed));
        assert_eq!(state.health_of(id), Some(scored(85)));

        let mut drier = p;
        drier.care.weekly_water_need = Decimal::from(7);
        state.dispatch(DashboardAction::UpdatePlant(drier));
        assert_eq!(state.health_of(id), None);
        assert_eq!(state.plant(id).unwrap().name, "Cactus");
    }

    #[test]
    fn test_delete_clears_current_plant() {
        let p = plant("Oak", PlantType::Tree);
        let id = p.id;
        let mut state = DashboardState::new();
        state.dispatch(DashboardAction::AddPlant(p));
        state.dispatch(DashboardAction::SetCurrentPlant(Some(id)));
        state.dispatch(DashboardAction::SetModalOpen(true));
        assert_eq!(state.current().map(|p| p.id), Some(id));

        state.dispatch(DashboardAction::DeletePlant(id));
        assert!(state.current_plant.is_none());
        assert!(state.modal_open);
    }

    #[test]
    fn test_refetch_prunes_health_of_missing_plants() {
        let kept = plant("Rose", PlantType::Flowering);
        let dropped = plant("Mint", PlantType::Herb);
        let mut state = DashboardState::new();
        state.dispatch(DashboardAction::FetchPlantsSuccess(vec![kept.clone(), dropped.clone()]));
        for id in [kept.id, dropped.id] {
            state.dispatch(DashboardAction::HealthRequested { plant_id: id, day: day(3) });
        }

        state.dispatch(DashboardAction::FetchPlantsSuccess(vec![kept.clone()]));
        assert!(state.health.contains_key(&kept.id));
        assert!(!state.health.contains_key(&dropped.id));
    }

    #[test]
    fn test_visible_plants_filters_by_name_and_type() {
        let mut state = DashboardState::new();
        state.dispatch(DashboardAction::FetchPlantsSuccess(vec![
            plant("Kitchen Basil", PlantType::Herb),
            plant("Rose", PlantType::Flowering),
            plant("Barrel", PlantType::Cactus),
        ]));

        state.dispatch(DashboardAction::SetSearchTerm("BASIL".to_string()));
        assert_eq!(state.visible_plants().len(), 1);

        state.dispatch(DashboardAction::SetSearchTerm("flowering".to_string()));
        assert_eq!(state.visible_plants()[0].name, "Rose");

        state.dispatch(DashboardAction::SetSearchTerm("  ".to_string()));
        assert_eq!(state.visible_plants().len(), 3);
    }
}
