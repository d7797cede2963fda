//! Location search models

use serde::{Deserialize, Serialize};

use crate::types::GpsCoordinates;

/// A place offered while the user types a location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationSuggestion {
    pub name: String,
    pub country: Option<String>,
    /// First-level administrative area (state, province)
    pub admin_area: Option<String>,
    #[serde(flatten)]
    pub coordinates: GpsCoordinates,
}

impl LocationSuggestion {
    /// "Name, Area, Country" skipping missing parts
    pub fn display_name(&self) -> String {
        [Some(self.name.as_str()), self.admin_area.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_display_name_skips_missing_parts() {
        let mut place = LocationSuggestion {
            name: "Istanbul".to_string(),
            country: Some("Türkiye".to_string()),
            admin_area: None,
            coordinates: GpsCoordinates::new(Decimal::new(410082, 4), Decimal::new(289784, 4)),
        };
        assert_eq!(place.display_name(), "Istanbul, Türkiye");

        place.admin_area = Some("Istanbul".to_string());
        assert_eq!(place.display_name(), "Istanbul, Istanbul, Türkiye");
    }
}
