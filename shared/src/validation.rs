//! Validation utilities for the Plant Care Dashboard
//!
//! Care plans are checked at data-entry time so that every stored plan
//! satisfies the health scorer's preconditions.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::types::GpsCoordinates;

pub const MAX_PLANT_NAME_LEN: usize = 100;

// ============================================================================
// Care Plan Validations
// ============================================================================

/// Smallest weekly water need a plant record can hold (0.01 mm)
pub const MIN_WEEKLY_WATER_NEED: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Largest weekly water need a plant record can hold (99,999,999.99 mm)
pub const MAX_WEEKLY_WATER_NEED: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Care plan values are stored with two decimal places
pub const CARE_PLAN_SCALE: u32 = 2;

fn has_storable_scale(value: Decimal) -> bool {
    value.normalize().scale() <= CARE_PLAN_SCALE
}

/// Validate weekly water need (mm per week) is positive and storable
pub fn validate_weekly_water_need(weekly_water_need: Decimal) -> Result<(), &'static str> {
    if weekly_water_need <= Decimal::ZERO {
        return Err("Weekly water need must be greater than 0");
    }
    if weekly_water_need < MIN_WEEKLY_WATER_NEED || weekly_water_need > MAX_WEEKLY_WATER_NEED {
        return Err("Weekly water need must be between 0.01 and 99999999.99");
    }
    if !has_storable_scale(weekly_water_need) {
        return Err("Weekly water need must have at most 2 decimal places");
    }
    Ok(())
}

/// Validate expected humidity is a percentage with at most two decimals
pub fn validate_expected_humidity(humidity: Decimal) -> Result<(), &'static str> {
    if humidity < Decimal::ZERO || humidity > Decimal::ONE_HUNDRED {
        return Err("Expected humidity must be between 0 and 100");
    }
    if !has_storable_scale(humidity) {
        return Err("Expected humidity must have at most 2 decimal places");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate plant name is present and not too long
pub fn validate_plant_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Plant name cannot be empty");
    }
    if trimmed.chars().count() > MAX_PLANT_NAME_LEN {
        return Err("Plant name must be at most 100 characters");
    }
    Ok(())
}

/// Validate coordinates are on the globe
pub fn validate_coordinates(coordinates: &GpsCoordinates) -> Result<(), &'static str> {
    if coordinates.latitude < Decimal::from(-90) || coordinates.latitude > Decimal::from(90) {
        return Err("Latitude must be between -90 and 90");
    }
    if coordinates.longitude < Decimal::from(-180) || coordinates.longitude > Decimal::from(180) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Parse a "latitude,longitude" pair such as "41.0082,28.9784"
pub fn parse_coordinates(input: &str) -> Option<GpsCoordinates> {
    let (lat, lon) = input.split_once(',')?;
    let coordinates = GpsCoordinates::new(
        Decimal::from_str(lat.trim()).ok()?,
        Decimal::from_str(lon.trim()).ok()?,
    );
    validate_coordinates(&coordinates).ok()?;
    Some(coordinates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    // ========================================================================
    // Care Plan Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_weekly_water_need() {
        assert!(validate_weekly_water_need(dec("70")).is_ok());
        assert!(validate_weekly_water_need(dec("0.5")).is_ok());
        assert!(validate_weekly_water_need(dec("0")).is_err());
        assert!(validate_weekly_water_need(dec("-3")).is_err());
    }

    #[test]
    fn test_weekly_water_need_fits_storage() {
        assert!(validate_weekly_water_need(dec("0.01")).is_ok());
        assert!(validate_weekly_water_need(dec("99999999.99")).is_ok());
        assert!(validate_weekly_water_need(dec("14.50")).is_ok());
        assert!(validate_weekly_water_need(dec("14.500")).is_ok());
        assert_eq!(
            validate_weekly_water_need(dec("0.001")),
            Err("Weekly water need must be between 0.01 and 99999999.99")
        );
        assert!(validate_weekly_water_need(dec("0.0000000000000000000000000001")).is_err());
        assert!(validate_weekly_water_need(dec("100000000")).is_err());
        assert_eq!(
            validate_weekly_water_need(dec("14.125")),
            Err("Weekly water need must have at most 2 decimal places")
        );
    }

    #[test]
    fn test_expected_humidity_fits_storage() {
        assert!(validate_expected_humidity(dec("55.25")).is_ok());
        assert!(validate_expected_humidity(dec("55.250")).is_ok());
        assert!(validate_expected_humidity(dec("55.255")).is_err());
    }

    #[test]
    fn test_storage_bounds() {
        assert_eq!(MIN_WEEKLY_WATER_NEED, dec("0.01"));
        assert_eq!(MAX_WEEKLY_WATER_NEED, dec("99999999.99"));
    }

    #[test]
    fn test_validate_expected_humidity() {
        assert!(validate_expected_humidity(dec("0")).is_ok());
        assert!(validate_expected_humidity(dec("55.5")).is_ok());
        assert!(validate_expected_humidity(dec("100")).is_ok());
        assert!(validate_expected_humidity(dec("-0.1")).is_err());
        assert!(validate_expected_humidity(dec("100.1")).is_err());
    }

    // ========================================================================
    // General Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_plant_name() {
        assert!(validate_plant_name("Monstera").is_ok());
        assert!(validate_plant_name("   ").is_err());
        assert!(validate_plant_name(&"a".repeat(100)).is_ok());
        assert!(validate_plant_name(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(&GpsCoordinates::new(dec("41.0082"), dec("28.9784"))).is_ok());
        assert!(validate_coordinates(&GpsCoordinates::new(dec("-90"), dec("180"))).is_ok());
        assert!(validate_coordinates(&GpsCoordinates::new(dec("90.5"), dec("0"))).is_err());
        assert!(validate_coordinates(&GpsCoordinates::new(dec("0"), dec("-180.1"))).is_err());
    }

    #[test]
    fn test_parse_coordinates() {
        let parsed = parse_coordinates("41.0082, 28.9784").unwrap();
        assert_eq!(parsed.latitude, dec("41.0082"));
        assert_eq!(parsed.longitude, dec("28.9784"));

        assert!(parse_coordinates("-33.86,151.2").is_some());
        assert!(parse_coordinates("Istanbul").is_none());
        assert!(parse_coordinates("95,10").is_none());
        assert!(parse_coordinates("41.0,").is_none());
    }

    proptest::proptest! {
        /// Any on-globe pair typed as "lat,lon" parses back to itself
        #[test]
        fn prop_parse_coordinates_accepts_valid_pairs(
            lat in -900_000i64..=900_000,
            lon in -1_800_000i64..=1_800_000,
        ) {
            let (lat, lon) = (Decimal::new(lat, 4), Decimal::new(lon, 4));
            let parsed = parse_coordinates(&format!("{},{}", lat, lon)).unwrap();
            proptest::prop_assert_eq!(parsed.latitude, lat);
            proptest::prop_assert_eq!(parsed.longitude, lon);
        }
    }
}
