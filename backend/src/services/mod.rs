//! Business logic services for the Plant Care Dashboard

pub mod health;
pub mod location;
pub mod plant;
pub mod weather;

pub use health::HealthService;
pub use location::LocationService;
pub use plant::PlantService;
pub use weather::WeatherService;
