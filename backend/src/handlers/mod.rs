//! HTTP handlers for the Plant Care Dashboard API

pub mod health;
pub mod location;
pub mod plant;
pub mod plant_health;
pub mod weather;

pub use health::*;
pub use location::*;
pub use plant::*;
pub use plant_health::*;
pub use weather::*;
