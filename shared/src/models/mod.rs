//! Domain models for the Plant Care Dashboard

mod health;
mod location;
mod plant;
mod weather;

pub use health::*;
pub use location::*;
pub use plant::*;
pub use weather::*;
