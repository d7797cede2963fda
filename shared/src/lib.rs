//! Shared types and models for the Plant Care Dashboard
//!
//! This crate contains the plant-care domain core shared between the backend,
//! the browser client (via WASM), and other components of the system. Nothing
//! in here performs I/O.

pub mod dashboard;
pub mod health;
pub mod models;
pub mod types;
pub mod validation;

pub use dashboard::*;
pub use health::*;
pub use models::*;
pub use types::*;
pub use validation::*;
