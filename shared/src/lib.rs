//! Shared types and calculations for Shelfie Inventories
//!
//! This crate contains the domain models, stock calculations and spreadsheet
//! normalization shared between the backend and the browser (via WASM).

pub mod import;
pub mod models;
pub mod stock;
pub mod types;
pub mod validation;

pub use models::*;
pub use stock::*;
pub use types::*;
pub use validation::*;
