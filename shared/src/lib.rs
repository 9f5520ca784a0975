//! Shared types and models for the Business Management Platform
//!
//! This crate contains the data model and the pure domain logic (stock
//! arithmetic, order totals, notification suppression) shared between the
//! backend services and their tests.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
