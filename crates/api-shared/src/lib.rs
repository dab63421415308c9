//! # API Shared
//!
//! Shared definitions for the MediNext API surfaces.
//!
//! Contains:
//! - JSON request/response types with OpenAPI schemas (`dto` module)
//! - `HealthService`
//!
//! Used by `api-rest` and the `cli` crate.

#![warn(rust_2018_idioms)]

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::{HealthRes, HealthService};
