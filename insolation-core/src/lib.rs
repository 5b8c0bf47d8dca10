//! Core library for the solar insolation API.
//!
//! This crate defines:
//! - Configuration handling
//! - Abstractions over the weather store and the two inference services
//! - The request orchestration & source-selection logic
//!
//! It is used by `insolation-server`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod inference;
pub mod model;
pub mod orchestrator;
pub mod store;
pub mod validate;

pub use config::Config;
pub use error::InsolationError;
pub use model::{InsolationEstimate, InsolationRequest, WeatherRecord};
pub use orchestrator::{CoverageWindow, Orchestrator};
pub use store::WeatherStore;
