use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod gradio;

/// Feature names in the positional order the feature model expects.
/// The service takes unnamed inputs, so this order is part of its contract.
pub const FEATURE_ORDER: [&str; 15] = [
    "air_temp",
    "albedo",
    "azimuth",
    "clearsky_dhi",
    "clearsky_dni",
    "clearsky_ghi",
    "clearsky_gti",
    "cloud_opacity",
    "dhi",
    "dni",
    "ghi",
    "gti",
    "precipitation_rate",
    "relative_humidity",
    "zenith",
];

/// Model that predicts from a full set of stored weather features.
///
/// `features` follows [`FEATURE_ORDER`]; the returned value is energy over a
/// 30-day, 24-hour baseline, not yet scaled to an hourly rate.
#[async_trait]
pub trait FeatureModel: Send + Sync + Debug {
    async fn predict(&self, features: &[f64]) -> Result<f64>;
}

/// Model that predicts directly from the date/time tuple, without stored
/// features. Used for years outside the historical coverage window.
#[async_trait]
pub trait ForecastModel: Send + Sync + Debug {
    async fn forecast(&self, year: i32, month: i32, day: i32, hour: i32) -> Result<f64>;
}

/// Pull the prediction out of a free-text model reply.
///
/// The feature model answers with prose whose last whitespace-delimited token
/// is the number. Kept as a standalone adapter so the text-splitting is
/// testable and swappable if the reply format changes.
pub fn parse_trailing_number(text: &str) -> Result<f64> {
    let token = text
        .split_whitespace()
        .next_back()
        .ok_or_else(|| anyhow!("Model reply was empty"))?;

    token
        .parse::<f64>()
        .with_context(|| format!("Model reply does not end with a number: '{token}'"))
}
