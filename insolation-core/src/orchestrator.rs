//! Request orchestration: validate, pick a source path, fetch or forecast,
//! apply the no-signal rule, normalize.

use std::sync::Arc;

use crate::{
    error::InsolationError,
    inference::{FEATURE_ORDER, FeatureModel, ForecastModel},
    model::{InsolationEstimate, InsolationRequest, WeatherRecord},
    store::WeatherStore,
    validate,
};

/// Irradiance fields checked by the no-signal rule. An hour where all of
/// these read zero (nighttime, typically) has zero insolation and needs no
/// inference call.
const IRRADIANCE_KEYS: [&str; 8] = [
    "clearsky_dhi",
    "clearsky_dni",
    "clearsky_ghi",
    "clearsky_gti",
    "dhi",
    "dni",
    "ghi",
    "gti",
];

/// The feature model reports energy over a 30-day, 24-hour baseline.
const MONTHLY_BASELINE_HOURS: f64 = 30.0 * 24.0;

/// Forecast-path outputs at or below this are reported as zero; the model
/// emits small positive values even for pitch-dark hours.
const FORECAST_NOISE_FLOOR: f64 = 10.0;

/// Years with stored observations. Requests outside this window can only be
/// answered by the forecast model.
#[derive(Debug, Clone, Copy)]
pub struct CoverageWindow {
    pub min_year: i32,
    pub max_year: i32,
}

impl CoverageWindow {
    pub fn contains(&self, year: i32) -> bool {
        (self.min_year..=self.max_year).contains(&year)
    }
}

impl Default for CoverageWindow {
    fn default() -> Self {
        Self { min_year: 2009, max_year: 2023 }
    }
}

/// Stateless per-request orchestrator over the three injected clients.
///
/// The clients are long-lived handles constructed once at startup; the
/// orchestrator itself holds no mutable state and is cheap to clone.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    store: Arc<dyn WeatherStore>,
    feature_model: Arc<dyn FeatureModel>,
    forecast_model: Arc<dyn ForecastModel>,
    coverage: CoverageWindow,
    forecast_fallback: bool,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn WeatherStore>,
        feature_model: Arc<dyn FeatureModel>,
        forecast_model: Arc<dyn ForecastModel>,
        coverage: CoverageWindow,
        forecast_fallback: bool,
    ) -> Self {
        Self { store, feature_model, forecast_model, coverage, forecast_fallback }
    }

    /// Answer one request. Validation errors, a missing row, and client
    /// failures each map to their own [`InsolationError`] variant; there are
    /// no retries and no partial results.
    pub async fn handle(
        &self,
        request: &InsolationRequest,
    ) -> Result<InsolationEstimate, InsolationError> {
        validate::check(request)?;

        if self.forecast_fallback && !self.coverage.contains(request.year) {
            return self.forecast(request).await;
        }

        self.historical(request).await
    }

    async fn forecast(
        &self,
        request: &InsolationRequest,
    ) -> Result<InsolationEstimate, InsolationError> {
        let raw = self
            .forecast_model
            .forecast(request.year, request.month, request.day, request.hour)
            .await
            .map_err(InsolationError::from_client)?;

        let solar_insolation = if raw > FORECAST_NOISE_FLOOR { round3(raw) } else { 0.0 };
        tracing::debug!(raw, solar_insolation, "forecast path");

        Ok(InsolationEstimate { solar_insolation, record: None })
    }

    async fn historical(
        &self,
        request: &InsolationRequest,
    ) -> Result<InsolationEstimate, InsolationError> {
        let record = self
            .store
            .fetch(request.year, request.month, request.day, request.hour)
            .await
            .map_err(InsolationError::from_client)?
            .ok_or(InsolationError::NotFound)?;

        let record = record.coerced();

        if no_signal(&record) {
            tracing::debug!("no-signal record, skipping inference");
            return Ok(InsolationEstimate { solar_insolation: 0.0, record: Some(record) });
        }

        let features = feature_vector(&record)?;
        let raw = self
            .feature_model
            .predict(&features)
            .await
            .map_err(InsolationError::from_client)?;

        // Scale the monthly-baseline energy down to an hourly watts figure.
        let solar_insolation = round3(raw / MONTHLY_BASELINE_HOURS * 1000.0);
        tracing::debug!(raw, solar_insolation, "historical path");

        Ok(InsolationEstimate { solar_insolation, record: Some(record) })
    }
}

/// True when every irradiance field reads zero, or the whole record does.
fn no_signal(record: &WeatherRecord) -> bool {
    let irradiance_dark = IRRADIANCE_KEYS.iter().all(|key| record.numeric(key) == Some(0.0));
    irradiance_dark || record.all_zero()
}

/// The fifteen features, in the service-defined positional order.
fn feature_vector(record: &WeatherRecord) -> Result<Vec<f64>, InsolationError> {
    FEATURE_ORDER
        .iter()
        .map(|key| {
            record.numeric(key).ok_or_else(|| {
                InsolationError::inference(format!("Record field '{key}' is missing or not numeric"))
            })
        })
        .collect()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
