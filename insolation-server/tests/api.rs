//! End-to-end tests for the API surface: envelope shapes, status codes, and
//! the source-selection behavior visible through them. External collaborators
//! are replaced with in-process stubs.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use insolation_core::{
    CoverageWindow, Orchestrator, WeatherRecord,
    inference::{FeatureModel, ForecastModel},
    store::WeatherStore,
};
use insolation_server::routes::{AppState, router};

#[derive(Debug)]
struct StubStore {
    row: Option<Value>,
}

#[async_trait]
impl WeatherStore for StubStore {
    async fn fetch(
        &self,
        _year: i32,
        _month: i32,
        _day: i32,
        _hour: i32,
    ) -> anyhow::Result<Option<WeatherRecord>> {
        Ok(self.row.clone().map(|v| serde_json::from_value(v).unwrap()))
    }
}

#[derive(Debug)]
struct StubFeatureModel {
    raw: f64,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl FeatureModel for StubFeatureModel {
    async fn predict(&self, _features: &[f64]) -> anyhow::Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.raw)
    }
}

#[derive(Debug)]
struct FailingFeatureModel;

#[async_trait]
impl FeatureModel for FailingFeatureModel {
    async fn predict(&self, _features: &[f64]) -> anyhow::Result<f64> {
        Err(anyhow::anyhow!("inference service unreachable"))
    }
}

#[derive(Debug)]
struct StubForecastModel {
    raw: f64,
}

#[async_trait]
impl ForecastModel for StubForecastModel {
    async fn forecast(&self, _year: i32, _month: i32, _day: i32, _hour: i32) -> anyhow::Result<f64> {
        Ok(self.raw)
    }
}

fn daytime_row() -> Value {
    json!({
        "year": 2015, "month": 6, "day": 15, "hour": 12,
        "air_temp": 24.1, "albedo": "0.13", "azimuth": -80.0,
        "clearsky_dhi": 120.0, "clearsky_dni": 890.0, "clearsky_ghi": 950.0,
        "clearsky_gti": 940.0, "cloud_opacity": "3.4", "dhi": 110.0,
        "dni": 870.0, "ghi": "930.5", "gti": 920.0,
        "precipitation_rate": 0.0, "relative_humidity": 41.0, "zenith": 22.0
    })
}

fn nighttime_row() -> Value {
    json!({
        "year": 2015, "month": 6, "day": 15, "hour": 2,
        "air_temp": 11.0, "albedo": 0.13, "azimuth": 120.0,
        "clearsky_dhi": 0, "clearsky_dni": 0, "clearsky_ghi": "0",
        "clearsky_gti": 0, "cloud_opacity": 8.0, "dhi": 0,
        "dni": 0, "ghi": 0, "gti": 0.0,
        "precipitation_rate": 0.0, "relative_humidity": 87.0, "zenith": 130.0
    })
}

struct TestApp {
    app: Router,
    feature_calls: Arc<AtomicUsize>,
}

fn test_app(row: Option<Value>, feature_raw: f64, forecast_raw: f64) -> TestApp {
    let calls = Arc::new(AtomicUsize::new(0));
    let feature_model = Arc::new(StubFeatureModel { raw: feature_raw, calls: calls.clone() });
    build_app(row, feature_model, forecast_raw, calls)
}

fn build_app(
    row: Option<Value>,
    feature_model: Arc<dyn FeatureModel>,
    forecast_raw: f64,
    feature_calls: Arc<AtomicUsize>,
) -> TestApp {
    let orchestrator = Orchestrator::new(
        Arc::new(StubStore { row }),
        feature_model,
        Arc::new(StubForecastModel { raw: forecast_raw }),
        CoverageWindow::default(),
        true,
    );

    TestApp {
        app: router(AppState { orchestrator: Arc::new(orchestrator) }),
        feature_calls,
    }
}

async fn post_get_data(app: Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/get-data/")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

#[tokio::test]
async fn root_returns_greeting() {
    let t = test_app(None, 0.0, 0.0);

    let response = t
        .app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn historical_success_echoes_weather_data() {
    let t = test_app(Some(daytime_row()), 720.0, 0.0);

    let (status, body) =
        post_get_data(t.app, json!({"year": 2015, "month": 6, "day": 15, "hour": 12})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["solar_insolation"], "1000 watts/hr");

    let rows = body["data"]["weather_data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    // echoed row is the coerced one
    assert_eq!(rows[0]["ghi"], json!(930.5));
    assert_eq!(t.feature_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn all_zero_irradiance_reports_zero_without_inference() {
    let t = test_app(Some(nighttime_row()), 720.0, 0.0);

    let (status, body) =
        post_get_data(t.app, json!({"year": 2015, "month": 6, "day": 15, "hour": 2})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["solar_insolation"], "0 watts/hr");
    assert!(body["data"]["weather_data"].is_array());
    assert_eq!(t.feature_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn forecast_path_omits_weather_data() {
    let t = test_app(None, 0.0, 45.6789);

    let (status, body) =
        post_get_data(t.app, json!({"year": 2025, "month": 6, "day": 15, "hour": 12})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["solar_insolation"], "45.679 watts/hr");
    assert!(body["data"].get("weather_data").is_none());
}

#[tokio::test]
async fn forecast_noise_floor_normalizes_to_zero() {
    let t = test_app(None, 0.0, 9.4);

    let (_, body) =
        post_get_data(t.app, json!({"year": 2025, "month": 6, "day": 15, "hour": 12})).await;

    assert_eq!(body["data"]["solar_insolation"], "0 watts/hr");
}

#[tokio::test]
async fn invalid_day_is_a_400_with_error_envelope() {
    let t = test_app(Some(daytime_row()), 720.0, 0.0);

    let (status, body) =
        post_get_data(t.app, json!({"year": 2015, "month": 2, "day": 30, "hour": 10})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("Invalid day for the month 2"));
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn negative_fields_report_the_sign_rule() {
    let t = test_app(Some(daytime_row()), 720.0, 0.0);

    let (status, body) =
        post_get_data(t.app, json!({"year": 2015, "month": -1, "day": 10, "hour": 5})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Month, day, and hour must be non-negative values");
}

#[tokio::test]
async fn missing_row_is_a_404() {
    let t = test_app(None, 720.0, 0.0);

    let (status, body) =
        post_get_data(t.app, json!({"year": 2015, "month": 6, "day": 15, "hour": 12})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Data not found");
}

#[tokio::test]
async fn inference_failure_is_a_500_naming_the_cause() {
    let calls = Arc::new(AtomicUsize::new(0));
    let t = build_app(Some(daytime_row()), Arc::new(FailingFeatureModel), 0.0, calls);

    let (status, body) =
        post_get_data(t.app, json!({"year": 2015, "month": 6, "day": 15, "hour": 12})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Error fetching data or making prediction"));
    assert!(message.contains("inference service unreachable"));
}
