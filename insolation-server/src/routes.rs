use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde_json::{Value, json};

use insolation_core::{InsolationError, InsolationRequest, Orchestrator};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/get-data/", post(get_data))
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Solar insolation API" }))
}

/// The one endpoint: validate the tuple, answer from the store or the
/// forecast model, wrap the result in the status envelope.
async fn get_data(
    State(state): State<AppState>,
    Json(request): Json<InsolationRequest>,
) -> (StatusCode, Json<Value>) {
    match state.orchestrator.handle(&request).await {
        Ok(estimate) => {
            let mut data = json!({
                "solar_insolation": format!("{} watts/hr", estimate.solar_insolation),
            });

            // weather_data is only present on the historical path, echoed as
            // the (coerced) row list the store produced.
            if let Some(record) = estimate.record {
                data["weather_data"] = json!([record]);
            }

            (StatusCode::OK, Json(json!({ "status": "success", "data": data })))
        }
        Err(err) => {
            let status = status_for(&err);
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                tracing::error!(%err, "request failed");
            }
            (status, Json(json!({ "status": "error", "message": err.to_string() })))
        }
    }
}

fn status_for(err: &InsolationError) -> StatusCode {
    match err {
        InsolationError::Validation { .. } => StatusCode::BAD_REQUEST,
        InsolationError::NotFound => StatusCode::NOT_FOUND,
        InsolationError::Inference { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
