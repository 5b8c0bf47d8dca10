use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{FeatureModel, ForecastModel, parse_trailing_number};

/// Client for one Gradio-hosted prediction endpoint.
///
/// Gradio's REST flow is two steps: POST the inputs to `call/predict` to get
/// an event id, then GET the event stream and read the final `data:` frame.
/// The same client type serves both hosted models; each instance points at one
/// base URL and implements the trait matching that model's inputs.
#[derive(Debug, Clone)]
pub struct GradioModel {
    base_url: String,
    http: Client,
}

impl GradioModel {
    pub fn new(base_url: String) -> Self {
        Self { base_url, http: Client::new() }
    }

    /// Run one predict call and return the first output value.
    async fn call_predict(&self, inputs: Vec<Value>) -> Result<Value> {
        let submit_url =
            format!("{}/gradio_api/call/predict", self.base_url.trim_end_matches('/'));

        let res = self
            .http
            .post(&submit_url)
            .json(&json!({ "data": inputs }))
            .send()
            .await
            .context("Failed to submit prediction request")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read prediction submit response")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Prediction submit failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let submitted: SubmitResponse =
            serde_json::from_str(&body).context("Failed to parse prediction submit JSON")?;

        let result_url = format!("{}/{}", submit_url, submitted.event_id);

        let res = self
            .http
            .get(&result_url)
            .send()
            .await
            .context("Failed to fetch prediction result")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read prediction result body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Prediction result fetch failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let outputs = parse_event_stream(&body)?;

        outputs
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Prediction result contained no outputs"))
    }
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    event_id: String,
}

/// Extract the outputs array from an SSE-framed Gradio result body.
/// The last `data:` line carries the completed value.
fn parse_event_stream(body: &str) -> Result<Vec<Value>> {
    let data_line = body
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .next_back()
        .ok_or_else(|| anyhow!("Prediction event stream contained no data frame"))?;

    serde_json::from_str(data_line.trim())
        .context("Failed to parse prediction event stream payload")
}

fn value_as_f64(value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => {
            n.as_f64().ok_or_else(|| anyhow!("Prediction output is not a finite number"))
        }
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .with_context(|| format!("Prediction output is not numeric: '{s}'")),
        other => Err(anyhow!("Unexpected prediction output type: {other}")),
    }
}

#[async_trait]
impl FeatureModel for GradioModel {
    async fn predict(&self, features: &[f64]) -> Result<f64> {
        let inputs: Vec<Value> = features.iter().map(|f| json!(*f)).collect();

        tracing::debug!(url = %self.base_url, "calling feature model");
        let output = self.call_predict(inputs).await?;

        // The feature model replies in free text; the number is the last token.
        let text = match &output {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        parse_trailing_number(&text)
    }
}

#[async_trait]
impl ForecastModel for GradioModel {
    async fn forecast(&self, year: i32, month: i32, day: i32, hour: i32) -> Result<f64> {
        tracing::debug!(url = %self.base_url, year, month, day, hour, "calling forecast model");
        let output = self
            .call_predict(vec![json!(year), json!(month), json!(day), json!(hour)])
            .await?;

        value_as_f64(&output)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX { format!("{}...", &body[..MAX]) } else { body.to_string() }
}
