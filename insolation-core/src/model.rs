use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single insolation query: which hour of which day.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct InsolationRequest {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
}

/// One stored observation row, keyed by feature name.
///
/// The store returns column values as loosely typed JSON; numeric columns may
/// arrive as strings. [`WeatherRecord::coerced`] normalizes those, and the
/// coerced record is what gets echoed back to the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct WeatherRecord(pub Map<String, Value>);

impl WeatherRecord {
    /// Parse every string field that reads as a finite number into a JSON
    /// number. Anything else passes through unchanged.
    #[must_use]
    pub fn coerced(mut self) -> Self {
        for value in self.0.values_mut() {
            if let Value::String(s) = value {
                if let Ok(parsed) = s.trim().parse::<f64>() {
                    if let Some(n) = serde_json::Number::from_f64(parsed) {
                        *value = Value::Number(n);
                    }
                }
            }
        }
        self
    }

    /// Numeric view of a field, if present and numeric after coercion.
    pub fn numeric(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    /// True when every field is numerically zero. Non-numeric fields count as
    /// non-zero; an empty record is not "all zero".
    pub fn all_zero(&self) -> bool {
        !self.0.is_empty() && self.0.values().all(|v| v.as_f64() == Some(0.0))
    }
}

/// The normalized answer for one request.
#[derive(Debug, Clone)]
pub struct InsolationEstimate {
    /// Solar insolation in watts/hr, already floored/rounded per source path.
    pub solar_insolation: f64,
    /// The observation the estimate was derived from; `None` on the forecast path.
    pub record: Option<WeatherRecord>,
}
