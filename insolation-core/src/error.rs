use thiserror::Error;

/// Error taxonomy for a single insolation request.
///
/// Every failure is terminal for the request that produced it; the server crate
/// maps each variant to an HTTP status (400 / 404 / 500).
#[derive(Debug, Error)]
pub enum InsolationError {
    /// The supplied date/time tuple violates a calendar rule.
    #[error("{message}")]
    Validation { message: String },

    /// No stored observation matches the requested (year, month, day, hour).
    #[error("Data not found")]
    NotFound,

    /// The weather store or one of the inference services failed.
    #[error("Error fetching data or making prediction: {message}")]
    Inference { message: String },
}

impl InsolationError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn inference<S: Into<String>>(message: S) -> Self {
        Self::Inference { message: message.into() }
    }

    /// Wrap a client-layer failure, keeping its context chain in the message.
    pub fn from_client(err: anyhow::Error) -> Self {
        Self::Inference { message: format!("{err:#}") }
    }
}
