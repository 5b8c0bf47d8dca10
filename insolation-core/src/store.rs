use crate::model::WeatherRecord;
use async_trait::async_trait;
use std::fmt::Debug;

pub mod postgrest;

/// Read-only access to the hourly weather observation table.
///
/// Implementations are long-lived and shared across requests; a fetch is a
/// self-contained read, so handles are safe to use concurrently.
#[async_trait]
pub trait WeatherStore: Send + Sync + Debug {
    /// Look up the single row matching (year, month, day, hour), if any.
    async fn fetch(
        &self,
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
    ) -> anyhow::Result<Option<WeatherRecord>>;
}
