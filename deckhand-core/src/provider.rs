use crate::{
    Config,
    model::{CurrentConditions, ForecastResponse, LocationQuery},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Failures of a single provider call.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The provider answered with a non-success status, e.g. 404 for an unknown place.
    #[error("{resource} not found: {status}")]
    NotFound { resource: &'static str, status: u16 },

    #[error("network error while fetching {resource}: {source}")]
    Transport {
        resource: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode {resource} response: {source}")]
    Decode {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl QueryError {
    pub fn status(&self) -> Option<u16> {
        match self {
            QueryError::NotFound { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Source of current conditions and forecasts. Both calls always ask for metric units.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current_conditions(
        &self,
        query: &LocationQuery,
    ) -> Result<CurrentConditions, QueryError>;

    async fn fetch_forecast(&self, query: &LocationQuery) -> Result<ForecastResponse, QueryError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?.to_owned();

    let provider = match config.base_url.as_deref() {
        Some(base) => OpenWeatherProvider::with_base_url(api_key, base),
        None => OpenWeatherProvider::new(api_key),
    };

    Ok(Box::new(provider))
}
