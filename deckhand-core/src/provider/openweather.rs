use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::model::{CurrentConditions, ForecastResponse, LocationQuery};

use super::{QueryError, WeatherProvider};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        path: &str,
        query: &LocationQuery,
    ) -> Result<T, QueryError> {
        let url = format!("{}/{}", self.base_url, path);

        let mut params = query.query_pairs();
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));

        let res = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|source| QueryError::Transport { resource, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| QueryError::Transport { resource, source })?;

        if !status.is_success() {
            tracing::warn!(
                resource,
                status = status.as_u16(),
                body = %truncate_body(&body),
                "OpenWeather request failed"
            );
            return Err(QueryError::NotFound { resource, status: status.as_u16() });
        }

        tracing::debug!(resource, location = %query, body = %truncate_body(&body), "OpenWeather response");

        serde_json::from_str(&body).map_err(|source| QueryError::Decode { resource, source })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_current_conditions(
        &self,
        query: &LocationQuery,
    ) -> Result<CurrentConditions, QueryError> {
        self.get_json("Weather", "weather", query).await
    }

    async fn fetch_forecast(&self, query: &LocationQuery) -> Result<ForecastResponse, QueryError> {
        self.get_json("Forecast", "forecast", query).await
    }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
