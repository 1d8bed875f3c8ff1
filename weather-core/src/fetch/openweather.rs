use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::model::{CurrentWeatherResponse, ForecastResponse};

use super::WeatherFetcher;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    http: Client,
}

impl Default for OpenWeatherClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenWeatherClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http: Client::new() }
    }

    /// Single GET against `{base_url}/{endpoint}` in metric units.
    async fn get_json(&self, endpoint: &str, city: &str, api_key: &str) -> Option<Value> {
        let url = format!("{}/{endpoint}", self.base_url);

        let res = match self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await
        {
            Ok(res) => res,
            Err(err) => {
                debug!(%url, error = %err, "OpenWeather request failed to send");
                return None;
            }
        };

        let status = res.status();
        if status != StatusCode::OK {
            debug!(%url, %status, "OpenWeather request returned non-200 status");
            return None;
        }

        match res.json::<Value>().await {
            Ok(body) => Some(body),
            Err(err) => {
                debug!(%url, error = %err, "OpenWeather response body is not JSON");
                None
            }
        }
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherClient {
    #[instrument(skip(self, api_key))]
    async fn fetch_current(&self, city: &str, api_key: &str) -> Option<CurrentWeatherResponse> {
        self.get_json("weather", city, api_key).await.map(CurrentWeatherResponse)
    }

    #[instrument(skip(self, api_key))]
    async fn fetch_forecast(&self, city: &str, api_key: &str) -> Option<ForecastResponse> {
        self.get_json("forecast", city, api_key).await.map(ForecastResponse)
    }
}
