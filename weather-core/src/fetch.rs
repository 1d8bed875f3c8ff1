use async_trait::async_trait;

use crate::model::{CurrentWeatherResponse, ForecastResponse};

pub mod openweather;

pub use openweather::{DEFAULT_BASE_URL, OpenWeatherClient};

/// Best-effort access to the two weather endpoints.
///
/// `None` means the call produced no usable result. Bad status codes,
/// transport errors and unreadable bodies all collapse into it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherFetcher: Send + Sync {
    async fn fetch_current(&self, city: &str, api_key: &str) -> Option<CurrentWeatherResponse>;

    async fn fetch_forecast(&self, city: &str, api_key: &str) -> Option<ForecastResponse>;
}
