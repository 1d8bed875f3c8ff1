//! Core library for the `cityweather` dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The fetch layer over the OpenWeatherMap current and forecast endpoints
//! - Reshaping of raw responses into display rows
//! - The per-submission dashboard flow
//!
//! It is used by `cityweather-cli`, but rendering is left to the caller.

pub mod config;
pub mod dashboard;
pub mod fetch;
pub mod model;
pub mod transform;

pub use config::Config;
pub use dashboard::{Dashboard, WeatherReport, build_dashboard};
pub use fetch::{OpenWeatherClient, WeatherFetcher};
pub use model::{
    CurrentConditions, CurrentWeatherResponse, ForecastPoint, ForecastResponse, ForecastSeries,
    MapView, WeatherQuery,
};
pub use transform::{TransformError, to_current_conditions, to_forecast_series};
