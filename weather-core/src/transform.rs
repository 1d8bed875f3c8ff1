//! Reshaping of raw OpenWeather JSON into display rows.
//!
//! Responses are accepted as-is by the fetch layer, so a 200 body that lacks
//! an expected key is only detected here.

use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;

use crate::model::{
    CurrentConditions, CurrentWeatherResponse, ForecastPoint, ForecastResponse, ForecastSeries,
};

const API_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Byte layout of `dt_txt`; `9` marks an ASCII digit.
const API_TIMESTAMP_LAYOUT: &[u8; 19] = b"9999-99-99 99:99:99";
const LABEL_FORMAT: &str = "%m.%d %H:%M";

#[derive(Debug, Error)]
pub enum TransformError {
    /// A required key is missing or has the wrong type.
    #[error("Unexpected {what} response shape: {source}")]
    Shape {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Forecast timestamp '{value}' does not match YYYY-MM-DD HH:MM:SS")]
    Timestamp {
        value: String,
        #[source]
        source: Option<chrono::ParseError>,
    },
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrent {
    main: OwCurrentMain,
    wind: OwWind,
    coord: OwCoord,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    main: OwMain,
    dt_txt: String,
}

#[derive(Debug, Deserialize)]
struct OwForecast {
    list: Vec<OwForecastEntry>,
}

pub fn to_current_conditions(
    response: &CurrentWeatherResponse,
) -> Result<CurrentConditions, TransformError> {
    let parsed = OwCurrent::deserialize(&response.0)
        .map_err(|source| TransformError::Shape { what: "current weather", source })?;

    Ok(CurrentConditions {
        temperature_c: parsed.main.temp,
        humidity_pct: parsed.main.humidity,
        wind_speed_mps: parsed.wind.speed,
        latitude: parsed.coord.lat,
        longitude: parsed.coord.lon,
    })
}

pub fn to_forecast_series(response: &ForecastResponse) -> Result<ForecastSeries, TransformError> {
    let parsed = OwForecast::deserialize(&response.0)
        .map_err(|source| TransformError::Shape { what: "forecast", source })?;

    let points = parsed
        .list
        .into_iter()
        .map(|entry| {
            Ok(ForecastPoint {
                label: reformat_timestamp(&entry.dt_txt)?,
                temperature_c: entry.main.temp,
            })
        })
        .collect::<Result<Vec<_>, TransformError>>()?;

    Ok(ForecastSeries::new(points))
}

/// `"2024-05-01 12:00:00"` -> `"05.01 12:00"`.
///
/// chrono skips whitespace and accepts unpadded fields, so the fixed-width
/// layout is checked byte by byte first.
pub fn reformat_timestamp(dt_txt: &str) -> Result<String, TransformError> {
    if !matches_layout(dt_txt.as_bytes()) {
        return Err(TransformError::Timestamp { value: dt_txt.to_string(), source: None });
    }

    let parsed = NaiveDateTime::parse_from_str(dt_txt, API_TIMESTAMP_FORMAT).map_err(|e| {
        TransformError::Timestamp { value: dt_txt.to_string(), source: Some(e) }
    })?;

    Ok(parsed.format(LABEL_FORMAT).to_string())
}

fn matches_layout(bytes: &[u8]) -> bool {
    bytes.len() == API_TIMESTAMP_LAYOUT.len()
        && bytes.iter().zip(API_TIMESTAMP_LAYOUT).all(|(&b, &expected)| match expected {
            b'9' => b.is_ascii_digit(),
            sep => b == sep,
        })
}
