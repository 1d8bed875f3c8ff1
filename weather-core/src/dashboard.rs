use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    fetch::WeatherFetcher,
    model::{CurrentConditions, ForecastSeries, MapView, WeatherQuery},
    transform::{TransformError, to_current_conditions, to_forecast_series},
};

/// Zoom level used for the city map unless configured otherwise.
pub const DEFAULT_MAP_ZOOM: u8 = 10;

/// Everything shown for a city whose current weather was retrieved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub city: String,
    pub current: CurrentConditions,
    pub map: MapView,
    /// `None` when the forecast call produced nothing.
    pub forecast: Option<ForecastSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Dashboard {
    /// Current weather could not be retrieved; only a warning is shown.
    Unavailable { city: String },
    Ready(Box<WeatherReport>),
}

impl Dashboard {
    pub fn warning(&self) -> Option<String> {
        match self {
            Dashboard::Unavailable { city } => Some(unavailable_warning(city)),
            Dashboard::Ready(_) => None,
        }
    }
}

pub fn unavailable_warning(city: &str) -> String {
    format!(
        "Could not retrieve data for city: {city}. Please check the name or the configured API key!"
    )
}

/// Run one submission: current weather first, the forecast only if that succeeded.
///
/// Fetch failures become [`Dashboard::Unavailable`] or a report without a
/// forecast. A successful response with an unexpected shape is returned as
/// an error.
#[instrument(skip(fetcher, query), fields(city = %query.city))]
pub async fn build_dashboard(
    fetcher: &dyn WeatherFetcher,
    query: &WeatherQuery,
    map_zoom: u8,
) -> Result<Dashboard, TransformError> {
    let Some(current) = fetcher.fetch_current(&query.city, &query.api_key).await else {
        debug!("current weather unavailable, skipping forecast");
        return Ok(Dashboard::Unavailable { city: query.city.clone() });
    };

    let current = to_current_conditions(&current)?;
    let map = MapView::centered_on(&current, map_zoom);

    let forecast = match fetcher.fetch_forecast(&query.city, &query.api_key).await {
        Some(response) => Some(to_forecast_series(&response)?),
        None => {
            debug!("forecast unavailable");
            None
        }
    };

    Ok(Dashboard::Ready(Box::new(WeatherReport {
        city: query.city.clone(),
        current,
        map,
        forecast,
    })))
}
