use serde::{Deserialize, Serialize};

/// One user submission: the city to look up and the credential to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
    pub api_key: String,
}

impl WeatherQuery {
    /// Returns `None` for an empty city; nothing should be requested then.
    pub fn new(city: impl Into<String>, api_key: impl Into<String>) -> Option<Self> {
        let city = city.into();
        if city.is_empty() {
            return None;
        }

        Some(Self { city, api_key: api_key.into() })
    }
}

/// Parsed body of a successful `/weather` call, kept as raw JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeatherResponse(pub serde_json::Value);

/// Parsed body of a successful `/forecast` call, kept as raw JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResponse(pub serde_json::Value);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_mps: f64,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Interval start formatted as `MM.DD HH:MM`.
    pub label: String,
    pub temperature_c: f64,
}

/// Forecast temperatures in the order the API returned them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    pub fn new(points: Vec<ForecastPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|p| p.label.as_str())
    }

    /// `(index, temperature)` pairs, the shape line charts expect.
    pub fn chart_points(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.temperature_c))
            .collect()
    }

    /// Lowest and highest temperature, or `None` for an empty series.
    pub fn temperature_range(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|p| p.temperature_c).fold(None, |acc, t| match acc {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        })
    }
}

/// Single-marker map centred on the queried city.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
}

impl MapView {
    pub fn centered_on(conditions: &CurrentConditions, zoom: u8) -> Self {
        Self { latitude: conditions.latitude, longitude: conditions.longitude, zoom }
    }

    pub fn openstreetmap_url(&self) -> String {
        format!(
            "https://www.openstreetmap.org/?mlat={lat}&mlon={lon}#map={zoom}/{lat}/{lon}",
            lat = self.latitude,
            lon = self.longitude,
            zoom = self.zoom,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(label: &str, t: f64) -> ForecastPoint {
        ForecastPoint { label: label.to_string(), temperature_c: t }
    }

    #[test]
    fn empty_city_yields_no_query() {
        assert!(WeatherQuery::new("", "KEY").is_none());

        let q = WeatherQuery::new("London", "KEY").expect("non-empty city");
        assert_eq!(q.city, "London");
        assert_eq!(q.api_key, "KEY");
    }

    #[test]
    fn temperature_range_covers_all_points() {
        let series = ForecastSeries::new(vec![
            point("05.01 12:00", 18.0),
            point("05.01 15:00", -2.5),
            point("05.01 18:00", 21.0),
        ]);

        assert_eq!(series.temperature_range(), Some((-2.5, 21.0)));
        assert_eq!(ForecastSeries::default().temperature_range(), None);
    }

    #[test]
    fn chart_points_keep_order() {
        let series = ForecastSeries::new(vec![point("a", 3.0), point("b", 1.0)]);
        assert_eq!(series.chart_points(), vec![(0.0, 3.0), (1.0, 1.0)]);
        assert_eq!(series.labels().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn osm_url_uses_zoom_and_coordinates() {
        let map = MapView { latitude: 51.5, longitude: -0.12, zoom: 10 };
        assert_eq!(
            map.openstreetmap_url(),
            "https://www.openstreetmap.org/?mlat=51.5&mlon=-0.12#map=10/51.5/-0.12"
        );
    }
}
