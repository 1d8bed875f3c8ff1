//! Integration tests for the OpenWeather fetch layer using wiremock.

use cityweather_core::{
    Dashboard, OpenWeatherClient, WeatherFetcher, WeatherQuery, build_dashboard,
    to_current_conditions, to_forecast_series,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn current_json() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": -0.12, "lat": 51.5 },
        "weather": [{ "id": 803, "main": "Clouds", "description": "broken clouds" }],
        "main": { "temp": 21.5, "feels_like": 21.1, "humidity": 60, "pressure": 1015 },
        "wind": { "speed": 3.2, "deg": 250 },
        "dt": 1714564800,
        "name": "London",
        "cod": 200
    })
}

fn forecast_json() -> serde_json::Value {
    serde_json::json!({
        "cod": "200",
        "cnt": 3,
        "list": [
            { "dt": 1714564800, "main": { "temp": 18.0 }, "dt_txt": "2024-05-01 12:00:00" },
            { "dt": 1714575600, "main": { "temp": 19.4 }, "dt_txt": "2024-05-01 15:00:00" },
            { "dt": 1714586400, "main": { "temp": 16.2 }, "dt_txt": "2024-05-01 18:00:00" }
        ],
        "city": { "name": "London", "country": "GB" }
    })
}

async fn mount(server: &MockServer, endpoint: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/{endpoint}")))
        .and(query_param("q", "London"))
        .and(query_param("appid", "KEY"))
        .and(query_param("units", "metric"))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn current_success_returns_parsed_body() {
    let server = MockServer::start().await;
    mount(&server, "weather", ResponseTemplate::new(200).set_body_json(current_json())).await;

    let client = OpenWeatherClient::with_base_url(server.uri());
    let response = client.fetch_current("London", "KEY").await.expect("present");

    let conditions = to_current_conditions(&response).expect("valid shape");
    assert_eq!(conditions.temperature_c, 21.5);
    assert_eq!(conditions.humidity_pct, 60.0);
    assert_eq!(conditions.wind_speed_mps, 3.2);
    assert_eq!(conditions.latitude, 51.5);
    assert_eq!(conditions.longitude, -0.12);
}

#[tokio::test]
async fn forecast_success_returns_parsed_body() {
    let server = MockServer::start().await;
    mount(&server, "forecast", ResponseTemplate::new(200).set_body_json(forecast_json())).await;

    let client = OpenWeatherClient::with_base_url(server.uri());
    let response = client.fetch_forecast("London", "KEY").await.expect("present");

    let series = to_forecast_series(&response).expect("valid shape");
    assert_eq!(series.len(), 3);
    assert_eq!(series.points()[0].label, "05.01 12:00");
    assert_eq!(series.points()[0].temperature_c, 18.0);
}

#[tokio::test]
async fn not_found_is_absent() {
    let server = MockServer::start().await;
    let body = serde_json::json!({ "cod": "404", "message": "city not found" });
    mount(&server, "weather", ResponseTemplate::new(404).set_body_json(body.clone())).await;
    mount(&server, "forecast", ResponseTemplate::new(404).set_body_json(body)).await;

    let client = OpenWeatherClient::with_base_url(server.uri());
    assert!(client.fetch_current("London", "KEY").await.is_none());
    assert!(client.fetch_forecast("London", "KEY").await.is_none());
}

#[tokio::test]
async fn unauthorized_and_server_errors_are_absent() {
    for status in [401u16, 500, 503] {
        let server = MockServer::start().await;
        mount(&server, "weather", ResponseTemplate::new(status)).await;

        let client = OpenWeatherClient::with_base_url(server.uri());
        assert!(
            client.fetch_current("London", "KEY").await.is_none(),
            "status {status} should be absent"
        );
    }
}

#[tokio::test]
async fn non_json_success_body_is_absent() {
    let server = MockServer::start().await;
    mount(&server, "weather", ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .await;

    let client = OpenWeatherClient::with_base_url(server.uri());
    assert!(client.fetch_current("London", "KEY").await.is_none());
}

#[tokio::test]
async fn unreachable_host_is_absent() {
    // Nothing listens on port 1.
    let client = OpenWeatherClient::with_base_url("http://127.0.0.1:1/data/2.5");
    assert!(client.fetch_current("London", "KEY").await.is_none());
    assert!(client.fetch_forecast("London", "KEY").await.is_none());
}

#[tokio::test]
async fn failed_current_never_requests_forecast() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_json()))
        .expect(0)
        .mount(&server)
        .await;

    let client = OpenWeatherClient::with_base_url(server.uri());
    let query = WeatherQuery::new("Atlantis", "KEY").expect("non-empty city");
    let dashboard = build_dashboard(&client, &query, 10).await.expect("no transform error");

    assert_eq!(dashboard, Dashboard::Unavailable { city: "Atlantis".to_string() });
}

#[tokio::test]
async fn end_to_end_report() {
    let server = MockServer::start().await;
    mount(&server, "weather", ResponseTemplate::new(200).set_body_json(current_json())).await;
    mount(&server, "forecast", ResponseTemplate::new(200).set_body_json(forecast_json())).await;

    let client = OpenWeatherClient::with_base_url(server.uri());
    let query = WeatherQuery::new("London", "KEY").expect("non-empty city");

    let Dashboard::Ready(report) = build_dashboard(&client, &query, 10).await.expect("valid")
    else {
        panic!("expected a ready dashboard");
    };

    assert_eq!(report.map.zoom, 10);
    let labels: Vec<_> = report.forecast.as_ref().expect("forecast").labels().collect();
    assert_eq!(labels, vec!["05.01 12:00", "05.01 15:00", "05.01 18:00"]);
}
