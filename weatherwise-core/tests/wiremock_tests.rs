//! Both views driven through the real HTTP sources against a mock server.

use std::time::Duration;

use weatherwise_core::{
    CityWeatherView, CoordinateForecastView, Coordinates, Settle, ViewState,
    provider::{openmeteo::OpenMeteoSource, openweather::OpenWeatherSource},
    view::{
        LOADING_LINE,
        city::{EMPTY_CITY_MESSAGE, NOT_FOUND_MESSAGE, TITLE},
    },
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const WEATHER_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/v1/forecast";

fn current_body(name: &str, temp: f64, rain_1h: Option<f64>) -> serde_json::Value {
    let mut body = serde_json::json!({
        "coord": {"lon": 33.45, "lat": -8.9},
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
        "main": {"temp": temp, "feels_like": temp, "pressure": 1012, "humidity": 78},
        "wind": {"speed": 2.57, "deg": 140},
        "sys": {"country": "TZ"},
        "name": name,
        "cod": 200
    });
    if let Some(mm) = rain_1h {
        body["rain"] = serde_json::json!({"1h": mm});
    }
    body
}

fn forecast_body() -> serde_json::Value {
    serde_json::json!({
        "latitude": -8.875,
        "longitude": 33.5,
        "timezone": "Africa/Dar_es_Salaam",
        "hourly_units": {"time": "iso8601", "temperature_2m": "°C"},
        "hourly": {
            "time": ["2024-01-15T00:00", "2024-01-15T01:00", "2024-01-15T02:00", "2024-01-15T03:00"],
            "temperature_2m": [16.2, 15.8, 15.1, 14.9],
            "precipitation": [0.0, 0.0, 0.3, 0.1],
            "apparent_temperature": [15.0, 14.6, 13.9, 13.8]
        },
        "daily": {
            "time": ["2024-01-15", "2024-01-16"],
            "temperature_2m_max": [24.1, 23.4]
        }
    })
}

fn city_view(server: &MockServer) -> CityWeatherView {
    let source = OpenWeatherSource::new("TEST_KEY".to_string())
        .with_base_url(format!("{}{WEATHER_PATH}", server.uri()));
    CityWeatherView::new(Box::new(source), "Mbeya")
}

fn forecast_view(base_url: String) -> CoordinateForecastView {
    let source = OpenMeteoSource::new().with_base_url(base_url);
    CoordinateForecastView::new(Box::new(source), Coordinates::new(-8.9, 33.45))
}

// ============================================================================
// Current conditions
// ============================================================================

#[tokio::test]
async fn city_lookup_sends_metric_query_with_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "Mbeya"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Mbeya", 21.7, None)))
        .expect(1)
        .mount(&server)
        .await;

    let view = city_view(&server);
    assert_eq!(view.mount().await, Settle::Applied);

    let lines = view.render();
    assert_eq!(lines[0], TITLE);
    assert!(lines.contains(&"Mbeya, TZ".to_string()));
    assert!(lines.contains(&"22°C".to_string()));
    assert!(lines.contains(&"Wind: 2.57 m/s".to_string()));
    assert!(lines.contains(&"Rain: 0 mm".to_string()));
}

#[tokio::test]
async fn city_lookup_shows_last_hour_rain() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(current_body("Mbeya", 19.0, Some(2.5))),
        )
        .mount(&server)
        .await;

    let view = city_view(&server);
    view.mount().await;

    assert!(view.render().contains(&"Rain: 2.5 mm".to_string()));
}

#[tokio::test]
async fn unknown_city_shows_generic_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"cod": "404", "message": "city not found"})),
        )
        .mount(&server)
        .await;

    let view = city_view(&server);
    view.set_city("Atlantis");
    view.submit().await;

    assert_eq!(view.render(), vec![TITLE.to_string(), NOT_FOUND_MESSAGE.to_string()]);
}

#[tokio::test]
async fn malformed_reply_shows_generic_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let view = city_view(&server);
    view.mount().await;

    assert_eq!(view.state(), ViewState::Failure(NOT_FOUND_MESSAGE.to_string()));
}

#[tokio::test]
async fn blank_city_never_hits_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Mbeya", 20.0, None)))
        .expect(0)
        .mount(&server)
        .await;

    let view = city_view(&server);
    view.set_city("   ");
    view.submit().await;

    assert_eq!(view.render(), vec![TITLE.to_string(), EMPTY_CITY_MESSAGE.to_string()]);
    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}

#[tokio::test]
async fn late_reply_for_older_lookup_is_ignored() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "Slowtown"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_body("Slowtown", 5.0, None))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "Mbeya"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Mbeya", 21.7, None)))
        .mount(&server)
        .await;

    let view = city_view(&server);

    let (older, newer) = tokio::join!(view.lookup("Slowtown"), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        view.lookup("Mbeya").await
    });

    assert_eq!(older, Settle::Superseded);
    assert_eq!(newer, Settle::Applied);
    assert_eq!(view.state().data().map(|c| c.location_name.as_str()), Some("Mbeya"));
}

#[tokio::test]
async fn loading_is_exclusive_while_in_flight() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_body("Mbeya", 21.7, None))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let view = city_view(&server);

    let (_, during) = tokio::join!(view.mount(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        view.render()
    });

    assert_eq!(during, vec![TITLE.to_string(), LOADING_LINE.to_string()]);
    assert!(view.state().data().is_some());
}

// ============================================================================
// Forecast
// ============================================================================

#[tokio::test]
async fn forecast_requests_expected_variables() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .and(query_param("latitude", "-8.9"))
        .and(query_param("longitude", "33.45"))
        .and(query_param("hourly", "temperature_2m,precipitation,apparent_temperature"))
        .and(query_param("daily", "temperature_2m_max"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&server)
        .await;

    let view = forecast_view(format!("{}{FORECAST_PATH}", server.uri()));
    assert_eq!(view.mount().await, Settle::Applied);

    let lines = view.render();
    let hourly_at = lines.iter().position(|l| l == "Hourly Temperature:").unwrap();
    let daily_at = lines.iter().position(|l| l == "Daily Max Temperature:").unwrap();

    assert_eq!(daily_at - hourly_at - 1, 4);
    assert_eq!(lines.len() - daily_at - 1, 2);
    assert_eq!(lines[hourly_at + 1], "1/15/2024, 12:00:00 AM: 16.2°C");
    assert_eq!(lines[hourly_at + 4], "1/15/2024, 3:00:00 AM: 14.9°C");
    assert_eq!(lines[daily_at + 2], "1/16/2024, 12:00:00 AM: 23.4°C");
}

#[tokio::test]
async fn forecast_surfaces_http_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let view = forecast_view(format!("{}{FORECAST_PATH}", server.uri()));
    view.mount().await;

    assert_eq!(view.render(), vec!["Error: HTTP error! Status: 500".to_string()]);
}

#[tokio::test]
async fn forecast_surfaces_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"reason": "?"})))
        .mount(&server)
        .await;

    let view = forecast_view(format!("{}{FORECAST_PATH}", server.uri()));
    view.mount().await;

    let lines = view.render();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("Error: Malformed response:"), "got {lines:?}");
}

#[tokio::test]
async fn forecast_surfaces_transport_error() {
    // Nothing listens here once the server is dropped.
    let base_url = {
        let server = MockServer::start().await;
        format!("{}{FORECAST_PATH}", server.uri())
    };

    let view = forecast_view(base_url);
    view.mount().await;

    let message = view.state().error().map(str::to_owned).unwrap_or_default();
    assert!(!message.is_empty());
    assert_ne!(message, NOT_FOUND_MESSAGE);
    assert_eq!(view.render(), vec![format!("Error: {message}")]);
}

#[tokio::test]
async fn forecast_shows_only_loading_while_in_flight() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(forecast_body())
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let view = forecast_view(format!("{}{FORECAST_PATH}", server.uri()));

    let (_, during) = tokio::join!(view.mount(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        view.render()
    });

    assert_eq!(during, vec![LOADING_LINE.to_string()]);
    assert_eq!(view.render().len(), 1 + 1 + 4 + 1 + 2);
}

#[tokio::test]
async fn late_forecast_for_previous_coordinates_is_ignored() {
    let server = MockServer::start().await;

    // Initial coordinates answer slowly.
    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .and(query_param("latitude", "-8.9"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(forecast_body())
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;

    let mut moved_body = forecast_body();
    moved_body["hourly"]["temperature_2m"][0] = serde_json::json!(29.5);

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .and(query_param("latitude", "-6.8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(moved_body))
        .mount(&server)
        .await;

    let view = forecast_view(format!("{}{FORECAST_PATH}", server.uri()));
    let moved = Coordinates::new(-6.8, 39.28);

    let (first, second) = tokio::join!(view.mount(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        view.set_coordinates(moved).await
    });

    assert_eq!(first, Settle::Superseded);
    assert_eq!(second, Some(Settle::Applied));
    assert_eq!(view.coordinates(), moved);

    let lines = view.render();
    assert_eq!(lines[2], "1/15/2024, 12:00:00 AM: 29.5°C");
}

#[tokio::test]
async fn forecast_with_partial_arrays_still_renders_every_entry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "hourly": {
                "time": ["2024-01-15T00:00", "2024-01-15T01:00", "not-a-time"],
                "temperature_2m": [16.0, 15.0],
                "apparent_temperature": [14.0]
            },
            "daily": {
                "time": ["2024-01-15", "2024-01-16"],
                "temperature_2m_max": [24.1, 23.4]
            }
        })))
        .mount(&server)
        .await;

    let view = forecast_view(format!("{}{FORECAST_PATH}", server.uri()));
    view.mount().await;

    assert_eq!(
        view.render(),
        vec![
            "Weather Data",
            "Hourly Temperature:",
            "1/15/2024, 12:00:00 AM: 16°C",
            "1/15/2024, 1:00:00 AM: 15°C",
            "Invalid Date: n/a",
            "Daily Max Temperature:",
            "1/15/2024, 12:00:00 AM: 24.1°C",
            "1/16/2024, 12:00:00 AM: 23.4°C",
        ]
    );
}
