use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{error::FetchError, model::CurrentConditions};

use super::{CurrentWeatherSource, fetch_body};

pub const DEFAULT_CURRENT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// OpenWeather "current weather data" endpoint, queried by city name in metric units.
#[derive(Debug, Clone)]
pub struct OpenWeatherSource {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherSource {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_CURRENT_WEATHER_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    rain: Option<OwRain>,
}

fn parse_current(body: &str) -> Result<CurrentConditions, FetchError> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    let weather = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::Malformed("response contained no weather entry".into()))?;

    Ok(CurrentConditions {
        location_name: parsed.name,
        country_code: parsed.sys.country,
        temperature_c: parsed.main.temp,
        description: weather.description,
        icon: weather.icon,
        humidity_pct: parsed.main.humidity,
        wind_speed_mps: parsed.wind.speed,
        rain_last_hour_mm: parsed.rain.and_then(|r| r.one_hour),
    })
}

#[async_trait]
impl CurrentWeatherSource for OpenWeatherSource {
    #[instrument(skip(self), fields(url = %self.base_url))]
    async fn current_by_city(&self, city: &str) -> Result<CurrentConditions, FetchError> {
        debug!("Fetching current weather");

        let request = self.http.get(&self.base_url).query(&[
            ("q", city),
            ("units", "metric"),
            ("appid", self.api_key.as_str()),
        ]);

        let body = fetch_body(request, "OpenWeather current").await?;
        parse_current(&body)
    }
}
