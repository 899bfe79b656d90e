//! Open-Meteo forecast endpoint.
//!
//! Hourly and daily variables come back as parallel arrays keyed by a `time`
//! array. Every `time` entry becomes one point, in upstream order; a value
//! array that is short or absent yields `None` for the missing positions, and
//! a timestamp that does not parse is kept as `None` rather than failing the
//! whole response.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{
    error::FetchError,
    model::{Coordinates, DailyPoint, ForecastSeries, HourlyPoint},
};

use super::{ForecastSource, fetch_body};

pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const HOURLY_VARIABLES: &str = "temperature_2m,precipitation,apparent_temperature";
const DAILY_VARIABLES: &str = "temperature_2m_max";

#[derive(Debug, Clone)]
pub struct OpenMeteoSource {
    base_url: String,
    http: Client,
}

impl Default for OpenMeteoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenMeteoSource {
    pub fn new() -> Self {
        Self { base_url: DEFAULT_FORECAST_URL.to_string(), http: Client::new() }
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
struct OmHourly {
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    precipitation: Vec<Option<f64>>,
    #[serde(default)]
    apparent_temperature: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    hourly: OmHourly,
    daily: OmDaily,
}

fn value_at(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}

fn parse_hour(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .inspect_err(|e| warn!(time = s, error = %e, "unparseable hourly time"))
        .ok()
}

fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .inspect_err(|e| warn!(date = s, error = %e, "unparseable daily date"))
        .ok()
}

fn parse_forecast(body: &str) -> Result<ForecastSeries, FetchError> {
    let OmForecastResponse { hourly, daily } =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    let hourly_points = hourly
        .time
        .iter()
        .enumerate()
        .map(|(i, t)| HourlyPoint {
            time: parse_hour(t),
            temperature_c: value_at(&hourly.temperature_2m, i),
            apparent_temperature_c: value_at(&hourly.apparent_temperature, i),
            precipitation_mm: value_at(&hourly.precipitation, i),
        })
        .collect();

    let daily_points = daily
        .time
        .iter()
        .enumerate()
        .map(|(i, d)| DailyPoint {
            date: parse_day(d),
            temperature_max_c: value_at(&daily.temperature_2m_max, i),
        })
        .collect();

    Ok(ForecastSeries { hourly: hourly_points, daily: daily_points })
}

#[async_trait]
impl ForecastSource for OpenMeteoSource {
    #[instrument(skip(self), fields(url = %self.base_url))]
    async fn forecast(&self, coords: Coordinates) -> Result<ForecastSeries, FetchError> {
        debug!("Fetching forecast");

        let latitude = coords.latitude.to_string();
        let longitude = coords.longitude.to_string();

        let request = self.http.get(&self.base_url).query(&[
            ("latitude", latitude.as_str()),
            ("longitude", longitude.as_str()),
            ("hourly", HOURLY_VARIABLES),
            ("daily", DAILY_VARIABLES),
            ("timezone", "auto"),
        ]);

        let body = fetch_body(request, "Open-Meteo forecast").await?;
        parse_forecast(&body)
    }
}
