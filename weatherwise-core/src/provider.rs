use crate::{
    Config, CurrentConditions, ForecastSeries,
    error::FetchError,
    model::Coordinates,
    provider::{openmeteo::OpenMeteoSource, openweather::OpenWeatherSource},
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::{fmt::Debug, time::Duration};
use tracing::warn;

pub mod openmeteo;
pub mod openweather;

/// Looks up current conditions by free-text city name.
#[async_trait]
pub trait CurrentWeatherSource: Send + Sync + Debug {
    async fn current_by_city(&self, city: &str) -> Result<CurrentConditions, FetchError>;
}

/// Fetches hourly and daily forecast series for a point.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn forecast(&self, coords: Coordinates) -> Result<ForecastSeries, FetchError>;
}

/// HTTP client honouring the configured timeout. Without one, reqwest's default applies.
pub fn http_client(timeout_secs: Option<u64>) -> anyhow::Result<Client> {
    let mut builder = Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().context("Failed to build HTTP client")
}

/// Construct the OpenWeather source from config.
pub fn current_source_from_config(config: &Config) -> anyhow::Result<Box<dyn CurrentWeatherSource>> {
    let api_key = config.resolve_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
             Hint: run `weatherwise configure` or set OPENWEATHER_API_KEY."
        )
    })?;

    let source = OpenWeatherSource::new(api_key)
        .with_base_url(config.endpoints.current_weather_url.clone())
        .with_client(http_client(config.timeout_secs)?);

    Ok(Box::new(source))
}

/// Construct the Open-Meteo source from config. No credentials are needed.
pub fn forecast_source_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastSource>> {
    let source = OpenMeteoSource::new()
        .with_base_url(config.endpoints.forecast_url.clone())
        .with_client(http_client(config.timeout_secs)?);

    Ok(Box::new(source))
}

/// Send a request and return the body of a successful reply.
pub(crate) async fn fetch_body(request: RequestBuilder, what: &str) -> Result<String, FetchError> {
    let res = request.send().await?;

    let status = res.status();
    let body = res.text().await?;

    if !status.is_success() {
        warn!(%status, "{what} request failed");
        return Err(FetchError::Status { status: status.as_u16(), body: truncate_body(&body) });
    }

    Ok(body)
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
