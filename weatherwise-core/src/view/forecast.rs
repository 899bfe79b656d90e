//! Hourly and daily forecast for a fixed pair of coordinates.

use chrono::NaiveDateTime;
use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::{
    model::{Coordinates, ForecastSeries},
    provider::ForecastSource,
};

use super::{LOADING_LINE, RequestSlot, Settle, ViewState};

pub const HEADING: &str = "Weather Data";
pub const HOURLY_HEADING: &str = "Hourly Temperature:";
pub const DAILY_HEADING: &str = "Daily Max Temperature:";

/// `1/15/2024, 1:00:00 PM`
pub fn localized(time: NaiveDateTime) -> String {
    time.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

pub const INVALID_DATE: &str = "Invalid Date";

fn localized_or_invalid(time: Option<NaiveDateTime>) -> String {
    time.map(localized).unwrap_or_else(|| INVALID_DATE.to_string())
}

fn temperature(value: Option<f64>) -> String {
    match value {
        Some(t) => format!("{t}°C"),
        None => "n/a".to_string(),
    }
}

/// Every hourly and daily point, one line each, in upstream order.
pub fn series_lines(series: &ForecastSeries) -> Vec<String> {
    let mut lines = Vec::with_capacity(series.hourly.len() + series.daily.len() + 3);

    lines.push(HEADING.to_string());
    lines.push(HOURLY_HEADING.to_string());
    lines.extend(
        series
            .hourly
            .iter()
            .map(|h| format!("{}: {}", localized_or_invalid(h.time), temperature(h.temperature_c))),
    );
    lines.push(DAILY_HEADING.to_string());
    lines.extend(series.daily.iter().map(|d| {
        format!(
            "{}: {}",
            localized_or_invalid(d.date.map(|date| date.and_time(chrono::NaiveTime::MIN))),
            temperature(d.temperature_max_c)
        )
    }));

    lines
}

/// Forecast view. Coordinates come from whoever opened the view; a change
/// triggers a new request.
#[derive(Debug)]
pub struct CoordinateForecastView {
    source: Box<dyn ForecastSource>,
    coords: Mutex<Coordinates>,
    slot: RequestSlot<ForecastSeries>,
}

impl CoordinateForecastView {
    pub fn new(source: Box<dyn ForecastSource>, coords: Coordinates) -> Self {
        Self { source, coords: Mutex::new(coords), slot: RequestSlot::new() }
    }

    pub fn coordinates(&self) -> Coordinates {
        *self.coords.lock()
    }

    pub async fn mount(&self) -> Settle {
        self.load(self.coordinates()).await
    }

    /// Re-fetch if `coords` differ from the current ones; `None` when unchanged.
    pub async fn set_coordinates(&self, coords: Coordinates) -> Option<Settle> {
        {
            let mut current = self.coords.lock();
            if *current == coords {
                return None;
            }
            *current = coords;
        }
        Some(self.load(coords).await)
    }

    async fn load(&self, coords: Coordinates) -> Settle {
        let ticket = self.slot.begin();

        let state = match self.source.forecast(coords).await {
            Ok(series) => {
                info!(
                    %coords,
                    hourly = series.hourly.len(),
                    daily = series.daily.len(),
                    "forecast loaded"
                );
                ViewState::Success(series)
            }
            Err(err) => {
                error!(%coords, error = %err, "Error fetching weather data");
                if let Some(body) = err.reply_body() {
                    debug!(%coords, body, "provider reply");
                }
                ViewState::Failure(err.to_string())
            }
        };

        self.slot.settle(ticket, state)
    }

    pub fn state(&self) -> ViewState<ForecastSeries> {
        self.slot.state()
    }

    pub fn render(&self) -> Vec<String> {
        match self.state() {
            ViewState::Idle => Vec::new(),
            ViewState::Loading => vec![LOADING_LINE.to_string()],
            ViewState::Failure(message) => vec![format!("Error: {message}")],
            ViewState::Success(series) => series_lines(&series),
        }
    }
}
