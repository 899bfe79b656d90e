//! Current conditions for a city typed by the user.

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::{model::CurrentConditions, provider::CurrentWeatherSource};

use super::{LOADING_LINE, RequestSlot, Settle, ViewState};

pub const TITLE: &str = "WeatherWise 🌦️";
pub const EMPTY_CITY_MESSAGE: &str = "Please enter a city name.";
pub const NOT_FOUND_MESSAGE: &str = "City not found. Please try again.";

const ICON_URL_PREFIX: &str = "https://openweathermap.org/img/wn/";

pub fn icon_url(icon: &str) -> String {
    format!("{ICON_URL_PREFIX}{icon}@4x.png")
}

/// Round half up, so -2.5 shows as -2 rather than -3.
pub fn display_temperature(temperature_c: f64) -> i64 {
    (temperature_c + 0.5).floor() as i64
}

pub fn rain_text(rain_last_hour_mm: Option<f64>) -> String {
    match rain_last_hour_mm {
        Some(mm) => format!("{mm} mm"),
        None => "0 mm".to_string(),
    }
}

/// Card lines for a successful lookup.
pub fn card_lines(c: &CurrentConditions) -> Vec<String> {
    vec![
        format!("{}, {}", c.location_name, c.country_code),
        format!("{}°C", display_temperature(c.temperature_c)),
        c.description.clone(),
        format!("Icon: {}", icon_url(&c.icon)),
        format!("Humidity: {}%", c.humidity_pct),
        format!("Wind: {} m/s", c.wind_speed_mps),
        format!("Rain: {}", rain_text(c.rain_last_hour_mm)),
    ]
}

/// Search-by-city view. The input starts at the default city and is looked
/// up once on [`mount`](Self::mount).
#[derive(Debug)]
pub struct CityWeatherView {
    source: Box<dyn CurrentWeatherSource>,
    city: Mutex<String>,
    slot: RequestSlot<CurrentConditions>,
}

impl CityWeatherView {
    pub fn new(source: Box<dyn CurrentWeatherSource>, default_city: impl Into<String>) -> Self {
        Self { source, city: Mutex::new(default_city.into()), slot: RequestSlot::new() }
    }

    /// Current contents of the city input.
    pub fn city(&self) -> String {
        self.city.lock().clone()
    }

    pub fn set_city(&self, city: impl Into<String>) {
        *self.city.lock() = city.into();
    }

    pub async fn mount(&self) -> Settle {
        self.submit().await
    }

    /// Look up whatever is currently in the input.
    pub async fn submit(&self) -> Settle {
        let city = self.city();
        self.lookup(&city).await
    }

    pub async fn lookup(&self, city: &str) -> Settle {
        let ticket = self.slot.begin();

        if city.trim().is_empty() {
            return self.slot.settle(ticket, ViewState::Failure(EMPTY_CITY_MESSAGE.to_string()));
        }

        let state = match self.source.current_by_city(city).await {
            Ok(conditions) => {
                info!(city, location = %conditions.location_name, "current conditions loaded");
                ViewState::Success(conditions)
            }
            Err(err) => {
                // The user only ever sees the generic message.
                warn!(city, error = %err, "city lookup failed");
                if let Some(body) = err.reply_body() {
                    debug!(city, body, "provider reply");
                }
                ViewState::Failure(NOT_FOUND_MESSAGE.to_string())
            }
        };

        self.slot.settle(ticket, state)
    }

    pub fn state(&self) -> ViewState<CurrentConditions> {
        self.slot.state()
    }

    /// Lines to display: the title, then exactly one of loading, error or card.
    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![TITLE.to_string()];
        match self.state() {
            ViewState::Idle => {}
            ViewState::Loading => lines.push(LOADING_LINE.to_string()),
            ViewState::Failure(message) => lines.push(message),
            ViewState::Success(conditions) => lines.extend(card_lines(&conditions)),
        }
        lines
    }
}
