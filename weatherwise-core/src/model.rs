use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Current conditions for a named city, as shown on the home view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub country_code: String,
    pub temperature_c: f64,
    pub description: String,
    /// Icon identifier, e.g. `"03d"`; expanded into an image URL when rendered.
    pub icon: String,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    /// `None` means the provider did not report rain for the last hour.
    pub rain_last_hour_mm: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// One hourly sample. Times are local to the forecast location; `None` when
/// the provider sent a timestamp that does not parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    pub time: Option<NaiveDateTime>,
    pub temperature_c: Option<f64>,
    pub apparent_temperature_c: Option<f64>,
    pub precipitation_mm: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: Option<NaiveDate>,
    pub temperature_max_c: Option<f64>,
}

/// Hourly and daily series in the order the provider returned them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub hourly: Vec<HourlyPoint>,
    pub daily: Vec<DailyPoint>,
}
