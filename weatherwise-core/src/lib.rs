//! Core library for the `weatherwise` app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - HTTP sources for current conditions (OpenWeather) and forecasts (Open-Meteo)
//! - The two views and the request/state machine behind them
//!
//! It is used by `weatherwise-cli`, but the views are front-end agnostic:
//! they expose their state and the lines to display.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod view;

pub use config::{Config, Endpoints};
pub use error::FetchError;
pub use model::{Coordinates, CurrentConditions, DailyPoint, ForecastSeries, HourlyPoint};
pub use provider::{CurrentWeatherSource, ForecastSource};
pub use view::{CityWeatherView, CoordinateForecastView, Settle, ViewState};
