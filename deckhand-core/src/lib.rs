//! Core library for the `deckhand` weather charts.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather query service behind the `WeatherProvider` trait
//! - Shared domain models (conditions, forecast, units)
//! - The moon phase calculator
//! - The presentation state controller driving a search session
//!
//! It is used by `deckhand-cli`, but any other front-end can drive the same controller.

pub mod config;
pub mod controller;
pub mod geolocation;
pub mod model;
pub mod moon;
pub mod provider;

pub use config::Config;
pub use controller::{Controller, SearchOutcome, ViewState};
pub use geolocation::{ConfiguredLocation, GeolocationError, Geolocator};
pub use model::{
    Coordinates, CurrentConditions, ForecastEntry, ForecastResponse, LocationQuery, UnitPreference,
};
pub use moon::{MoonPhase, moon_phase_on, moon_phase_today};
pub use provider::{QueryError, WeatherProvider, provider_from_config};
