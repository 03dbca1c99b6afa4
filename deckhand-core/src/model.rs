use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw forecast samples are 3 hours apart, so every 8th one is ~24h later.
pub const FORECAST_STRIDE: usize = 8;
pub const FORECAST_DAYS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// What the provider is asked about: a free-text place or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Place(String),
    Coordinates(Coordinates),
}

impl LocationQuery {
    pub fn place(name: impl Into<String>) -> Self {
        LocationQuery::Place(name.into())
    }

    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        LocationQuery::Coordinates(Coordinates { latitude, longitude })
    }

    /// Provider query parameters identifying the location.
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            LocationQuery::Place(name) => vec![("q", name.clone())],
            LocationQuery::Coordinates(c) => vec![
                ("lat", c.latitude.to_string()),
                ("lon", c.longitude.to_string()),
            ],
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationQuery::Place(name) => f.write_str(name),
            LocationQuery::Coordinates(c) => write!(f, "{}, {}", c.latitude, c.longitude),
        }
    }
}

/// Display unit. The provider is always queried in metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitPreference {
    #[default]
    Celsius,
    Fahrenheit,
}

impl UnitPreference {
    pub fn toggled(self) -> Self {
        match self {
            UnitPreference::Celsius => UnitPreference::Fahrenheit,
            UnitPreference::Fahrenheit => UnitPreference::Celsius,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnitPreference::Celsius => "°C",
            UnitPreference::Fahrenheit => "°F",
        }
    }

    /// Convert a metric reading for display, rounding halves up.
    pub fn convert(self, celsius: f64) -> i64 {
        let value = match self {
            UnitPreference::Celsius => celsius,
            UnitPreference::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        };
        (value + 0.5).floor() as i64
    }

    pub fn format(self, celsius: f64) -> String {
        format!("{}{}", self.convert(celsius), self.symbol())
    }
}

impl fmt::Display for UnitPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnitPreference::Celsius => "celsius",
            UnitPreference::Fahrenheit => "fahrenheit",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    #[serde(default)]
    pub humidity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDescription {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Wind {
    /// Metres per second.
    #[serde(default)]
    pub speed: Option<f64>,
    /// Degrees, meteorological.
    #[serde(default)]
    pub deg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SunTimes {
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
}

/// Current conditions exactly as the provider returns them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub name: String,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<WeatherDescription>,
    #[serde(default)]
    pub wind: Wind,
    /// Metres.
    #[serde(default)]
    pub visibility: Option<u32>,
    #[serde(default)]
    pub sys: SunTimes,
    /// Shift from UTC in seconds.
    #[serde(default)]
    pub timezone: i64,
}

impl CurrentConditions {
    pub fn description(&self) -> &str {
        first_description(&self.weather)
    }

    /// e.g. `18.0 km/h from 250°`, or `N/A km/h` without a usable speed.
    pub fn wind_summary(&self) -> String {
        let speed = match self.wind.speed {
            Some(mps) if mps != 0.0 => format!("{:.1}", mps * 3.6),
            _ => "N/A".to_string(),
        };

        match self.wind.deg {
            Some(deg) => format!("{speed} km/h from {deg}°"),
            None => format!("{speed} km/h"),
        }
    }

    pub fn visibility_summary(&self) -> String {
        match self.visibility {
            Some(0) | None => "N/A".to_string(),
            Some(m) if m >= 10_000 => "Excellent (10+ km)".to_string(),
            Some(m) => format!("{:.1} km", f64::from(m) / 1000.0),
        }
    }

    /// Sunrise as wall-clock `HH:MM` at the observed place.
    pub fn sunrise_local(&self) -> Option<String> {
        local_clock(self.sys.sunrise, self.timezone)
    }

    pub fn sunset_local(&self) -> Option<String> {
        local_clock(self.sys.sunset, self.timezone)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastCity {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
}

/// One raw 3-hour forecast sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub dt: i64,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<WeatherDescription>,
}

/// Forecast payload exactly as the provider returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub city: Option<ForecastCity>,
    pub list: Vec<ForecastSample>,
}

impl ForecastResponse {
    /// One sample per day: raw indices 0, 8, 16, ... at most five of them.
    pub fn daily_samples(&self) -> impl Iterator<Item = &ForecastSample> {
        self.list.iter().step_by(FORECAST_STRIDE).take(FORECAST_DAYS)
    }

    pub fn entries(&self) -> Vec<ForecastEntry> {
        self.daily_samples().map(ForecastEntry::from).collect()
    }
}

/// A surfaced forecast day.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub description: String,
}

impl From<&ForecastSample> for ForecastEntry {
    fn from(sample: &ForecastSample) -> Self {
        Self {
            timestamp: DateTime::from_timestamp(sample.dt, 0).unwrap_or_default(),
            temperature_c: sample.main.temp,
            description: first_description(&sample.weather).to_string(),
        }
    }
}

fn first_description(weather: &[WeatherDescription]) -> &str {
    weather
        .first()
        .map(|w| w.description.as_str())
        .unwrap_or("Unknown")
}

fn local_clock(epoch: i64, offset: i64) -> Option<String> {
    epoch
        .checked_add(offset)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%H:%M").to_string())
}
