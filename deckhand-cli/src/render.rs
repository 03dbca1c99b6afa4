use chrono::Local;
use deckhand_core::{MoonPhase, ViewState};
use std::fmt;

pub const LOADING_MESSAGE: &str = "Consulting the sea witches... 🗺️";

/// A controller snapshot drawn as plain text.
pub struct Screen<'a> {
    pub state: &'a ViewState,
    pub moon: MoonPhase,
}

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state;

        if state.is_loading {
            writeln!(f, "{LOADING_MESSAGE}")?;
        }
        if let Some(error) = &state.error {
            writeln!(f, "{error}")?;
        }

        let Some(weather) = &state.weather else {
            return Ok(());
        };

        writeln!(f, "Weather in {}", weather.name)?;
        writeln!(f, "  Temperature: {}", state.display_temp(weather.main.temp))?;
        writeln!(f, "  Feels like: {}", state.display_temp(weather.main.feels_like))?;
        writeln!(f, "  Description: {}", weather.description())?;
        writeln!(f, "  Humidity: {}%", weather.main.humidity)?;

        writeln!(f)?;
        writeln!(f, "Maritime Conditions")?;
        writeln!(f, "  Wind: {}", weather.wind_summary())?;
        writeln!(f, "  Visibility: {}", weather.visibility_summary())?;
        let na = || "N/A".to_string();
        writeln!(f, "  Sunrise: {}", weather.sunrise_local().unwrap_or_else(na))?;
        writeln!(f, "  Sunset: {}", weather.sunset_local().unwrap_or_else(na))?;
        writeln!(f, "  Moon Phase: {}", self.moon)?;

        if state.forecast.is_some() {
            writeln!(f)?;
            writeln!(f, "5-Day Forecast")?;
            for entry in state.forecast_entries() {
                writeln!(
                    f,
                    "  {}  Temp: {}  {}",
                    entry.timestamp.with_timezone(&Local).format("%a %Y-%m-%d"),
                    state.display_temp(entry.temperature_c),
                    entry.description,
                )?;
            }
        }

        Ok(())
    }
}
