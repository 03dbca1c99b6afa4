//! Presentation state for one search session.
//!
//! The controller owns every piece of transient UI state and sequences the two
//! provider calls of a search. A renderer only ever reads [`ViewState`]
//! snapshots and forwards user actions back as method calls.

use parking_lot::Mutex;

use crate::{
    geolocation::{GeolocationError, Geolocator},
    model::{CurrentConditions, ForecastEntry, ForecastResponse, LocationQuery, UnitPreference},
    moon::{MoonPhase, moon_phase_today},
    provider::{QueryError, WeatherProvider},
};

pub const EMPTY_INPUT_MESSAGE: &str =
    "Avast! Ye need to mark a destination on yer map first, matey!";
pub const SEARCH_FAILED_MESSAGE: &str = "Ye must be pullin' me peg-leg -- that port's make-believe! Best be checkin' yer spellin' or try another.";
pub const LOCATION_FAILED_MESSAGE: &str =
    "Couldn't get weather for your location. Try searching manually.";
pub const LOCATION_DENIED_MESSAGE: &str = "Location access denied. Please search manually.";
pub const LOCATION_UNSUPPORTED_MESSAGE: &str =
    "Location services not supported on this device.";

/// Everything a renderer needs to draw the current screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub input_text: String,
    pub is_loading: bool,
    pub error: Option<String>,
    pub unit: UnitPreference,
    pub weather: Option<CurrentConditions>,
    pub forecast: Option<ForecastResponse>,
}

impl ViewState {
    /// A stored metric temperature in the current display unit, e.g. `53°F`.
    pub fn display_temp(&self, celsius: f64) -> String {
        self.unit.format(celsius)
    }

    pub fn forecast_entries(&self) -> Vec<ForecastEntry> {
        self.forecast
            .as_ref()
            .map(ForecastResponse::entries)
            .unwrap_or_default()
    }
}

/// How a search action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Loaded,
    Failed,
    /// A newer search started before this one finished; its result was dropped.
    Superseded,
}

#[derive(Debug, Default)]
struct Inner {
    view: ViewState,
    /// Ticket of the most recently started search.
    latest: u64,
}

#[derive(Debug)]
pub struct Controller {
    provider: Box<dyn WeatherProvider>,
    geolocator: Box<dyn Geolocator>,
    inner: Mutex<Inner>,
}

impl Controller {
    pub fn new(provider: Box<dyn WeatherProvider>, geolocator: Box<dyn Geolocator>) -> Self {
        Self {
            provider,
            geolocator,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn with_unit(self, unit: UnitPreference) -> Self {
        self.inner.lock().view.unit = unit;
        self
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ViewState {
        self.inner.lock().view.clone()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.inner.lock().view.input_text = text.into();
    }

    /// Flip the display unit. Stored readings stay metric and nothing is refetched.
    pub fn toggle_units(&self) -> UnitPreference {
        let mut inner = self.inner.lock();
        inner.view.unit = inner.view.unit.toggled();
        inner.view.unit
    }

    /// Recomputed on every call; it only depends on today's date.
    pub fn moon_phase(&self) -> MoonPhase {
        moon_phase_today()
    }

    /// Store `text` as the input and search for it.
    pub async fn search(&self, text: impl Into<String>) -> SearchOutcome {
        self.set_input(text);
        self.submit_search().await
    }

    /// Search for the current input text.
    pub async fn submit_search(&self) -> SearchOutcome {
        let place = self.inner.lock().view.input_text.trim().to_string();

        if place.is_empty() {
            self.inner.lock().view.error = Some(EMPTY_INPUT_MESSAGE.to_string());
            return SearchOutcome::Failed;
        }

        tracing::info!(place = %place, "searching");
        self.run_search(LocationQuery::Place(place), SEARCH_FAILED_MESSAGE)
            .await
    }

    /// Search for the device location.
    pub async fn use_current_location(&self) -> SearchOutcome {
        let coordinates = match self.geolocator.locate().await {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(error = %err, "geolocation failed");
                let message = match err {
                    GeolocationError::Denied => LOCATION_DENIED_MESSAGE,
                    GeolocationError::Unsupported => LOCATION_UNSUPPORTED_MESSAGE,
                };
                self.inner.lock().view.error = Some(message.to_string());
                return SearchOutcome::Failed;
            }
        };

        tracing::info!(
            latitude = coordinates.latitude,
            longitude = coordinates.longitude,
            "searching current location"
        );
        self.run_search(LocationQuery::Coordinates(coordinates), LOCATION_FAILED_MESSAGE)
            .await
    }

    async fn run_search(&self, query: LocationQuery, failure_message: &str) -> SearchOutcome {
        let ticket = self.begin();
        let result = self.fetch_both(&query).await;
        self.finish(ticket, result, failure_message)
    }

    /// Conditions first, then the forecast only if conditions succeeded.
    async fn fetch_both(
        &self,
        query: &LocationQuery,
    ) -> Result<(CurrentConditions, ForecastResponse), QueryError> {
        let weather = self.provider.fetch_current_conditions(query).await?;
        let forecast = self.provider.fetch_forecast(query).await?;
        Ok((weather, forecast))
    }

    fn begin(&self) -> u64 {
        let mut inner = self.inner.lock();
        inner.latest += 1;
        inner.view.is_loading = true;
        inner.view.error = None;
        inner.view.weather = None;
        inner.view.forecast = None;
        inner.latest
    }

    fn finish(
        &self,
        ticket: u64,
        result: Result<(CurrentConditions, ForecastResponse), QueryError>,
        failure_message: &str,
    ) -> SearchOutcome {
        let mut inner = self.inner.lock();

        if inner.latest != ticket {
            tracing::debug!(ticket, latest = inner.latest, "dropping stale search result");
            return SearchOutcome::Superseded;
        }

        inner.view.is_loading = false;

        match result {
            Ok((weather, forecast)) => {
                // a blank submit while in flight may have left a message behind
                inner.view.error = None;
                inner.view.weather = Some(weather);
                inner.view.forecast = Some(forecast);
                SearchOutcome::Loaded
            }
            Err(err) => {
                tracing::warn!(error = %err, status = ?err.status(), "search failed");
                inner.view.error = Some(failure_message.to_string());
                SearchOutcome::Failed
            }
        }
    }
}
