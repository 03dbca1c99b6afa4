//! Device location lookup for "use my location".

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{Config, model::Coordinates};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    Denied,
    #[error("location services unsupported")]
    Unsupported,
}

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    /// Polled once per "use my location" action.
    async fn locate(&self) -> Result<Coordinates, GeolocationError>;
}

/// Reports the coordinates stored in the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfiguredLocation {
    home: Option<Coordinates>,
    share_location: bool,
}

impl ConfiguredLocation {
    pub fn new(home: Option<Coordinates>, share_location: bool) -> Self {
        Self { home, share_location }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.home, config.share_location)
    }
}

#[async_trait]
impl Geolocator for ConfiguredLocation {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        if !self.share_location {
            return Err(GeolocationError::Denied);
        }
        self.home.ok_or(GeolocationError::Unsupported)
    }
}
