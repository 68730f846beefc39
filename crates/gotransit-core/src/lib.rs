//! Shared types for the GO Transit proxy: canonical records returned to
//! callers, caller parameter normalization, and process configuration.

pub mod alerts;
pub mod app_config;
pub mod config;
pub mod journeys;
pub mod params;
pub mod schedules;
pub mod stops;

use thiserror::Error;

pub use alerts::{Alert, AlertKind, AllAlerts, ServiceException, UnionDeparture};
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use journeys::{Fare, FareResponse, JourneyResponse, JourneyService, JourneyStop, JourneyTrip};
pub use params::ParamError;
pub use schedules::{Line, LineSchedule, LineStop, TripSchedule, TripStop};
pub use stops::{Destination, NextService, NextServicePrediction, Stop, StopDetails};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
