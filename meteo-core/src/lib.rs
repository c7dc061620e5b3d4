//! Client library for the Open-Meteo weather API.
//!
//! This crate defines:
//! - Request options and a fluent builder
//! - URL construction and product-line routing (forecast, archive, seasonal, marine)
//! - The HTTP client and typed response models
//! - Configuration & credentials handling for the `meteo` CLI
//!
//! ```no_run
//! # async fn demo() -> Result<(), meteo_core::MeteoError> {
//! use meteo_core::{Client, Metric, Options, TemperatureUnit};
//!
//! let options = Options::builder()
//!     .location(37.7749, -122.4194)
//!     .temperature_unit(TemperatureUnit::Fahrenheit)
//!     .current([Metric::TEMPERATURE_2M, Metric::WEATHER_CODE])
//!     .build();
//!
//! let data = Client::new().get(&options).await?;
//! println!("{:?}", data.current);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod options;
pub mod request;
pub mod units;
pub mod weather_code;

pub use client::{Client, DEFAULT_USER_AGENT, WeatherSource};
pub use config::{Config, Location, UnitPreferences};
pub use error::MeteoError;
pub use metrics::{Interval, Metric, Metrics};
pub use model::{
    Current, CurrentUnits, Daily, DailyUnits, Hourly, HourlyUnits, Seasonal, SeasonalUnits,
    WeatherData,
};
pub use options::{Options, OptionsBuilder, Product};
pub use request::{Endpoints, Route};
pub use units::{PrecipitationUnit, TemperatureUnit, WindSpeedUnit};
