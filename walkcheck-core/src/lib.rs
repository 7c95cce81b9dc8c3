//! Core library for the `walkcheck` bot.
//!
//! This crate defines:
//! - Provider configuration, loaded from disk and the environment
//! - The OpenWeather fetcher behind the `WeatherSource` trait
//! - A TTL weather cache with single-flight fetches, and a TTL error log
//! - The walk rule that turns a reading into a verdict
//!
//! `WalkAdvisor` ties these together for whatever front end talks to users.

pub mod advisor;
pub mod cache;
pub mod classify;
pub mod config;
pub mod error;
pub mod error_log;
pub mod model;
pub mod provider;

pub use advisor::WalkAdvisor;
pub use cache::{CacheEntry, WeatherCache};
pub use classify::{Recommendation, Verdict, classify};
pub use config::{Config, ProviderConfig};
pub use error::{ConfigError, FetchError};
pub use error_log::ErrorLog;
pub use model::Reading;
pub use provider::{OpenWeatherProvider, WeatherSource};
