use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::FetchError, model::Reading};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Something that can produce a fresh [`Reading`] for the configured location.
///
/// One call is one outbound request; implementations do not cache or retry.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(&self) -> Result<Reading, FetchError>;
}
