use anyhow::Context;
use std::sync::Arc;

use crate::{
    cache::WeatherCache,
    classify::{Recommendation, classify},
    config::ProviderConfig,
    error::FetchError,
    error_log::ErrorLog,
    provider::{OpenWeatherProvider, WeatherSource},
};

/// Entry point for the chat layer: one weather cache, one error log.
#[derive(Debug)]
pub struct WalkAdvisor {
    cache: WeatherCache,
    errors: ErrorLog,
}

impl WalkAdvisor {
    pub fn new(cache: WeatherCache, errors: ErrorLog) -> Self {
        Self { cache, errors }
    }

    /// Advisor backed by the OpenWeather endpoint in `config`, default TTLs.
    pub fn from_config(config: ProviderConfig) -> anyhow::Result<Self> {
        let provider =
            OpenWeatherProvider::new(config).context("Failed to build weather HTTP client")?;
        let source: Arc<dyn WeatherSource> = Arc::new(provider);
        Ok(Self::new(WeatherCache::new(source), ErrorLog::new()))
    }

    /// Typed recommendation. Failures are returned, not logged.
    pub async fn recommend(&self) -> Result<Recommendation, FetchError> {
        let reading = self.cache.get_or_fetch().await?;
        Ok(classify(&reading))
    }

    /// Explanation text for the current weather, or `None` if no reading could be
    /// obtained. The failure goes to the error log; the caller is expected to stay
    /// silent.
    pub async fn check_walk(&self) -> Option<String> {
        match self.recommend().await {
            Ok(rec) => {
                tracing::info!(verdict = %rec.verdict, "walk checked");
                Some(rec.text)
            }
            Err(err) => {
                self.errors.record(&err);
                None
            }
        }
    }

    pub fn error_log(&self) -> String {
        self.errors.read_all()
    }
}
