//! Time-boxed, single-entry weather cache.
//!
//! A miss starts one background fetch task and parks a shared handle to it next to
//! the entry. Every caller that arrives while the fetch is outstanding awaits the
//! same handle, so a miss window costs at most one outbound request. The task
//! writes the entry before it resolves, which means no waiter can observe the new
//! reading ahead of the cache.

use futures::{
    FutureExt,
    future::{BoxFuture, Shared},
};
use parking_lot::Mutex;
use std::{sync::Arc, time::Duration};
use tokio::time::Instant;

use crate::{error::FetchError, model::Reading, provider::WeatherSource};

pub const WEATHER_TTL: Duration = Duration::from_secs(30 * 60);

/// A cached value and the instant after which it must not be served.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub expires_at: Instant,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    pub fn is_live(&self, now: Instant) -> bool {
        now <= self.expires_at
    }
}

type InFlight = Shared<BoxFuture<'static, Result<Reading, FetchError>>>;

#[derive(Default)]
struct Slot {
    entry: Option<CacheEntry<Reading>>,
    in_flight: Option<InFlight>,
}

pub struct WeatherCache {
    source: Arc<dyn WeatherSource>,
    ttl: Duration,
    slot: Arc<Mutex<Slot>>,
}

impl std::fmt::Debug for WeatherCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherCache")
            .field("source", &self.source)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl WeatherCache {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self::with_ttl(source, WEATHER_TTL)
    }

    pub fn with_ttl(source: Arc<dyn WeatherSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// Return the cached reading if it is still fresh, otherwise fetch one.
    ///
    /// Failures leave the cache empty and are returned to every caller that was
    /// waiting on the failed fetch. Must be called from within a tokio runtime.
    pub async fn get_or_fetch(&self) -> Result<Reading, FetchError> {
        let pending = {
            let mut slot = self.slot.lock();

            if let Some(entry) = slot.entry.as_ref().filter(|e| e.is_live(Instant::now())) {
                tracing::debug!("weather cache hit");
                return Ok(entry.value.clone());
            }

            if let Some(in_flight) = slot.in_flight.clone() {
                tracing::debug!("weather cache miss, joining in-flight fetch");
                in_flight
            } else {
                tracing::debug!("weather cache miss, starting fetch");
                let in_flight = self.spawn_fetch();
                slot.in_flight = Some(in_flight.clone());
                in_flight
            }
        };

        pending.await
    }

    #[cfg(test)]
    fn peek(&self) -> Option<Reading> {
        let slot = self.slot.lock();
        slot.entry
            .as_ref()
            .filter(|e| e.is_live(Instant::now()))
            .map(|e| e.value.clone())
    }

    fn spawn_fetch(&self) -> InFlight {
        let source = Arc::clone(&self.source);
        let slot = Arc::clone(&self.slot);
        let ttl = self.ttl;

        let task = tokio::spawn(async move {
            let result = source.fetch().await;

            let mut guard = slot.lock();
            guard.in_flight = None;
            guard.entry = match &result {
                Ok(reading) => Some(CacheEntry::new(reading.clone(), ttl)),
                Err(_) => None,
            };
            drop(guard);

            match &result {
                Ok(reading) => tracing::debug!(
                    temperature = reading.temperature,
                    wind_speed = reading.wind_speed,
                    "weather cached"
                ),
                Err(err) => tracing::warn!(error = %err, "weather fetch failed"),
            }

            result
        });

        async move {
            task.await
                .unwrap_or_else(|join_err| Err(FetchError::Aborted(join_err.to_string())))
        }
        .boxed()
        .shared()
    }
}
