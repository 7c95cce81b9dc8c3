use parking_lot::Mutex;
use std::{fmt::Display, time::Duration};
use tokio::time::Instant;

use crate::cache::CacheEntry;

pub const ERROR_LOG_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const EMPTY_ERROR_LOG: &str = "error list is empty";

/// Newline-joined text of recent fetch failures.
///
/// Every write pushes the expiry out to `ttl` from that write, so the log only
/// clears after a full quiet window. No size bound.
#[derive(Debug)]
pub struct ErrorLog {
    ttl: Duration,
    entry: Mutex<Option<CacheEntry<String>>>,
}

impl Default for ErrorLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::with_ttl(ERROR_LOG_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: Mutex::new(None),
        }
    }

    pub fn record(&self, error: &impl Display) {
        let message = error.to_string();
        tracing::debug!(error = %message, "recording error");

        let mut entry = self.entry.lock();
        let text = match entry.take() {
            Some(live) if live.is_live(Instant::now()) => format!("{}\n{}", live.value, message),
            _ => message,
        };
        *entry = Some(CacheEntry::new(text, self.ttl));
    }

    pub fn read_all(&self) -> String {
        let entry = self.entry.lock();
        entry
            .as_ref()
            .filter(|e| e.is_live(Instant::now()))
            .map(|e| e.value.clone())
            .unwrap_or_else(|| EMPTY_ERROR_LOG.to_string())
    }
}
