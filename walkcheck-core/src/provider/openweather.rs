use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;
use serde::Deserialize;
use std::{sync::Arc, time::Duration};

use crate::{config::ProviderConfig, error::FetchError, model::Reading};

use super::WeatherSource;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Current-weather client for an OpenWeather-compatible endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    config: ProviderConfig,
    timeout: Duration,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(config: ProviderConfig) -> reqwest::Result<Self> {
        Self::with_timeout(config, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(config: ProviderConfig, timeout: Duration) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            config,
            timeout,
            http,
        })
    }

    fn query(&self) -> [(&str, &str); 4] {
        [
            ("lat", self.config.latitude.as_str()),
            ("lon", self.config.longitude.as_str()),
            ("appid", self.config.api_key.as_str()),
            ("units", "metric"),
        ]
    }

    fn transport_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Request(Arc::new(err))
        }
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherProvider {
    async fn fetch(&self) -> Result<Reading, FetchError> {
        tracing::debug!(
            lat = %self.config.latitude,
            lon = %self.config.longitude,
            "requesting current weather"
        );

        let res = self
            .http
            .get(&self.config.base_url)
            .query(&self.query())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout)
            } else {
                FetchError::Body(Arc::new(e))
            }
        })?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(Arc::new(e)))?;

        Ok(parsed.into_reading())
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    #[serde(default)]
    feels_like: f64,
    #[serde(default)]
    temp_min: f64,
    #[serde(default)]
    temp_max: f64,
    #[serde(default)]
    pressure: i32,
    #[serde(default)]
    humidity: i32,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    #[serde(default)]
    deg: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    wind: OwWind,
}

impl OwCurrentResponse {
    fn into_reading(self) -> Reading {
        Reading {
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            temp_min: self.main.temp_min,
            temp_max: self.main.temp_max,
            wind_speed: self.wind.speed,
            wind_direction: self.wind.deg,
            pressure: self.main.pressure,
            humidity: self.main.humidity,
            observed_at: Local::now(),
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_minimal_body_with_zeroed_optionals() {
        let body = r#"{"main":{"temp":-12.5},"wind":{"speed":3.1}}"#;
        let parsed: OwCurrentResponse = serde_json::from_str(body).expect("decode");
        let reading = parsed.into_reading();

        assert_eq!(reading.temperature, -12.5);
        assert_eq!(reading.wind_speed, 3.1);
        assert_eq!(reading.feels_like, 0.0);
        assert_eq!(reading.wind_direction, 0.0);
        assert_eq!(reading.pressure, 0);
        assert_eq!(reading.humidity, 0);
    }

    #[test]
    fn missing_temperature_is_a_decode_error() {
        let body = r#"{"main":{"humidity":80},"wind":{"speed":3.1}}"#;
        assert!(serde_json::from_str::<OwCurrentResponse>(body).is_err());
    }

    #[test]
    fn ignores_unknown_fields() {
        let body = r#"{
            "coord": {"lon": 37.61, "lat": 55.75},
            "weather": [{"id": 600, "main": "Snow"}],
            "main": {"temp": -20.0, "feels_like": -27.3, "pressure": 1031, "humidity": 84},
            "wind": {"speed": 5.0, "deg": 250, "gust": 9.1},
            "name": "Moscow"
        }"#;
        let reading = serde_json::from_str::<OwCurrentResponse>(body)
            .expect("decode")
            .into_reading();

        assert_eq!(reading.pressure, 1031);
        assert_eq!(reading.wind_direction, 250.0);
        assert_eq!(reading.feels_like, -27.3);
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "ж".repeat(300);
        let out = truncate_body(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);

        assert_eq!(truncate_body("short"), "short");
    }
}
