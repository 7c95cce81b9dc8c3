use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One snapshot of the weather at the configured location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Air temperature, °C.
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Wind speed, m/s.
    pub wind_speed: f64,
    /// Wind direction, meteorological degrees.
    pub wind_direction: f64,
    /// Sea-level pressure, hPa.
    pub pressure: i32,
    /// Relative humidity, %.
    pub humidity: i32,
    /// Local time the reading was fetched.
    pub observed_at: DateTime<Local>,
}

impl Reading {
    /// Reading with only the fields the walk rule looks at; everything else zeroed.
    pub fn basic(temperature: f64, wind_speed: f64, observed_at: DateTime<Local>) -> Self {
        Self {
            temperature,
            feels_like: 0.0,
            temp_min: 0.0,
            temp_max: 0.0,
            wind_speed,
            wind_direction: 0.0,
            pressure: 0,
            humidity: 0,
            observed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn reading_survives_json_snapshot() {
        let at = Local
            .with_ymd_and_hms(2024, 2, 3, 7, 45, 0)
            .single()
            .expect("valid local time");
        let reading = Reading {
            pressure: 1018,
            humidity: 86,
            wind_direction: 320.0,
            ..Reading::basic(-18.5, 6.4, at)
        };

        let json = serde_json::to_value(&reading).expect("serialize");
        assert_eq!(json["temperature"], -18.5);
        assert_eq!(json["pressure"], 1018);
        assert!(json["observed_at"].as_str().is_some());

        let back: Reading = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, reading);
    }
}
