//! The walk rule: temperature and wind in, verdict and a one-line explanation out.

use std::fmt;

use crate::model::Reading;

pub const UNDETERMINED: &str = "Temperature data undetermined.";

const WALK_ON: &str = "The walk is on.";
const WALK_OFF: &str = "The walk is cancelled.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    GoodWeather,
    BadWeather,
    /// Walk goes ahead but the weather deserves a look (mild, or unknown).
    CheckWeather,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::GoodWeather => "good_weather",
            Verdict::BadWeather => "bad_weather",
            Verdict::CheckWeather => "check_weather",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub verdict: Verdict,
    pub text: String,
}

/// Apply the walk rule to `reading`.
///
/// Rules are checked top to bottom and the first match wins. The fifth rule only
/// adds coverage for `-15 < t < -14` with strong wind; everything else it names is
/// claimed earlier. Temperatures in `(-15, -14)` with wind under 7 m/s, and NaN,
/// fall through to [`UNDETERMINED`].
pub fn classify(reading: &Reading) -> Recommendation {
    let t = reading.temperature;
    let v = reading.wind_speed;

    let (verdict, phrase, mark) = if t >= 0.0 {
        (Verdict::CheckWeather, WALK_ON, "☀️")
    } else if (-14.0..0.0).contains(&t) {
        (Verdict::GoodWeather, WALK_ON, "🌡️")
    } else if (-30.0..=-15.0).contains(&t) && v > 7.0 {
        (Verdict::BadWeather, WALK_OFF, "☃️")
    } else if (-30.0..=-15.0).contains(&t) && v <= 7.0 {
        (Verdict::GoodWeather, WALK_ON, "🌡️")
    } else if (-15.0..0.0).contains(&t) && v >= 7.0 {
        (Verdict::GoodWeather, WALK_ON, "🌡️")
    } else if t < -30.0 {
        (Verdict::BadWeather, WALK_OFF, "❄️")
    } else {
        return Recommendation {
            verdict: Verdict::CheckWeather,
            text: UNDETERMINED.to_string(),
        };
    };

    Recommendation {
        verdict,
        text: explain(reading, phrase, mark),
    }
}

fn explain(reading: &Reading, phrase: &str, mark: &str) -> String {
    format!(
        "🚶 {phrase}\n{mark} Now {:.1}°C and wind {:.1} m/s. As of {}",
        reading.temperature,
        reading.wind_speed,
        reading.observed_at.format("%H:%M"),
    )
}
