use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One weather lookup: a city and the calendar day to report on.
#[derive(Debug, Clone)]
pub struct WeatherQuery {
    pub city: String,
    pub date: NaiveDate,
}

/// One hourly observation inside a forecast day. `condition` holds the
/// already-translated label, not the provider's free text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyReading {
    pub hour: u8,
    pub temperature_c: i32,
    pub feels_like_c: i32,
    pub condition: String,
    pub humidity_pct: u8,
    pub wind_speed_kmh: u32,
}

/// Diagnostic for an hourly entry that failed to decode. The batch carries
/// on; callers can inspect these instead of grepping logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedReading {
    /// Position of the entry in the provider's hourly array.
    pub index: usize,
    pub reason: String,
}

/// A full day of hourly readings for one city, sorted ascending by hour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayForecast {
    pub city: String,
    pub country: String,
    pub date: NaiveDate,
    pub readings: Vec<HourlyReading>,
    pub skipped: Vec<SkippedReading>,
}

/// One entry of the built-in joke catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JokeRecord {
    pub category: &'static str,
    pub text: &'static str,
}

/// A single push message. The body may contain Markdown; the gateway
/// renders it on the receiving client.
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub title: String,
    pub body: Option<String>,
}

impl NotificationRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), body: None }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}
