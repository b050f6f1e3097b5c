//! HTTP client for the wttr.in weather service.
//!
//! Two response shapes are consumed: the structured JSON forecast document
//! (`?format=j1`) and the compact one-line plain-text format used for
//! current conditions.

use log::warn;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::Error;
use crate::model::{DayForecast, HourlyReading, SkippedReading, WeatherQuery};
use crate::weather::translate_condition;

const DEFAULT_BASE_URL: &str = "http://wttr.in";

#[derive(Debug, Clone)]
pub struct WttrClient {
    http: Client,
    base_url: Url,
}

impl WttrClient {
    pub fn new() -> Self {
        let base_url = Url::parse(DEFAULT_BASE_URL).expect("default wttr.in URL is valid");
        Self::with_base_url(base_url)
    }

    /// Point the client at a different host. Used by tests to target a
    /// local mock server.
    pub fn with_base_url(base_url: Url) -> Self {
        Self { http: Client::new(), base_url }
    }

    /// Fetch the hourly forecast for one city and one calendar day.
    pub async fn fetch_day(&self, query: &WeatherQuery) -> Result<DayForecast, Error> {
        if query.city.trim().is_empty() {
            return Err(Error::validation("城市名称不能为空"));
        }

        let url = self.city_url(&query.city)?;

        let res = self
            .http
            .get(url)
            .query(&[("format", "j1")])
            .send()
            .await
            .map_err(Error::transport)?;

        let status = res.status();
        let body = res.text().await.map_err(Error::transport)?;

        if !status.is_success() {
            return Err(Error::Upstream(format!(
                "天气服务请求失败 (HTTP {status}): {}",
                truncate_body(&body),
            )));
        }

        let parsed: WttrResponse = serde_json::from_str(&body)
            .map_err(|err| Error::Parse(format!("无法解析天气响应: {err}")))?;

        day_from_response(parsed, query)
    }

    /// Fetch the compact one-line current-conditions string, e.g.
    /// `晴 +20°C 60% ↘12km/h`.
    pub async fn fetch_current(&self, city: &str) -> Result<String, Error> {
        if city.trim().is_empty() {
            return Err(Error::validation("城市名称不能为空"));
        }

        let url = self.city_url(city)?;

        let res = self
            .http
            .get(url)
            .query(&[("format", "%C %t %h %w"), ("lang", "zh")])
            .send()
            .await
            .map_err(Error::transport)?;

        let status = res.status();
        let body = res.text().await.map_err(Error::transport)?;

        if !status.is_success() {
            return Err(Error::Upstream(format!(
                "天气服务请求失败 (HTTP {status}): {}",
                truncate_body(&body),
            )));
        }

        Ok(body.trim().to_string())
    }

    /// The city travels as a path segment, so `push` percent-encodes it.
    fn city_url(&self, city: &str) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::validation("天气服务地址无效"))?
            .push(city.trim());
        Ok(url)
    }
}

impl Default for WttrClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct WttrValue {
    value: String,
}

#[derive(Debug, Deserialize)]
struct WttrArea {
    #[serde(rename = "areaName")]
    area_name: Vec<WttrValue>,
    country: Vec<WttrValue>,
}

#[derive(Debug, Deserialize)]
struct WttrHour {
    time: String,
    #[serde(rename = "tempC")]
    temp_c: String,
    #[serde(rename = "FeelsLikeC")]
    feels_like_c: String,
    humidity: String,
    #[serde(rename = "windspeedKmph")]
    windspeed_kmph: String,
    #[serde(rename = "weatherDesc")]
    weather_desc: Vec<WttrValue>,
}

#[derive(Debug, Deserialize)]
struct WttrDay {
    date: String,
    hourly: Vec<WttrHour>,
}

#[derive(Debug, Deserialize)]
struct WttrResponse {
    weather: Vec<WttrDay>,
    #[serde(default)]
    nearest_area: Vec<WttrArea>,
}

fn day_from_response(data: WttrResponse, query: &WeatherQuery) -> Result<DayForecast, Error> {
    let date_str = query.date.format("%Y-%m-%d").to_string();

    // Linear scan, first match wins.
    let day = data
        .weather
        .iter()
        .find(|day| day.date == date_str)
        .ok_or_else(|| Error::Upstream(format!("找不到 {date_str} 的天气预报")))?;

    let mut readings = Vec::new();
    let mut skipped = Vec::new();

    for (index, entry) in day.hourly.iter().enumerate() {
        match decode_hourly(entry) {
            Ok(reading) => readings.push(reading),
            Err(reason) => {
                warn!("跳过无法解析的小时记录 #{index}: {reason}");
                skipped.push(SkippedReading { index, reason });
            }
        }
    }

    // Provider order is not guaranteed; sort is stable.
    readings.sort_by_key(|reading| reading.hour);

    let area = data.nearest_area.first();
    let city = area
        .and_then(|area| area.area_name.first())
        .map(|name| name.value.clone())
        .unwrap_or_else(|| query.city.clone());
    let country = area
        .and_then(|area| area.country.first())
        .map(|country| country.value.clone())
        .unwrap_or_default();

    Ok(DayForecast { city, country, date: query.date, readings, skipped })
}

fn decode_hourly(entry: &WttrHour) -> Result<HourlyReading, String> {
    let hour = decode_hour(&entry.time)?;

    let description = entry
        .weather_desc
        .first()
        .map(|desc| desc.value.as_str())
        .ok_or_else(|| "weatherDesc 为空".to_string())?;

    Ok(HourlyReading {
        hour,
        temperature_c: parse_field(&entry.temp_c, "tempC")?,
        feels_like_c: parse_field(&entry.feels_like_c, "FeelsLikeC")?,
        condition: translate_condition(description),
        humidity_pct: parse_field(&entry.humidity, "humidity")?,
        wind_speed_kmh: parse_field(&entry.windspeed_kmph, "windspeedKmph")?,
    })
}

/// The `time` field encodes minutes-since-midnight ×100 ("0", "300", ...,
/// "2300"); integer division by 100 yields the hour of day.
fn decode_hour(raw: &str) -> Result<u8, String> {
    let encoded: u32 = raw.trim().parse().map_err(|_| format!("时间字段无效: {raw:?}"))?;

    let hour = encoded / 100;
    if hour > 23 {
        return Err(format!("小时超出范围: {hour}"));
    }

    Ok(hour as u8)
}

fn parse_field<T: std::str::FromStr>(raw: &str, name: &str) -> Result<T, String> {
    raw.trim().parse().map_err(|_| format!("{name} 字段无效: {raw:?}"))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        let prefix: String = body.chars().take(MAX).collect();
        format!("{prefix}...")
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn hour_entry(time: &str, temp: &str, desc: &str) -> serde_json::Value {
        json!({
            "time": time,
            "tempC": temp,
            "FeelsLikeC": temp,
            "humidity": "60",
            "windspeedKmph": "12",
            "weatherDesc": [{"value": desc}],
        })
    }

    fn j1_body(date: &str, hours: Vec<serde_json::Value>) -> serde_json::Value {
        json!({
            "nearest_area": [{
                "areaName": [{"value": "Maoming"}],
                "country": [{"value": "China"}],
            }],
            "weather": [{"date": date, "hourly": hours}],
        })
    }

    fn query(date: &str) -> WeatherQuery {
        WeatherQuery {
            city: "Maoming".into(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        }
    }

    #[test]
    fn hour_decoding_divides_by_one_hundred() {
        assert_eq!(decode_hour("0").unwrap(), 0);
        assert_eq!(decode_hour("300").unwrap(), 3);
        assert_eq!(decode_hour("1430").unwrap(), 14);
        assert_eq!(decode_hour("2300").unwrap(), 23);

        assert!(decode_hour("noon").is_err());
        assert!(decode_hour("2500").is_err());
    }

    #[test]
    fn readings_are_sorted_ascending_by_hour() {
        let body = j1_body(
            "2025-11-10",
            vec![
                hour_entry("2100", "18", "Clear"),
                hour_entry("0", "15", "Mist"),
                hour_entry("900", "22", "Sunny"),
            ],
        );
        let parsed: WttrResponse = serde_json::from_value(body).unwrap();

        let forecast = day_from_response(parsed, &query("2025-11-10")).unwrap();

        let hours: Vec<u8> = forecast.readings.iter().map(|r| r.hour).collect();
        assert_eq!(hours, vec![0, 9, 21]);
        assert_eq!(forecast.city, "Maoming");
        assert_eq!(forecast.country, "China");
    }

    #[test]
    fn malformed_hour_is_skipped_with_a_diagnostic() {
        let body = j1_body(
            "2025-11-10",
            vec![
                hour_entry("0", "15", "Clear"),
                hour_entry("300", "not-a-number", "Clear"),
                hour_entry("600", "16", "Clear"),
            ],
        );
        let parsed: WttrResponse = serde_json::from_value(body).unwrap();

        let forecast = day_from_response(parsed, &query("2025-11-10")).unwrap();

        assert_eq!(forecast.readings.len(), 2);
        assert_eq!(forecast.skipped.len(), 1);
        assert_eq!(forecast.skipped[0].index, 1);
        assert!(forecast.skipped[0].reason.contains("tempC"));
    }

    #[test]
    fn missing_date_is_an_upstream_error() {
        let body = j1_body("2025-11-10", vec![hour_entry("0", "15", "Clear")]);
        let parsed: WttrResponse = serde_json::from_value(body).unwrap();

        let err = day_from_response(parsed, &query("2025-11-11")).unwrap_err();
        assert!(err.to_string().contains("找不到 2025-11-11"));
    }

    #[tokio::test]
    async fn fetch_day_requests_the_j1_format() {
        let server = MockServer::start().await;
        let body = j1_body(
            "2025-11-10",
            vec![hour_entry("0", "15", "Partly cloudy"), hour_entry("300", "14", "Clear")],
        );

        Mock::given(method("GET"))
            .and(path("/Maoming"))
            .and(query_param("format", "j1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let client = WttrClient::with_base_url(server.uri().parse().unwrap());
        let forecast = client.fetch_day(&query("2025-11-10")).await.unwrap();

        assert_eq!(forecast.readings.len(), 2);
        assert_eq!(forecast.readings[0].condition, "局部多云");
    }

    #[tokio::test]
    async fn non_success_status_is_an_upstream_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let client = WttrClient::with_base_url(server.uri().parse().unwrap());
        let err = client.fetch_day(&query("2025-11-10")).await.unwrap_err();

        assert!(matches!(err, Error::Upstream(_)));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn empty_city_is_rejected_before_any_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = WttrClient::with_base_url(server.uri().parse().unwrap());
        let blank = WeatherQuery {
            city: "  ".into(),
            date: NaiveDate::from_ymd_opt(2025, 11, 10).unwrap(),
        };

        let err = client.fetch_day(&blank).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn connection_refused_is_a_transport_error() {
        // Grab a local address, then shut the server down so nothing
        // listens there anymore. An exclusive (non-pooled) server is
        // required: pooled servers keep listening after drop.
        let server = MockServer::builder().start().await;
        let uri = server.uri();
        drop(server);

        let client = WttrClient::with_base_url(uri.parse().unwrap());
        let err = client.fetch_day(&query("2025-11-10")).await.unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test]
    async fn fetch_current_returns_the_trimmed_line() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/Maoming"))
            .and(query_param("lang", "zh"))
            .respond_with(ResponseTemplate::new(200).set_body_string("晴 +20°C 60% ↘12km/h\n"))
            .mount(&server)
            .await;

        let client = WttrClient::with_base_url(server.uri().parse().unwrap());
        let line = client.fetch_current("Maoming").await.unwrap();

        assert_eq!(line, "晴 +20°C 60% ↘12km/h");
    }
}
