//! Multi-day forecast driver and report rendering on top of [`wttr`].

use chrono::{Days, NaiveDate};

use crate::error::Error;
use crate::model::{DayForecast, WeatherQuery};

pub mod wttr;

pub use wttr::WttrClient;

/// Ordered (English fragment, Chinese label) pairs, matched case-insensitively
/// against the provider's free-text condition, first match wins. Specific
/// fragments must stay ahead of the generic ones they contain: "partly
/// cloudy" before "cloud", "light rain" before "rain".
const CONDITION_LABELS: &[(&str, &str)] = &[
    ("partly cloudy", "局部多云"),
    ("scattered clouds", "零星云"),
    ("broken clouds", "多云间晴"),
    ("few clouds", "少云"),
    ("light rain", "小雨"),
    ("moderate rain", "中雨"),
    ("heavy rain", "大雨"),
    ("light snow", "小雪"),
    ("heavy snow", "大雪"),
    ("thunderstorm", "雷雨"),
    ("drizzle", "毛毛雨"),
    ("shower", "阵雨"),
    ("overcast", "阴天"),
    ("sunny", "晴朗"),
    ("clear", "晴天"),
    ("cloud", "多云"),
    ("rain", "降雨"),
    ("snow", "降雪"),
    ("fog", "雾"),
    ("mist", "薄雾"),
    ("haze", "雾霾"),
];

/// Translate a free-text condition to its Chinese label. Unknown conditions
/// pass through unmodified.
pub fn translate_condition(description: &str) -> String {
    let lower = description.to_lowercase();

    CONDITION_LABELS
        .iter()
        .find(|(fragment, _)| lower.contains(fragment))
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| description.to_string())
}

/// Icon for a translated label. Labels that fell through translation get the
/// generic rainbow.
pub fn condition_icon(label: &str) -> &'static str {
    match label {
        "晴天" | "晴朗" => "☀️",
        "多云" | "阴天" => "☁️",
        "局部多云" | "多云间晴" => "⛅",
        "零星云" | "少云" => "🌤️",
        "小雨" | "阵雨" | "毛毛雨" => "🌦️",
        "降雨" | "中雨" => "🌧️",
        "大雨" => "💦",
        "雷雨" => "⛈️",
        "降雪" | "大雪" => "❄️",
        "小雪" => "🌨️",
        "雾" | "薄雾" => "🌫️",
        "雾霾" => "😷",
        _ => "🌈",
    }
}

/// Parse a `YYYY-MM-DD` start date. The message names the expected pattern
/// so the user can fix the input without reading docs.
pub fn parse_start_date(input: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        Error::validation(format!(
            "日期格式不正确：{input}。请使用 YYYY-MM-DD 格式（例如 2025-11-10）"
        ))
    })
}

/// Fetch `days` consecutive days of forecast starting at `start`, one
/// request per day, strictly in order. Per-day failures become error entries
/// in the returned vector instead of aborting the span; only caller-input
/// problems fail the whole call, and they do so before any request is sent.
pub async fn forecast_span(
    client: &WttrClient,
    city: &str,
    start: NaiveDate,
    days: u32,
) -> Result<Vec<Result<DayForecast, Error>>, Error> {
    if city.trim().is_empty() {
        return Err(Error::validation("城市名称不能为空"));
    }
    if days < 1 {
        return Err(Error::validation("预测天数必须至少为1天"));
    }

    let mut span = Vec::with_capacity(days as usize);
    for offset in 0..u64::from(days) {
        let date = start
            .checked_add_days(Days::new(offset))
            .ok_or_else(|| Error::validation("起始日期超出可表示范围"))?;

        let query = WeatherQuery { city: city.to_string(), date };
        span.push(client.fetch_day(&query).await);
    }

    Ok(span)
}

const RULE_WIDTH: usize = 70;

/// Render the multi-day report in the fixed text layout: one section per
/// requested day, error days inline, one icon-prefixed line per reading.
pub fn render_report(span: &[Result<DayForecast, Error>]) -> String {
    let mut out = Vec::new();

    out.push(format!("📊 未来{}天天气预报", span.len()));
    out.push("=".repeat(RULE_WIDTH));

    for (idx, day) in span.iter().enumerate() {
        let day_no = idx + 1;

        let forecast = match day {
            Ok(forecast) => forecast,
            Err(err) => {
                out.push(format!("\n❌ 第{day_no}天数据错误: {err}"));
                continue;
            }
        };

        if day_no > 1 {
            out.push(format!("\n{}", "-".repeat(RULE_WIDTH)));
        }

        out.push(format!("\n🌍 城市: {}, {}", forecast.city, forecast.country));
        out.push(format!("📅 日期: {}（第{day_no}天）", forecast.date.format("%Y-%m-%d")));
        out.push("⏰ 24小时天气详情：".to_string());
        out.push("-".repeat(RULE_WIDTH));

        for reading in &forecast.readings {
            let icon = condition_icon(&reading.condition);
            out.push(format!(
                "{icon} {}时: {} | 温度: {}°C | 体感: {}°C | 湿度: {}% | 风速: {}km/h",
                reading.hour,
                reading.condition,
                reading.temperature_c,
                reading.feels_like_c,
                reading.humidity_pct,
                reading.wind_speed_kmh,
            ));
        }

        if !forecast.skipped.is_empty() {
            out.push(format!("⚠️ 跳过 {} 条无法解析的小时记录", forecast.skipped.len()));
        }
    }

    out.join("\n")
}
