use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::error::GatewayError;
use crate::models::WeatherRecord;

/// Converts a WMO weather code to its English label
pub fn weather_condition(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

/// Builds the prompt that asks the agent about freshly fetched weather
pub fn weather_chat_prompt(
    location: &str,
    weather: &WeatherRecord,
    question: &str,
) -> Result<String, GatewayError> {
    let data = serde_json::to_string(weather)
        .map_err(|e| GatewayError::Upstream(format!("Failed to encode weather data: {}", e)))?;
    Ok(format!(
        "Based on this weather data for {}: {}\n\nUser question: {}",
        location, data, question
    ))
}

/// Two-space indented JSON, used for stdio text bodies
pub fn pretty_json<T: Serialize>(value: &T) -> Result<String, GatewayError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| GatewayError::Upstream(format!("Failed to encode response: {}", e)))
}

/// Current instant as ISO-8601 UTC with millisecond precision
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
