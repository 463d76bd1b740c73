use schemars::JsonSchema;
use serde::{Deserialize, Serialize, Serializer};

use crate::constants::WEATHER_AGENT;

// ============================================================================
// Open-Meteo API Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GeocodingResponse {
    /// Open-Meteo drops this key entirely when nothing matches.
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodeResult {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    pub current: CurrentConditions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentConditions {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(rename = "temperature_2m")]
    pub temperature: f64,
    #[serde(rename = "apparent_temperature")]
    pub feels_like: f64,
    #[serde(rename = "relative_humidity_2m")]
    pub humidity: f64,
    #[serde(rename = "wind_speed_10m")]
    pub wind_speed: f64,
    #[serde(rename = "wind_gusts_10m")]
    pub wind_gust: f64,
    pub weather_code: i32,
}

// ============================================================================
// Gateway Models
// ============================================================================

/// Normalized current weather for one geocoded place.
///
/// Field order matters: it is the order used when the record is embedded in
/// an agent prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    #[serde(serialize_with = "plain_number")]
    pub temperature: f64,
    #[serde(serialize_with = "plain_number")]
    pub feels_like: f64,
    #[serde(serialize_with = "plain_number")]
    pub humidity: f64,
    #[serde(serialize_with = "plain_number")]
    pub wind_speed: f64,
    #[serde(serialize_with = "plain_number")]
    pub wind_gust: f64,
    pub conditions: String,
    pub location: String,
}

/// Writes integral floats without a fractional part (`20` rather than `20.0`).
fn plain_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Outcome of the combined weather + question flow.
#[derive(Debug, Clone)]
pub struct WeatherChat {
    pub weather: WeatherRecord,
    pub agent_response: Option<String>,
}

// ============================================================================
// MCP Tool Request Models
// ============================================================================

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetWeatherRequest {
    /// The location to get weather for
    pub location: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct ChatWithAgentRequest {
    /// Message to send to the agent
    pub message: String,
    /// Agent name (default: weatherAgent)
    #[serde(default = "default_agent")]
    pub agent: String,
}

fn default_agent() -> String {
    WEATHER_AGENT.to_string()
}
