/// User agent string for HTTP requests
pub const USER_AGENT: &str = concat!("weather-gateway/", env!("CARGO_PKG_VERSION"));

/// Open-Meteo geocoding search endpoint
pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// Open-Meteo forecast endpoint
pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Fields requested from the forecast endpoint for current conditions
pub const CURRENT_FIELDS: &str = "temperature_2m,apparent_temperature,relative_humidity_2m,wind_speed_10m,wind_gusts_10m,weather_code";

/// OpenAI-compatible API base URL used by the default agent
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_AGENT_MODEL: &str = "gpt-4o-mini";

pub const DEFAULT_PORT: u16 = 3001;

/// Upper bound for any single upstream call, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The only agent known to the gateway
pub const WEATHER_AGENT: &str = "weatherAgent";

/// The only tool exposed over HTTP
pub const WEATHER_TOOL: &str = "weather";

/// Identity advertised on the stdio transport
pub const SERVER_NAME: &str = "mastra-mcp-server";
pub const SERVER_VERSION: &str = "1.0.0";

pub const AGENTS_RESOURCE_URI: &str = "mastra://agents";
pub const TOOLS_RESOURCE_URI: &str = "mastra://tools";

/// Substituted when the agent produces no text
pub const NO_AGENT_RESPONSE: &str = "No response from agent";
