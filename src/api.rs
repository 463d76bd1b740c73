//! JSON-over-HTTP transport.
//!
//! Every route answers `application/json`. Failures use the `{error, message}`
//! envelope: `error` is a short summary, `message` the underlying detail.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::error::GatewayError;
use crate::formatters::timestamp;
use crate::gateway::Gateway;
use crate::models::WeatherRecord;

const ENDPOINTS: &[&str] = &[
    "GET  /health - Health check",
    "GET  /api/agents - List available agents",
    "GET  /api/tools - List available tools",
    "POST /api/agents/:agentName/chat - Chat with an agent",
    "POST /api/tools/:toolName/execute - Execute a tool",
    "GET  /api/weather/:location - Get weather for location",
    "POST /api/weather/chat - Weather chat with agent",
];

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, error: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            status,
            body: ErrorBody {
                error: error.into(),
                message: if message.is_empty() {
                    "Unknown error".to_string()
                } else {
                    message
                },
            },
        }
    }

    fn bad_request(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, message)
    }

    fn not_found(message: String) -> Self {
        Self::new(StatusCode::NOT_FOUND, message.clone(), message)
    }

    fn not_found_route(path: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "Not found",
            format!("Route {} not found", path),
        )
    }

    /// Client errors surface their own message; server errors are summarized
    /// by `summary` with the cause in `message`.
    fn from_gateway(summary: &str, err: GatewayError) -> Self {
        let status = err.status_code();
        let message = err.to_string();
        if status.is_server_error() {
            tracing::warn!("{}: {}", summary, message);
            Self::new(status, summary, message)
        } else {
            Self::new(status, message.clone(), message)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// ============================================================================
// Response bodies
// ============================================================================

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct AgentsResponse {
    agents: &'static [&'static str],
}

#[derive(Debug, Serialize)]
struct ToolsResponse {
    tools: &'static [&'static str],
}

#[derive(Debug, Serialize)]
struct WeatherResponse {
    weather: WeatherRecord,
    location: String,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    response: String,
    agent: String,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct ToolResponse {
    result: WeatherRecord,
    tool: String,
    timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WeatherChatResponse {
    weather: WeatherRecord,
    location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    question: Option<String>,
    agent_response: Option<String>,
    timestamp: String,
}

// ============================================================================
// Router
// ============================================================================

/// Builds the application with permissive CORS
pub fn router(gateway: Gateway) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/agents", get(list_agents))
        .route("/api/tools", get(list_tools))
        .route("/api/agents/{agent_name}/chat", post(agent_chat))
        .route("/api/tools/{tool_name}/execute", post(execute_tool))
        .route("/api/weather/chat", post(weather_chat))
        .route("/api/weather/{location}", get(weather_by_location))
        .fallback(route_not_found)
        .layer(CorsLayer::permissive())
        .with_state(gateway)
}

/// Binds `0.0.0.0:port` and serves until Ctrl-C or SIGTERM
pub async fn serve(gateway: Gateway, port: u16) -> anyhow::Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;

    tracing::info!("API server running on http://localhost:{}", port);
    tracing::info!("Available endpoints:");
    for endpoint in ENDPOINTS {
        tracing::info!("  {}", endpoint);
    }

    axum::serve(listener, router(gateway))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

// ============================================================================
// Request helpers
// ============================================================================

fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            "Invalid request body",
            rejection.body_text(),
        )
    })
}

/// Non-blank string field of a JSON object
fn text_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}

// ============================================================================
// Handlers
// ============================================================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: timestamp(),
    })
}

async fn list_agents() -> Json<AgentsResponse> {
    Json(AgentsResponse {
        agents: Gateway::agents(),
    })
}

async fn list_tools() -> Json<ToolsResponse> {
    Json(ToolsResponse {
        tools: Gateway::tools(),
    })
}

async fn weather_by_location(
    State(gateway): State<Gateway>,
    Path(location): Path<String>,
) -> ApiResult<WeatherResponse> {
    tracing::info!("GET weather for location: {}", location);

    let weather = gateway
        .weather(&location)
        .await
        .map_err(|e| ApiError::from_gateway("Failed to get weather", e))?;

    Ok(Json(WeatherResponse {
        weather,
        location,
        timestamp: timestamp(),
    }))
}

async fn agent_chat(
    State(gateway): State<Gateway>,
    Path(agent_name): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<ChatResponse> {
    let body = json_body(body)?;
    let message = text_field(&body, "message")
        .ok_or_else(|| ApiError::bad_request("Message is required"))?;

    let response = gateway
        .chat(&agent_name, message)
        .await
        .map_err(|e| ApiError::from_gateway("Failed to chat with agent", e))?;

    Ok(Json(ChatResponse {
        response,
        agent: agent_name,
        timestamp: timestamp(),
    }))
}

async fn execute_tool(
    State(gateway): State<Gateway>,
    Path(tool_name): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<ToolResponse> {
    if Gateway::ensure_tool(&tool_name).is_err() {
        return Err(ApiError::not_found(format!("Tool {} not found", tool_name)));
    }

    let body = json_body(body)?;
    let location = body
        .get("parameters")
        .and_then(|parameters| text_field(parameters, "location"))
        .ok_or_else(|| ApiError::bad_request("Location parameter is required"))?;

    tracing::info!("Executing tool {} for location: {}", tool_name, location);

    let result = gateway
        .weather(location)
        .await
        .map_err(|e| ApiError::from_gateway("Failed to execute tool", e))?;

    Ok(Json(ToolResponse {
        result,
        tool: tool_name,
        timestamp: timestamp(),
    }))
}

async fn weather_chat(
    State(gateway): State<Gateway>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<WeatherChatResponse> {
    let body = json_body(body)?;
    let location = text_field(&body, "location")
        .ok_or_else(|| ApiError::bad_request("Location is required"))?;
    let question = body.get("question").and_then(Value::as_str);

    tracing::info!("Weather chat for location: {}", location);

    let chat = gateway
        .weather_chat(location, question)
        .await
        .map_err(|e| ApiError::from_gateway("Failed to process weather chat", e))?;

    Ok(Json(WeatherChatResponse {
        weather: chat.weather,
        location: location.to_string(),
        question: question.map(str::to_string),
        agent_response: chat.agent_response,
        timestamp: timestamp(),
    }))
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::not_found_route(uri.path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn server_errors_are_summarized() {
        let err = ApiError::from_gateway(
            "Failed to get weather",
            GatewayError::LocationNotFound("Zzzzz".into()),
        );
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body.error, "Failed to get weather");
        assert_eq!(err.body.message, "Location 'Zzzzz' not found");
    }

    #[test]
    fn client_errors_keep_their_message() {
        let err = ApiError::from_gateway(
            "Failed to chat with agent",
            GatewayError::UnknownAgent("unknownAgent".into()),
        );
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.body.error, "Agent unknownAgent not found");
    }

    #[test]
    fn empty_cause_reads_unknown_error() {
        let err = ApiError::from_gateway(
            "Failed to execute tool",
            GatewayError::Upstream(String::new()),
        );
        assert_eq!(err.body.message, "Unknown error");
    }

    #[test]
    fn text_field_ignores_blank_and_non_strings() {
        let body = json!({ "a": "Paris", "b": "  ", "c": 7 });
        assert_eq!(text_field(&body, "a"), Some("Paris"));
        assert_eq!(text_field(&body, "b"), None);
        assert_eq!(text_field(&body, "c"), None);
        assert_eq!(text_field(&body, "missing"), None);
    }

    #[test]
    fn question_is_omitted_when_absent() {
        let body = WeatherChatResponse {
            weather: WeatherRecord {
                temperature: 1.0,
                feels_like: 0.0,
                humidity: 50.0,
                wind_speed: 2.0,
                wind_gust: 3.0,
                conditions: "Overcast".into(),
                location: "Oslo".into(),
            },
            location: "oslo".into(),
            question: None,
            agent_response: None,
            timestamp: "2026-01-01T00:00:00.000Z".into(),
        };
        let value = serde_json::to_value(body).unwrap();
        assert!(value.get("question").is_none());
        assert_eq!(value["agentResponse"], Value::Null);
    }
}
