#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use httpmock::{Method::GET, Mock, MockServer};
use serde_json::json;

use weather_gateway::{
    config::UpstreamConfig, Agent, AgentProxy, Gateway, Generation, WeatherFetcher,
};

/// Agent stub that records every prompt it receives.
pub struct ScriptedAgent {
    reply: Result<Option<String>, String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedAgent {
    pub fn replying(text: &str) -> Arc<Self> {
        Self::with(Ok(Some(text.to_string())))
    }

    pub fn silent() -> Arc<Self> {
        Self::with(Ok(None))
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Self::with(Err(message.to_string()))
    }

    fn with(reply: Result<Option<String>, String>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Agent for ScriptedAgent {
    async fn generate(&self, prompt: &str) -> anyhow::Result<Generation> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(Generation { text: text.clone() }),
            Err(message) => Err(anyhow::anyhow!(message.clone())),
        }
    }
}

pub fn upstream_config(server: &MockServer) -> UpstreamConfig {
    UpstreamConfig {
        geocoding_url: server.url("/v1/search"),
        forecast_url: server.url("/v1/forecast"),
        timeout_secs: 5,
    }
}

pub fn gateway(server: &MockServer, agent: Arc<dyn Agent>) -> Gateway {
    let fetcher = WeatherFetcher::new(&upstream_config(server)).expect("fetcher");
    Gateway::new(fetcher, AgentProxy::new(agent))
}

/// Geocoding answer for `query` resolving to one place
pub async fn mock_place<'a>(
    server: &'a MockServer,
    query: &str,
    name: &str,
    latitude: f64,
    longitude: f64,
) -> Mock<'a> {
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/search")
                .query_param("name", query)
                .query_param("count", "1");
            then.status(200).json_body(json!({
                "results": [{
                    "id": 1,
                    "name": name,
                    "latitude": latitude,
                    "longitude": longitude,
                    "country": "Somewhere"
                }],
                "generationtime_ms": 0.4
            }));
        })
        .await
}

/// Geocoding answer with an empty result list
pub async fn mock_no_place<'a>(server: &'a MockServer, query: &str) -> Mock<'a> {
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/search")
                .query_param("name", query);
            then.status(200).json_body(json!({ "results": [] }));
        })
        .await
}

pub struct Current {
    pub temperature: f64,
    pub apparent: f64,
    pub humidity: f64,
    pub wind: f64,
    pub gusts: f64,
    pub code: i32,
}

pub async fn mock_forecast<'a>(
    server: &'a MockServer,
    latitude: f64,
    longitude: f64,
    current: Current,
) -> Mock<'a> {
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/forecast")
                .query_param("latitude", latitude.to_string())
                .query_param("longitude", longitude.to_string())
                .query_param(
                    "current",
                    "temperature_2m,apparent_temperature,relative_humidity_2m,wind_speed_10m,wind_gusts_10m,weather_code",
                );
            then.status(200).json_body(json!({
                "latitude": latitude,
                "longitude": longitude,
                "current": {
                    "time": "2026-10-19T10:00",
                    "interval": 900,
                    "temperature_2m": current.temperature,
                    "apparent_temperature": current.apparent,
                    "relative_humidity_2m": current.humidity,
                    "wind_speed_10m": current.wind,
                    "wind_gusts_10m": current.gusts,
                    "weather_code": current.code
                }
            }));
        })
        .await
}

/// Istanbul at 20°C, partly cloudy
pub async fn mock_istanbul(server: &MockServer) {
    mock_place(server, "Istanbul", "Istanbul", 41.01, 28.95).await;
    mock_forecast(
        server,
        41.01,
        28.95,
        Current {
            temperature: 20.0,
            apparent: 19.0,
            humidity: 65.0,
            wind: 10.0,
            gusts: 15.0,
            code: 2,
        },
    )
    .await;
}
