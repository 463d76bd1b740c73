use std::sync::Arc;

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{AgentConfig, UpstreamConfig};
use crate::constants::{NO_AGENT_RESPONSE, USER_AGENT, WEATHER_AGENT};
use crate::error::{GatewayError, Result};

const INSTRUCTIONS: &str = "You are a helpful weather assistant that provides accurate weather information. \
When weather data is included in the message, base your answer on it. \
Always mention the location, keep answers concise but informative, \
and include practical advice such as clothing or umbrellas when it is relevant.";

/// Text produced by an agent for one prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    pub text: Option<String>,
}

/// A conversational collaborator. Implementations must tolerate concurrent calls.
#[async_trait]
pub trait Agent: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<Generation>;
}

/// Normalizes agent output and failures for the transports.
#[derive(Clone)]
pub struct AgentProxy {
    agent: Arc<dyn Agent>,
}

impl AgentProxy {
    pub fn new(agent: Arc<dyn Agent>) -> Self {
        Self { agent }
    }

    /// Builds the OpenAI-backed agent when a key is configured
    pub fn from_config(agent: &AgentConfig, upstream: &UpstreamConfig) -> Result<Self> {
        let backend: Arc<dyn Agent> = match &agent.openai_api_key {
            Some(key) if !key.trim().is_empty() => {
                let client = Client::builder()
                    .user_agent(USER_AGENT)
                    .timeout(upstream.timeout())
                    .build()?;
                Arc::new(OpenAiAgent::new(
                    client,
                    &agent.openai_base_url,
                    key.clone(),
                    agent.agent_model.clone(),
                ))
            }
            _ => {
                tracing::warn!("OPENAI_API_KEY is not set; agent calls will fail");
                Arc::new(UnconfiguredAgent)
            }
        };
        Ok(Self::new(backend))
    }

    pub async fn ask(&self, prompt: &str) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(GatewayError::InvalidInput(
                "Message is required".to_string(),
            ));
        }

        let generation = self.agent.generate(prompt).await.map_err(|e| {
            tracing::warn!("Agent call failed: {:#}", e);
            GatewayError::Agent(e.to_string())
        })?;

        Ok(generation
            .text
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| NO_AGENT_RESPONSE.to_string()))
    }
}

/// Stand-in used when no model credentials are available.
#[derive(Debug, Clone, Copy)]
pub struct UnconfiguredAgent;

#[async_trait]
impl Agent for UnconfiguredAgent {
    async fn generate(&self, _prompt: &str) -> anyhow::Result<Generation> {
        bail!("Agent {} is not configured: set OPENAI_API_KEY", WEATHER_AGENT)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Weather assistant backed by an OpenAI-compatible chat completions API.
#[derive(Debug, Clone)]
pub struct OpenAiAgent {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiAgent {
    pub fn new(client: Client, base_url: &str, api_key: String, model: String) -> Self {
        Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl Agent for OpenAiAgent {
    async fn generate(&self, prompt: &str) -> anyhow::Result<Generation> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: INSTRUCTIONS,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(anyhow!("Agent request failed with status {}: {}", status, detail));
        }

        let completion = response.json::<ChatCompletionResponse>().await?;
        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content);

        Ok(Generation { text })
    }
}
