use std::sync::Arc;

use crate::agent::AgentProxy;
use crate::config::{AgentConfig, UpstreamConfig};
use crate::constants::{WEATHER_AGENT, WEATHER_TOOL};
use crate::error::{GatewayError, Result};
use crate::formatters::weather_chat_prompt;
use crate::models::{WeatherChat, WeatherRecord};
use crate::weather::WeatherFetcher;

/// Capabilities shared by the HTTP and stdio transports
#[derive(Clone)]
pub struct Gateway {
    weather: Arc<WeatherFetcher>,
    agent: AgentProxy,
}

impl Gateway {
    pub fn new(weather: WeatherFetcher, agent: AgentProxy) -> Self {
        Self {
            weather: Arc::new(weather),
            agent,
        }
    }

    pub fn from_config(upstream: &UpstreamConfig, agent: &AgentConfig) -> Result<Self> {
        Ok(Self::new(
            WeatherFetcher::new(upstream)?,
            AgentProxy::from_config(agent, upstream)?,
        ))
    }

    pub fn agents() -> &'static [&'static str] {
        &[WEATHER_AGENT]
    }

    pub fn tools() -> &'static [&'static str] {
        &[WEATHER_TOOL]
    }

    pub fn ensure_agent(name: &str) -> Result<()> {
        if Self::agents().contains(&name) {
            Ok(())
        } else {
            Err(GatewayError::UnknownAgent(name.to_string()))
        }
    }

    pub fn ensure_tool(name: &str) -> Result<()> {
        if Self::tools().contains(&name) {
            Ok(())
        } else {
            Err(GatewayError::UnknownTool(name.to_string()))
        }
    }

    pub async fn weather(&self, location: &str) -> Result<WeatherRecord> {
        self.weather.fetch(location).await
    }

    /// Sends `message` to the named agent
    pub async fn chat(&self, agent: &str, message: &str) -> Result<String> {
        Self::ensure_agent(agent)?;
        tracing::info!("Chatting with agent: {}", agent);
        self.agent.ask(message).await
    }

    /// Fetches weather and, when a question is given, asks the agent about it.
    /// An empty question never reaches the agent; whitespace-only ones do.
    pub async fn weather_chat(&self, location: &str, question: Option<&str>) -> Result<WeatherChat> {
        let weather = self.weather(location).await?;

        let agent_response = match question.filter(|q| !q.is_empty()) {
            Some(question) => {
                let prompt = weather_chat_prompt(location, &weather, question)?;
                Some(self.agent.ask(&prompt).await?)
            }
            None => None,
        };

        Ok(WeatherChat {
            weather,
            agent_response,
        })
    }
}
