//! Weather lookup and agent chat exposed over two transports: a JSON HTTP API
//! and a stdio tool/resource server.
//!
//! Both transports share one [`Gateway`]: geocode → forecast → normalize for
//! weather, and a thin proxy in front of an [`Agent`] for chat.

pub mod agent;
pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod formatters;
pub mod gateway;
pub mod models;
pub mod service;
pub mod weather;

pub use agent::{Agent, AgentProxy, Generation};
pub use error::GatewayError;
pub use gateway::Gateway;
pub use models::WeatherRecord;
pub use service::GatewayService;
pub use weather::WeatherFetcher;
