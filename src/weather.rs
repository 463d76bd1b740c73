use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

use crate::config::UpstreamConfig;
use crate::constants::{CURRENT_FIELDS, USER_AGENT};
use crate::error::{GatewayError, Result};
use crate::formatters::weather_condition;
use crate::models::{
    CurrentConditions, CurrentWeatherResponse, GeocodeResult, GeocodingResponse, WeatherRecord,
};

/// Resolves a place name and fetches its current conditions from Open-Meteo
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    client: Client,
    geocoding_url: String,
    forecast_url: String,
}

impl WeatherFetcher {
    /// Creates a fetcher with its own HTTP client
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()?;

        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &UpstreamConfig) -> Self {
        Self {
            client,
            geocoding_url: config.geocoding_url.clone(),
            forecast_url: config.forecast_url.clone(),
        }
    }

    /// Sends the request and deserializes a successful JSON response
    async fn make_request<T: for<'de> Deserialize<'de>>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(GatewayError::Upstream(format!(
                "Request failed with status: {}",
                response.status()
            )));
        }

        Ok(response.json::<T>().await?)
    }

    /// First geocoding match for `location`, if any
    pub async fn geocode(&self, location: &str) -> Result<Option<GeocodeResult>> {
        let request = self
            .client
            .get(&self.geocoding_url)
            .query(&[("name", location), ("count", "1")]);

        let response = self.make_request::<GeocodingResponse>(request).await?;
        Ok(response.results.into_iter().next())
    }

    pub async fn current_conditions(&self, latitude: f64, longitude: f64) -> Result<CurrentConditions> {
        let request = self.client.get(&self.forecast_url).query(&[
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
        ]);

        let response = self.make_request::<CurrentWeatherResponse>(request).await?;
        Ok(response.current)
    }

    /// Geocode, forecast, normalize.
    ///
    /// The returned record carries the canonical place name from geocoding,
    /// not the caller's spelling.
    pub async fn fetch(&self, location: &str) -> Result<WeatherRecord> {
        let query = location.trim();
        if query.is_empty() {
            return Err(GatewayError::InvalidInput(
                "Location must not be empty".to_string(),
            ));
        }

        tracing::info!("Geocoding location: {}", query);

        let place = self
            .geocode(query)
            .await
            .inspect_err(|e| tracing::warn!("Geocoding failed for {}: {}", query, e))?
            .ok_or_else(|| GatewayError::LocationNotFound(location.to_string()))?;

        tracing::debug!(
            "Resolved {} to {} ({}, {})",
            query,
            place.name,
            place.latitude,
            place.longitude
        );

        let current = self
            .current_conditions(place.latitude, place.longitude)
            .await
            .inspect_err(|e| tracing::warn!("Forecast failed for {}: {}", place.name, e))?;

        Ok(normalize(current, place.name))
    }
}

fn normalize(current: CurrentConditions, location: String) -> WeatherRecord {
    WeatherRecord {
        temperature: current.temperature,
        feels_like: current.feels_like,
        humidity: current.humidity,
        wind_speed: current.wind_speed,
        wind_gust: current.wind_gust,
        conditions: weather_condition(current.weather_code).to_string(),
        location,
    }
}
