use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    config::ProviderConfig,
    model::{WeatherResult, capitalize, format_temperature},
};

use super::{AdapterError, WeatherProvider};

const NOT_AVAILABLE: &str = "N/A";

/// Adapter for the OpenWeatherMap current-conditions endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    endpoint: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(config: &ProviderConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            http,
        })
    }

    async fn fetch_current(
        &self,
        city: &str,
        credential: &str,
    ) -> Result<WeatherResult, AdapterError> {
        let res = self
            .http
            .get(&self.endpoint)
            .query(&[("q", city), ("appid", credential), ("units", "metric")])
            .send()
            .await
            .map_err(network_failure)?;

        let status = res.status();
        let body = res.text().await.map_err(network_failure)?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).map_err(|_| AdapterError::IncompleteData)?;

        if parsed.is_not_found() {
            return Err(AdapterError::CityNotFound(city.to_string()));
        }

        parsed.into_result()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwMain {
    temp: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwWeather {
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwCurrentResponse {
    name: Option<String>,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    // The provider sends this as a number on success and a string on errors.
    cod: Option<Value>,
}

impl OwCurrentResponse {
    fn is_not_found(&self) -> bool {
        match &self.cod {
            Some(Value::String(code)) => code == "404",
            Some(Value::Number(code)) => code.as_u64() == Some(404),
            _ => false,
        }
    }

    fn into_result(self) -> Result<WeatherResult, AdapterError> {
        let temp = self.main.temp.ok_or(AdapterError::IncompleteData)?;

        let description = self
            .weather
            .into_iter()
            .next()
            .and_then(|w| w.description)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Ok(WeatherResult {
            city: self.name.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            country_code: self.sys.country.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            temperature: format_temperature(temp),
            description: capitalize(&description),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(&self, city: &str, credential: &str) -> Result<WeatherResult, AdapterError> {
        debug!(city, "requesting current weather");
        self.fetch_current(city, credential).await
    }
}

fn network_failure(err: reqwest::Error) -> AdapterError {
    if err.is_timeout() {
        AdapterError::NetworkFailure(format!("request timed out: {err}"))
    } else {
        AdapterError::NetworkFailure(err.to_string())
    }
}

/// Only 401 gets its own variant; every other error status, 404 included, is an `HttpFailure`.
fn classify_status(status: StatusCode, body: &str) -> AdapterError {
    if status == StatusCode::UNAUTHORIZED {
        return AdapterError::InvalidCredential;
    }

    AdapterError::HttpFailure {
        status: status.as_u16(),
        detail: truncate_body(body),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
