use crate::{Config, WeatherResult, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Everything that can go wrong while fetching current conditions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    #[error("Invalid API key.")]
    InvalidCredential,

    #[error("City '{0}' not found.")]
    CityNotFound(String),

    #[error("Incomplete data retrieved from API.")]
    IncompleteData,

    #[error("Connection error: {0}")]
    NetworkFailure(String),

    #[error("HTTP error {status}: {detail}")]
    HttpFailure { status: u16, detail: String },
}

/// A source of current weather conditions.
///
/// Implementations hold no per-call state, so repeated calls with the same
/// arguments against unchanged remote data give equal results.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, city: &str, credential: &str) -> Result<WeatherResult, AdapterError>;
}

/// Construct the provider described by `config`.
///
/// Fails only if the HTTP client cannot be built, which callers treat as fatal.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider = OpenWeatherProvider::new(&config.provider)?;
    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_default_config() {
        let provider = provider_from_config(&Config::default());
        assert!(provider.is_ok());
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            AdapterError::InvalidCredential.to_string(),
            "Invalid API key."
        );
        assert_eq!(
            AdapterError::CityNotFound("Nowhereville".into()).to_string(),
            "City 'Nowhereville' not found."
        );

        let err = AdapterError::HttpFailure {
            status: 500,
            detail: "boom".into(),
        };
        assert_eq!(err.to_string(), "HTTP error 500: boom");
    }
}
