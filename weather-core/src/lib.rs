//! Core library for the `miniweather` app.
//!
//! This crate defines:
//! - Configuration and the persisted API key
//! - The weather provider adapter and its error taxonomy
//! - The session controller driving the credential and query phases
//!
//! It has no terminal dependencies; `miniweather` supplies the display and input surface.

pub mod config;
pub mod controller;
pub mod credential;
pub mod model;
pub mod provider;

pub use config::{Config, ProviderConfig, UiConfig};
pub use controller::{Controller, InputEvent, Phase, Session};
pub use credential::CredentialStore;
pub use model::WeatherResult;
pub use provider::{AdapterError, WeatherProvider, provider_from_config};
