use std::path::PathBuf;

use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use miniweather_core::{
    Config, CredentialStore, WeatherProvider, controller::PROBE_CITY, provider_from_config,
};

use crate::{app, logging};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "miniweather", version, about = "Current weather for any city")]
pub struct Cli {
    /// Read configuration from this file instead of the platform default.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Open the interactive app (the default).
    Run,

    /// Enter and verify the OpenWeather API key.
    Configure,

    /// Print current weather for a city and exit.
    Show {
        /// City name, e.g. "Paris".
        city: String,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        let store = CredentialStore::new(config.credential_file_path()?);

        match self.command.unwrap_or(Command::Run) {
            Command::Run => {
                logging::init_file(&config.log_file_path()?)?;
                let provider = provider_from_config(&config)?;
                app::run(&config, provider, store).await
            }
            Command::Configure => {
                logging::init_stderr()?;
                let provider = provider_from_config(&config)?;
                configure(provider.as_ref(), &store).await
            }
            Command::Show { city, json } => {
                logging::init_stderr()?;
                let provider = provider_from_config(&config)?;
                show(provider.as_ref(), &store, &city, json).await
            }
        }
    }
}

async fn configure(provider: &dyn WeatherProvider, store: &CredentialStore) -> anyhow::Result<()> {
    let key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let key = key.trim();
    if key.is_empty() {
        bail!("API key must not be empty");
    }

    provider
        .fetch(PROBE_CITY, key)
        .await
        .map_err(|err| anyhow!("API key was not accepted: {err}"))?;

    store.save(key)?;
    println!("API key saved to {}", store.path().display());

    Ok(())
}

async fn show(
    provider: &dyn WeatherProvider,
    store: &CredentialStore,
    city: &str,
    json: bool,
) -> anyhow::Result<()> {
    let credential = store.load().ok_or_else(|| {
        anyhow!(
            "No API key configured.\n\
             Hint: run `miniweather configure` and enter your API key."
        )
    })?;

    let city = city.trim();
    if city.is_empty() {
        bail!("City name must not be empty");
    }

    let result = provider.fetch(city, &credential).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}  {}", result.temperature, result.description);
        println!("{}", result.location());
    }

    Ok(())
}
