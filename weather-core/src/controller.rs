//! Session state and the two-phase input state machine.
//!
//! The controller starts in [`Phase::AcquiringCredential`]. At the start of
//! every frame it probes the persisted key, and once a key is accepted it
//! moves to [`Phase::Querying`] for the rest of the run. Provider calls are
//! awaited inline, so nothing else in the loop progresses while one is
//! outstanding.

use chrono::{DateTime, Local};
use tracing::{error, info, warn};

use crate::{CredentialStore, WeatherProvider, WeatherResult};

pub const CREDENTIAL_MAX_LEN: usize = 32;
pub const QUERY_MAX_LEN: usize = 25;

/// City used to check that a stored key is accepted by the provider.
pub const PROBE_CITY: &str = "earth";

pub const INITIAL_STATUS: &str = "Enter city name and press ENTER";
pub const ERROR_STATUS: &str = "error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    AcquiringCredential,
    Querying,
}

/// Keyboard-level input, already stripped of terminal specifics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Char(char),
    Backspace,
    Submit,
    /// Clipboard contents to replace the credential buffer with.
    Paste(String),
    /// Shift, caps-lock, tab and friends: recognized, never typed.
    Ignored,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub phase: Phase,
    pub credential: String,
    pub credential_input: String,
    pub query_input: String,
    pub last_result: Option<WeatherResult>,
    pub is_fetching: bool,
    pub status_message: String,
    pub last_updated: Option<DateTime<Local>>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::AcquiringCredential,
            credential: String::new(),
            credential_input: String::new(),
            query_input: String::new(),
            last_result: Some(WeatherResult::placeholder()),
            is_fetching: false,
            status_message: INITIAL_STATUS.to_string(),
            last_updated: None,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct Controller {
    session: Session,
    provider: Box<dyn WeatherProvider>,
    store: CredentialStore,
    running: bool,
}

impl Controller {
    pub fn new(provider: Box<dyn WeatherProvider>, store: CredentialStore) -> Self {
        Self {
            session: Session::new(),
            provider,
            store,
            running: true,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Per-frame work that happens regardless of input.
    pub async fn begin_frame(&mut self) {
        if self.session.phase == Phase::AcquiringCredential {
            self.validate_stored_credential().await;
        }
    }

    pub async fn handle_event(&mut self, event: InputEvent) {
        if event == InputEvent::Quit {
            info!("quit requested");
            self.running = false;
            return;
        }

        match self.session.phase {
            Phase::AcquiringCredential => self.handle_credential_input(event),
            Phase::Querying => self.handle_query_input(event).await,
        }
    }

    async fn validate_stored_credential(&mut self) {
        let Some(stored) = self.store.load() else {
            return;
        };

        match self.provider.fetch(PROBE_CITY, &stored).await {
            Ok(_) => {
                info!("stored API key accepted");
                self.session.credential = stored;
                self.session.phase = Phase::Querying;
            }
            Err(err) => {
                warn!(error = %err, "stored API key rejected, clearing it");
                if let Err(err) = self.store.clear() {
                    error!(error = %err, "failed to clear credential file");
                }
            }
        }
    }

    fn handle_credential_input(&mut self, event: InputEvent) {
        let buffer = &mut self.session.credential_input;

        match event {
            InputEvent::Submit => {
                self.session.credential = buffer.trim().to_string();
                buffer.clear();

                if let Err(err) = self.store.save(&self.session.credential) {
                    error!(error = %err, "failed to persist API key");
                }
            }
            InputEvent::Backspace => {
                buffer.pop();
            }
            InputEvent::Paste(text) => {
                // Oversized pastes are usually the wrong thing on the clipboard.
                *buffer = if text.chars().count() > CREDENTIAL_MAX_LEN {
                    String::new()
                } else {
                    text
                };
            }
            InputEvent::Char(c) => {
                push_capped(buffer, c, CREDENTIAL_MAX_LEN);
            }
            InputEvent::Ignored | InputEvent::Quit => {}
        }
    }

    async fn handle_query_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Submit => self.submit_query().await,
            InputEvent::Backspace => {
                self.session.query_input.pop();
            }
            InputEvent::Char(c) => {
                if push_capped(&mut self.session.query_input, c, QUERY_MAX_LEN) {
                    self.session.status_message.clear();
                }
            }
            InputEvent::Paste(_) | InputEvent::Ignored | InputEvent::Quit => {}
        }
    }

    async fn submit_query(&mut self) {
        let city = self.session.query_input.trim().to_string();
        self.session.query_input.clear();

        if city.is_empty() || self.session.is_fetching {
            return;
        }

        self.session.last_result = None;
        self.session.is_fetching = true;
        let outcome = self.provider.fetch(&city, &self.session.credential).await;
        self.session.is_fetching = false;

        match outcome {
            Ok(result) => {
                info!(city = %result.city, temperature = %result.temperature, "weather updated");
                self.session.last_result = Some(result);
                self.session.last_updated = Some(Local::now());
            }
            Err(err) => {
                warn!(%city, error = %err, "weather fetch failed");
                self.session.status_message = ERROR_STATUS.to_string();
                self.session.last_result = Some(WeatherResult::placeholder());
            }
        }
    }
}

/// Appends a printable `c` unless `buffer` already holds `cap` characters.
fn push_capped(buffer: &mut String, c: char, cap: usize) -> bool {
    if c.is_control() || buffer.chars().count() >= cap {
        return false;
    }
    buffer.push(c);
    true
}
