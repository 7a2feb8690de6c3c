//! The interactive frame loop.

use std::{
    io::{self, Stdout},
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use miniweather_core::{Config, Controller, CredentialStore, Session, WeatherProvider};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::{
    input::{self, SystemClipboard},
    ui,
};

pub async fn run(
    config: &Config,
    provider: Box<dyn WeatherProvider>,
    store: CredentialStore,
) -> Result<()> {
    info!(credential_file = %store.path().display(), fps = config.ui.fps, "starting");

    let mut controller = Controller::new(provider, store);
    let mut clipboard = SystemClipboard::default();
    let frame_budget = frame_budget(config.ui.fps);

    let mut screen = Screen::enter()?;
    screen.draw(controller.session())?;

    while controller.is_running() {
        let frame_start = Instant::now();

        controller.begin_frame().await;

        while controller.is_running() && event::poll(Duration::ZERO)? {
            let event = event::read().context("Failed to read terminal event")?;
            if let Some(input) = input::translate(&event, &mut clipboard) {
                controller.handle_event(input).await;
            }
        }

        screen.draw(controller.session())?;

        // Sleep out the frame, waking early if input arrives.
        if let Some(remaining) = frame_budget.checked_sub(frame_start.elapsed()) {
            event::poll(remaining)?;
        }
    }

    info!("exiting");
    Ok(())
}

fn frame_budget(fps: u32) -> Duration {
    Duration::from_secs(1) / fps.max(1)
}

/// Raw-mode alternate screen; restored on drop.
struct Screen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Screen {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;

        undo_on_error(
            || {
                execute!(io::stdout(), EnterAlternateScreen, EnableBracketedPaste)
                    .context("Failed to enter alternate screen")?;

                let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
                    .context("Failed to set up terminal")?;
                Ok(Self { terminal })
            },
            || {
                let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
                let _ = disable_raw_mode();
            },
        )
    }

    fn draw(&mut self, session: &Session) -> Result<()> {
        self.terminal
            .draw(|frame| ui::render(frame, session))
            .context("Failed to draw frame")?;
        Ok(())
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            DisableBracketedPaste,
            LeaveAlternateScreen
        );
        let _ = self.terminal.show_cursor();
    }
}

/// Runs `setup`; if it fails, runs `undo` before returning the error.
fn undo_on_error<T>(setup: impl FnOnce() -> Result<T>, undo: impl FnOnce()) -> Result<T> {
    let result = setup();
    if result.is_err() {
        undo();
    }
    result
}
