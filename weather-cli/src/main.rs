//! Binary crate for the `miniweather` app.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - The terminal display and keyboard surface
//! - Logging setup

use clap::Parser;

mod app;
mod cli;
mod input;
mod logging;
mod ui;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
