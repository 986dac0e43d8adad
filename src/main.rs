#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! moltbook — read and search Moltbook from the terminal.

mod api;
mod cli;
mod commands;
mod config;
mod types;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::ChronoLocal;

use api::Client;
use cli::{Cli, OutputCtx, write_error, write_stdout};
use config::{LOG_LEVEL_ENV_VAR, Settings};
use types::ErrorOutput;

/// Exit status for failures before any request is made.
const STARTUP_EXIT_CODE: i32 = 1;

/// Targets kept at `warn` whatever the requested level.
const QUIET_TARGETS: [&str; 4] = ["reqwest", "hyper", "hyper_util", "rustls"];

fn main() {
    let cli = Cli::parse();
    init_tracing_subscriber(cli.verbose);

    let ctx = OutputCtx::new(cli.output, cli.json, cli.no_header);

    let client = match build_client() {
        Ok(client) => client,
        Err(err) => {
            write_error(&ErrorOutput::from_startup_error(&err), ctx.format);
            std::process::exit(STARTUP_EXIT_CODE);
        }
    };

    match commands::dispatch(&cli.command, &client, &ctx) {
        Ok(out) => write_stdout(&out),
        Err(err) => {
            tracing::debug!(code = err.code(), "command failed");
            write_error(&ErrorOutput::from_api_error(&err), ctx.format);
            std::process::exit(err.exit_code());
        }
    }
}

fn build_client() -> anyhow::Result<Client> {
    let settings = Settings::from_env()?;
    tracing::debug!(base_url = %settings.base_url, timeout = ?settings.timeout, "settings");
    Client::from_settings(&settings).context("failed to initialise the HTTP client")
}

fn init_tracing_subscriber(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let mut filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var(LOG_LEVEL_ENV_VAR)
        .from_env_lossy();
    for target in QUIET_TARGETS {
        if let Ok(directive) = format!("{target}=warn").parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_timer(ChronoLocal::rfc_3339())
        .init();
}
