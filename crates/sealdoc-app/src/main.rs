// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sealdoc: official-document layout and PDF stamping.
//
// Entry point. Initialises logging, loads configuration, and dispatches the
// requested subcommand.

mod commands;
mod parse;
mod tools;

use std::path::PathBuf;
use std::process::ExitCode;

use sealdoc_core::AppConfig;
use sealdoc_core::human_errors::describe_error;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = commands::build_cli().get_matches();

    let config_path = matches.get_one::<PathBuf>("config");
    let config = match AppConfig::load(config_path.map(PathBuf::as_path)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", describe_error(&err));
            return ExitCode::from(2);
        }
    };

    let action = match parse::matches_to_action(&matches, &config) {
        Ok(action) => action,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::from(2);
        }
    };

    tracing::debug!(?action, "Sealdoc starting");

    match tools::run(action, &config).await {
        Ok(message) => {
            println!("{message}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
