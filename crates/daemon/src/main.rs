// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! herdd: the herd scheduler daemon.

use herd_daemon::{env, lifecycle, Config};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("herdd: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = std::fs::create_dir_all(&config.state_dir) {
        eprintln!("herdd: cannot create {}: {err}", config.state_dir.display());
        return ExitCode::FAILURE;
    }

    let file_appender = tracing_appender::rolling::never(&config.state_dir, "herdd.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_new(env::log_filter())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file_writer.and(std::io::stderr))
        .init();

    match lifecycle::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(err = %err, "daemon failed");
            eprintln!("herdd: {err}");
            ExitCode::FAILURE
        }
    }
}
