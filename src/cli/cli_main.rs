// Main CLI entrypoint
// (c) 2026 The sftp-put authors

use std::process::ExitCode;

use super::args::CliArgs;

use crate::{
    client::{client_main, MAX_UPDATE_FPS},
    config::Manager,
    util::setup_tracing,
};
use anstream::println;
use clap::Parser;
use indicatif::{MultiProgress, ProgressDrawTarget};

/// Main CLI entrypoint
///
/// Returns failure (after logging why) if the configuration is unusable or the upload fails.
pub fn cli() -> anyhow::Result<ExitCode> {
    let args = CliArgs::parse();
    let display = if args.quiet {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    } else {
        MultiProgress::with_draw_target(ProgressDrawTarget::stderr_with_hz(MAX_UPDATE_FPS))
    };
    setup_tracing(args.trace_level(), Some(&display), args.log_file.as_deref())
        .inspect_err(|e| eprintln!("{e:?}"))?;

    let mut manager = match Manager::new(&args.env_file()) {
        Ok(m) => m,
        Err(e) => {
            tracing::error!("{e:#}");
            return Ok(ExitCode::FAILURE);
        }
    };
    manager.merge_provider(args.overrides.clone());

    if args.show_config {
        println!("{manager}");
        return Ok(ExitCode::SUCCESS);
    }

    manager
        .resolve()
        .map_err(anyhow::Error::from)
        .and_then(|config| client_main(&config, &display, args.statistics))
        .inspect_err(|e| tracing::error!("{e:#}"))
        .map_or(Ok(ExitCode::FAILURE), |()| Ok(ExitCode::SUCCESS))
}
