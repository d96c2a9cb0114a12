// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Yawp CLI Entry Point
//!
//! The binary entry point for yawp.
//!
//! This module is responsible for bootstrapping the process and managing its
//! global lifecycle. It isolates the command-line interface layer from the
//! core library logic.
//!
//! ## Responsibilities
//!
//! 1.  **Global State Setup**: Initializes the `tracing` subscriber on stderr
//!     with a level derived from the `-v` count, so diagnostics never mix with
//!     records when `--output -` puts the record stream on stdout.
//! 2.  **Configuration Mapping**: Converts raw command-line arguments (parsed
//!     via `clap`) into the internal `Config` struct and finalizes it.
//! 3.  **Error Boundary**: Usage failures print the usage text and terminate
//!     with the traditional getopt-era status. Resource failures are logged to
//!     the error stream and converted into a non-zero `ExitCode`.

mod args;

use std::process::{self, ExitCode};

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use yawp_common::{config::Config, debug, error, info};

use crate::args::CommandLine;

fn main() -> ExitCode {
    let cmd = match CommandLine::parse_args() {
        Ok(cmd) => cmd,
        Err(e) => {
            // Usage problems, help requests and a bare invocation all end
            // here, before anything was configured. Exit status stays -1.
            let _ = e.print();
            process::exit(-1);
        }
    };

    init_logging(cmd.verbosity);
    info!("yawp v{}", env!("CARGO_PKG_VERSION"));

    let mut cfg = Config::from(&cmd);

    match run(&mut cfg) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Critical failure: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Resolves the remaining defaults and writes the output header. Anything
/// failing in here is a resource problem, not a usage problem; `main` logs
/// it and maps it to a failing exit code.
fn run(cfg: &mut Config) -> anyhow::Result<()> {
    cfg.finalize()?;
    cfg.write_header().context("cannot write the output header")?;

    if !cfg.targets.is_empty() {
        debug!("{} target prefix(es) from the command line", cfg.targets.len());
    }
    info!(
        "configuration resolved: {} probing, {} parameters recorded",
        cfg.probe_type,
        cfg.params.len()
    );

    Ok(())
}

/// `-v` raises the default level to debug, `-vv` and beyond to trace; an
/// explicit `RUST_LOG` wins over both. Diagnostics go to stderr so that the
/// record stream on stdout stays clean.
fn init_logging(verbosity: u8) {
    let default_directive = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_failures_carry_the_failing_path() {
        let mut cfg = Config::default();
        cfg.output = Some("/nonexistent-dir/run.ywp".to_string());

        let err = run(&mut cfg).unwrap_err();
        assert!(format!("{err:#}").contains("cannot open /nonexistent-dir/run.ywp"));
    }

    #[test]
    fn testing_mode_runs_without_an_output() {
        let mut cfg = Config {
            testing: true,
            ..Config::default()
        };

        run(&mut cfg).unwrap();
        assert!(cfg.out.is_none());
    }
}
