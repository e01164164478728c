//! consel - backup director console
//!
//! Thin wrapper around [`consel_cli::run`] that turns errors into semantic
//! exit codes.

use std::process::ExitCode;

use consel_cli::error::{exit_code_from_error, needs_report};

fn main() -> ExitCode {
    match consel_cli::run() {
        Ok(code) => code,
        Err(err) => {
            if needs_report(&err) {
                eprintln!("Error: {err:#}");
            }
            ExitCode::from(exit_code_from_error(&err))
        },
    }
}
