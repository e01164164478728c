//! Logging initialization and configuration.
//!
//! Sets up the tracing subscriber and color control from CLI flags and
//! environment variables. Logs always go to stderr so they never mix with
//! console output or JSON results.

use anyhow::Result;
use colored::control as color_control;
use is_terminal::IsTerminal;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::Cli;
use crate::output::OutputFormat;

/// Level chosen from the global flags.
///
/// Machine clients (API mode or JSON output) only see errors unless verbose or
/// debug logging was asked for explicitly.
pub fn log_level(cli: &Cli) -> Level {
    if cli.verbose || cli.debug {
        Level::DEBUG
    } else if cli.quiet || cli.api || cli.output == OutputFormat::Json {
        Level::ERROR
    } else {
        Level::WARN
    }
}

/// Install the global subscriber and apply color settings.
///
/// # Errors
///
/// Returns an error if the global tracing subscriber cannot be set.
pub fn initialize_logging(cli: &Cli) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(cli))
        .with_target(cli.debug)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Color control: disable when requested, NO_COLOR is set, or output is not a terminal
    let env_no_color = std::env::var_os("NO_COLOR").is_some();
    let machine_output = cli.api || cli.output == OutputFormat::Json;
    if cli.no_color || env_no_color || machine_output || !std::io::stdout().is_terminal() {
        color_control::set_override(false);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;

    fn level_for(args: &[&str]) -> Level {
        let cli = Cli::try_parse_from(std::iter::once("consel").chain(args.iter().copied())).unwrap();
        log_level(&cli)
    }

    #[test]
    fn test_default_level_is_warn() {
        assert_eq!(level_for(&[]), Level::WARN);
    }

    #[test]
    fn test_verbose_wins_over_machine_output() {
        assert_eq!(level_for(&["-v", "--api"]), Level::DEBUG);
        assert_eq!(level_for(&["--debug", "-o", "json"]), Level::DEBUG);
    }

    #[test]
    fn test_machine_clients_only_see_errors() {
        assert_eq!(level_for(&["--api"]), Level::ERROR);
        assert_eq!(level_for(&["--output", "json"]), Level::ERROR);
        assert_eq!(level_for(&["-q"]), Level::ERROR);
    }
}
