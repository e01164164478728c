//! consel CLI - console for a backup director
//!
//! The binary loads a director description, then either runs the command
//! given on its own command line or reads commands from stdin until `quit`
//! or end of input. All target resolution is done by `consel_core`; this
//! crate owns the director state, the terminal session and output.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Result, anyhow};
use clap::Parser;
use consel_core::args::ArgumentVector;
use consel_core::collab::Session;
use consel_core::config::ConsoleSettings;
use consel_core::memory::{MemoryCatalog, MemoryJobRegistry};
use consel_core::{Config, Console, ConsoleMode};
use is_terminal::IsTerminal;
use tracing::{debug, info};

pub mod cli;
mod commands;
pub mod error;
mod output;
mod session;
mod utils;

use crate::cli::Cli;
use crate::commands::CommandResult;
use crate::error::CliError;
use crate::output::{Effect, OutputFormat, write_json};
use crate::session::ColorSession;
use crate::utils::initialize_logging;

/// Prompt printed before each command when stdin is a terminal.
const COMMAND_PROMPT: &str = "*";

/// Director state one console talks to: configuration, catalog and live jobs.
#[derive(Debug)]
pub struct Director {
    config: Config,
    catalog: MemoryCatalog,
    jobs: MemoryJobRegistry,
}

impl Director {
    /// Take the catalog rows and live jobs out of `config`.
    #[must_use]
    pub fn new(mut config: Config) -> Self {
        let catalog = MemoryCatalog::new(std::mem::take(&mut config.records));
        let jobs = MemoryJobRegistry::new(std::mem::take(&mut config.running));
        Self { config, catalog, jobs }
    }

    #[must_use]
    pub const fn settings(&self) -> &ConsoleSettings {
        &self.config.console
    }

    #[must_use]
    pub const fn mode(&self) -> ConsoleMode {
        self.config.mode()
    }

    /// Run one command through `session` and apply its effect.
    ///
    /// The outer error is for commands that could not start (unknown
    /// command word); the inner result is the command's own outcome.
    pub fn execute(
        &mut self,
        args: &ArgumentVector,
        session: &mut dyn Session,
    ) -> Result<CommandResult, CliError> {
        let word = args.command();
        let Some(command) = commands::lookup(word) else {
            return Err(CliError::usage(anyhow!("{word}: is an invalid command.")));
        };
        debug!(command = command.name, "executing");

        let result = {
            let mut console = Console::new(
                args,
                session,
                &self.config.acl,
                &self.catalog,
                &self.jobs,
                &self.config.resources,
            )
            .with_mode(self.config.mode());
            command.run(&mut console, &self.config.console)
        };

        if let Ok(outcome) = &result {
            if let Some(effect) = &outcome.effect {
                self.apply(effect);
            }
        }
        Ok(result)
    }

    fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::SetEnabled { kind, name, enabled } => {
                if self.config.resources.set_enabled(*kind, name, *enabled) {
                    info!(kind = kind.as_str(), name, enabled, "resource updated");
                }
            },
            Effect::EndJobs(ids) => {
                for &id in ids {
                    if self.jobs.finish(id) {
                        info!(id, "job ended");
                    }
                }
            },
            Effect::Quit => {},
        }
    }
}

/// What the caller should do after a command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Parse, execute and report one command line.
///
/// Text results go through the session; JSON results go to `out`.
fn run_line(
    director: &mut Director,
    line: &str,
    session: &mut dyn Session,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<Flow> {
    let args = ArgumentVector::parse(line)
        .map_err(|err| CliError::core(consel_core::Error::from(err)))?;
    if args.command().is_empty() {
        return Ok(Flow::Continue);
    }

    let result = director.execute(&args, session)?;
    match format {
        OutputFormat::Json => write_json(out, args.command(), &result)?,
        OutputFormat::Text => {
            if let Ok(outcome) = &result {
                if !outcome.message.is_empty() {
                    session.send(&outcome.message);
                }
            }
        },
    }

    match result {
        Ok(outcome) if outcome.effect == Some(Effect::Quit) => Ok(Flow::Quit),
        Ok(_) => Ok(Flow::Continue),
        Err(err) => Err(CliError::selection(err).into()),
    }
}

/// Read commands until `quit` or end of input. Failed commands were already
/// reported and do not end the session.
fn run_session(
    director: &mut Director,
    session: &mut dyn Session,
    format: OutputFormat,
    out: &mut dyn Write,
    prompt: &str,
) -> Result<()> {
    while let Some(line) = session.read_line(prompt) {
        match run_line(director, &line, session, format, out) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {},
            Err(err) => {
                if error::needs_report(&err) {
                    session.error(&err.to_string());
                }
            },
        }
    }
    Ok(())
}

/// Execute the consel CLI with the current process arguments.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded, logging cannot be
/// initialized, or a one-shot command fails.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    initialize_logging(&cli)?;

    let mut config = Config::load(cli.config.as_deref()).map_err(CliError::core)?;
    config.console.batch |= cli.batch;
    config.console.api |= cli.api;
    let mut director = Director::new(config);

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    // JSON results own stdout, so the conversation moves to stderr.
    let conversation: Box<dyn Write> = match cli.output {
        OutputFormat::Text => Box::new(io::stdout()),
        OutputFormat::Json => Box::new(io::stderr()),
    };
    let mut session = ColorSession::new(stdin.lock(), conversation);
    let mut stdout = io::stdout();

    match cli.command_line() {
        Some(line) => {
            run_line(&mut director, &line, &mut session, cli.output, &mut stdout)?;
        },
        None => {
            if interactive {
                session.send(&format!(
                    "Console \"{}\" ready. Type help for commands.",
                    director.settings().name
                ));
            }
            let prompt = if interactive { COMMAND_PROMPT } else { "" };
            run_session(&mut director, &mut session, cli.output, &mut stdout, prompt)?;
        },
    }

    stdout.flush()?;
    Ok(ExitCode::SUCCESS)
}
