//! # Console Commands
//!
//! Each command resolves its targets through `consel_core` and describes the
//! result as an [`Outcome`]. Commands never touch director state directly;
//! anything they change is returned as an [`Effect`](crate::output::Effect).
//!
//! Command words match case-insensitively and may be abbreviated to any
//! unique prefix (`mo` for `mount`, `can` for `cancel`).

use consel_core::SelectError;
use consel_core::config::ConsoleSettings;
use consel_core::console::Console;
use serde_json::json;

use crate::output::{Effect, Outcome};

mod jobs;
mod resources;
mod storage;
mod volume;

/// Result of running one console command.
pub type CommandResult = Result<Outcome, SelectError>;

type Handler = fn(&mut Console<'_>, &ConsoleSettings) -> CommandResult;

/// One entry of the command table.
#[derive(Debug)]
pub struct Command {
    pub name: &'static str,
    pub help: &'static str,
    handler: Handler,
}

impl Command {
    pub fn run(&self, console: &mut Console<'_>, settings: &ConsoleSettings) -> CommandResult {
        (self.handler)(console, settings)
    }
}

/// Every console command, in help order.
pub const COMMANDS: &[Command] = &[
    Command { name: "cancel", help: "Cancel running jobs", handler: jobs::cancel },
    Command { name: "catalog", help: "Select a catalog", handler: resources::catalog },
    Command { name: "client", help: "Select a client record", handler: resources::client },
    Command { name: "disable", help: "Disable a job, client or schedule", handler: resources::disable },
    Command { name: "enable", help: "Enable a job, client or schedule", handler: resources::enable },
    Command { name: "exit", help: "Terminate the session", handler: quit },
    Command { name: "fileset", help: "Select a file set", handler: resources::fileset },
    Command { name: "help", help: "Print this list", handler: help },
    Command { name: "job", help: "Select a finished job record", handler: jobs::job },
    Command { name: "jobs", help: "List finished jobs by type, level and status", handler: jobs::jobs },
    Command { name: "label", help: "Label a new volume", handler: storage::label },
    Command { name: "mediatype", help: "Select a media type", handler: storage::mediatype },
    Command { name: "mount", help: "Mount a volume in a storage drive", handler: storage::mount },
    Command { name: "pool", help: "Select a pool record", handler: resources::pool },
    Command { name: "prune", help: "Prune files, jobs or a volume", handler: volume::prune },
    Command { name: "quit", help: "Terminate the session", handler: quit },
    Command { name: "release", help: "Release a storage drive", handler: storage::release },
    Command { name: "restore", help: "Prepare a restore", handler: jobs::restore },
    Command { name: "run", help: "Prepare a job run", handler: jobs::run },
    Command { name: "slots", help: "Select autochanger slots", handler: storage::slots },
    Command { name: "status", help: "Report director, storage, client or schedule status", handler: resources::status },
    Command { name: "stop", help: "Stop running jobs", handler: jobs::stop },
    Command { name: "storage", help: "Select a storage record", handler: storage::storage },
    Command { name: "unmount", help: "Unmount a storage drive", handler: storage::unmount },
    Command { name: "volume", help: "Select a volume", handler: volume::volume },
];

/// Find a command by exact name, else by unique prefix.
pub fn lookup(word: &str) -> Option<&'static Command> {
    if word.is_empty() {
        return None;
    }
    if let Some(exact) = COMMANDS.iter().find(|c| c.name.eq_ignore_ascii_case(word)) {
        return Some(exact);
    }
    let word = word.to_ascii_lowercase();
    let mut matches = COMMANDS.iter().filter(|c| c.name.starts_with(&word));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

fn help(_: &mut Console<'_>, _: &ConsoleSettings) -> CommandResult {
    let mut lines = vec![
        "  Command       Description".to_owned(),
        "  =======       ===========".to_owned(),
    ];
    lines.extend(COMMANDS.iter().map(|c| format!("  {:<13} {}", c.name, c.help)));
    let names: Vec<&str> = COMMANDS.iter().map(|c| c.name).collect();
    Ok(Outcome::new(lines.join("\n"), json!({ "commands": names })))
}

fn quit(_: &mut Console<'_>, _: &ConsoleSettings) -> CommandResult {
    Ok(Outcome::new("", json!(null)).with_effect(Effect::Quit))
}

/// Report a failed lookup the way resolvers do and fail with `InvalidInput`.
fn reject(console: &mut Console<'_>, msg: &str, subject: &str) -> SelectError {
    console.error(msg);
    SelectError::InvalidInput(subject.to_owned())
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::test_support::run;
    use super::*;

    #[test]
    fn test_lookup_exact_and_prefix() {
        assert_eq!(lookup("mount").unwrap().name, "mount");
        assert_eq!(lookup("MOUNT").unwrap().name, "mount");
        assert_eq!(lookup("mo").unwrap().name, "mount");
        assert_eq!(lookup("can").unwrap().name, "cancel");
        // `job` is exact even though `jobs` shares the prefix
        assert_eq!(lookup("job").unwrap().name, "job");
    }

    #[test]
    fn test_lookup_rejects_ambiguous_and_unknown() {
        assert!(lookup("s").is_none());
        assert!(lookup("frobnicate").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_command_table_is_sorted_and_unique() {
        let names: Vec<_> = COMMANDS.iter().map(|c| c.name).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_help_lists_every_command() {
        let (result, _) = run("help", "");
        let outcome = result.unwrap();

        for command in COMMANDS {
            assert!(outcome.message.contains(command.name), "{}", command.name);
        }
        assert_eq!(outcome.data["commands"].as_array().unwrap().len(), COMMANDS.len());
    }

    #[test]
    fn test_quit_ends_the_session() {
        let (result, out) = run("quit", "");
        assert_eq!(result.unwrap().effect, Some(Effect::Quit));
        assert!(out.is_empty());
    }
}
