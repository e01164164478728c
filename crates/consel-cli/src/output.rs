//! # Command Results
//!
//! Every console command produces an [`Outcome`]: a human message, a JSON
//! payload describing what was resolved, and optionally an [`Effect`] on the
//! director state. Effects are applied by the caller after the command's
//! console context is gone, because the context borrows that state.
//!
//! Text output sends the message through the console session. JSON output
//! writes one object per command to stdout:
//!
//! ```json
//! {"command":"mount","ok":true,"data":{"storage":"Tape","drive":1,"slot":4}}
//! {"command":"mount","ok":false,"error":"ambiguous"}
//! ```

use std::io::Write;

use clap::ValueEnum;
use consel_core::SelectError;
use consel_core::types::{AclType, JobId};
use serde::Serialize;
use serde_json::{Value, json};

/// Output format for command results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable console output
    #[default]
    Text,
    /// One JSON object per command on stdout
    Json,
}

/// Change to the director state requested by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Flip the enabled flag of a job, client or schedule.
    SetEnabled {
        kind: AclType,
        name: String,
        enabled: bool,
    },
    /// Remove canceled or stopped jobs from the live registry.
    EndJobs(Vec<JobId>),
    /// End the interactive session.
    Quit,
}

/// Result of one successful console command.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub message: String,
    pub data: Value,
    pub effect: Option<Effect>,
}

impl Outcome {
    pub fn new(message: impl Into<String>, data: Value) -> Self {
        Self {
            message: message.into(),
            data,
            effect: None,
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }
}

#[derive(Serialize)]
struct JsonResult<'a> {
    command: &'a str,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
}

/// Write the JSON line for a finished command.
pub fn write_json(
    out: &mut dyn Write,
    command: &str,
    result: &Result<Outcome, SelectError>,
) -> anyhow::Result<()> {
    let record = match result {
        Ok(outcome) => JsonResult {
            command,
            ok: true,
            data: Some(&outcome.data),
            error: None,
        },
        Err(err) => JsonResult {
            command,
            ok: false,
            data: None,
            error: Some(err.category()),
        },
    };
    serde_json::to_writer(&mut *out, &record)?;
    writeln!(out)?;
    Ok(())
}

/// `{"name": ..}` payload shared by the single-entity commands.
pub fn named(kind: &str, name: &str) -> Value {
    json!({ "kind": kind, "name": name })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn json_line(command: &str, result: &Result<Outcome, SelectError>) -> Value {
        let mut out = Vec::new();
        write_json(&mut out, command, result).unwrap();
        assert!(out.ends_with(b"\n"));
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn test_success_line_carries_data() {
        let outcome = Outcome::new("Pool \"Full\" selected.", named("pool", "Full"));

        let line = json_line("pool", &Ok(outcome));

        assert_eq!(line["command"], "pool");
        assert_eq!(line["ok"], true);
        assert_eq!(line["data"]["name"], "Full");
        assert!(line.get("error").is_none());
    }

    #[test]
    fn test_failure_line_carries_category() {
        let line = json_line("mount", &Err(SelectError::AmbiguousInBatchMode("Storage".into())));

        assert_eq!(line["ok"], false);
        assert_eq!(line["error"], "ambiguous");
        assert!(line.get("data").is_none());
    }

    #[test]
    fn test_effect_builder() {
        let outcome = Outcome::new("bye", Value::Null).with_effect(Effect::Quit);
        assert_eq!(outcome.effect, Some(Effect::Quit));
    }
}
