//! Volume commands: volume, prune.

use std::time::Duration;

use consel_core::SelectError;
use consel_core::config::ConsoleSettings;
use consel_core::confirm::confirm_retention;
use consel_core::console::Console;
use consel_core::prompt::do_keyword_prompt;
use consel_core::select::{get_client_dbr, select_media_dbr, select_pool_and_media_dbr};
use serde_json::json;

use super::{CommandResult, reject};
use crate::output::Outcome;

/// Volume from `volume=` or the pool listing.
pub fn volume(console: &mut Console<'_>, _: &ConsoleSettings) -> CommandResult {
    let media = select_media_dbr(console)?;
    let pool_id = media.pool_id.unwrap_or_default();
    Ok(Outcome::new(
        format!("Volume \"{}\" (MediaId {}, PoolId {pool_id}).", media.name, media.id),
        json!({ "volume": media.name, "id": media.id, "pool_id": pool_id }),
    ))
}

const PRUNE_TARGETS: &[&str] = &["Files", "Jobs", "Volume"];

/// `prune files|jobs|volume [retention=PERIOD] [yes]`
///
/// The retention period defaults to the console setting and is confirmed
/// before anything is reported as pruned.
pub fn prune(console: &mut Console<'_>, settings: &ConsoleSettings) -> CommandResult {
    let target = match console.args.find_arg_keyword(PRUNE_TARGETS) {
        Some(index) => index,
        None => do_keyword_prompt(console, "Choose item to prune", PRUNE_TARGETS)?,
    };
    let mut retention = retention_argument(console, settings.default_retention)?;

    let (subject, data) = match PRUNE_TARGETS.get(target).copied() {
        Some("Volume") => {
            let (pool, media) = select_pool_and_media_dbr(console)?;
            confirm(console, &mut retention, "Volume")?;
            (
                format!("Volume \"{}\" in Pool \"{}\"", media.name, pool.name),
                json!({ "volume": media.name, "pool": pool.name }),
            )
        },
        Some(what @ ("Files" | "Jobs")) => {
            let client = get_client_dbr(console, None)?;
            let label = if what == "Files" { "File" } else { "Job" };
            confirm(console, &mut retention, label)?;
            (
                format!("{what} of Client \"{}\"", client.name),
                json!({ "target": what.to_ascii_lowercase(), "client": client.name }),
            )
        },
        _ => return Err(SelectError::InvalidInput(target.to_string())),
    };

    let period = humantime::format_duration(retention).to_string();
    let mut data = data;
    data["retention"] = json!(period);
    Ok(Outcome::new(format!("Pruned {subject} older than {period}."), data))
}

fn retention_argument(console: &mut Console<'_>, default: Duration) -> Result<Duration, SelectError> {
    let args = console.args;
    match args.find_arg_with_value("retention").and_then(|i| args.value(i)) {
        Some(value) => humantime::parse_duration(value).map_err(|_| {
            reject(console, &format!("Invalid retention period specified: {value}"), value)
        }),
        None => Ok(default),
    }
}

fn confirm(console: &mut Console<'_>, retention: &mut Duration, what: &str) -> Result<(), SelectError> {
    if confirm_retention(console, retention, what) {
        Ok(())
    } else {
        Err(console.aborted())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::test_support::run;

    #[test]
    fn test_volume_by_name() {
        let (result, _) = run("volume volume=Incr-0001", "");
        assert_eq!(result.unwrap().message, "Volume \"Incr-0001\" (MediaId 3, PoolId 2).");
    }

    #[test]
    fn test_volume_from_pool_listing_by_media_id() {
        let (result, out) = run("volume pool=Full", "*2\n");

        assert_eq!(result.unwrap().data["volume"], "Full-0002");
        assert!(out.contains("Enter *MediaId or Volume name: "));
    }

    #[test]
    fn test_volume_not_found() {
        let (result, out) = run("volume volume=Nope", "");

        assert!(matches!(result, Err(SelectError::NotFound(_))));
        assert!(out.contains("Media record for Volume \"Nope\" not found."));
    }

    #[test]
    fn test_prune_volume_with_yes() {
        let (result, out) = run("prune volume=Full-0001 retention=14days yes", "");
        let outcome = result.unwrap();

        assert_eq!(
            outcome.message,
            "Pruned Volume \"Full-0001\" in Pool \"Full\" older than 14days."
        );
        assert!(out.contains("The current Volume retention period is: 14days"));
    }

    #[test]
    fn test_prune_asks_for_target_and_uses_default_retention() {
        let (result, _) = run("prune client=alpha-fd", "2\nyes\n");
        let outcome = result.unwrap();

        assert_eq!(outcome.data["target"], "jobs");
        assert_eq!(outcome.data["retention"], "30days");
    }

    #[test]
    fn test_prune_declined() {
        let (result, out) = run("prune files client=alpha-fd", "no\n");
        assert_eq!(result.unwrap_err(), SelectError::UserAborted);
        assert!(out.contains("Selection aborted, nothing done."));
    }

    #[test]
    fn test_prune_rejects_bad_retention() {
        let (result, out) = run("prune jobs retention=soon", "");

        assert!(matches!(result, Err(SelectError::InvalidInput(_))));
        assert!(out.contains("Invalid retention period specified: soon"));
    }
}
