//! Resource commands: enable, disable, pool, client, fileset, catalog, status.

use consel_core::SelectError;
use consel_core::config::ConsoleSettings;
use consel_core::console::Console;
use consel_core::prompt::do_keyword_prompt;
use consel_core::select::{
    get_catalog_resource, get_client_dbr, get_client_resource, get_fileset_resource,
    get_pool_dbr, get_schedule_resource, get_storage_resource, get_user_job_status_selection,
    select_enable_disable_client_resource, select_enable_disable_job_resource,
    select_enable_disable_schedule_resource,
};
use consel_core::types::{AclType, LiveJob};
use serde_json::{Value, json};

use super::CommandResult;
use crate::output::{Effect, Outcome, named};

pub fn enable(console: &mut Console<'_>, _: &ConsoleSettings) -> CommandResult {
    toggle(console, true)
}

pub fn disable(console: &mut Console<'_>, _: &ConsoleSettings) -> CommandResult {
    toggle(console, false)
}

/// `client=` or `schedule=` switch the kind; jobs are the default.
fn toggle(console: &mut Console<'_>, enable: bool) -> CommandResult {
    let args = console.args;
    let (kind, name) = if args.find_arg("client").is_some() {
        let client = select_enable_disable_client_resource(console, enable)?;
        (AclType::Client, client.name.clone())
    } else if args.find_arg("schedule").is_some() {
        let schedule = select_enable_disable_schedule_resource(console, enable)?;
        (AclType::Schedule, schedule.name.clone())
    } else {
        let job = select_enable_disable_job_resource(console, enable)?;
        (AclType::Job, job.name.clone())
    };

    let verb = if enable { "enabled" } else { "disabled" };
    let label = match kind {
        AclType::Client => "Client",
        AclType::Schedule => "Schedule",
        _ => "Job",
    };
    Ok(Outcome::new(
        format!("{label} \"{name}\" {verb}"),
        json!({ "kind": kind.as_str(), "name": name, "enabled": enable }),
    )
    .with_effect(Effect::SetEnabled { kind, name, enabled: enable }))
}

/// Pool record named by `pool=`, `recyclepool=` or `nextpool=`.
pub fn pool(console: &mut Console<'_>, _: &ConsoleSettings) -> CommandResult {
    const POOL_KEYWORDS: &[&str] = &["pool", "recyclepool", "nextpool"];
    let keyword = console
        .args
        .find_arg_keyword(POOL_KEYWORDS)
        .map_or("pool", |i| POOL_KEYWORDS[i]);

    let record = get_pool_dbr(console, None, keyword)?;
    let message = if record.is_none_sentinel() {
        "No Pool selected.".to_owned()
    } else {
        format!("Pool \"{}\" (PoolId {}).", record.name, record.id)
    };
    let mut data = named("pool", &record.name);
    data["id"] = json!(record.id);
    Ok(Outcome::new(message, data))
}

pub fn client(console: &mut Console<'_>, _: &ConsoleSettings) -> CommandResult {
    let record = get_client_dbr(console, None)?;
    let mut data = named("client", &record.name);
    data["id"] = json!(record.id);
    Ok(Outcome::new(format!("Client \"{}\" (ClientId {}).", record.name, record.id), data))
}

pub fn fileset(console: &mut Console<'_>, _: &ConsoleSettings) -> CommandResult {
    let fileset = get_fileset_resource(console)?;
    Ok(Outcome::new(format!("FileSet \"{}\".", fileset.name), named("fileset", &fileset.name)))
}

pub fn catalog(console: &mut Console<'_>, _: &ConsoleSettings) -> CommandResult {
    let catalog = get_catalog_resource(console)?;
    Ok(Outcome::new(format!("Catalog \"{}\".", catalog.name), named("catalog", &catalog.name)))
}

const STATUS_TARGETS: &[&str] = &["director", "storage", "client", "scheduler"];

/// `status director|storage|client|scheduler`, asking when none is named.
pub fn status(console: &mut Console<'_>, _: &ConsoleSettings) -> CommandResult {
    let target = match console.args.find_arg_keyword(STATUS_TARGETS) {
        Some(index) => index,
        None => do_keyword_prompt(console, "Status available for", STATUS_TARGETS)?,
    };

    match STATUS_TARGETS.get(target).copied() {
        Some("director") => director_status(console),
        Some("storage") => {
            let store = get_storage_resource(console, false, false)?;
            let changer = if store.autochanger {
                format!(", autochanger with {} drives and {} slots", store.drives, store.slots)
            } else {
                String::new()
            };
            Ok(Outcome::new(
                format!("Storage \"{}\": Media Type {}{changer}.", store.name, store.media_type),
                json!({
                    "storage": store.name,
                    "media_type": store.media_type,
                    "autochanger": store.autochanger,
                    "drives": store.drives,
                    "slots": store.slots,
                    "enabled": store.enabled,
                }),
            ))
        },
        Some("client") => {
            let client = get_client_resource(console)?;
            Ok(enabled_status("Client", &client.name, client.enabled))
        },
        Some("scheduler") => {
            let schedule = get_schedule_resource(console)?;
            Ok(enabled_status("Schedule", &schedule.name, schedule.enabled))
        },
        _ => Err(SelectError::InvalidInput(target.to_string())),
    }
}

fn enabled_status(kind: &str, name: &str, enabled: bool) -> Outcome {
    let state = if enabled { "enabled" } else { "disabled" };
    let mut data = named(&kind.to_ascii_lowercase(), name);
    data["enabled"] = json!(enabled);
    Outcome::new(format!("{kind} \"{name}\" is {state}."), data)
}

/// Running jobs the console may see, optionally filtered by `jobstatus=`.
fn director_status(console: &mut Console<'_>) -> CommandResult {
    let status = get_user_job_status_selection(console)?;
    let jobs: Vec<LiveJob> = console
        .jobs
        .snapshot()
        .into_iter()
        .filter(|job| job.job.as_deref().is_none_or(|name| console.acl_ok(AclType::Job, name)))
        .filter(|job| status.is_none_or(|code| job.status.code() == code))
        .collect();

    if jobs.is_empty() {
        return Ok(Outcome::new("No Jobs running.", json!({ "running": [] })));
    }

    let mut lines = vec!["Running Jobs:".to_owned()];
    lines.extend(jobs.iter().map(|job| {
        format!("{:>6} {} ({})", job.id, job.unique_name, job.status.code())
    }));
    let rows: Vec<Value> = jobs
        .iter()
        .map(|job| json!({ "id": job.id, "job": job.unique_name, "status": job.status }))
        .collect();
    Ok(Outcome::new(lines.join("\n"), json!({ "running": rows })))
}
