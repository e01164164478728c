//! Job commands: cancel, stop, job, jobs, run, restore.

use consel_core::SelectError;
use consel_core::confirm::ConfirmDialog;
use consel_core::config::ConsoleSettings;
use consel_core::console::Console;
use consel_core::jobs::select_jobs;
use consel_core::select::{
    get_catalog_resource, get_client_dbr, get_client_resource, get_fileset_resource,
    get_job_dbr, get_job_resource, get_level_from_name, get_pool_resource, get_restore_job,
    get_user_job_level_selection, get_user_job_status_selection, get_user_job_type_selection,
};
use consel_core::types::{AclType, JobLevel, Record};
use serde_json::{Value, json};
use tracing::debug;

use super::{CommandResult, reject};
use crate::output::{Effect, Outcome};

pub fn cancel(console: &mut Console<'_>, _: &ConsoleSettings) -> CommandResult {
    end_jobs(console, "cancel", "canceled")
}

pub fn stop(console: &mut Console<'_>, _: &ConsoleSettings) -> CommandResult {
    end_jobs(console, "stop", "stopped")
}

fn end_jobs(console: &mut Console<'_>, reason: &str, done: &str) -> CommandResult {
    let selection = select_jobs(console, reason)?;

    let mut lines = Vec::new();
    let mut ended = Vec::new();
    let mut rows = Vec::new();
    for id in selection {
        // The job may have finished on its own since it was selected.
        let Some(job) = console.jobs.by_id(id) else {
            debug!(id, "selected job already gone");
            continue;
        };
        lines.push(format!("JobId {id}, Job {} marked to be {done}.", job.unique_name));
        rows.push(json!({ "id": id, "job": job.unique_name }));
        ended.push(id);
    }

    Ok(Outcome::new(lines.join("\n"), json!({ "reason": reason, "jobs": rows }))
        .with_effect(Effect::EndJobs(ended)))
}

fn job_json(record: &Record) -> Value {
    json!({
        "id": record.id,
        "name": record.name,
        "unique_name": record.unique_name,
        "level": record.level.map(String::from),
        "status": record.status.map(String::from),
    })
}

/// One finished job from `jobid=`/`ujobid=`, or the listing and a JobId prompt.
pub fn job(console: &mut Console<'_>, _: &ConsoleSettings) -> CommandResult {
    let record = get_job_dbr(console)?;
    let unique = record.unique_name.as_deref().unwrap_or(&record.name);
    Ok(Outcome::new(format!("JobId {}: {unique}", record.id), job_json(&record)))
}

/// Finished jobs filtered by `jobtype`, `joblevel=` and `jobstatus=`.
///
/// A bare `jobtype` keyword asks for the type.
pub fn jobs(console: &mut Console<'_>, _: &ConsoleSettings) -> CommandResult {
    let job_type = match console.args.find_arg("jobtype") {
        Some(_) => Some(get_user_job_type_selection(console)?),
        None => None,
    };
    let level = get_user_job_level_selection(console)?;
    let status = get_user_job_status_selection(console)?;

    let records = console.catalog.list_jobs(None).map_err(|err| {
        console.error(&err.to_string());
        SelectError::from(err)
    })?;
    let resources = console.resources;
    let matching: Vec<&Record> = records
        .iter()
        .filter(|r| console.acl_ok(AclType::Job, &r.name))
        .filter(|r| level.is_none_or(|code| r.level == Some(code)))
        .filter(|r| status.is_none_or(|code| r.status == Some(code)))
        .filter(|r| {
            job_type.is_none_or(|t| resources.job(&r.name).is_some_and(|job| job.job_type == t))
        })
        .collect();
    debug!(total = records.len(), matching = matching.len(), "listed jobs");

    let message = if matching.is_empty() {
        "No jobs found.".to_owned()
    } else {
        matching
            .iter()
            .map(|r| {
                format!(
                    "{:>6} {} level={} status={}",
                    r.id,
                    r.unique_name.as_deref().unwrap_or(&r.name),
                    r.level.unwrap_or('-'),
                    r.status.unwrap_or('-'),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };
    let rows: Vec<Value> = matching.iter().map(|r| job_json(r)).collect();
    Ok(Outcome::new(message, json!({ "jobs": rows })))
}

/// Resolve everything a job run needs and confirm the level.
pub fn run(console: &mut Console<'_>, _: &ConsoleSettings) -> CommandResult {
    let job = get_job_resource(console)?;
    let client = get_client_resource(console)?;
    let fileset = get_fileset_resource(console)?;
    let pool = get_pool_resource(console)?;

    let args = console.args;
    let mut level = match args.find_arg_with_value("level").and_then(|i| args.value(i)) {
        Some(name) => get_level_from_name(name).ok_or_else(|| {
            reject(console, &format!("Level \"{name}\" not valid."), name)
        })?,
        None => JobLevel::Incremental,
    };

    let dialog = ConfirmDialog::new(
        "Level",
        "Enter new Level: ",
        |l: &JobLevel| l.name().to_owned(),
        get_level_from_name,
    );
    if !dialog.run(console, &mut level) {
        return Err(console.aborted());
    }

    let message = format!(
        "Job \"{}\" queued: Client \"{}\" FileSet \"{}\" Pool \"{}\" Level {}.",
        job.name,
        client.name,
        fileset.name,
        pool.name,
        level.name()
    );
    Ok(Outcome::new(
        message,
        json!({
            "job": job.name,
            "client": client.name,
            "fileset": fileset.name,
            "pool": pool.name,
            "level": level.name(),
        }),
    ))
}

/// Restore job, source client record and catalog for a restore.
pub fn restore(console: &mut Console<'_>, _: &ConsoleSettings) -> CommandResult {
    let job = get_restore_job(console)?;
    let client = get_client_dbr(console, None)?;
    let catalog = get_catalog_resource(console)?;

    let message = format!(
        "Restore Job \"{}\" for Client \"{}\" using Catalog \"{}\".",
        job.name, client.name, catalog.name
    );
    Ok(Outcome::new(
        message,
        json!({ "job": job.name, "client": client.name, "catalog": catalog.name }),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use consel_core::Config;

    use super::*;
    use crate::Director;
    use crate::commands::test_support::{DIRECTOR, run, run_on};

    #[test]
    fn test_cancel_explicit_jobs_once() {
        let (result, out) = run("cancel jobid=3 jobid=3", "");
        let outcome = result.unwrap();

        assert_eq!(outcome.effect, Some(Effect::EndJobs(vec![3])));
        assert!(outcome.message.starts_with("JobId 3, Job Nightly."));
        assert!(outcome.message.ends_with("marked to be canceled."));
        assert!(out.is_empty());
    }

    #[test]
    fn test_cancel_removes_job_from_registry() {
        // Given: A director with job 3 running
        let mut director = Director::new(Config::from_toml_str(DIRECTOR).unwrap());

        // When: Cancelling it, then cancelling it again
        let (first, _) = run_on(&mut director, "cancel jobid=3 yes", "");
        let (second, out) = run_on(&mut director, "cancel jobid=3 yes", "");

        // Then: The second attempt finds nothing
        assert!(first.is_ok());
        assert!(second.is_err());
        assert!(out.contains("JobId 3 is not running."), "{out}");
    }

    #[test]
    fn test_stop_all_with_yes() {
        let (result, _) = run("stop all yes", "");
        let outcome = result.unwrap();

        assert!(matches!(outcome.effect, Some(Effect::EndJobs(ref ids)) if ids.len() == 3));
        assert_eq!(outcome.data["reason"], "stop");
    }

    #[test]
    fn test_jobs_filters_by_level_and_status() {
        let (result, _) = run("jobs joblevel=F jobstatus=T", "");
        let outcome = result.unwrap();

        let rows = outcome.data["jobs"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], 10);
    }

    #[test]
    fn test_jobs_filters_by_type() {
        let (result, _) = run("jobs jobtype=Restore", "");
        let outcome = result.unwrap();

        assert_eq!(outcome.message, "No jobs found.");
    }

    #[test]
    fn test_job_by_id() {
        let (result, _) = run("job jobid=11", "");
        let outcome = result.unwrap();

        assert_eq!(outcome.message, "JobId 11: Weekly.2024-05-04_21.00.00_11");
        assert_eq!(outcome.data["level"], "I");
    }

    #[test]
    fn test_job_prompts_for_jobid() {
        let (result, out) = run("job", "10\n");

        assert_eq!(result.unwrap().data["id"], 10);
        assert!(out.contains("Enter the JobId to select: "));
    }

    #[test]
    fn test_run_resolves_every_target() {
        let (result, out) = run("run job=Nightly client=alpha-fd pool=Full level=Full yes", "");
        let outcome = result.unwrap();

        assert_eq!(outcome.data["job"], "Nightly");
        assert_eq!(outcome.data["fileset"], "LinuxAll");
        assert_eq!(outcome.data["pool"], "Full");
        assert_eq!(outcome.data["level"], "Full");
        assert!(out.contains("The current Level is: Full"));
    }

    #[test]
    fn test_run_level_can_be_modified() {
        let (result, _) = run("run job=Nightly client=alpha-fd pool=Full", "mod\ndifferential\nyes\n");
        assert_eq!(result.unwrap().data["level"], "Differential");
    }

    #[test]
    fn test_run_rejects_unknown_level() {
        let (result, out) = run("run job=Nightly client=alpha-fd pool=Full level=Sometimes", "");

        assert!(matches!(result, Err(SelectError::InvalidInput(_))));
        assert!(out.contains("Level \"Sometimes\" not valid."));
    }

    #[test]
    fn test_restore_picks_the_only_restore_job() {
        let (result, _) = run("restore client=alpha-fd", "");
        let outcome = result.unwrap();

        assert_eq!(outcome.data["job"], "RestoreFiles");
        assert_eq!(outcome.data["client"], "alpha-fd");
        assert_eq!(outcome.data["catalog"], "MyCatalog");
    }
}
