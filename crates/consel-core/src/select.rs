//! Per-entity resolvers used by console commands.
//!
//! Each function configures a [`ResourceSelector`] or [`RecordSelector`] (or
//! runs a small dedicated dialog) for one entity kind. All of them report
//! failures to the session before returning the error.

use tracing::debug;

use crate::console::Console;
use crate::error::SelectError;
use crate::prompt::{PromptSession, choose, get_pint};
use crate::resolve::{RecordSelector, ResourceSelector};
use crate::types::{
    AclType, CatalogResource, ClientResource, DbId, DriveNumber, FileSetResource, JobLevel,
    JobResource, JobStatus, JobType, PoolResource, Record, RecordKind, ScheduleResource,
    SlotNumber, StorageResource,
};
use crate::validation::validate_name;

const STORAGE_KEYWORDS: &[&str] = &["storage", "sd"];
const CLIENT_KEYWORDS: &[&str] = &["client", "fd"];
const POOL_KEYWORDS: &[&str] = &["pool"];
const JOB_KEYWORDS: &[&str] = &["job"];
const RESTORE_JOB_KEYWORDS: &[&str] = &["restorejob"];
const SCHEDULE_KEYWORDS: &[&str] = &["schedule"];
const FILESET_KEYWORDS: &[&str] = &["fileset"];
const CATALOG_KEYWORDS: &[&str] = &["catalog"];
const NO_KEYWORDS: &[&str] = &[];

/// Bare keywords that never name a storage, even when a bare keyword may.
const NON_STORAGE_FLAGS: &[&str] = &["barcode", "barcodes", "encrypt", "scan", "slots"];

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

fn storage_menu<'q>(autochanger_only: bool) -> ResourceSelector<'q, StorageResource> {
    let selector = ResourceSelector::new("Storage", AclType::Storage, NO_KEYWORDS);
    if autochanger_only {
        selector
            .header("The defined Autochanger Storage resources are:")
            .filter(|s: &StorageResource| s.autochanger)
    } else {
        selector
    }
}

/// Menu of storages, optionally autochangers only.
pub fn select_storage_resource<'a>(
    console: &mut Console<'a>,
    autochanger_only: bool,
) -> Result<&'a StorageResource, SelectError> {
    let resources = console.resources;
    storage_menu(autochanger_only).select(console, &resources.storages)
}

/// Storage for commands that act on a device.
///
/// The command line is scanned left to right. `storage=`/`sd=` names the
/// storage directly; `jobid=`, `job=`/`jobname=` and `ujobid=` name a running
/// job whose write storage is used. With `use_default`, a bare keyword is
/// taken as the storage name (`mount Tape`), and a bare `?` forces the menu.
/// A storage the console may not see is discarded in favour of the menu.
pub fn get_storage_resource<'a>(
    console: &mut Console<'a>,
    use_default: bool,
    autochangers_only: bool,
) -> Result<&'a StorageResource, SelectError> {
    let args = console.args;
    let resources = console.resources;
    debug!(use_default, autochangers_only, "resolving storage");

    let mut store_name: Option<&str> = None;
    let mut inherited: Option<String> = None;

    for (_, arg) in args.iter() {
        let keyword = arg.keyword.as_str();
        if keyword.is_empty() {
            continue;
        }

        if use_default && arg.value.is_none() {
            if NON_STORAGE_FLAGS.iter().any(|f| f.eq_ignore_ascii_case(keyword)) {
                continue;
            }
            if store_name.is_some() {
                console.error("Storage name given twice.");
                return Err(SelectError::InvalidInput(keyword.to_owned()));
            }
            if keyword.starts_with('?') {
                store_name = None;
                break;
            }
            store_name = Some(keyword);
            continue;
        }

        let value = arg.value.as_deref();
        match keyword.to_ascii_lowercase().as_str() {
            "storage" | "sd" => {
                store_name = value;
                break;
            },
            "jobid" => {
                let Some(id) = value.and_then(|v| v.parse().ok()).filter(|&id| id > 0) else {
                    console.error(&format!("Expecting jobid=nn command, got: {keyword}"));
                    return Err(SelectError::InvalidInput(keyword.to_owned()));
                };
                let Some(job) = console.jobs.by_id(id) else {
                    console.error(&format!("JobId {id} is not running."));
                    return Err(SelectError::NotFound(id.to_string()));
                };
                inherited = job.write_storage;
                break;
            },
            "job" | "jobname" | "ujobid" => {
                let Some(name) = value else {
                    console.error(&format!("Expecting {keyword}=xxx, got: {keyword}."));
                    return Err(SelectError::InvalidInput(keyword.to_owned()));
                };
                let job = if keyword.eq_ignore_ascii_case("ujobid") {
                    console.jobs.by_full_name(name)
                } else {
                    console.jobs.by_partial_name(name)
                };
                let Some(job) = job else {
                    console.error(&format!("Job \"{name}\" is not running."));
                    return Err(SelectError::NotFound(name.to_owned()));
                };
                inherited = job.write_storage;
                break;
            },
            _ => {},
        }
    }

    let mut store = inherited
        .as_deref()
        .and_then(|name| resources.storage(name))
        .filter(|s| console.acl_ok(AclType::Storage, &s.name));

    if store.is_none() {
        if let Some(name) = store_name.filter(|n| !n.is_empty()) {
            store = resources.storage(name);
            if store.is_none() {
                console.error(&format!("Storage resource \"{name}\": not found"));
            }
        }
    }

    match store.filter(|s| console.acl_ok(AclType::Storage, &s.name)) {
        Some(store) => Ok(store),
        None => select_storage_resource(console, autochangers_only),
    }
}

/// Drive of `storage` to operate on.
///
/// `drive=N` wins. Otherwise a changer with several drives asks; everything
/// else uses drive 0.
pub fn get_storage_drive(
    console: &mut Console<'_>,
    storage: &StorageResource,
) -> Result<DriveNumber, SelectError> {
    let args = console.args;
    if let Some(value) = args.find_arg_with_value("drive").and_then(|i| args.value(i)) {
        return value.trim().parse().map_err(|_| {
            console.error(&format!("Expecting drive=nn, got: {value}"));
            SelectError::InvalidInput(value.to_owned())
        });
    }

    if !storage.autochanger || storage.drives <= 1 {
        return Ok(0);
    }

    let mut prompts = PromptSession::start("Select Drive:");
    for drive in 0..storage.drives {
        prompts.add(format!("Drive {drive}"));
    }
    let choice = choose(console, prompts, "Drive", "Select drive")?;
    DriveNumber::try_from(choice.index).map_err(|_| SelectError::InvalidInput(choice.label))
}

/// Slot of `storage` to operate on; `None` for storages without slots.
pub fn get_storage_slot(
    console: &mut Console<'_>,
    storage: &StorageResource,
) -> Result<Option<SlotNumber>, SelectError> {
    let args = console.args;
    let value = match args.find_arg_with_value("slot").and_then(|i| args.value(i)) {
        Some(value) => value.to_owned(),
        None if storage.autochanger => console.read_answer("Enter autochanger slot: ")?,
        None => return Ok(None),
    };

    match value.trim().parse::<SlotNumber>() {
        Ok(slot) => Ok(Some(slot)),
        Err(_) => {
            console.error(&format!("Expecting slot=nn, got: {value}"));
            Err(SelectError::InvalidInput(value))
        },
    }
}

/// Media type from `mediatype=` or a menu of the visible storages' media types.
pub fn get_media_type(console: &mut Console<'_>) -> Result<String, SelectError> {
    let args = console.args;
    if let Some(value) = args.find_arg_with_value("mediatype").and_then(|i| args.value(i)) {
        return Ok(value.to_owned());
    }

    let resources = console.resources;
    let mut prompts = PromptSession::start("Media Types defined in conf file:");
    for store in &resources.storages {
        if console.acl_ok(AclType::Storage, &store.name) {
            prompts.add(store.media_type.as_str());
        }
    }
    choose(console, prompts, "Media Type", "Select the Media Type").map(|c| c.label)
}

// ---------------------------------------------------------------------------
// Other configured resources
// ---------------------------------------------------------------------------

/// Menu of file sets.
pub fn select_fileset_resource<'a>(
    console: &mut Console<'a>,
) -> Result<&'a FileSetResource, SelectError> {
    let resources = console.resources;
    ResourceSelector::new("FileSet", AclType::FileSet, FILESET_KEYWORDS)
        .select_msg("Select FileSet resource")
        .select(console, &resources.filesets)
}

/// `fileset=` or the file set menu.
pub fn get_fileset_resource<'a>(
    console: &mut Console<'a>,
) -> Result<&'a FileSetResource, SelectError> {
    let resources = console.resources;
    ResourceSelector::new("FileSet", AclType::FileSet, FILESET_KEYWORDS)
        .resolve(console, &resources.filesets)
}

/// `catalog=` or the catalog menu.
///
/// API clients cannot answer a menu here, so they get the first catalog, and
/// an error when the console may not use it.
pub fn get_catalog_resource<'a>(
    console: &mut Console<'a>,
) -> Result<&'a CatalogResource, SelectError> {
    let resources = console.resources;
    let selector = ResourceSelector::new("Catalog", AclType::Catalog, CATALOG_KEYWORDS);
    if let Some(catalog) = selector.explicit(console, &resources.catalogs) {
        return Ok(catalog);
    }

    if console.mode.api {
        let Some(first) = resources.catalogs.first() else {
            console.error("Could not find a Catalog resource");
            return Err(SelectError::NotFound("Catalog".to_owned()));
        };
        if !console.acl_ok(AclType::Catalog, &first.name) {
            console.error(
                "You must specify a \"use <catalog-name>\" command before continuing.",
            );
            return Err(SelectError::Unauthorized(first.name.clone()));
        }
        return Ok(first);
    }

    selector.select(console, &resources.catalogs)
}

/// Menu of job resources.
pub fn select_job_resource<'a>(console: &mut Console<'a>) -> Result<&'a JobResource, SelectError> {
    let resources = console.resources;
    ResourceSelector::new("Job", AclType::Job, JOB_KEYWORDS).select(console, &resources.jobs)
}

/// `job=` or the job resource menu.
pub fn get_job_resource<'a>(console: &mut Console<'a>) -> Result<&'a JobResource, SelectError> {
    let resources = console.resources;
    ResourceSelector::new("Job", AclType::Job, JOB_KEYWORDS).resolve(console, &resources.jobs)
}

fn restore_jobs<'q>() -> ResourceSelector<'q, JobResource> {
    ResourceSelector::new("Job", AclType::Job, RESTORE_JOB_KEYWORDS)
        .label("Restore Job")
        .header("The defined Restore Job resources are:")
        .select_msg("Select Restore Job")
        .restrict(|job: &JobResource| job.job_type == JobType::Restore)
}

/// `restorejob=` (which must name a restore job) or the restore job menu.
pub fn get_restore_job<'a>(console: &mut Console<'a>) -> Result<&'a JobResource, SelectError> {
    let resources = console.resources;
    restore_jobs().resolve(console, &resources.jobs)
}

/// Menu of restore jobs.
pub fn select_restore_job_resource<'a>(
    console: &mut Console<'a>,
) -> Result<&'a JobResource, SelectError> {
    let resources = console.resources;
    restore_jobs().select(console, &resources.jobs)
}

fn clients<'q>() -> ResourceSelector<'q, ClientResource> {
    ResourceSelector::new("Client", AclType::Client, CLIENT_KEYWORDS)
        .select_msg("Select Client (File daemon) resource")
}

/// Menu of clients.
pub fn select_client_resource<'a>(
    console: &mut Console<'a>,
) -> Result<&'a ClientResource, SelectError> {
    let resources = console.resources;
    clients().select(console, &resources.clients)
}

/// `client=`/`fd=` or the client menu.
pub fn get_client_resource<'a>(
    console: &mut Console<'a>,
) -> Result<&'a ClientResource, SelectError> {
    let resources = console.resources;
    clients().resolve(console, &resources.clients)
}

/// Menu of pool resources.
///
/// Most commands want the catalog row instead; see [`get_pool_dbr`].
pub fn select_pool_resource<'a>(console: &mut Console<'a>) -> Result<&'a PoolResource, SelectError> {
    let resources = console.resources;
    ResourceSelector::new("Pool", AclType::Pool, POOL_KEYWORDS).select(console, &resources.pools)
}

/// `pool=` or the pool resource menu.
pub fn get_pool_resource<'a>(console: &mut Console<'a>) -> Result<&'a PoolResource, SelectError> {
    let resources = console.resources;
    ResourceSelector::new("Pool", AclType::Pool, POOL_KEYWORDS).resolve(console, &resources.pools)
}

/// `schedule=` or the schedule menu.
pub fn get_schedule_resource<'a>(
    console: &mut Console<'a>,
) -> Result<&'a ScheduleResource, SelectError> {
    let resources = console.resources;
    ResourceSelector::new("Schedule", AclType::Schedule, SCHEDULE_KEYWORDS)
        .resolve(console, &resources.schedules)
}

/// Job to enable (`enable = true`) or disable. The menu leaves out jobs
/// already in the target state.
pub fn select_enable_disable_job_resource<'a>(
    console: &mut Console<'a>,
    enable: bool,
) -> Result<&'a JobResource, SelectError> {
    let resources = console.resources;
    ResourceSelector::new("Job", AclType::Job, JOB_KEYWORDS)
        .filter(move |job: &JobResource| job.enabled != enable)
        .resolve(console, &resources.jobs)
}

pub fn select_enable_disable_client_resource<'a>(
    console: &mut Console<'a>,
    enable: bool,
) -> Result<&'a ClientResource, SelectError> {
    let resources = console.resources;
    ResourceSelector::new("Client", AclType::Client, CLIENT_KEYWORDS)
        .filter(move |client: &ClientResource| client.enabled != enable)
        .resolve(console, &resources.clients)
}

pub fn select_enable_disable_schedule_resource<'a>(
    console: &mut Console<'a>,
    enable: bool,
) -> Result<&'a ScheduleResource, SelectError> {
    let resources = console.resources;
    ResourceSelector::new("Schedule", AclType::Schedule, SCHEDULE_KEYWORDS)
        .filter(move |schedule: &ScheduleResource| schedule.enabled != enable)
        .resolve(console, &resources.schedules)
}

// ---------------------------------------------------------------------------
// Job types, levels and statuses
// ---------------------------------------------------------------------------

/// Case-insensitive job level lookup.
pub fn get_level_from_name(name: &str) -> Option<JobLevel> {
    JobLevel::ALL
        .into_iter()
        .find(|level| level.name().eq_ignore_ascii_case(name))
}

/// Job type from `jobtype=` or a menu of all job types.
pub fn get_user_job_type_selection(console: &mut Console<'_>) -> Result<JobType, SelectError> {
    let args = console.args;
    let name = match args.find_arg_with_value("jobtype").and_then(|i| args.value(i)) {
        Some(value) => value.to_owned(),
        None => {
            let mut prompts = PromptSession::start("Jobtype to prune:");
            for job_type in JobType::ALL {
                prompts.add(job_type.name());
            }
            choose(console, prompts, "JobType", "Select Job Type")?.label
        },
    };

    JobType::from_name(&name).ok_or_else(|| {
        console.warning(&format!("Illegal jobtype {name}."));
        SelectError::InvalidInput(name)
    })
}

/// Job status filter from `jobstatus=`: a one-letter code or a status name.
pub fn get_user_job_status_selection(
    console: &mut Console<'_>,
) -> Result<Option<char>, SelectError> {
    let args = console.args;
    let Some(value) = args.find_arg_with_value("jobstatus").and_then(|i| args.value(i)) else {
        return Ok(None);
    };

    let status = single_letter(value).or_else(|| {
        let status = match value.to_ascii_lowercase().as_str() {
            "terminated" => JobStatus::Terminated,
            "warnings" => JobStatus::Warnings,
            "canceled" => JobStatus::Canceled,
            "running" => JobStatus::Running,
            "error" => JobStatus::ErrorTerminated,
            "fatal" => JobStatus::FatalError,
            _ => return None,
        };
        Some(status.code())
    });

    match status {
        Some(code) => Ok(Some(code)),
        None => {
            console.warning(&format!("Illegal jobstatus {value}."));
            Err(SelectError::InvalidInput(value.to_owned()))
        },
    }
}

/// Job level filter from `joblevel=`, a one-letter code.
pub fn get_user_job_level_selection(
    console: &mut Console<'_>,
) -> Result<Option<char>, SelectError> {
    let args = console.args;
    let Some(value) = args.find_arg_with_value("joblevel").and_then(|i| args.value(i)) else {
        return Ok(None);
    };
    match single_letter(value) {
        Some(code) => Ok(Some(code)),
        None => {
            console.warning(&format!("Illegal joblevel {value}."));
            Err(SelectError::InvalidInput(value.to_owned()))
        },
    }
}

fn single_letter(value: &str) -> Option<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Catalog records
// ---------------------------------------------------------------------------

fn client_records<'q>() -> RecordSelector<'q> {
    RecordSelector::new(RecordKind::Client, "client").alias("fd")
}

/// Client row: `preset` if visible, else `client=`/`fd=`, else a menu.
pub fn get_client_dbr(
    console: &mut Console<'_>,
    preset: Option<&str>,
) -> Result<Record, SelectError> {
    client_records().get(console, preset)
}

pub fn select_client_dbr(console: &mut Console<'_>) -> Result<Record, SelectError> {
    client_records().select(console)
}

/// Pool row named by `keyword=` (`pool`, `recyclepool`, `nextpool`, ...).
///
/// For `recyclepool` the menu also offers `*None*`, returned as
/// [`Record::none`].
pub fn get_pool_dbr(
    console: &mut Console<'_>,
    preset: Option<&str>,
    keyword: &str,
) -> Result<Record, SelectError> {
    RecordSelector::new(RecordKind::Pool, keyword).get(console, preset)
}

pub fn select_pool_dbr(console: &mut Console<'_>, keyword: &str) -> Result<Record, SelectError> {
    RecordSelector::new(RecordKind::Pool, keyword).select(console)
}

/// Storage row named by `keyword=`; `recyclestorage` also offers `*None*`.
pub fn get_storage_dbr(
    console: &mut Console<'_>,
    preset: Option<&str>,
    keyword: &str,
) -> Result<Record, SelectError> {
    RecordSelector::new(RecordKind::Storage, keyword).get(console, preset)
}

pub fn select_storage_dbr(
    console: &mut Console<'_>,
    keyword: &str,
) -> Result<Record, SelectError> {
    RecordSelector::new(RecordKind::Storage, keyword).select(console)
}

/// Volume from `volume=`, or from a pool's volume listing.
///
/// At the prompt, `*N` selects by media id and anything else is a volume name.
pub fn select_media_dbr(console: &mut Console<'_>) -> Result<Record, SelectError> {
    let args = console.args;
    let volume = args.find_arg_with_value("volume").and_then(|i| args.value(i));

    let (lookup_id, lookup_name) = match volume {
        Some(name) => (None, Some(checked_volume_name(console, name)?)),
        None => {
            let pool = get_pool_dbr(console, None, "pool")?;
            let media = console.catalog.list_media(Some(pool.id)).map_err(|err| {
                console.error(&err.to_string());
                SelectError::from(err)
            })?;
            send_table(
                console,
                &["MediaId", "VolumeName"],
                media.iter().map(|m| vec![m.id.to_string(), m.name.clone()]),
            );

            let input = console.read_answer("Enter *MediaId or Volume name: ")?;
            let input = input.trim();
            match input.strip_prefix('*').and_then(|id| id.parse::<DbId>().ok()) {
                Some(id) => (Some(id), None),
                None => (None, Some(checked_volume_name(console, input)?)),
            }
        },
    };

    let found = match (lookup_id, lookup_name.as_deref()) {
        (Some(id), _) => console.catalog.lookup_by_id(RecordKind::Media, id),
        (None, Some(name)) => console.catalog.lookup_by_name(RecordKind::Media, name),
        (None, None) => Ok(None),
    };
    let subject = lookup_name.unwrap_or_else(|| format!("*{}", lookup_id.unwrap_or_default()));
    match found {
        Ok(Some(record)) => Ok(record),
        Ok(None) => {
            console.error(&format!("Media record for Volume \"{subject}\" not found."));
            Err(SelectError::NotFound(subject))
        },
        Err(err) => {
            console.error(&err.to_string());
            Err(err.into())
        },
    }
}

fn checked_volume_name(console: &mut Console<'_>, name: &str) -> Result<String, SelectError> {
    validate_name(name).map_err(|err| {
        console.error(&err.to_string());
        SelectError::InvalidInput(name.to_owned())
    })?;
    Ok(name.to_owned())
}

/// A volume and the pool it belongs to. The console must have access to the pool.
pub fn select_pool_and_media_dbr(
    console: &mut Console<'_>,
) -> Result<(Record, Record), SelectError> {
    let media = select_media_dbr(console)?;
    let pool_id = media.pool_id.unwrap_or_default();

    let pool = match console.catalog.lookup_by_id(RecordKind::Pool, pool_id) {
        Ok(Some(pool)) => pool,
        Ok(None) => {
            console.error(&format!("Pool record for PoolId {pool_id} not found."));
            return Err(SelectError::NotFound(pool_id.to_string()));
        },
        Err(err) => {
            console.error(&err.to_string());
            return Err(err.into());
        },
    };

    if !console.acl_ok(AclType::Pool, &pool.name) {
        console.error(&format!("No access to Pool \"{}\"", pool.name));
        return Err(SelectError::Unauthorized(pool.name));
    }
    Ok((pool, media))
}

/// List finished jobs (optionally of one job resource) and ask for a JobId.
pub fn select_job_dbr(
    console: &mut Console<'_>,
    job_name: Option<&str>,
) -> Result<Record, SelectError> {
    let jobs = console.catalog.list_jobs(job_name).map_err(|err| {
        console.error(&err.to_string());
        SelectError::from(err)
    })?;
    let visible: Vec<Record> = jobs
        .into_iter()
        .filter(|job| console.acl_ok(AclType::Job, &job.name))
        .collect();
    send_table(
        console,
        &["JobId", "Name", "Level", "JobStatus"],
        visible.iter().map(|job| {
            vec![
                job.id.to_string(),
                job.name.clone(),
                job.level.map(String::from).unwrap_or_default(),
                job.status.map(String::from).unwrap_or_default(),
            ]
        }),
    );

    let Some(id) = get_pint(console, "Enter the JobId to select: ") else {
        return Err(console.aborted());
    };
    lookup_job(console, id)
}

/// Job row from `ujobid=` or `jobid=`, else the job listing of
/// `job=`/`jobname=` (or all jobs) with a JobId prompt.
pub fn get_job_dbr(console: &mut Console<'_>) -> Result<Record, SelectError> {
    let args = console.args;

    for (_, arg) in args.iter() {
        let Some(value) = arg.value.as_deref() else {
            continue;
        };
        let found = if arg.keyword.eq_ignore_ascii_case("ujobid") {
            console.catalog.lookup_by_name(RecordKind::Job, value)
        } else if arg.keyword.eq_ignore_ascii_case("jobid") {
            match value.parse::<DbId>() {
                Ok(id) => console.catalog.lookup_by_id(RecordKind::Job, id),
                Err(_) => Ok(None),
            }
        } else {
            continue;
        };

        match found {
            Ok(Some(job)) if console.acl_ok(AclType::Job, &job.name) => return Ok(job),
            Ok(Some(_) | None) => console.error(&format!("Could not find Job \"{value}\"")),
            Err(err) => console.error(&format!("Could not find Job \"{value}\": ERR={err}")),
        }
        break;
    }

    let job_name = args
        .find_any_with_value(&["jobname", "job"])
        .and_then(|i| args.value(i));
    select_job_dbr(console, job_name)
}

fn lookup_job(console: &mut Console<'_>, id: u64) -> Result<Record, SelectError> {
    match console.catalog.lookup_by_id(RecordKind::Job, id) {
        Ok(Some(job)) if console.acl_ok(AclType::Job, &job.name) => Ok(job),
        Ok(Some(job)) => {
            console.error(&format!("No access to Job \"{}\"", job.name));
            Err(SelectError::Unauthorized(job.name))
        },
        Ok(None) => {
            console.error(&format!("Job record for JobId {id} not found."));
            Err(SelectError::NotFound(id.to_string()))
        },
        Err(err) => {
            console.error(&err.to_string());
            Err(err.into())
        },
    }
}

/// Send rows as a `|`-separated table with right-aligned columns.
fn send_table(
    console: &mut Console<'_>,
    headers: &[&str],
    rows: impl Iterator<Item = Vec<String>>,
) {
    let rows: Vec<Vec<String>> = rows.collect();
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            rows.iter()
                .filter_map(|row| row.get(col).map(String::len))
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let render = |cells: &mut dyn Iterator<Item = &str>| {
        cells
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:>width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    console.send(&render(&mut headers.iter().copied()));
    for row in &rows {
        console.send(&render(&mut row.iter().map(String::as_str)));
    }
}
