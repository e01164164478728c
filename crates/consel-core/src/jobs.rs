//! # Job Multi-Selection
//!
//! Bulk commands such as `cancel` and `stop` act on a set of live jobs. The
//! set is built in one of three ways, tried in order:
//!
//! 1. **Explicit**: every `jobid=`, `job=` and `ujobid=` argument. Jobs that
//!    are not running are reported and skipped, but a job the console may not
//!    see aborts the whole selection.
//! 2. **Bulk**: `all` or `state=created|blocked|waiting|running` selects every
//!    visible matching job, confirmed once unless in batch mode or `yes`.
//! 3. **Interactive**: a menu of visible jobs.
//!
//! The registry is only read through snapshots. A job that ends while the
//! user is choosing is reported as not found.

use tracing::debug;

use crate::confirm::get_yesno;
use crate::console::Console;
use crate::error::SelectError;
use crate::prompt::{PromptSession, choose};
use crate::types::{AclType, JobId, JobStatus, LiveJob};

/// Reasons for which picking the only running job still needs a confirmation.
pub const DESTRUCTIVE_REASONS: &[&str] = &["cancel", "stop"];

/// Selected job ids, unique, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSelection {
    ids: Vec<JobId>,
}

impl JobSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` unless already selected. Returns true when it was added.
    pub fn insert(&mut self, id: JobId) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn contains(&self, id: JobId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[JobId] {
        &self.ids
    }
}

impl IntoIterator for JobSelection {
    type Item = JobId;
    type IntoIter = std::vec::IntoIter<JobId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}

/// Execution state filter for `state=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStateClass {
    Created,
    Blocked,
    Waiting,
    Running,
}

impl JobStateClass {
    /// Case-insensitive parse of `created`, `blocked`, `waiting` or `running`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "created" => Some(Self::Created),
            "blocked" => Some(Self::Blocked),
            "waiting" => Some(Self::Waiting),
            "running" => Some(Self::Running),
            _ => None,
        }
    }

    pub fn matches(self, job: &LiveJob) -> bool {
        match self {
            Self::Created => job.status == JobStatus::Created,
            Self::Blocked => job.started && job.status == JobStatus::Blocked,
            Self::Waiting => job.status.is_waiting(),
            Self::Running => job.started && job.status == JobStatus::Running,
        }
    }
}

/// Build the set of live jobs a bulk command acts on.
///
/// `reason` is the command verb ("cancel", "stop", ...) used in messages.
/// On failure nothing is selected and the reason was already reported.
pub fn select_jobs(console: &mut Console<'_>, reason: &str) -> Result<JobSelection, SelectError> {
    let selection = select_explicit(console, reason)?;
    if !selection.is_empty() {
        debug!(ids = ?selection.ids(), "jobs selected from command line");
        return Ok(selection);
    }

    let snapshot = console.jobs.snapshot();
    // Job id 0 is the console's own pseudo job.
    let others: Vec<LiveJob> = snapshot.into_iter().filter(|job| job.id != 0).collect();
    let total = others.len();
    let visible: Vec<LiveJob> = others
        .into_iter()
        .filter(|job| job_visible(console, job))
        .collect();

    if visible.is_empty() {
        console.send(if total == 0 {
            "No Jobs running."
        } else {
            "None of your jobs are running."
        });
        return Err(SelectError::EmptyCandidateSet("Job".to_owned()));
    }

    let args = console.args;
    let select_all = args.find_arg("all").is_some();
    let state = args.find_arg_with_value("state").and_then(|i| args.value(i));
    if select_all || state.is_some() {
        select_bulk(console, reason, &visible, select_all, state)
    } else {
        select_interactive(console, reason, &visible)
    }
}

fn job_visible(console: &Console<'_>, job: &LiveJob) -> bool {
    job.job
        .as_deref()
        .is_none_or(|name| console.acl_ok(AclType::Job, name))
}

fn select_explicit(console: &mut Console<'_>, reason: &str) -> Result<JobSelection, SelectError> {
    let args = console.args;
    let mut selection = JobSelection::new();

    for (_, arg) in args.iter() {
        let keyword = arg.keyword.to_ascii_lowercase();
        let value = arg.value.as_deref();

        let job = match (keyword.as_str(), value) {
            ("jobid", Some(value)) => {
                let Some(id) = value.parse::<JobId>().ok().filter(|&id| id != 0) else {
                    continue;
                };
                let job = console.jobs.by_id(id);
                if job.is_none() {
                    console.error(&format!(
                        "JobId {value} is not running. Use Job name to {reason} inactive jobs."
                    ));
                }
                job
            },
            ("job" | "ujobid", Some(value)) => {
                let job = if keyword == "job" {
                    console.jobs.by_partial_name(value)
                } else {
                    console.jobs.by_full_name(value)
                };
                if job.is_none() {
                    console.warning(&format!(
                        "Warning Job {value} is not running. Continuing anyway ..."
                    ));
                }
                job
            },
            _ => None,
        };

        let Some(job) = job else {
            continue;
        };
        if !job_visible(console, &job) {
            console.error("Unauthorized command from this console.");
            return Err(SelectError::Unauthorized(job.unique_name));
        }
        selection.insert(job.id);
    }

    Ok(selection)
}

fn select_bulk(
    console: &mut Console<'_>,
    reason: &str,
    visible: &[LiveJob],
    select_all: bool,
    state: Option<&str>,
) -> Result<JobSelection, SelectError> {
    let class = match state {
        Some(state) if !select_all => match JobStateClass::parse(state) {
            Some(class) => Some(class),
            None => {
                console.error("Illegal state either created, blocked, waiting or running");
                return Err(SelectError::InvalidInput(state.to_owned()));
            },
        },
        _ => None,
    };

    let mut selection = JobSelection::new();
    for job in visible {
        if class.is_none_or(|class| class.matches(job)) && selection.insert(job.id) {
            console.send(&format!("Selected Job {} for {reason}", job.id));
        }
    }

    if selection.is_empty() {
        console.send("No Jobs selected.");
        return Err(SelectError::EmptyCandidateSet("Job".to_owned()));
    }

    if !console.mode.batch && !console.args.has_yes() {
        let prompt = format!("Confirm {reason} (yes/no): ");
        if get_yesno(console, &prompt) != Some(true) {
            return Err(console.aborted());
        }
    }

    Ok(selection)
}

fn select_interactive(
    console: &mut Console<'_>,
    reason: &str,
    visible: &[LiveJob],
) -> Result<JobSelection, SelectError> {
    let mut prompts = PromptSession::start("Select Job:");
    for job in visible {
        prompts.add(job_label(job));
    }
    let choice = choose(console, prompts, "Job", &format!("Choose Job to {reason}"))?;

    if DESTRUCTIVE_REASONS.contains(&reason) && visible.len() == 1 {
        let prompt = if console.mode.api {
            format!("{}: {}\n\nConfirm {reason}?", capitalize(reason), choice.label)
        } else {
            format!("Confirm {reason} (yes/no): ")
        };
        if get_yesno(console, &prompt) != Some(true) {
            return Err(console.aborted());
        }
    }

    let unique_name = parse_job_label(&choice.label).unwrap_or_default();
    let Some(job) = console.jobs.by_full_name(unique_name) else {
        console.warning(&format!("Job \"{unique_name}\" not found."));
        return Err(SelectError::NotFound(unique_name.to_owned()));
    };

    let mut selection = JobSelection::new();
    selection.insert(job.id);
    Ok(selection)
}

fn job_label(job: &LiveJob) -> String {
    format!("JobId={} Job={}", job.id, job.unique_name)
}

/// Unique job name back out of a menu label.
fn parse_job_label(label: &str) -> Option<&str> {
    label
        .strip_prefix("JobId=")?
        .split_once(" Job=")
        .map(|(_, name)| name)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
