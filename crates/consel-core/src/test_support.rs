//! Shared fixtures for the inline test modules.

#![allow(clippy::unwrap_used, dead_code)]

use std::collections::VecDeque;

use crate::args::ArgumentVector;
use crate::collab::{AccessControl, Catalog, Session, Signal};
use crate::console::{Console, ConsoleMode};
use crate::error::CatalogError;
use crate::memory::{MemoryCatalog, MemoryJobRegistry};
use crate::types::{
    AclType, CatalogResource, ClientResource, DbId, FileSetResource, JobId, JobResource,
    JobStatus, JobType, LiveJob, PoolResource, Record, RecordKind, Resources, ScheduleResource,
    StorageResource,
};

/// One thing the session saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Info(String),
    Warning(String),
    Error(String),
    Signal(Signal),
    Prompt(String),
}

/// Session serving canned input and recording everything else.
#[derive(Debug, Default)]
pub struct ScriptedSession {
    input: VecDeque<String>,
    pub transcript: Vec<Line>,
    pub reads: usize,
}

impl ScriptedSession {
    pub fn with_input(lines: &[&str]) -> Self {
        Self {
            input: lines.iter().map(|l| (*l).to_owned()).collect(),
            ..Self::default()
        }
    }

    /// Informational, warning and error text, one message per line.
    pub fn output(&self) -> String {
        self.transcript
            .iter()
            .filter_map(|line| match line {
                Line::Info(m) | Line::Warning(m) | Line::Error(m) => Some(m.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn errors(&self) -> Vec<&str> {
        self.transcript
            .iter()
            .filter_map(|line| match line {
                Line::Error(m) => Some(m.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.transcript
            .iter()
            .filter_map(|line| match line {
                Line::Warning(m) => Some(m.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn prompts(&self) -> Vec<&str> {
        self.transcript
            .iter()
            .filter_map(|line| match line {
                Line::Prompt(p) => Some(p.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn signals(&self) -> Vec<Signal> {
        self.transcript
            .iter()
            .filter_map(|line| match line {
                Line::Signal(s) => Some(*s),
                _ => None,
            })
            .collect()
    }
}

impl Session for ScriptedSession {
    fn send(&mut self, msg: &str) {
        self.transcript.push(Line::Info(msg.to_owned()));
    }

    fn warning(&mut self, msg: &str) {
        self.transcript.push(Line::Warning(msg.to_owned()));
    }

    fn error(&mut self, msg: &str) {
        self.transcript.push(Line::Error(msg.to_owned()));
    }

    fn signal(&mut self, signal: Signal) {
        self.transcript.push(Line::Signal(signal));
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.transcript.push(Line::Prompt(prompt.to_owned()));
        self.reads += 1;
        self.input.pop_front()
    }
}

/// Access control that denies an explicit list of names.
#[derive(Debug, Default)]
pub struct DenyList(pub Vec<(AclType, String)>);

impl AccessControl for DenyList {
    fn access_ok(&self, acl: AclType, name: &str) -> bool {
        !self.0.iter().any(|(a, n)| *a == acl && n == name)
    }
}

pub fn job_resource(name: &str, job_type: JobType, enabled: bool) -> JobResource {
    JobResource {
        name: name.to_owned(),
        job_type,
        enabled,
        storage: None,
    }
}

/// A small director: two plain storages, two changers, pools, clients and jobs.
pub fn resources() -> Resources {
    Resources {
        storages: vec![
            StorageResource::new("File1", "File"),
            StorageResource::new("File2", "File"),
            StorageResource::new("Tape", "LTO-8").with_changer(2, 10),
            StorageResource::new("Loader", "LTO-8").with_changer(1, 24),
        ],
        pools: vec![
            PoolResource { name: "Full".into() },
            PoolResource { name: "Incremental".into() },
        ],
        clients: vec![
            ClientResource { name: "alpha-fd".into(), enabled: true },
            ClientResource { name: "beta-fd".into(), enabled: false },
        ],
        jobs: vec![
            job_resource("Nightly", JobType::Backup, true),
            job_resource("Weekly", JobType::Backup, false),
            job_resource("RestoreFiles", JobType::Restore, true),
        ],
        schedules: vec![
            ScheduleResource { name: "WeeklyCycle".into(), enabled: true },
            ScheduleResource { name: "MonthlyCycle".into(), enabled: false },
        ],
        filesets: vec![FileSetResource { name: "LinuxAll".into() }],
        catalogs: vec![CatalogResource { name: "MyCatalog".into() }],
    }
}

pub fn media(id: DbId, name: &str, pool_id: DbId) -> Record {
    let mut record = Record::new(RecordKind::Media, id, name);
    record.pool_id = Some(pool_id);
    record
}

pub fn job_record(id: DbId, name: &str, unique_name: &str) -> Record {
    let mut record = Record::new(RecordKind::Job, id, name);
    record.unique_name = Some(unique_name.to_owned());
    record.status = Some('T');
    record.level = Some('F');
    record
}

pub fn catalog() -> MemoryCatalog {
    MemoryCatalog::new([
        Record::new(RecordKind::Client, 1, "alpha-fd"),
        Record::new(RecordKind::Client, 2, "beta-fd"),
        Record::new(RecordKind::Pool, 1, "Full"),
        Record::new(RecordKind::Pool, 2, "Incremental"),
        Record::new(RecordKind::Storage, 1, "File1"),
        Record::new(RecordKind::Storage, 2, "Tape"),
        media(1, "Full-0001", 1),
        media(2, "Full-0002", 1),
        media(3, "Incr-0001", 2),
        job_record(10, "Nightly", "Nightly.2024-05-01_23.05.00_07"),
        job_record(11, "Weekly", "Weekly.2024-05-04_21.00.00_11"),
    ])
}

/// Catalog whose name lookups ignore case, as with a case-insensitive collation.
pub struct CaseFolding(pub MemoryCatalog);

impl Catalog for CaseFolding {
    fn list_ids(&self, kind: RecordKind) -> Result<Vec<DbId>, CatalogError> {
        self.0.list_ids(kind)
    }

    fn lookup_by_id(&self, kind: RecordKind, id: DbId) -> Result<Option<Record>, CatalogError> {
        self.0.lookup_by_id(kind, id)
    }

    fn lookup_by_name(&self, kind: RecordKind, name: &str) -> Result<Option<Record>, CatalogError> {
        for id in self.0.list_ids(kind)? {
            if let Some(record) = self.0.lookup_by_id(kind, id)? {
                if record.name.eq_ignore_ascii_case(name) {
                    return Ok(Some(record));
                }
            }
        }
        Ok(None)
    }

    fn list_media(&self, pool_id: Option<DbId>) -> Result<Vec<Record>, CatalogError> {
        self.0.list_media(pool_id)
    }

    fn list_jobs(&self, job_name: Option<&str>) -> Result<Vec<Record>, CatalogError> {
        self.0.list_jobs(job_name)
    }
}

pub fn live_job(id: JobId, job: &str, status: JobStatus, started: bool) -> LiveJob {
    LiveJob {
        id,
        unique_name: format!("{job}.2024-05-01_23.05.00_{id:02}"),
        job: Some(job.to_owned()),
        status,
        started,
        write_storage: Some("Tape".to_owned()),
    }
}

pub fn registry() -> MemoryJobRegistry {
    MemoryJobRegistry::new([
        live_job(3, "Nightly", JobStatus::Running, true),
        live_job(4, "Weekly", JobStatus::WaitMedia, true),
        live_job(5, "Nightly", JobStatus::Created, false),
    ])
}

/// Owned collaborators for one console command.
pub struct Harness {
    pub args: ArgumentVector,
    pub session: ScriptedSession,
    pub acl: DenyList,
    pub catalog: MemoryCatalog,
    pub jobs: MemoryJobRegistry,
    pub resources: Resources,
    pub mode: ConsoleMode,
}

impl Harness {
    /// Fixture director with `line` as the command line and no input.
    pub fn new(line: &str) -> Self {
        Self {
            args: ArgumentVector::parse(line).unwrap(),
            session: ScriptedSession::default(),
            acl: DenyList::default(),
            catalog: catalog(),
            jobs: registry(),
            resources: resources(),
            mode: ConsoleMode::interactive(),
        }
    }

    pub fn input(mut self, lines: &[&str]) -> Self {
        self.session = ScriptedSession::with_input(lines);
        self
    }

    pub fn deny(mut self, acl: AclType, name: &str) -> Self {
        self.acl.0.push((acl, name.to_owned()));
        self
    }

    pub fn mode(mut self, mode: ConsoleMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn jobs(mut self, jobs: MemoryJobRegistry) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn catalog(mut self, catalog: MemoryCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn console(&mut self) -> Console<'_> {
        Console::new(
            &self.args,
            &mut self.session,
            &self.acl,
            &self.catalog,
            &self.jobs,
            &self.resources,
        )
        .with_mode(self.mode)
    }
}
