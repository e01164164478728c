use serde::{Deserialize, Serialize};

/// Identifier of a live or historical job.
pub type JobId = u32;
/// Catalog row identifier.
pub type DbId = u64;
/// Drive index inside an autochanger, starting at 0.
pub type DriveNumber = u16;
/// Physical slot number inside an autochanger, starting at 1.
pub type SlotNumber = u32;

/// Name shown (and accepted) for a "no record" choice, e.g. no recycle pool.
pub const NONE_SENTINEL: &str = "*None*";

/// Resource class an access control list applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AclType {
    /// Job resources and the live jobs they define.
    Job,
    /// Clients (file daemons).
    Client,
    /// Storages (storage daemons and autochangers).
    Storage,
    /// Schedules.
    Schedule,
    /// Pools.
    Pool,
    /// Catalogs.
    Catalog,
    /// File sets.
    #[serde(rename = "fileset")]
    FileSet,
}

impl AclType {
    /// Lowercase identifier, as used in configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Job => "job",
            Self::Client => "client",
            Self::Storage => "storage",
            Self::Schedule => "schedule",
            Self::Pool => "pool",
            Self::Catalog => "catalog",
            Self::FileSet => "fileset",
        }
    }
}

/// Anything selectable by name from a menu.
pub trait Named {
    /// The resource name.
    fn name(&self) -> &str;
}

const fn enabled_by_default() -> bool {
    true
}

const fn one_drive() -> DriveNumber {
    1
}

fn file_media_type() -> String {
    "File".to_owned()
}

/// A configured storage daemon device or autochanger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageResource {
    pub name: String,
    #[serde(default = "file_media_type")]
    pub media_type: String,
    #[serde(default)]
    pub autochanger: bool,
    #[serde(default = "one_drive")]
    pub drives: DriveNumber,
    /// Number of slots in the changer magazine; 0 for plain devices.
    #[serde(default)]
    pub slots: SlotNumber,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl StorageResource {
    /// A single-drive, non-changer storage.
    pub fn new(name: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            autochanger: false,
            drives: 1,
            slots: 0,
            enabled: true,
        }
    }

    /// Turn this storage into an autochanger with `drives` drives and `slots` slots.
    #[must_use]
    pub const fn with_changer(mut self, drives: DriveNumber, slots: SlotNumber) -> Self {
        self.autochanger = true;
        self.drives = drives;
        self.slots = slots;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolResource {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientResource {
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResource {
    pub name: String,
    #[serde(default, rename = "type")]
    pub job_type: JobType,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub storage: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResource {
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSetResource {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogResource {
    pub name: String,
}

macro_rules! impl_named {
    ($($ty:ty),+ $(,)?) => {
        $(impl Named for $ty {
            fn name(&self) -> &str {
                &self.name
            }
        })+
    };
}

impl_named!(
    StorageResource,
    PoolResource,
    ClientResource,
    JobResource,
    ScheduleResource,
    FileSetResource,
    CatalogResource,
);

/// In-memory configuration registry of the director.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    #[serde(rename = "storage")]
    pub storages: Vec<StorageResource>,
    #[serde(rename = "pool")]
    pub pools: Vec<PoolResource>,
    #[serde(rename = "client")]
    pub clients: Vec<ClientResource>,
    #[serde(rename = "job")]
    pub jobs: Vec<JobResource>,
    #[serde(rename = "schedule")]
    pub schedules: Vec<ScheduleResource>,
    #[serde(rename = "fileset")]
    pub filesets: Vec<FileSetResource>,
    #[serde(rename = "catalog")]
    pub catalogs: Vec<CatalogResource>,
}

fn by_name<'r, T: Named>(items: &'r [T], name: &str) -> Option<&'r T> {
    items.iter().find(|item| item.name() == name)
}

impl Resources {
    pub fn storage(&self, name: &str) -> Option<&StorageResource> {
        by_name(&self.storages, name)
    }

    pub fn pool(&self, name: &str) -> Option<&PoolResource> {
        by_name(&self.pools, name)
    }

    pub fn client(&self, name: &str) -> Option<&ClientResource> {
        by_name(&self.clients, name)
    }

    pub fn job(&self, name: &str) -> Option<&JobResource> {
        by_name(&self.jobs, name)
    }

    pub fn schedule(&self, name: &str) -> Option<&ScheduleResource> {
        by_name(&self.schedules, name)
    }

    /// Set the enabled flag of a job, client or schedule. Returns false when
    /// no such resource exists or the kind has no enabled flag.
    pub fn set_enabled(&mut self, kind: AclType, name: &str, enabled: bool) -> bool {
        let flag = match kind {
            AclType::Job => self.jobs.iter_mut().find(|j| j.name == name).map(|j| &mut j.enabled),
            AclType::Client => self
                .clients
                .iter_mut()
                .find(|c| c.name == name)
                .map(|c| &mut c.enabled),
            AclType::Schedule => self
                .schedules
                .iter_mut()
                .find(|s| s.name == name)
                .map(|s| &mut s.enabled),
            _ => None,
        };
        flag.map(|f| *f = enabled).is_some()
    }
}

/// Kind of job a job resource defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    #[default]
    Backup,
    Admin,
    Archive,
    Verify,
    Restore,
    Migrate,
    Copy,
    Consolidate,
}

impl JobType {
    /// All job types in menu order.
    pub const ALL: [Self; 8] = [
        Self::Backup,
        Self::Admin,
        Self::Archive,
        Self::Verify,
        Self::Restore,
        Self::Migrate,
        Self::Copy,
        Self::Consolidate,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Backup => "Backup",
            Self::Admin => "Admin",
            Self::Archive => "Archive",
            Self::Verify => "Verify",
            Self::Restore => "Restore",
            Self::Migrate => "Migrate",
            Self::Copy => "Copy",
            Self::Consolidate => "Consolidate",
        }
    }

    /// Catalog code of the job type.
    pub const fn code(self) -> char {
        match self {
            Self::Backup => 'B',
            Self::Admin => 'D',
            Self::Archive => 'A',
            Self::Verify => 'V',
            Self::Restore => 'R',
            Self::Migrate => 'g',
            Self::Copy => 'c',
            Self::Consolidate => 'O',
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }
}

/// Backup or verify level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobLevel {
    Full,
    Base,
    Incremental,
    Differential,
    Since,
    VirtualFull,
    VerifyCatalog,
    VerifyInit,
    VerifyVolumeToCatalog,
    VerifyDiskToCatalog,
    VerifyData,
}

impl JobLevel {
    pub const ALL: [Self; 11] = [
        Self::Full,
        Self::Base,
        Self::Incremental,
        Self::Differential,
        Self::Since,
        Self::VirtualFull,
        Self::VerifyCatalog,
        Self::VerifyInit,
        Self::VerifyVolumeToCatalog,
        Self::VerifyDiskToCatalog,
        Self::VerifyData,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Full => "Full",
            Self::Base => "Base",
            Self::Incremental => "Incremental",
            Self::Differential => "Differential",
            Self::Since => "Since",
            Self::VirtualFull => "VirtualFull",
            Self::VerifyCatalog => "Catalog",
            Self::VerifyInit => "InitCatalog",
            Self::VerifyVolumeToCatalog => "VolumeToCatalog",
            Self::VerifyDiskToCatalog => "DiskToCatalog",
            Self::VerifyData => "Data",
        }
    }

    pub const fn code(self) -> char {
        match self {
            Self::Full => 'F',
            Self::Base => 'B',
            Self::Incremental => 'I',
            Self::Differential => 'D',
            Self::Since => 'S',
            Self::VirtualFull => 'f',
            Self::VerifyCatalog => 'C',
            Self::VerifyInit => 'V',
            Self::VerifyVolumeToCatalog => 'O',
            Self::VerifyDiskToCatalog => 'd',
            Self::VerifyData => 'A',
        }
    }
}

/// Execution state of a live job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Created,
    Running,
    Blocked,
    Terminated,
    Warnings,
    ErrorTerminated,
    FatalError,
    Canceled,
    WaitFd,
    WaitSd,
    WaitMedia,
    WaitMount,
    WaitStoreRes,
    WaitJobRes,
    WaitClientRes,
    WaitMaxJobs,
    WaitStartTime,
    WaitPriority,
}

impl JobStatus {
    /// One-letter status code as stored in the catalog.
    pub const fn code(self) -> char {
        match self {
            Self::Created => 'C',
            Self::Running => 'R',
            Self::Blocked => 'B',
            Self::Terminated => 'T',
            Self::Warnings => 'W',
            Self::ErrorTerminated => 'E',
            Self::FatalError => 'f',
            Self::Canceled => 'A',
            Self::WaitFd => 'F',
            Self::WaitSd => 'S',
            Self::WaitMedia => 'm',
            Self::WaitMount => 'M',
            Self::WaitStoreRes => 's',
            Self::WaitJobRes => 'j',
            Self::WaitClientRes => 'c',
            Self::WaitMaxJobs => 'd',
            Self::WaitStartTime => 't',
            Self::WaitPriority => 'p',
        }
    }

    /// True while the job waits on a daemon, a resource, media or its start time.
    pub const fn is_waiting(self) -> bool {
        matches!(
            self,
            Self::WaitFd
                | Self::WaitSd
                | Self::WaitMedia
                | Self::WaitMount
                | Self::WaitStoreRes
                | Self::WaitJobRes
                | Self::WaitClientRes
                | Self::WaitMaxJobs
                | Self::WaitStartTime
                | Self::WaitPriority
        )
    }
}

/// Snapshot of a job instance in the live process registry.
///
/// Values are owned copies; holding one does not keep the job alive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveJob {
    pub id: JobId,
    /// Unique job name, e.g. `Nightly.2024-05-01_23.05.00_07`.
    pub unique_name: String,
    /// Name of the job resource that defines this job.
    #[serde(default)]
    pub job: Option<String>,
    pub status: JobStatus,
    /// Whether execution has begun (as opposed to queued).
    #[serde(default)]
    pub started: bool,
    /// Storage the job writes to.
    #[serde(default)]
    pub write_storage: Option<String>,
}

/// Catalog table a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Client,
    Pool,
    Storage,
    Media,
    Job,
}

impl RecordKind {
    /// Human readable kind, used in menus and messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Client => "Client",
            Self::Pool => "Pool",
            Self::Storage => "Storage",
            Self::Media => "Media",
            Self::Job => "Job",
        }
    }

    /// Access control list that guards records of this kind.
    pub const fn acl(self) -> AclType {
        match self {
            Self::Client => AclType::Client,
            Self::Pool | Self::Media => AclType::Pool,
            Self::Storage => AclType::Storage,
            Self::Job => AclType::Job,
        }
    }
}

/// A catalog row.
///
/// Only the columns the selection dialogs need are modelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub kind: RecordKind,
    pub id: DbId,
    /// Client, pool, storage or volume name; the job resource name for jobs.
    pub name: String,
    /// Owning pool of a media record.
    #[serde(default)]
    pub pool_id: Option<DbId>,
    /// Unique job name of a job record.
    #[serde(default)]
    pub unique_name: Option<String>,
    /// Job status code of a job record.
    #[serde(default)]
    pub status: Option<char>,
    /// Job level code of a job record.
    #[serde(default)]
    pub level: Option<char>,
}

impl Record {
    pub fn new(kind: RecordKind, id: DbId, name: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            name: name.into(),
            pool_id: None,
            unique_name: None,
            status: None,
            level: None,
        }
    }

    /// The "no record" choice: only the name is populated.
    pub fn none(kind: RecordKind) -> Self {
        Self::new(kind, 0, NONE_SENTINEL)
    }

    pub fn is_none_sentinel(&self) -> bool {
        self.id == 0 && self.name == NONE_SENTINEL
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_job_type_lookup_ignores_case() {
        assert_eq!(JobType::from_name("restore"), Some(JobType::Restore));
        assert_eq!(JobType::from_name("CONSOLIDATE"), Some(JobType::Consolidate));
        assert_eq!(JobType::from_name("backups"), None);
    }

    #[test]
    fn test_waiting_statuses() {
        assert!(JobStatus::WaitMedia.is_waiting());
        assert!(JobStatus::WaitStartTime.is_waiting());
        assert!(!JobStatus::Running.is_waiting());
        assert!(!JobStatus::Blocked.is_waiting());
    }

    #[test]
    fn test_set_enabled_only_touches_toggleable_kinds() {
        let mut resources = Resources::default();
        resources.jobs.push(JobResource {
            name: "Nightly".into(),
            job_type: JobType::Backup,
            enabled: true,
            storage: None,
        });
        resources.pools.push(PoolResource { name: "Full".into() });

        assert!(resources.set_enabled(AclType::Job, "Nightly", false));
        assert!(!resources.job("Nightly").unwrap().enabled);
        assert!(!resources.set_enabled(AclType::Pool, "Full", false));
        assert!(!resources.set_enabled(AclType::Job, "Missing", false));
    }

    #[test]
    fn test_resources_deserialize_from_tables() {
        let resources: Resources = toml::from_str(
            r#"
            [[storage]]
            name = "Loader"
            media_type = "LTO-8"
            autochanger = true
            drives = 2
            slots = 24

            [[job]]
            name = "RestoreFiles"
            type = "restore"
            "#,
        )
        .unwrap();

        let loader = resources.storage("Loader").unwrap();
        assert!(loader.autochanger);
        assert_eq!(loader.slots, 24);
        assert_eq!(resources.job("RestoreFiles").unwrap().job_type, JobType::Restore);
    }

    #[test]
    fn test_none_record_only_has_a_name() {
        let record = Record::none(RecordKind::Pool);
        assert!(record.is_none_sentinel());
        assert_eq!(record.name, "*None*");
        assert_eq!(record.pool_id, None);
    }
}
