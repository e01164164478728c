//! Collaborators the resolvers consume but do not own.
//!
//! The catalog, the live job registry, the access predicate and the console
//! channel all live outside this crate in a real director. Resolvers only see
//! these traits, so tests and the CLI plug in their own implementations (see
//! [`crate::memory`] and [`crate::session`]).

use crate::error::CatalogError;
use crate::types::{AclType, DbId, JobId, LiveJob, Record, RecordKind};

/// Access predicate: may this console see `name` of class `acl`?
///
/// Evaluated per candidate and never cached, so a predicate may change its
/// answer between calls.
pub trait AccessControl {
    /// True when the console is allowed to operate on the named entity.
    fn access_ok(&self, acl: AclType, name: &str) -> bool;
}

impl<F> AccessControl for F
where
    F: Fn(AclType, &str) -> bool,
{
    fn access_ok(&self, acl: AclType, name: &str) -> bool {
        self(acl, name)
    }
}

/// Grants every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessControl for AllowAll {
    fn access_ok(&self, _acl: AclType, _name: &str) -> bool {
        true
    }
}

/// Persistent catalog of clients, pools, storages, media and finished jobs.
pub trait Catalog {
    /// All row ids of one table.
    fn list_ids(&self, kind: RecordKind) -> Result<Vec<DbId>, CatalogError>;

    /// Fetch one row by id; `Ok(None)` when the row is gone.
    fn lookup_by_id(&self, kind: RecordKind, id: DbId) -> Result<Option<Record>, CatalogError>;

    /// Fetch one row by name. Job rows match on their unique job name.
    fn lookup_by_name(&self, kind: RecordKind, name: &str)
    -> Result<Option<Record>, CatalogError>;

    /// Media rows, optionally restricted to one pool.
    fn list_media(&self, pool_id: Option<DbId>) -> Result<Vec<Record>, CatalogError>;

    /// Job rows, optionally restricted to one job resource name.
    fn list_jobs(&self, job_name: Option<&str>) -> Result<Vec<Record>, CatalogError>;
}

/// Registry of jobs currently known to the director process.
///
/// Every lookup returns an owned snapshot. A job may finish at any moment
/// after the call returns.
pub trait JobRegistry {
    fn by_id(&self, id: JobId) -> Option<LiveJob>;

    /// First job whose unique name starts with `prefix`.
    fn by_partial_name(&self, prefix: &str) -> Option<LiveJob>;

    fn by_full_name(&self, unique_name: &str) -> Option<LiveJob>;

    /// All live jobs, including the console's own pseudo job (id 0) if any.
    fn snapshot(&self) -> Vec<LiveJob>;
}

/// Out-of-band markers for machine (API) clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// A selection list follows.
    StartSelect,
    /// The selection list is complete.
    EndSelect,
    /// The console is waiting for the selection.
    SelectInput,
}

impl Signal {
    /// Wire marker written by text sessions.
    pub const fn marker(self) -> &'static str {
        match self {
            Self::StartSelect => "@@start_select",
            Self::EndSelect => "@@end_select",
            Self::SelectInput => "@@select_input",
        }
    }
}

/// Bidirectional console channel.
pub trait Session {
    /// Informational message.
    fn send(&mut self, msg: &str);

    fn warning(&mut self, msg: &str);

    fn error(&mut self, msg: &str);

    fn signal(&mut self, signal: Signal);

    /// Show `prompt` and read one line without its terminator.
    ///
    /// `None` means input ended or failed.
    fn read_line(&mut self, prompt: &str) -> Option<String>;
}
