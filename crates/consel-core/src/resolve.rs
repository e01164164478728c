//! # Generic Resolvers
//!
//! Every entity kind is resolved the same way:
//!
//! 1. Look for an explicit name on the command line (`storage=Tape1`). If
//!    the console may see it and it exists, return it without a dialog.
//! 2. Otherwise build a menu of every candidate the console may see, run
//!    the chooser, and look the chosen name up again.
//!
//! [`ResourceSelector`] does this over the configured resources and
//! [`RecordSelector`] over catalog rows. The `select` module configures one
//! of these per entity kind.
//!
//! A denied explicit name falls through to the menu without a message. An
//! unknown explicit name is reported once and also falls through; it is never
//! retried.

use tracing::{debug, warn};

use crate::console::Console;
use crate::error::SelectError;
use crate::prompt::{PromptSession, choose};
use crate::types::{AclType, NONE_SENTINEL, Named, Record, RecordKind};

type Predicate<'q, T> = Box<dyn Fn(&T) -> bool + 'q>;

/// Resolver for one kind of configured resource.
pub struct ResourceSelector<'q, T> {
    kind: &'static str,
    label: &'static str,
    acl: AclType,
    aliases: &'q [&'q str],
    header: String,
    select_msg: String,
    filter: Option<Predicate<'q, T>>,
    restrict: Option<Predicate<'q, T>>,
}

impl<'q, T: Named> ResourceSelector<'q, T> {
    /// A selector for `kind` ("Storage", "Pool", ...) guarded by `acl` and
    /// named on the command line by any of `aliases`.
    pub fn new(kind: &'static str, acl: AclType, aliases: &'q [&'q str]) -> Self {
        Self {
            kind,
            label: kind,
            acl,
            aliases,
            header: format!("The defined {kind} resources are:"),
            select_msg: format!("Select {kind} resource"),
            filter: None,
            restrict: None,
        }
    }

    #[must_use]
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    #[must_use]
    pub fn select_msg(mut self, msg: impl Into<String>) -> Self {
        self.select_msg = msg.into();
        self
    }

    /// Name used in the "does not exist" message, e.g. "Restore Job".
    #[must_use]
    pub const fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    /// Drop menu candidates that fail `keep`. Explicit names are not affected.
    #[must_use]
    pub fn filter(mut self, keep: impl Fn(&T) -> bool + 'q) -> Self {
        self.filter = Some(Box::new(keep));
        self
    }

    /// Reject resources failing `keep` everywhere, explicit names included.
    #[must_use]
    pub fn restrict(mut self, keep: impl Fn(&T) -> bool + 'q) -> Self {
        self.restrict = Some(Box::new(keep));
        self
    }

    /// Explicit name first, menu second.
    pub fn resolve<'r>(
        &self,
        console: &mut Console<'_>,
        items: &'r [T],
    ) -> Result<&'r T, SelectError> {
        if let Some(found) = self.explicit(console, items) {
            return Ok(found);
        }
        self.select(console, items)
    }

    /// Resolve the first aliased argument with a value, reporting unknown names.
    ///
    /// `None` means the caller should fall back to the menu.
    pub fn explicit<'r>(&self, console: &mut Console<'_>, items: &'r [T]) -> Option<&'r T> {
        let args = console.args;
        let index = args.find_any_with_value(self.aliases)?;
        let name = args.value(index)?;

        if !console.acl_ok(self.acl, name) {
            return None;
        }
        match self.find(items, name) {
            Some(found) => {
                debug!(kind = self.kind, name, "resolved from command line");
                Some(found)
            },
            None => {
                console.error(&format!(
                    "Error: {} resource \"{name}\" does not exist.",
                    self.label
                ));
                None
            },
        }
    }

    /// Offer every visible candidate in a menu.
    pub fn select<'r>(
        &self,
        console: &mut Console<'_>,
        items: &'r [T],
    ) -> Result<&'r T, SelectError> {
        let mut prompts = PromptSession::start(self.header.clone());
        for item in items {
            if self.keep(item)
                && self.filter.as_ref().is_none_or(|keep| keep(item))
                && console.acl_ok(self.acl, item.name())
            {
                prompts.add(item.name());
            }
        }

        let choice = choose(console, prompts, self.kind, &self.select_msg)?;
        self.find(items, &choice.label).ok_or_else(|| {
            console.error(&format!(
                "Error: {} resource \"{}\" does not exist.",
                self.label, choice.label
            ));
            SelectError::NotFound(choice.label)
        })
    }

    fn keep(&self, item: &T) -> bool {
        self.restrict.as_ref().is_none_or(|keep| keep(item))
    }

    fn find<'r>(&self, items: &'r [T], name: &str) -> Option<&'r T> {
        items
            .iter()
            .find(|item| item.name() == name && self.keep(item))
    }
}

impl<T> std::fmt::Debug for ResourceSelector<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceSelector")
            .field("kind", &self.kind)
            .field("acl", &self.acl)
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}

/// Resolver for catalog rows (clients, pools, storages).
#[derive(Debug, Clone)]
pub struct RecordSelector<'q> {
    kind: RecordKind,
    keyword: &'q str,
    aliases: Vec<&'q str>,
}

impl<'q> RecordSelector<'q> {
    /// Selector reading `keyword=` (e.g. `pool`, `recyclepool`, `nextpool`).
    pub fn new(kind: RecordKind, keyword: &'q str) -> Self {
        Self {
            kind,
            keyword,
            aliases: vec![keyword],
        }
    }

    /// Additional keywords naming the same record, e.g. `fd` for clients.
    #[must_use]
    pub fn alias(mut self, alias: &'q str) -> Self {
        self.aliases.push(alias);
        self
    }

    /// Whether the menu offers the "no record" choice.
    fn offers_none(&self) -> bool {
        matches!(
            (self.kind, self.keyword),
            (RecordKind::Pool, "recyclepool") | (RecordKind::Storage, "recyclestorage")
        )
    }

    /// Use `preset` if it names a visible record, else resolve like [`Self::select`].
    pub fn get(
        &self,
        console: &mut Console<'_>,
        preset: Option<&str>,
    ) -> Result<Record, SelectError> {
        if let Some(name) = preset.filter(|n| !n.is_empty()) {
            match console.catalog.lookup_by_name(self.kind, name) {
                Ok(Some(record)) if console.acl_ok(self.kind.acl(), &record.name) => {
                    return Ok(record);
                },
                Ok(_) => self.report_missing(console, name, None),
                Err(err) => self.report_missing(console, name, Some(&err.to_string())),
            }
        }
        self.select(console)
    }

    /// Explicit `keyword=name` first, catalog menu second.
    pub fn select(&self, console: &mut Console<'_>) -> Result<Record, SelectError> {
        if let Some(record) = self.explicit(console) {
            return Ok(record);
        }
        self.menu(console)
    }

    fn explicit(&self, console: &mut Console<'_>) -> Option<Record> {
        let args = console.args;
        let index = args.find_any_with_value(&self.aliases)?;
        let name = args.value(index)?;
        if !console.acl_ok(self.kind.acl(), name) {
            return None;
        }
        // The row may be stored under a different spelling than the one typed.
        match console.catalog.lookup_by_name(self.kind, name) {
            Ok(Some(record)) if console.acl_ok(self.kind.acl(), &record.name) => Some(record),
            Ok(Some(_)) => None,
            Ok(None) => {
                self.report_missing(console, name, None);
                None
            },
            Err(err) => {
                self.report_missing(console, name, Some(&err.to_string()));
                None
            },
        }
    }

    fn menu(&self, console: &mut Console<'_>) -> Result<Record, SelectError> {
        let label = self.kind.label();
        let ids = console.catalog.list_ids(self.kind).map_err(|err| {
            console.error(&format!(
                "Error obtaining {} ids. ERR={err}",
                label.to_ascii_lowercase()
            ));
            SelectError::from(err)
        })?;
        if ids.is_empty() {
            console.error(empty_message(self.kind));
            return Err(SelectError::EmptyCandidateSet(label.to_owned()));
        }

        let mut prompts = PromptSession::start(format!("Defined {label}s:"));
        let offers_none = self.offers_none();
        if offers_none {
            prompts.add(NONE_SENTINEL);
        }
        for id in ids {
            match console.catalog.lookup_by_id(self.kind, id) {
                Ok(Some(record)) if console.acl_ok(self.kind.acl(), &record.name) => {
                    prompts.add(record.name);
                },
                Ok(_) => {},
                Err(err) => warn!(kind = label, id, "skipping unreadable record: {err}"),
            }
        }

        let choice = choose(console, prompts, label, &format!("Select the {label}"))?;
        if offers_none && choice.label == NONE_SENTINEL {
            return Ok(Record::none(self.kind));
        }

        match console.catalog.lookup_by_name(self.kind, &choice.label) {
            Ok(Some(record)) if console.acl_ok(self.kind.acl(), &record.name) => Ok(record),
            Ok(Some(record)) => {
                console.error(&format!("No access to {label} \"{}\"", record.name));
                Err(SelectError::Unauthorized(record.name))
            },
            Ok(None) => {
                self.report_missing(console, &choice.label, None);
                Err(SelectError::NotFound(choice.label))
            },
            Err(err) => {
                self.report_missing(console, &choice.label, Some(&err.to_string()));
                Err(err.into())
            },
        }
    }

    fn report_missing(&self, console: &mut Console<'_>, name: &str, err: Option<&str>) {
        let label = self.kind.label();
        match err {
            Some(err) => console.error(&format!("Could not find {label} \"{name}\": ERR={err}")),
            None => console.error(&format!("Could not find {label} \"{name}\"")),
        }
    }
}

fn empty_message(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Client => "No clients defined. You must run a job before using this command.",
        RecordKind::Pool => "No pools defined. Use the \"create\" command to create one.",
        RecordKind::Storage => "No storages defined.",
        RecordKind::Media => "No volumes defined.",
        RecordKind::Job => "No jobs defined.",
    }
}
