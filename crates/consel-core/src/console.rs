//! Per-command console context.
//!
//! A [`Console`] bundles everything one command resolution needs: the parsed
//! argument vector, the session to talk through, the access predicate, the
//! catalog, the live job registry and the configured resources. It is built
//! for one command and dropped afterwards.

use tracing::debug;

use crate::args::ArgumentVector;
use crate::collab::{AccessControl, Catalog, JobRegistry, Session};
use crate::error::SelectError;
use crate::types::{AclType, Resources};

/// Sent when a dialog ends without an answer.
pub const ABORT_MESSAGE: &str = "Selection aborted, nothing done.";

/// How the console talks to its user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsoleMode {
    /// Non-interactive: any prompt that needs an answer fails instead.
    pub batch: bool,
    /// Machine client: selection lists are framed by signals and unnumbered.
    pub api: bool,
}

impl ConsoleMode {
    pub const fn interactive() -> Self {
        Self { batch: false, api: false }
    }

    pub const fn batch() -> Self {
        Self { batch: true, api: false }
    }

    pub const fn api() -> Self {
        Self { batch: false, api: true }
    }
}

/// Context of one console command.
pub struct Console<'a> {
    pub args: &'a ArgumentVector,
    pub session: &'a mut dyn Session,
    pub acl: &'a dyn AccessControl,
    pub catalog: &'a dyn Catalog,
    pub jobs: &'a dyn JobRegistry,
    pub resources: &'a Resources,
    pub mode: ConsoleMode,
}

impl<'a> Console<'a> {
    /// Interactive console over the given collaborators.
    pub fn new(
        args: &'a ArgumentVector,
        session: &'a mut dyn Session,
        acl: &'a dyn AccessControl,
        catalog: &'a dyn Catalog,
        jobs: &'a dyn JobRegistry,
        resources: &'a Resources,
    ) -> Self {
        Self {
            args,
            session,
            acl,
            catalog,
            jobs,
            resources,
            mode: ConsoleMode::interactive(),
        }
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: ConsoleMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn acl_ok(&self, acl: AclType, name: &str) -> bool {
        let allowed = self.acl.access_ok(acl, name);
        if !allowed {
            debug!(acl = acl.as_str(), name, "access denied");
        }
        allowed
    }

    pub fn send(&mut self, msg: &str) {
        self.session.send(msg);
    }

    pub fn warning(&mut self, msg: &str) {
        self.session.warning(msg);
    }

    pub fn error(&mut self, msg: &str) {
        self.session.error(msg);
    }

    /// Read one line of input.
    ///
    /// Batch consoles never read: the request is reported and answered like
    /// end of input.
    pub fn read_line(&mut self, prompt: &str) -> Option<String> {
        if self.mode.batch {
            let what = prompt.trim_end().trim_end_matches(':');
            self.error(&format!("Input for \"{what}\" is not possible in batch mode."));
            return None;
        }
        self.session.read_line(prompt)
    }

    /// Read an answer the command cannot do without.
    pub fn read_answer(&mut self, prompt: &str) -> Result<String, SelectError> {
        match self.read_line(prompt) {
            Some(line) => Ok(line),
            None => Err(self.aborted()),
        }
    }

    /// Report an abandoned dialog.
    pub fn aborted(&mut self) -> SelectError {
        self.send(ABORT_MESSAGE);
        SelectError::UserAborted
    }
}

impl std::fmt::Debug for Console<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("args", &self.args)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
