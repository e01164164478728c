//! Director description for the console.
//!
//! A single TOML file describes what the console can see: console settings,
//! access control lists, the configured resources and (for demos and tests)
//! the catalog rows and live jobs.
//!
//! ## Lookup order
//!
//! 1. An explicit path (the CLI's `--config`)
//! 2. `CONSEL_CONFIG`
//! 3. `director.toml` in the platform config directory, when it exists
//! 4. Built-in defaults (an empty director)
//!
//! `CONSEL_BATCH` and `CONSEL_API` override the console mode afterwards.
//!
//! ## Example
//!
//! ```toml
//! [console]
//! name = "operator"
//! default_retention = "60days"
//!
//! [acl]
//! storage = ["Tape", "File1"]
//! pool = ["*all*"]
//!
//! [[storage]]
//! name = "Tape"
//! media_type = "LTO-8"
//! autochanger = true
//! drives = 2
//! slots = 24
//!
//! [[record]]
//! kind = "pool"
//! id = 1
//! name = "Full"
//!
//! [[running]]
//! id = 3
//! unique_name = "Nightly.2024-05-01_23.05.00_03"
//! job = "Nightly"
//! status = "running"
//! started = true
//! write_storage = "Tape"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collab::AccessControl;
use crate::console::ConsoleMode;
use crate::types::{AclType, LiveJob, Record, Resources};
use crate::{Error, Result};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "CONSEL_CONFIG";
/// Environment variable forcing batch mode on or off.
pub const BATCH_ENV: &str = "CONSEL_BATCH";
/// Environment variable forcing API mode on or off.
pub const API_ENV: &str = "CONSEL_API";

/// List entry granting every name of a class.
pub const ACL_ALL: &str = "*all*";

const CONFIG_FILE: &str = "director.toml";

/// Complete console configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub console: ConsoleSettings,
    pub acl: ConsoleAcl,
    #[serde(flatten)]
    pub resources: Resources,
    /// Catalog rows served by the in-memory catalog.
    #[serde(rename = "record")]
    pub records: Vec<Record>,
    /// Jobs registered in the in-memory live registry.
    pub running: Vec<LiveJob>,
}

/// `[console]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleSettings {
    /// Console name shown in the interactive prompt.
    pub name: String,
    /// Never prompt; ambiguous selections fail.
    pub batch: bool,
    /// Frame selection lists for machine clients.
    pub api: bool,
    /// Retention offered by `prune` when the command line names none.
    #[serde(with = "humantime_serde")]
    pub default_retention: Duration,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            name: "*UserAgent*".to_owned(),
            batch: false,
            api: false,
            default_retention: Duration::from_secs(180 * 24 * 60 * 60),
        }
    }
}

/// `[acl]` table: per class, the names this console may use.
///
/// A class without a list is unrestricted; [`ACL_ALL`] in a list grants the
/// whole class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleAcl {
    pub job: Option<Vec<String>>,
    pub client: Option<Vec<String>>,
    pub storage: Option<Vec<String>>,
    pub schedule: Option<Vec<String>>,
    pub pool: Option<Vec<String>>,
    pub catalog: Option<Vec<String>>,
    pub fileset: Option<Vec<String>>,
}

impl ConsoleAcl {
    fn list(&self, acl: AclType) -> Option<&[String]> {
        let list = match acl {
            AclType::Job => &self.job,
            AclType::Client => &self.client,
            AclType::Storage => &self.storage,
            AclType::Schedule => &self.schedule,
            AclType::Pool => &self.pool,
            AclType::Catalog => &self.catalog,
            AclType::FileSet => &self.fileset,
        };
        list.as_deref()
    }
}

impl AccessControl for ConsoleAcl {
    fn access_ok(&self, acl: AclType, name: &str) -> bool {
        self.list(acl)
            .is_none_or(|names| names.iter().any(|n| n == ACL_ALL || n == name))
    }
}

impl Config {
    /// Load following the lookup order above, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be read or is not valid.
    /// A missing default file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from))
            .or_else(|| Self::default_path().filter(|p| p.exists()));

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => {
                debug!("no director configuration found, using defaults");
                Self::default()
            },
        };
        config.apply_env_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "loaded director configuration");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// `director.toml` in the platform config directory.
    ///
    /// - Linux: `~/.config/consel/director.toml`
    /// - macOS: `~/Library/Application Support/dev.consel.consel/director.toml`
    /// - Windows: `%APPDATA%\consel\consel\config\director.toml`
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "consel", "consel")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Apply `CONSEL_BATCH` / `CONSEL_API` as read through `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(batch) = lookup(BATCH_ENV).as_deref().and_then(parse_flag) {
            self.console.batch = batch;
        }
        if let Some(api) = lookup(API_ENV).as_deref().and_then(parse_flag) {
            self.console.api = api;
        }
    }

    pub const fn mode(&self) -> ConsoleMode {
        ConsoleMode {
            batch: self.console.batch,
            api: self.console.api,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
