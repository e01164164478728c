//! # consel-core
//!
//! Target-entity resolution for an interactive backup-director console.
//!
//! Console commands name the thing they operate on with keyword/value pairs
//! (`storage=Tape1`, `jobid=42`, `slots=1-5,9`). This crate turns such an
//! argument vector into a concrete entity: a storage, pool, client, job,
//! schedule, volume, drive, slot list, media type or job type. When the command
//! line is silent or names something invalid, the caller gets an access-filtered,
//! deduplicated numbered menu instead.
//!
//! ## Architecture
//!
//! - **Arguments**: [`args::ArgumentVector`] tokenizes a command line and
//!   answers keyword queries
//! - **Collaborators**: [`collab`] declares the catalog, live job registry,
//!   session channel and access predicate the resolvers consume
//! - **Dialogs**: [`prompt`] (numbered choice) and [`confirm`] (yes/mod/no)
//! - **Resolvers**: [`resolve`] holds the generic resource and record
//!   selectors, [`select`] instantiates them per entity kind
//! - **Bulk selection**: [`jobs::select_jobs`] and [`slots::parse_slot_list`]
//!
//! ## Quick Start
//!
//! ```rust
//! use consel_core::args::ArgumentVector;
//! use consel_core::collab::AllowAll;
//! use consel_core::memory::{MemoryCatalog, MemoryJobRegistry};
//! use consel_core::session::IoSession;
//! use consel_core::types::{Resources, StorageResource};
//! use consel_core::{Console, select};
//!
//! let mut resources = Resources::default();
//! resources.storages.push(StorageResource::new("File1", "File"));
//!
//! let args = ArgumentVector::parse("mount storage=File1")?;
//! let catalog = MemoryCatalog::default();
//! let jobs = MemoryJobRegistry::default();
//! let mut session = IoSession::new(&b""[..], Vec::new());
//!
//! let mut console = Console::new(&args, &mut session, &AllowAll, &catalog, &jobs, &resources);
//! let storage = select::get_storage_resource(&mut console, false, false)?;
//! assert_eq!(storage.name, "File1");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! Resolution failures are reported to the console session at the point of
//! detection and then returned as [`SelectError`]. Callers decide what to do
//! from the variant; they should not print the error a second time.

/// Command-line tokenizer and keyword scanning
pub mod args;
/// Collaborator traits consumed by the resolvers
pub mod collab;
/// Yes/mod/no confirmation dialog
pub mod confirm;
/// Director description and console settings
pub mod config;
/// Per-command console context
pub mod console;
/// Error types and result aliases
pub mod error;
/// Multi-job selection for bulk operations
pub mod jobs;
/// In-memory catalog and live job registry
pub mod memory;
/// Prompt sessions and the interactive chooser
pub mod prompt;
/// Generic resource and record selectors
pub mod resolve;
/// Per-entity-kind resolver instantiations
pub mod select;
/// Reader/writer backed console session
pub mod session;
/// Slot range list parsing
pub mod slots;
/// Core data types
pub mod types;
/// Name validation
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use console::{Console, ConsoleMode};
pub use error::{CatalogError, Error, Result, SelectError};
