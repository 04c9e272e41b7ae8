//! # TLS Bypass Rule Manager Core
//!
//! Frontend-independent library for maintaining a TLS bypass rule file.
//!
//! ## Architecture
//!
//! This crate provides:
//! - **Rule store** - Parses and edits the rule file, keeps backups and the sync file
//! - **Pattern validation** - Regex compile/search wrappers that never panic
//! - **Conflict detection** - Probe-based overlap sampling between enabled rules
//! - **Templates** - Guided pattern generation for users who don't write regex
//! - **Codec** - Export/import in txt, json, yaml and burp formats
//!
//! ## Example
//!
//! ```rust,no_run
//! use tbr_core::{ConflictDetector, RuleKind, RuleStore};
//!
//! let store = RuleStore::initialize("tls_bypass_rule.txt")?;
//! store.add_rule(r".*\.example\.com", RuleKind::Regex, true)?;
//! store.add_rule("www.example.com", RuleKind::Host, true)?;
//!
//! let conflicts = ConflictDetector::default().find_conflicts(&store.list_rules()?);
//! assert_eq!(conflicts.len(), 1);
//! # Ok::<(), tbr_core::Error>(())
//! ```
//!
//! The store performs unsynchronized read-modify-write cycles on plain files.
//! Only one process should mutate a given rule file at a time.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod codec;
pub mod config;
pub mod conflict;
pub mod error;
pub mod rule;
pub mod store;
pub mod template;
pub mod validator;

// Re-exports for convenience
pub use codec::{Codec, Format, ImportSummary};
pub use config::StoreConfig;
pub use conflict::{Conflict, ConflictDetector, ConflictKind};
pub use error::{Error, Result};
pub use rule::{Rule, RuleKind};
pub use store::{RuleStats, RuleStore};
pub use template::Template;
pub use validator::Validation;
