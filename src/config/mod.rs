//! Configuration loading and validation
//!
//! The configuration names the tracked projects, their per-source
//! identifiers, the merge precedence order, and optional hosting tokens.
//! Structural problems (no projects, duplicate names, unknown fields) are
//! caught here, before any source is ever queried.

mod config;

pub use config::{Auth, Config, DEFAULT_CONFIG_YAML, ProjectEntry};
