//! Command-line commands and orchestration for projstat
//!
//! The `report` command is the main flow: load configuration, aggregate
//! facts for every matching project, and render the result. The `list`
//! command prints project names without touching any source, and `init`
//! writes a starter configuration file.

mod common;
mod init;
mod list;
mod report;

pub use init::{InitArgs, init_config};
pub use list::{ListArgs, list_projects};
pub use report::{ReportArgs, process_report};
