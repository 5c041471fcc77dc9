//! A tool to keep track of all your projects.
//!
//! # Overview
//!
//! `projstat` gathers metadata about the projects you maintain from the
//! places that know about them (a local git checkout, GitHub or GitLab,
//! PyPI, Bower, and Travis) and prints one consolidated summary per project.
//! Sources are queried concurrently; a source being down or misbehaving
//! never hides what the other sources had to say.
//!
//! # Quick Start
//!
//! Create a starter configuration and edit it:
//!
//! ```bash
//! projstat init
//! $EDITOR projects.yml
//! ```
//!
//! Then produce a report:
//!
//! ```bash
//! projstat report
//! ```
//!
//! # Basic Usage
//!
//! **Report on every configured project:**
//! ```bash
//! projstat report
//! ```
//!
//! **Report on projects whose name contains a string:**
//! ```bash
//! projstat report tokio
//! ```
//!
//! **Show which source reported each value:**
//! ```bash
//! projstat report --show-sources
//! ```
//!
//! **Sort projects by most recent activity:**
//! ```bash
//! projstat report --sort updated
//! ```
//!
//! **Write a machine-readable report:**
//! ```bash
//! projstat report --json report.json
//! ```
//!
//! **List configured projects without querying anything:**
//! ```bash
//! projstat list
//! ```
//!
//! # Configuration
//!
//! Configuration lives in `projects.[toml|yml|yaml|json]` in the current
//! directory or under `~/.config/projstat/`; `--config` points anywhere
//! else. Each project names the sources it should be tracked against:
//!
//! ```yaml
//! precedence:
//!   - version-control
//!   - hosting
//!   - package-registry
//!   - frontend-registry
//!   - ci
//!
//! projects:
//!   - name: project-stats
//!     version-control: ~/src/project-stats
//!     hosting: github:xi/project-stats
//!     package-registry: project-stats
//! ```
//!
//! When two sources disagree about a fact (say, the version on PyPI lags the
//! latest git tag), the source listed earlier in `precedence` wins; the
//! losing values are still shown after the winner.
//!
//! # Hosting Tokens
//!
//! Unauthenticated hosting API access is heavily rate limited. Provide
//! tokens via `GITHUB_TOKEN` / `GITLAB_TOKEN`, the `--github-token` /
//! `--gitlab-token` flags, or the `auth` section of the configuration file.

use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};
use projstat::Result;

mod commands;

use crate::commands::{InitArgs, ListArgs, ReportArgs, init_config, list_projects, process_report};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "projstat", version, about)]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: ProjstatSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProjstatSubcommand {
    /// Gather facts about the configured projects and print a report
    Report(Box<ReportArgs>),
    /// List the configured project names without querying any source
    List(ListArgs),
    /// Generate a default configuration file
    Init(InitArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    match &Cli::parse().command {
        ProjstatSubcommand::Report(report_args) => process_report(report_args).await,
        ProjstatSubcommand::List(list_args) => list_projects(list_args),
        ProjstatSubcommand::Init(init_args) => init_config(init_args),
    }
}
