use super::common::{Common, CommonArgs};
use camino::Utf8PathBuf;
use clap::Args;
use core::cmp::Ordering;
use ohno::{IntoAppError, bail};
use projstat::Result;
use projstat::facts::{FactKey, ProjectReport};
use projstat::reports::{ConsoleOptions, generate_console, generate_json};
use std::fs;
use strum::IntoEnumIterator;

const LOG_TARGET: &str = "  commands";

/// Arguments for the report command
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Optionally filter projects by a case-insensitive name substring
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Show only the most important facts per project
    #[arg(long, short = 's')]
    pub short: bool,

    /// Show which sources reported each value
    #[arg(long, short = 'S')]
    pub show_sources: bool,

    /// Sort projects by a fact key (e.g. updated, stars) instead of declaration order
    #[arg(long, short = 'z', value_name = "KEY")]
    pub sort: Option<String>,

    /// Write a JSON report to a file instead of printing to the terminal
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub json: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Aggregate facts for every matching project and render the result.
pub async fn process_report(args: &ReportArgs) -> Result<()> {
    let common = Common::new(&args.common)?;

    let projects = common.filter_projects(args.query.as_deref());
    if projects.is_empty() {
        if let Some(query) = &args.query {
            bail!("no configured project matches '{query}'");
        }
        bail!("no projects configured");
    }

    let sort_key = args.sort.as_deref().map(parse_fact_key).transpose()?;

    // Racing against Ctrl-C drops every in-flight source query without
    // emitting a partial report
    let mut reports = tokio::select! {
        reports = common.aggregator.collect(&projects) => reports?,
        _ = tokio::signal::ctrl_c() => {
            log::warn!(target: LOG_TARGET, "Interrupted; abandoning in-flight source queries");
            bail!("run cancelled");
        }
    };

    if let Some(key) = sort_key {
        sort_reports(&mut reports, key);
    }

    if let Some(path) = &args.json {
        let mut output = String::new();
        generate_json(&reports, &mut output)?;
        fs::write(path, output).into_app_err_with(|| format!("writing JSON report to {path}"))?;
    } else {
        let mut output = String::new();
        generate_console(
            &reports,
            ConsoleOptions {
                short: args.short,
                show_sources: args.show_sources,
                use_colors: common.use_colors(),
            },
            &mut output,
        )?;
        print!("{output}");
    }

    Ok(())
}

fn parse_fact_key(raw: &str) -> Result<FactKey> {
    raw.parse().map_err(|_| {
        let valid = FactKey::iter().map(|k| k.to_string()).collect::<Vec<_>>().join(", ");
        ohno::app_err!("unknown fact key '{raw}'; valid keys are: {valid}")
    })
}

/// Order reports by a fact's winning value; projects missing the fact sort last.
fn sort_reports(reports: &mut [ProjectReport], key: FactKey) {
    reports.sort_by(|a, b| match (a.winning_value(key), b.winning_value(key)) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
