use crate::Result;
use crate::facts::{Claim, FactKey, ProjectReport};
use core::fmt::Write;
use owo_colors::OwoColorize;

/// Rendering knobs for the console report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOptions {
    /// Show only the first few keys per project.
    pub short: bool,

    /// Attribute every claim to the sources that made it.
    pub show_sources: bool,

    /// Use ANSI colors.
    pub use_colors: bool,
}

pub fn generate<W: Write>(reports: &[ProjectReport], options: ConsoleOptions, writer: &mut W) -> Result<()> {
    for (index, report) in reports.iter().enumerate() {
        if index > 0 {
            writeln!(writer)?;
        }

        if options.use_colors {
            writeln!(writer, "{}", report.name().bold())?;
        } else {
            writeln!(writer, "{}", report.name())?;
        }

        for (key, claims) in report.facts() {
            if options.short && key as usize >= FactKey::SHORT_COUNT {
                continue;
            }
            writeln!(writer, "  {key}: {}", format_claims(claims, options))?;
        }

        for failure in report.failures() {
            let line = format!("! {} {}: {}", failure.source, failure.kind, failure.message);
            if options.use_colors {
                writeln!(writer, "  {}", line.red())?;
            } else {
                writeln!(writer, "  {line}")?;
            }
        }
    }

    Ok(())
}

/// Render all claims for one fact, winning claim first, separated by `;`.
fn format_claims(claims: &[Claim], options: ConsoleOptions) -> String {
    let mut parts = Vec::with_capacity(claims.len());

    for claim in claims {
        let mut part = claim.value.to_string();
        if options.show_sources {
            let sources = claim.sources.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
            if options.use_colors {
                let _ = write!(part, " {}", format!("({sources})").dimmed());
            } else {
                let _ = write!(part, " ({sources})");
            }
        }
        parts.push(part);
    }

    parts.join("; ")
}
