//! Report generation for aggregated project data
//!
//! Pure presentation: the generators render a slice of [`ProjectReport`]s in
//! the order given, including every claim and every recorded failure. No
//! merge decisions are made here.
//!
//! # Implementation Model
//!
//! Two report generators are provided, each accessed through a `generate`
//! function writing into a [`core::fmt::Write`] sink:
//! - **Console**: indented `key: value` lines per project with optional
//!   source attributions and ANSI colors
//! - **JSON**: machine-readable structured data

mod console;
mod json;

pub use console::{ConsoleOptions, generate as generate_console};
pub use json::generate as generate_json;

use clap::ValueEnum;
use std::io::IsTerminal;

/// Control when console output uses ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Color when stdout is a terminal
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

impl ColorMode {
    #[must_use]
    pub fn enabled(self) -> bool {
        match self {
            Self::Auto => std::io::stdout().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}
