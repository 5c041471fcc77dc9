//! Common processing logic shared between commands.

use camino::Utf8PathBuf;
use clap::Args;
use clap::ValueEnum;
use projstat::Result;
use projstat::config::Config;
use projstat::facts::{AdapterRegistry, Aggregator, ProjectSpec};
use projstat::reports::ColorMode;

const LOG_TARGET: &str = "  commands";

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,
    /// Only error messages
    Error,
    /// Warning and error messages
    Warn,
    /// Info, warning, and error messages
    Info,
    /// Debug and above messages
    Debug,
    /// All messages including trace
    Trace,
}

/// Common arguments shared between the report and list commands
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN")]
    pub github_token: Option<String>,

    /// GitLab personal access token
    #[arg(long, value_name = "TOKEN", env = "GITLAB_TOKEN")]
    pub gitlab_token: Option<String>,

    /// Path to configuration file [default: one of projects.[toml|yml|yaml|json] ]
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    pub log_level: LogLevel,
}

pub struct Common {
    pub config: Config,
    pub aggregator: Aggregator,
    color: ColorMode,
}

impl Common {
    /// Create a new Common processor with logger, config, and aggregator
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or is invalid
    pub fn new(args: &CommonArgs) -> Result<Self> {
        Self::init_logging(args.log_level);

        let (config, config_path) = Config::load(args.config.as_ref())?;
        log::info!(target: LOG_TARGET, "Loaded configuration from '{config_path}'");

        // Command line (and environment) tokens take priority over the config file
        let github_token = args.github_token.as_deref().or(config.auth.github_token.as_deref());
        let gitlab_token = args.gitlab_token.as_deref().or(config.auth.gitlab_token.as_deref());

        let registry = AdapterRegistry::standard(github_token, gitlab_token)?;
        let aggregator = Aggregator::new(registry, config.precedence.clone());

        Ok(Self {
            config,
            aggregator,
            color: args.color,
        })
    }

    /// Initialize logger based on log level
    fn init_logging(log_level: LogLevel) {
        if log_level == LogLevel::None {
            return;
        }

        let level = match log_level {
            LogLevel::None => return, // Already checked above, but being explicit
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };

        let env = env_logger::Env::default().filter_or("RUST_LOG", level);

        env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
            .init();
    }

    /// The configured projects, optionally narrowed by a case-insensitive
    /// substring match on the name, in declaration order.
    #[must_use]
    pub fn filter_projects(&self, query: Option<&str>) -> Vec<ProjectSpec> {
        let specs = self.config.project_specs();
        match query {
            Some(query) => {
                let query = query.to_lowercase();
                specs.into_iter().filter(|spec| spec.name().to_lowercase().contains(&query)).collect()
            }
            None => specs,
        }
    }

    #[must_use]
    pub fn use_colors(&self) -> bool {
        self.color.enabled()
    }
}
