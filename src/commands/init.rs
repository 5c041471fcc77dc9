use camino::Utf8PathBuf;
use clap::Args;
use ohno::bail;
use projstat::Result;
use projstat::config::Config;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Where to write the configuration file (format chosen by extension)
    #[arg(long, short = 'o', value_name = "PATH", default_value = "projects.yml")]
    pub output: Utf8PathBuf,

    /// Overwrite the file if it already exists
    #[arg(long)]
    pub force: bool,
}

/// Write a starter configuration file.
pub fn init_config(args: &InitArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!("'{}' already exists; use --force to overwrite it", args.output);
    }

    Config::save_default(&args.output)?;
    println!("Wrote default configuration to {}", args.output);

    Ok(())
}
