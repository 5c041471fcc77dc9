use super::common::{Common, CommonArgs};
use clap::Args;
use projstat::Result;

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Optionally filter projects by a case-insensitive name substring
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Print the configured project names, one per line, without querying any source.
pub fn list_projects(args: &ListArgs) -> Result<()> {
    let common = Common::new(&args.common)?;

    for spec in common.filter_projects(args.query.as_deref()) {
        println!("{}", spec.name());
    }

    Ok(())
}
