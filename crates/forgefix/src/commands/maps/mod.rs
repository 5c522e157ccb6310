pub mod fix;
pub mod inspect;

#[derive(clap::Subcommand)]
pub enum MapsCommands {
    /// Remap the tag references of every installed map
    Fix(fix::FixArgs),
    /// Print the tag references of a map file
    Inspect(inspect::InspectArgs),
}

impl MapsCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            MapsCommands::Fix(fix) => fix.handle(),
            MapsCommands::Inspect(inspect) => inspect.handle(),
        }
    }
}
