pub mod invalidate;
pub mod show;

#[derive(clap::Subcommand)]
pub enum PreferencesCommands {
    /// Force the game to revalidate installed maps on next launch
    Invalidate(invalidate::InvalidateArgs),
    /// Print the cached map validity flags
    Show(show::ShowArgs),
}

impl PreferencesCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            PreferencesCommands::Invalidate(invalidate) => invalidate.handle(),
            PreferencesCommands::Show(show) => show.handle(),
        }
    }
}
