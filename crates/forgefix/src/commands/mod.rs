pub mod maps;
pub mod preferences;

use std::path::PathBuf;

use clap::Args;

use crate::install::GameDir;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle installed Forge maps
    Maps {
        #[command(subcommand)]
        command: maps::MapsCommands,
    },
    /// Handle the game's preferences file
    Preferences {
        #[command(subcommand)]
        command: preferences::PreferencesCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Maps { command } => command.handle(),
            Commands::Preferences { command } => command.handle(),
        }
    }
}

/// Arguments shared by commands that work on a game install
#[derive(Args)]
pub struct GameDirArgs {
    /// The ElDewrito install directory
    #[arg(
        short,
        long,
        value_name = "DIR",
        env = "FORGEFIX_GAME_DIR",
        default_value = "."
    )]
    game_dir: PathBuf,
}

impl GameDirArgs {
    pub fn game_dir(&self) -> GameDir {
        GameDir::new(&self.game_dir)
    }
}
