use blf_map::preferences::{read_flags_path, CacheFlag};
use clap::Args;
use miette::{miette, Context, Result};
use owo_colors::OwoColorize;

use crate::commands::GameDirArgs;

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    game: GameDirArgs,
}

impl ShowArgs {
    pub fn handle(&self) -> Result<()> {
        let path = self.game.game_dir().preferences();

        let flags = read_flags_path(&path)
            .context(format!("reading {}", path.display()))?
            .ok_or(miette!("{} does not exist", path.display()))?;

        for (flag, value) in flags {
            let name = match flag {
                CacheFlag::MultiplayerValid => "multiplayer valid",
                CacheFlag::ForgeValid => "forge valid",
            };
            if value != 0 {
                println!("{:<17} ({:#06x}): {}", name, flag.offset(), "yes".green());
            } else {
                println!("{:<17} ({:#06x}): {}", name, flag.offset(), "no".red());
            }
        }

        Ok(())
    }
}
