use blf_map::invalidate;
use clap::Args;
use miette::{Context, Result};
use tracing::info;

use crate::commands::GameDirArgs;

#[derive(Args)]
pub struct InvalidateArgs {
    #[command(flatten)]
    game: GameDirArgs,
}

impl InvalidateArgs {
    pub fn handle(&self) -> Result<()> {
        let path = self.game.game_dir().preferences();

        let written = invalidate(&path).context(format!("invalidating {}", path.display()))?;
        if written {
            info!("invalidated cached maps in {}", path.display());
        } else {
            info!("{} does not exist, nothing to invalidate", path.display());
        }

        Ok(())
    }
}
