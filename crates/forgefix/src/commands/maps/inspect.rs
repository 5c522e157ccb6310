use blf_map::{patch::inspect_path, MapLayout};
use clap::Args;
use miette::{miette, Context, Result};
use owo_colors::OwoColorize;
use std::path::PathBuf;

#[derive(Args)]
pub struct InspectArgs {
    /// An input map file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Also list unused slots
    #[arg(long, default_value_t = false)]
    all: bool,
}

impl InspectArgs {
    pub fn handle(&self) -> Result<()> {
        let references = inspect_path(&self.file, &MapLayout::default())
            .context(format!("path: {}", &self.file.display()))?
            .ok_or(miette!("{} is not a Forge map", self.file.display()))?;

        for (slot, reference) in references.iter().enumerate() {
            if reference.is_unused() {
                if self.all {
                    println!("{:>3}: {}", slot, "unused".dimmed());
                }
                continue;
            }
            println!("{:>3}: {:#010x}", slot, reference.index);
        }

        Ok(())
    }
}
