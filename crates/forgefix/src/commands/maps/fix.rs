use blf_map::{invalidate, MapPatcher, RemapTable};
use clap::Args;
use itertools::Itertools;
use miette::{Context, Result};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::commands::GameDirArgs;

#[derive(Args)]
pub struct FixArgs {
    #[command(flatten)]
    game: GameDirArgs,

    /// The tag remap table, one `<old>,<new>` hex pair per line
    #[arg(short, long, value_name = "FILE")]
    tag_map: PathBuf,

    /// Don't check that the game directory is an ElDewrito install
    #[arg(long, default_value_t = false)]
    skip_verify: bool,

    /// Only report what would be changed
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

/// What happened to each map of a batch
#[derive(Debug, Default)]
pub struct FixReport {
    pub fixed: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, blf_map::error::Error)>,
}

impl FixArgs {
    pub fn handle(&self) -> Result<()> {
        let game = self.game.game_dir();
        if !self.skip_verify {
            game.verify()?;
        }

        info!("loading tag map");
        let table = RemapTable::from_path(&self.tag_map)
            .context(format!("reading {}", self.tag_map.display()))?;
        if table.is_empty() {
            warn!("{} contains no remap entries", self.tag_map.display());
        }
        if !table.is_chain_free() {
            warn!(
                "tag map remaps indices that are also remap targets, a second run will remap them again"
            );
        }

        info!("searching for map files in {}", game.map_dir().display());
        let maps = game.find_maps();

        let report = if self.dry_run {
            dry_run(&maps, &table)
        } else {
            let report = fix_maps(&maps, &table);

            info!("invalidating cached maps");
            invalidate(game.preferences())
                .context(format!("invalidating {}", game.preferences().display()))?;

            report
        };

        print_report(&report, self.dry_run);
        Ok(())
    }
}

/// Patch every map, a failing map is recorded and the batch carries on
pub fn fix_maps(maps: &[PathBuf], table: &RemapTable) -> FixReport {
    let patcher = MapPatcher::new(table);
    let mut report = FixReport::default();

    for (i, path) in maps.iter().enumerate() {
        info!("[{}/{}] fixing {}", i + 1, maps.len(), path.display());
        match patcher.patch_path(path) {
            Ok(outcome) if outcome.is_patched() => report.fixed.push(path.clone()),
            Ok(_) => report.skipped.push(path.clone()),
            Err(e) => {
                warn!("unable to fix {}: {}", path.display(), e);
                report.failed.push((path.clone(), e));
            }
        }
    }

    report
}

fn dry_run(maps: &[PathBuf], table: &RemapTable) -> FixReport {
    let patcher = MapPatcher::new(table);
    let mut report = FixReport::default();

    for path in maps {
        match patcher.pending_path(path) {
            Ok(Some(pending)) => {
                info!("{} would have {} references remapped", path.display(), pending);
                report.fixed.push(path.clone());
            }
            Ok(None) => report.skipped.push(path.clone()),
            Err(e) => {
                warn!("unable to fix {}: {}", path.display(), e);
                report.failed.push((path.clone(), e));
            }
        }
    }

    report
}

fn print_report(report: &FixReport, dry_run: bool) {
    let verb = if dry_run { "Would fix" } else { "Successfully fixed" };

    if report.fixed.is_empty() {
        println!("No Forge maps seem to be installed.");
    } else {
        println!(
            "{} {} map(s):\n\n{}",
            verb,
            report.fixed.len(),
            report.fixed.iter().map(|p| display(p).green().to_string()).join("\n")
        );
    }

    if !report.failed.is_empty() {
        println!(
            "\nUnable to fix {} map(s):\n\n{}",
            report.failed.len(),
            report
                .failed
                .iter()
                .map(|(p, e)| format!("{}: {}", display(p).red(), e))
                .join("\n")
        );
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
