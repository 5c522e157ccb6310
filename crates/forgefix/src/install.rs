//! Locating things inside an ElDewrito install

use std::path::{Path, PathBuf};

use blf_map::layout::PREFERENCES_FILE;
use miette::{miette, Result};
use walkdir::WalkDir;

/// Directory, relative to the game root, that user maps are installed to
pub const MAP_DIR: &str = "mods/maps";
/// Extension of installed map files
pub const MAP_EXTENSION: &str = "map";
/// Files that must be present for a directory to be a game install
pub const REQUIRED_FILES: [&str; 2] = ["eldorado.exe", "mtndew.dll"];

/// Root directory of a game install
#[derive(Debug, Clone)]
pub struct GameDir {
    root: PathBuf,
}

impl GameDir {
    pub fn new(root: impl Into<PathBuf>) -> GameDir {
        GameDir { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Make sure the game executables can be found
    pub fn verify(&self) -> Result<()> {
        let missing = REQUIRED_FILES
            .iter()
            .filter(|name| !self.root.join(name).is_file())
            .collect::<Vec<_>>();

        if missing.is_empty() {
            return Ok(());
        }

        Err(miette!(
            help = "point --game-dir at your ElDewrito 0.5 install",
            "{} is not an ElDewrito install, missing {:?}",
            self.root.display(),
            missing
        ))
    }

    pub fn map_dir(&self) -> PathBuf {
        self.root.join(MAP_DIR)
    }

    pub fn preferences(&self) -> PathBuf {
        self.root.join(PREFERENCES_FILE)
    }

    /// Every `.map` file below the map directory, sorted by path.
    ///
    /// An install without a map directory has no maps.
    pub fn find_maps(&self) -> Vec<PathBuf> {
        let map_dir = self.map_dir();
        if !map_dir.is_dir() {
            return Vec::new();
        }

        WalkDir::new(map_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|path| {
                path.extension()
                    .map_or(false, |ext| ext.eq_ignore_ascii_case(MAP_EXTENSION))
            })
            .collect()
    }
}
