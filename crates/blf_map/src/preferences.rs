//! Invalidating the map validity cache in `preferences.dat`
//!

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::{
    fs::{File, OpenOptions},
    io::{ErrorKind, Read, Seek, SeekFrom, Write},
    path::Path,
};
use tracing::{debug, instrument};

use crate::{
    error::Result,
    exclusive::open_exclusive,
    layout::{FORGE_VALID_OFFSET, MULTIPLAYER_VALID_OFFSET},
};

/// Validity flags cached by the game
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CacheFlag {
    /// Installed multiplayer maps were validated
    MultiplayerValid,

    /// Installed forge maps were validated
    ForgeValid,
}

impl CacheFlag {
    pub const ALL: [CacheFlag; 2] = [CacheFlag::MultiplayerValid, CacheFlag::ForgeValid];

    /// Offset of the flag inside the preferences file
    pub fn offset(&self) -> u64 {
        match self {
            CacheFlag::MultiplayerValid => MULTIPLAYER_VALID_OFFSET,
            CacheFlag::ForgeValid => FORGE_VALID_OFFSET,
        }
    }
}

/// Clear both validity flags of the preferences file at `path`.
///
/// Returns `false` without touching anything when the file does not exist. Any other failure,
/// including the file being locked elsewhere, is returned as an error.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn invalidate(path: impl AsRef<Path>) -> Result<bool> {
    let mut file = match open_exclusive(OpenOptions::new().write(true), path.as_ref()) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("no preferences file, nothing to invalidate");
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };

    invalidate_stream(&mut file)?;
    debug!("invalidated cached map validity");
    Ok(true)
}

/// Write a zero over every [`CacheFlag`]
pub fn invalidate_stream<W: Write + Seek>(writer: &mut W) -> Result<()> {
    for flag in CacheFlag::ALL {
        writer.seek(SeekFrom::Start(flag.offset()))?;
        writer.write_i32::<LittleEndian>(0)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read the current value of every [`CacheFlag`]
pub fn read_flags<R: Read + Seek>(reader: &mut R) -> Result<[(CacheFlag, i32); 2]> {
    let mut flags = CacheFlag::ALL.map(|flag| (flag, 0));
    for (flag, value) in flags.iter_mut() {
        reader.seek(SeekFrom::Start(flag.offset()))?;
        *value = reader.read_i32::<LittleEndian>()?;
    }
    Ok(flags)
}

/// [`read_flags`] for the preferences file at `path`, `None` when it does not exist
pub fn read_flags_path(path: impl AsRef<Path>) -> Result<Option<[(CacheFlag, i32); 2]>> {
    let mut file = match File::open(path.as_ref()) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    read_flags(&mut file).map(Some)
}
