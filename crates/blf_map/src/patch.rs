//! Rewriting tag references inside Forge maps
//!

use binrw::BinRead;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::{
    fs::OpenOptions,
    io::{Read, Seek, SeekFrom, Write},
    path::Path,
};
use tracing::{debug, instrument};

use crate::{
    error::Result,
    exclusive::open_exclusive,
    layout::{MapLayout, TAG_INDEX_SIZE},
    remap::RemapTable,
    types::{PatchOutcome, TagReference},
};

/// Patch the Forge map at `path` in place using `table`.
///
/// Shorthand for [`MapPatcher::patch_path`] with the default layout.
pub fn patch(path: impl AsRef<Path>, table: &RemapTable) -> Result<PatchOutcome> {
    MapPatcher::new(table).patch_path(path)
}

/// Applies a [`RemapTable`] to Forge maps
///
/// ```no_run
/// fn fix(paths: &[std::path::PathBuf], table: &blf_map::RemapTable) -> blf_map::error::Result<()> {
///     let patcher = blf_map::MapPatcher::new(table);
///
///     for path in paths {
///         if patcher.patch_path(path)?.is_patched() {
///             println!("fixed {}", path.display());
///         }
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MapPatcher<'a> {
    table: &'a RemapTable,
    layout: MapLayout,
}

impl<'a> MapPatcher<'a> {
    pub fn new(table: &'a RemapTable) -> MapPatcher<'a> {
        Self::with_layout(table, MapLayout::default())
    }

    pub fn with_layout(table: &'a RemapTable, layout: MapLayout) -> MapPatcher<'a> {
        MapPatcher { table, layout }
    }

    /// Open the file at `path` for reading and writing and patch it.
    ///
    /// The file is held exclusively while it is patched, so a file that is open or locked elsewhere
    /// fails with an I/O error. Failing to open the file is an error, a file that is not a map is
    /// not. The file is closed before this returns.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn patch_path(&self, path: impl AsRef<Path>) -> Result<PatchOutcome> {
        let mut file = open_exclusive(OpenOptions::new().read(true).write(true), path.as_ref())?;
        self.patch_stream(&mut file)
    }

    /// Patch a map held in any seekable stream.
    ///
    /// Only the 4 byte tag index of a record is ever written, and only when the table remaps it.
    pub fn patch_stream<S: Read + Write + Seek>(&self, stream: &mut S) -> Result<PatchOutcome> {
        if !is_map(stream, &self.layout)? {
            return Ok(PatchOutcome::NotApplicable);
        }

        let mut rewritten = 0usize;
        for slot in 0..self.layout.tag_record_count {
            stream.seek(SeekFrom::Start(self.layout.record_offset(slot)))?;
            let old = stream.read_i32::<LittleEndian>()?;
            if old < 0 {
                continue;
            }
            let Some(new) = self.table.get(old) else {
                continue;
            };

            stream.seek(SeekFrom::Current(-(TAG_INDEX_SIZE as i64)))?;
            stream.write_i32::<LittleEndian>(new)?;
            debug!(slot, old, new, "remapped tag reference");
            rewritten += 1;
        }
        stream.flush()?;

        debug!(rewritten, "patched map");
        Ok(PatchOutcome::Patched)
    }

    /// Count the references a patch would rewrite, without writing anything.
    ///
    /// Returns `None` when the stream is not a map.
    pub fn pending_stream<S: Read + Seek>(&self, stream: &mut S) -> Result<Option<usize>> {
        Ok(inspect_stream(stream, &self.layout)?.map(|references| {
            references
                .iter()
                .filter(|r| !r.is_unused() && self.table.get(r.index).is_some())
                .count()
        }))
    }

    /// [`MapPatcher::pending_stream`] for the file at `path`, opened read only
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn pending_path(&self, path: impl AsRef<Path>) -> Result<Option<usize>> {
        let mut file = std::fs::File::open(path.as_ref())?;
        self.pending_stream(&mut file)
    }
}

/// Read every tag reference of a map, or `None` when the stream is not a map
pub fn inspect_stream<S: Read + Seek>(
    stream: &mut S,
    layout: &MapLayout,
) -> Result<Option<Vec<TagReference>>> {
    if !is_map(stream, layout)? {
        return Ok(None);
    }

    let references = (0..layout.tag_record_count)
        .map(|slot| -> Result<TagReference> {
            stream.seek(SeekFrom::Start(layout.record_offset(slot)))?;
            Ok(TagReference::read(stream)?)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(references))
}

/// [`inspect_stream`] for the file at `path`, opened read only
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn inspect_path(
    path: impl AsRef<Path>,
    layout: &MapLayout,
) -> Result<Option<Vec<TagReference>>> {
    let mut file = std::fs::File::open(path.as_ref())?;
    inspect_stream(&mut file, layout)
}

/// Check the length and magics of a stream against `layout`
fn is_map<S: Read + Seek>(stream: &mut S, layout: &MapLayout) -> Result<bool> {
    let length = stream.seek(SeekFrom::End(0))?;
    if length < layout.required_length() {
        debug!(length, "file too short to be a map");
        return Ok(false);
    }

    for (offset, expected) in &layout.magics {
        stream.seek(SeekFrom::Start(*offset))?;
        let mut magic = [0u8; 4];
        stream.read_exact(&mut magic)?;
        if &magic != expected {
            debug!(offset, ?magic, "magic mismatch, not a map");
            return Ok(false);
        }
    }

    Ok(true)
}
