//! Types for building tag index remap tables
//!
//! A remap table source is plain text with one `<old>,<new>` pair of hex numbers per line:
//!
//! ```text
//! 1A2B,1A30
//!  00FF , 0100
//! ```
//!
//! Lines that do not hold two valid hex numbers are skipped.

use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io::Read,
    path::Path,
};

use tracing::{debug, instrument, trace};

use crate::error::Result;

/// Maps stale tag indices to their current value
///
/// ```no_run
/// fn load(path: &std::path::Path) -> blf_map::error::Result<()> {
///     let table = blf_map::RemapTable::from_path(path)?;
///
///     for (old, new) in table.iter() {
///         println!("{old:#x} -> {new:#x}");
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RemapTable {
    entries: HashMap<i32, i32>,
}

impl RemapTable {
    /// Parse a remap table from its text source.
    ///
    /// Never fails, a source without a single valid line gives an empty table. When a key appears
    /// more than once the last line wins.
    pub fn parse(source: &str) -> RemapTable {
        let mut entries = HashMap::new();
        for (number, line) in source.lines().enumerate() {
            match parse_line(line) {
                Some((old, new)) => {
                    entries.insert(old, new);
                }
                None if !line.trim().is_empty() => {
                    trace!(line = number + 1, "skipping malformed remap entry");
                }
                None => {}
            }
        }

        RemapTable { entries }
    }

    /// Read the whole source from `reader` and parse it
    pub fn from_reader<R: Read>(mut reader: R) -> Result<RemapTable> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        Ok(Self::parse(&source))
    }

    /// Read and parse the remap table stored at `path`
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> Result<RemapTable> {
        let table = Self::from_reader(File::open(path.as_ref())?)?;
        debug!(entries = table.len(), "loaded remap table");
        Ok(table)
    }

    /// New index for `old`, if it has been remapped
    pub fn get(&self, old: i32) -> Option<i32> {
        self.entries.get(&old).copied()
    }

    /// Number of remapped indices
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this table remaps nothing
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the `(old, new)` pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.entries.iter().map(|(old, new)| (*old, *new))
    }

    /// Whether no index is both remapped and a remap target.
    ///
    /// Patching is only idempotent for such tables. With `A -> B` and `B -> C` a second pass turns
    /// the `B` written by the first pass into `C`.
    pub fn is_chain_free(&self) -> bool {
        let targets: HashSet<i32> = self.entries.values().copied().collect();
        !self.entries.keys().any(|old| targets.contains(old))
    }
}

impl FromIterator<(i32, i32)> for RemapTable {
    fn from_iter<T: IntoIterator<Item = (i32, i32)>>(iter: T) -> Self {
        RemapTable {
            entries: iter.into_iter().collect(),
        }
    }
}

fn parse_line(line: &str) -> Option<(i32, i32)> {
    let mut parts = line.trim().split(',');
    let old = parse_hex(parts.next()?)?;
    let new = parse_hex(parts.next()?)?;
    Some((old, new))
}

/// Parse a hex number as a 32 bit pattern, so `FFFFFFFF` is `-1`
fn parse_hex(field: &str) -> Option<i32> {
    let field = field.trim();
    if !field.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(field, 16).ok().map(|v| v as i32)
}
