//! Base types for the structure of a Forge map file.

use binrw::{BinRead, BinWrite};

/// Entry of the tag reference table
///
/// Only the leading tag index is understood, the remaining bytes are carried as is.
/// All data is stored in little endian format
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct TagReference {
    /// Index into the global tag list, negative when the slot is unused
    pub index: i32,

    /// Unknown trailing data
    pub data: [u8; 8],
}

impl TagReference {
    /// Whether this slot references no tag
    pub fn is_unused(&self) -> bool {
        self.index < 0
    }
}

/// Result of patching a single file
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The file is not a Forge map and was left untouched
    NotApplicable,

    /// The file is a Forge map and its tag references have been remapped.
    ///
    /// This is returned even when none of the references needed rewriting.
    Patched,
}

impl PatchOutcome {
    pub fn is_patched(&self) -> bool {
        matches!(self, PatchOutcome::Patched)
    }
}
