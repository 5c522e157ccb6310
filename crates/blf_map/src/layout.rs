//! Fixed offsets and sizes describing the Forge map and preferences files.
//!
//! The patching code never hardcodes an offset; it reads them from a [`MapLayout`].

/// Smallest file length that can hold a Forge map
pub const MIN_MAP_LENGTH: u64 = 0xE1E0;

/// Magic found at the very start of every BLF file
pub const BLF_MAGIC: [u8; 4] = *b"_blf";
pub const BLF_MAGIC_OFFSET: u64 = 0x0;

/// Magic of the map variant chunk
pub const MAPV_MAGIC: [u8; 4] = *b"mapv";
pub const MAPV_MAGIC_OFFSET: u64 = 0x138;

/// Start of the tag reference table
pub const TAG_TABLE_OFFSET: u64 = 0xD498;
/// Size of a single tag reference record
pub const TAG_RECORD_STRIDE: u64 = 0xC;
/// Number of records in the tag reference table
pub const TAG_RECORD_COUNT: usize = 256;
/// Size of the tag index at the start of each record
pub const TAG_INDEX_SIZE: u64 = 4;

/// Name of the preferences file, relative to the game directory
pub const PREFERENCES_FILE: &str = "preferences.dat";
/// "multiplayer valid" flag
pub const MULTIPLAYER_VALID_OFFSET: u64 = 0x378;
/// "forge valid" flag
pub const FORGE_VALID_OFFSET: u64 = 0xEA90;

/// Describes where the interesting parts of a map file live
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MapLayout {
    /// Files shorter than this are not maps
    pub min_length: u64,

    /// Each magic and the offset it must appear at
    pub magics: [(u64, [u8; 4]); 2],

    /// Offset of the first tag reference
    pub tag_table_offset: u64,

    /// Distance between two tag references
    pub tag_record_stride: u64,

    /// Number of tag references
    pub tag_record_count: usize,
}

impl MapLayout {
    /// Layout of maps saved by ElDewrito 0.5
    pub const FORGE_0_5: MapLayout = MapLayout {
        min_length: MIN_MAP_LENGTH,
        magics: [
            (BLF_MAGIC_OFFSET, BLF_MAGIC),
            (MAPV_MAGIC_OFFSET, MAPV_MAGIC),
        ],
        tag_table_offset: TAG_TABLE_OFFSET,
        tag_record_stride: TAG_RECORD_STRIDE,
        tag_record_count: TAG_RECORD_COUNT,
    };

    /// Offset of the tag reference in `slot`.
    ///
    /// Saturates at `u64::MAX` for layouts whose table does not fit in a 64 bit offset, so such a
    /// layout requires a length no file can have.
    #[inline(always)]
    pub fn record_offset(&self, slot: usize) -> u64 {
        (slot as u64)
            .saturating_mul(self.tag_record_stride)
            .saturating_add(self.tag_table_offset)
    }

    /// Length a file must have before any field is read.
    ///
    /// Covers both the minimum map size and the end of the last tag index.
    pub fn required_length(&self) -> u64 {
        let last_index_end = match self.tag_record_count {
            0 => 0,
            n => self.record_offset(n - 1).saturating_add(TAG_INDEX_SIZE),
        };
        let last_magic_end = self
            .magics
            .iter()
            .map(|(offset, magic)| offset.saturating_add(magic.len() as u64))
            .max()
            .unwrap_or(0);

        self.min_length.max(last_index_end).max(last_magic_end)
    }
}

impl Default for MapLayout {
    fn default() -> Self {
        Self::FORGE_0_5
    }
}
