//! This library validates and patches **BLF** Forge map files used by *Halo Online* / *ElDewrito*.
//!
//! # Forge Map Format Documentation
//!
//! Forge maps are saved as fixed-layout binary files (usually with the `.map` extension) built from
//! BLF chunks. Each map carries a table of references into the game's global tag list. When the tag
//! list is reorganized by a game update, the indices stored in that table go stale and the map no
//! longer loads. This crate rewrites those indices using an old-to-new remap table.
//!
//! Only the handful of fields needed for the rewrite are understood. Everything else in the file is
//! treated as opaque and is never written.
//!
//! ## File Structure
//!
//! | Offset (bytes)         | Field                  | Description                                                |
//! |------------------------|------------------------|------------------------------------------------------------|
//! | 0x0000                 | Magic number           | 4 bytes: ASCII `_blf`                                      |
//! | 0x0138                 | Magic number           | 4 bytes: ASCII `mapv`                                      |
//! | 0xD498 + i * 0xC       | Tag reference          | 12 bytes per record, 256 records                           |
//!
//! A file shorter than `0xE1E0` bytes is never a map.
//!
//! ### Tag Reference Table
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Tag index              | 4 bytes: signed index, negative when the slot is unused |
//! | 0x0004         | Unknown                | 8 bytes: left untouched                                 |
//!
//! ## Preferences File
//!
//! The game caches whether its installed maps were valid in `preferences.dat`. After maps are patched
//! the cache must be invalidated so the game rescans them.
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0378         | Multiplayer valid      | 4 bytes: non-zero when multiplayer maps were validated  |
//! | 0xEA90         | Forge valid            | 4 bytes: non-zero when forge maps were validated        |
//!
//! ## Additional Information
//!
//! - **File Extension**: `.map`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Crash safety**: patching happens in place, one 4-byte field at a time. An interrupted patch
//!   leaves a partially remapped but structurally intact file; it is not atomic.
//!

pub mod error;
mod exclusive;
pub mod layout;
pub mod patch;
pub mod preferences;
pub mod remap;
pub mod types;

pub use layout::MapLayout;
pub use patch::{patch, MapPatcher};
pub use preferences::invalidate;
pub use remap::RemapTable;
pub use types::{PatchOutcome, TagReference};
