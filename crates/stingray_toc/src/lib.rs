//! This library loads, edits and patches the **TOC audio archives** of Stingray games.
//!
//! # TOC Archive Format Documentation
//!
//! An archive is a TOC file, named by a 64-bit hex id, and an optional `<name>.stream`
//! file next to it. The TOC file lists every object and holds the data of soundbanks,
//! bank dependencies and text banks; the stream file holds the audio that banks stream
//! from disk.
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field        | Description                                           |
//! |----------------|--------------|-------------------------------------------------------|
//! | 0x0000         | Magic number | 4 bytes: `0xF0000011`                                 |
//! | 0x0004         | Type Count   | 4 bytes: number of type rows                          |
//! | 0x0008         | File Count   | 4 bytes: number of entries                            |
//! | 0x000C         | Unknown      | 4 bytes: copied through                               |
//! | 0x0010         | Reserved     | 56 bytes: copied through                              |
//! | 0x0048         | Type Rows    | Type Count * 32 bytes                                 |
//! | ...            | Entries      | File Count * 80 bytes                                 |
//! | ...            | Padding      | 8 bytes, only when there are entries                  |
//! | ...            | Data         | one 16 byte aligned block per entry                   |
//!
//! ### Type Rows
//!
//! One row per kind of entry present: `reserved u64`, `type_id u64`, `count u64`,
//! `alignment u32` (always 16) and `unknown u32` (always 64). The type ids are listed in
//! [`types::type_id`].
//!
//! ### Entries
//!
//! | Offset (bytes) | Field               | Description                                     |
//! |----------------|---------------------|-------------------------------------------------|
//! | 0x0000         | File Id             | 8 bytes: id of the object                       |
//! | 0x0008         | Type Id             | 8 bytes: kind of the object                     |
//! | 0x0010         | Data Offset         | 8 bytes: offset of the data in the TOC file     |
//! | 0x0018         | Stream Offset       | 8 bytes: offset of the payload in the stream    |
//! | 0x0020         | GPU Resource Offset | 8 bytes                                         |
//! | 0x0028         | Reserved            | 16 bytes                                        |
//! | 0x0038         | Data Size           | 4 bytes                                         |
//! | 0x003C         | Stream Size         | 4 bytes                                         |
//! | 0x0040         | GPU Resource Size   | 4 bytes                                         |
//! | 0x0044         | Reserved            | 8 bytes: 16 and 64                              |
//! | 0x004C         | Entry Index         | 4 bytes: position of the entry                  |
//!
//! Entries are written streams first, then banks, dependencies and text banks.
//!
//! ### Entry Data
//!
//! - **Stream**: a small header whose bytes `8..12` hold the payload size.
//! - **Bank**: a 16 byte wrapper (`tag`, `size`, `bank_id`) followed by a Wwise soundbank,
//!   see the `stingray_bank` crate.
//! - **Dependency**: `tag u32`, `size u32` and the UTF-8 path of the bank with the same id.
//! - **Text**: a text bank, see the `stingray_text` crate.
//!
//! ## Streamed Audio
//!
//! A bank locates the streamed audio of a source through the Murmur2 64 hash of its
//! directory path joined with the source id, see [`hash::stream_resource_id`].
//!
//! ## Additional Information
//!
//! - **Endianness**: Little-endian for all multi-byte values
//! - **Patches**: a patch is an archive named `<name>.patch_<n>` holding only the
//!   objects that differ from the base archive
//!

pub mod archive;
pub mod audio;
pub mod bank;
pub mod error;
pub mod graph;
pub mod hash;
pub mod language;
pub mod modding;
pub mod read;
pub mod stream;
pub mod text;
pub mod tracked;
pub mod types;
pub mod write;

pub use archive::{Archive, LoadOptions};
pub use audio::{AudioId, AudioPayload};
pub use graph::{SoundGraph, StringKey, TrackKey};
pub use modding::{Mod, ModOptions};
