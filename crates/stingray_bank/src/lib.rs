//! This library reads and re-encodes the **Wwise soundbanks** stored inside Stingray audio archives.
//!
//! # Soundbank Format
//!
//! A soundbank is a flat sequence of chunks. Every chunk starts with a four byte ASCII tag
//! followed by the little-endian size of its data.
//!
//! | Offset (bytes) | Field | Description                              |
//! |----------------|-------|------------------------------------------|
//! | 0x0000         | Tag   | 4 bytes: chunk identifier, e.g. `BKHD`   |
//! | 0x0004         | Size  | 4 bytes: size of the data that follows   |
//! | 0x0008         | Data  | `Size` bytes                             |
//!
//! ## Chunks
//!
//! - **BKHD**: bank header, kept verbatim.
//! - **DIDX**: media index, one 12 byte entry per media: `id`, `offset` into `DATA`, `size`.
//! - **DATA**: the media bytes, concatenated without padding.
//! - **HIRC**: a `u32` record count followed by the hierarchy records.
//! - anything else is carried through untouched.
//!
//! ## Hierarchy Records
//!
//! | Offset (bytes) | Field | Description                                       |
//! |----------------|-------|---------------------------------------------------|
//! | 0x0000         | Kind  | 1 byte: record kind                               |
//! | 0x0001         | Size  | 4 bytes: size of everything after this field     |
//! | 0x0005         | Id    | 4 bytes: record id                                |
//!
//! The kinds decoded in detail are listed in [`hirc::kind`]. Counts and sizes are
//! recomputed when a record is encoded, so editing a record's lists keeps the bank
//! consistent.
//!
//! ## Additional Information
//!
//! - **Endianness**: Little-endian for all multi-byte values
//! - **Media codec**: only Vorbis sources ([`types::VORBIS`]) are located and repacked

pub mod cursor;
pub mod error;
pub mod hirc;
pub mod read;
pub mod types;
pub mod write;

pub use cursor::ByteCursor;
pub use hirc::{Hierarchy, HircRecord};
pub use read::Bank;
pub use write::BankBuilder;
