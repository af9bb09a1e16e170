//! # Text Bank Format Documentation
//!
//! This crate reads and writes the **text banks** that hold the localized strings of a
//! Stingray audio archive. Each text bank carries the strings of a single language.
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field     | Description                                           |
//! |----------------|-----------|-------------------------------------------------------|
//! | 0x0000         | Signature | 8 bytes: `AE F3 85 3E 01 00 00 00`                    |
//! | 0x0008         | Count     | 4 bytes: number of strings                            |
//! | 0x000C         | Language  | 4 bytes: language id                                  |
//! | 0x0010         | Ids       | Count * 4 bytes: string ids                           |
//! | ...            | Offsets   | Count * 4 bytes: offset of each string from the start |
//! | ...            | Strings   | nul-terminated UTF-8 strings                          |
//!
//! The first string starts at `16 + 8 * Count`.
//!
//! ## Additional Information
//!
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Known languages**: `0x03F97B57` English (US), `0x6F4515CB` English (UK)
//!

pub mod error;
pub mod read;
pub mod types;
pub mod write;

pub use types::TextTable;
