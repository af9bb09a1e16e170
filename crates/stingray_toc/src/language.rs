//! Language ids of localized text banks

use crate::error::{Error, Result};

/// English (US), the default language
pub const EN_US: u32 = 0x03F9_7B57;

/// English (UK)
pub const EN_UK: u32 = 0x6F45_15CB;

/// Maps a language name to its id
///
/// Known names are `English (US)` and `English (UK)`, anything else must be a number,
/// either decimal or `0x` prefixed hex.
pub fn language_lookup(name: &str) -> Result<u32> {
    match name.trim() {
        "English (US)" => Ok(EN_US),
        "English (UK)" => Ok(EN_UK),
        other => {
            let parsed = match other.strip_prefix("0x").or_else(|| other.strip_prefix("0X")) {
                Some(hex) => u32::from_str_radix(hex, 16),
                None => other.parse(),
            };
            parsed.map_err(|_| Error::CustomError(format!("unknown language {other:?}")))
        }
    }
}
