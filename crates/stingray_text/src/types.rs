use derive_more::derive::{Constructor, Deref, DerefMut};
use indexmap::IndexMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// First eight bytes of every text bank
pub const SIGNATURE: [u8; 8] = [0xAE, 0xF3, 0x85, 0x3E, 0x01, 0x00, 0x00, 0x00];

/// Localized strings of one language, keyed by string id in file order
#[derive(Constructor, Clone, Debug, Default, PartialEq, Eq, Deref, DerefMut)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextTable {
    /// Language id, e.g. `0x03F97B57` for English (US)
    pub language: u32,

    #[deref]
    #[deref_mut]
    pub entries: IndexMap<u32, String>,
}
