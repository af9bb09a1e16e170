use indexmap::IndexMap;
use stingray_text::TextTable;

use crate::error::Result;
use crate::graph::{SoundGraph, StringKey};
use crate::tracked::ModificationCounter;
use crate::types::TocEntry;

/// A text bank of the archive; its strings live in the graph's string table
#[derive(Debug, Clone, PartialEq)]
pub struct TextBank {
    pub id: u64,
    pub entry: TocEntry,
    pub language: u32,

    /// Ids of the strings in this bank, in file order
    pub string_ids: Vec<u32>,
    pub counter: ModificationCounter,
}

impl TextBank {
    pub fn is_modified(&self) -> bool {
        self.counter.is_modified()
    }

    pub fn keys(&self) -> impl Iterator<Item = StringKey> + '_ {
        self.string_ids
            .iter()
            .map(|id| StringKey::new(self.language, *id))
    }

    /// Encodes the bank with the current strings of `graph`
    pub fn generate(&self, graph: &SoundGraph) -> Result<Vec<u8>> {
        let entries = self
            .keys()
            .filter_map(|key| {
                graph
                    .strings
                    .get(&key)
                    .map(|text| (key.id, text.get().clone()))
            })
            .collect::<IndexMap<_, _>>();

        Ok(TextTable::new(self.language, entries).to_bytes()?)
    }
}
