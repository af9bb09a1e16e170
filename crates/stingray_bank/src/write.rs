use binrw::BinWrite;
use indexmap::IndexMap;
use tracing::{instrument, trace};

use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::hirc::Hierarchy;
use crate::types::{MediaEntry, RawChunk};

fn chunk_size(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::MalformedBank(format!("chunk of {len} bytes is too large")))
}

fn write_chunk(out: &mut ByteCursor, tag: &[u8; 4], data: &[u8]) -> Result<()> {
    out.write_bytes(tag);
    out.write_u32(chunk_size(data.len())?);
    out.write_bytes(data);
    Ok(())
}

/// Assembles soundbank bytes chunk by chunk
///
/// The output is `BKHD`, then `DIDX` and `DATA` when at least one media was added,
/// then `HIRC`, then any extra chunks in the order given.
#[derive(Debug, Default)]
pub struct BankBuilder {
    header: Vec<u8>,
    index: IndexMap<u32, MediaEntry>,
    data: Vec<u8>,
}

impl BankBuilder {
    /// Starts a bank with the given `BKHD` contents
    pub fn new(header: impl Into<Vec<u8>>) -> Self {
        BankBuilder {
            header: header.into(),
            ..Default::default()
        }
    }

    /// Appends media to the `DATA` chunk
    ///
    /// Returns `false` without touching the bank when `id` was already added.
    pub fn add_media(&mut self, id: u32, bytes: &[u8]) -> Result<bool> {
        if self.index.contains_key(&id) {
            return Ok(false);
        }

        let entry = MediaEntry {
            id,
            offset: chunk_size(self.data.len())?,
            size: chunk_size(bytes.len())?,
        };
        trace!(id, offset = entry.offset, size = entry.size, "adding media");

        self.index.insert(id, entry);
        self.data.extend_from_slice(bytes);
        Ok(true)
    }

    pub fn media_count(&self) -> usize {
        self.index.len()
    }

    /// Writes every chunk and returns the bank bytes
    #[instrument(skip_all, err, fields(media = self.index.len(), records = hierarchy.len()))]
    pub fn finish(self, hierarchy: &Hierarchy, extra: &[RawChunk]) -> Result<Vec<u8>> {
        let mut out = ByteCursor::default();
        write_chunk(&mut out, b"BKHD", &self.header)?;

        if !self.index.is_empty() {
            let mut index = ByteCursor::default();
            for entry in self.index.values() {
                entry.write(&mut index)?;
            }
            write_chunk(&mut out, b"DIDX", index.get_ref())?;
            write_chunk(&mut out, b"DATA", &self.data)?;
        }

        write_chunk(&mut out, b"HIRC", &hierarchy.to_bytes()?)?;

        for chunk in extra {
            write_chunk(&mut out, &chunk.tag, &chunk.data)?;
        }

        Ok(out.into_inner())
    }
}
