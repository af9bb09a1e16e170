//! Types for reading text banks
//!

use byteorder::{LittleEndian, ReadBytesExt};
use indexmap::{map::Entry, IndexMap};
use std::io::{Cursor, Read, Seek, SeekFrom};
use tracing::{instrument, warn};

use crate::error::{Error, Result};
use crate::types::{TextTable, SIGNATURE};

fn read_cstring<R: Read>(reader: &mut R) -> Result<String> {
    let mut buffer = Vec::new();
    loop {
        match reader.read_u8()? {
            0 => break,
            byte => buffer.push(byte),
        }
    }
    Ok(String::from_utf8(buffer)?)
}

impl TextTable {
    /// Read a text bank starting at the reader's current position.
    ///
    /// ```no_run
    /// fn list_strings(data: &[u8]) -> stingray_text::error::Result<()> {
    ///     let table = stingray_text::TextTable::from_bytes(data)?;
    ///
    ///     for (id, text) in table.iter() {
    ///         println!("{id}: {text}");
    ///     }
    ///
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip_all, err)]
    pub fn read<R: Read + Seek>(mut reader: R) -> Result<TextTable> {
        let base = reader.stream_position()?;

        let mut signature = [0u8; 8];
        reader.read_exact(&mut signature)?;
        if signature != SIGNATURE {
            return Err(Error::InvalidFile);
        }

        let count = reader.read_u32::<LittleEndian>()? as usize;
        let language = reader.read_u32::<LittleEndian>()?;

        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            ids.push(reader.read_u32::<LittleEndian>()?);
        }

        let mut offsets = Vec::with_capacity(count);
        for _ in 0..count {
            offsets.push(reader.read_u32::<LittleEndian>()?);
        }

        let mut entries = IndexMap::with_capacity(count);
        for (id, offset) in ids.into_iter().zip(offsets) {
            reader.seek(SeekFrom::Start(base + offset as u64))?;
            let text = read_cstring(&mut reader)?;

            match entries.entry(id) {
                Entry::Vacant(slot) => {
                    slot.insert(text);
                }
                Entry::Occupied(_) => {
                    warn!(id, language, "duplicate string id, keeping the first one");
                }
            }
        }

        Ok(TextTable { language, entries })
    }

    /// Read a text bank held in memory
    pub fn from_bytes(data: &[u8]) -> Result<TextTable> {
        TextTable::read(Cursor::new(data))
    }

    /// Number of strings contained in this table.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Try to get a string by its id
    pub fn by_id(&self, id: u32) -> Option<&str> {
        self.entries.get(&id).map(String::as_str)
    }
}
