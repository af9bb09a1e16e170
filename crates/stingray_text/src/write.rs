use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

use crate::error::{Error, Result};
use crate::types::{TextTable, SIGNATURE};

fn to_u32(value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::TooLarge(value))
}

impl TextTable {
    /// Write the table as a text bank
    ///
    /// Strings are stored in id order right after the offset table, each followed by a nul.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&SIGNATURE)?;
        writer.write_u32::<LittleEndian>(to_u32(self.entries.len())?)?;
        writer.write_u32::<LittleEndian>(self.language)?;

        for id in self.entries.keys() {
            writer.write_u32::<LittleEndian>(*id)?;
        }

        let mut offset = 16 + 8 * self.entries.len();
        for text in self.entries.values() {
            writer.write_u32::<LittleEndian>(to_u32(offset)?)?;
            offset += text.len() + 1;
        }

        for text in self.entries.values() {
            writer.write_all(text.as_bytes())?;
            writer.write_u8(0)?;
        }

        Ok(())
    }

    /// Encode the table into a new buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write(&mut out)?;
        Ok(out)
    }
}
