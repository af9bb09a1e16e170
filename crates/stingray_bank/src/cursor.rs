//! Growable byte buffer with a read/write cursor.
//!
//! Every multi-byte value is little-endian. Moving the cursor or writing past the
//! end of the buffer zero-extends it, reading past the end fails with
//! [`Error::UnexpectedEof`].

use byteorder::{ByteOrder, LittleEndian};
use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::error::{Error, Result};

/// In-memory buffer used by every decoder and encoder in this workspace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteCursor {
    buffer: Vec<u8>,
    position: usize,
}

macro_rules! primitive {
    ($($ty:ty => $read:ident, $write:ident, $bo_read:ident, $bo_write:ident;)*) => {
        $(
            #[doc = concat!("Reads a `", stringify!($ty), "` and advances the cursor")]
            pub fn $read(&mut self) -> Result<$ty> {
                let bytes = self.read_bytes(std::mem::size_of::<$ty>())?;
                Ok(LittleEndian::$bo_read(bytes))
            }

            #[doc = concat!("Writes a `", stringify!($ty), "` at the cursor")]
            pub fn $write(&mut self, value: $ty) {
                let mut bytes = [0u8; std::mem::size_of::<$ty>()];
                LittleEndian::$bo_write(&mut bytes, value);
                self.write_bytes(&bytes);
            }
        )*
    };
}

impl ByteCursor {
    /// Wraps an existing buffer, positioned at its start
    pub fn new(buffer: impl Into<Vec<u8>>) -> Self {
        ByteCursor {
            buffer: buffer.into(),
            position: 0,
        }
    }

    /// Current cursor position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves the cursor, zero-extending the buffer when `position` is past its end
    pub fn set_position(&mut self, position: usize) {
        if position > self.buffer.len() {
            self.buffer.resize(position, 0);
        }
        self.position = position;
    }

    /// Total length of the buffer
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the buffer holds no bytes at all
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Bytes left between the cursor and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// Borrow the whole buffer
    pub fn get_ref(&self) -> &[u8] {
        &self.buffer
    }

    /// Unwrap and return the inner buffer
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    /// Reads `count` bytes and advances the cursor past them
    pub fn read_bytes(&mut self, count: usize) -> Result<&[u8]> {
        let available = self.remaining();
        if count > available {
            return Err(Error::UnexpectedEof {
                position: self.position,
                requested: count,
                available,
            });
        }

        let start = self.position;
        self.position += count;
        Ok(&self.buffer[start..self.position])
    }

    /// Advances the cursor without looking at the bytes
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.read_bytes(count).map(|_| ())
    }

    /// Reads a nul-terminated string, returning it without the terminator
    pub fn read_cstring(&mut self) -> Result<Vec<u8>> {
        let tail = &self.buffer[self.position.min(self.buffer.len())..];
        let Some(length) = tail.iter().position(|b| *b == 0) else {
            return Err(Error::UnexpectedEof {
                position: self.position,
                requested: tail.len() + 1,
                available: tail.len(),
            });
        };

        let value = self.read_bytes(length)?.to_vec();
        self.skip(1)?;
        Ok(value)
    }

    /// Reads a byte without advancing the cursor
    pub fn peek_u8(&mut self) -> Result<u8> {
        let start = self.position;
        let value = self.read_u8();
        self.position = start;
        value
    }

    /// Reads a `u32` without advancing the cursor
    pub fn peek_u32(&mut self) -> Result<u32> {
        let start = self.position;
        let value = self.read_u32();
        self.position = start;
        value
    }

    /// Reads a byte and advances the cursor
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Reads a signed byte and advances the cursor
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Writes `bytes` at the cursor, overwriting what is there and growing the buffer as needed
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        let end = self.position + bytes.len();
        if end > self.buffer.len() {
            self.buffer.resize(end, 0);
        }
        self.buffer[self.position..end].copy_from_slice(bytes);
        self.position = end;
    }

    /// Writes a byte at the cursor
    pub fn write_u8(&mut self, value: u8) {
        self.write_bytes(&[value]);
    }

    /// Writes a signed byte at the cursor
    pub fn write_i8(&mut self, value: i8) {
        self.write_u8(value as u8);
    }

    primitive! {
        u16 => read_u16, write_u16, read_u16, write_u16;
        u32 => read_u32, write_u32, read_u32, write_u32;
        u64 => read_u64, write_u64, read_u64, write_u64;
        i16 => read_i16, write_i16, read_i16, write_i16;
        i32 => read_i32, write_i32, read_i32, write_i32;
        i64 => read_i64, write_i64, read_i64, write_i64;
        f64 => read_f64, write_f64, read_f64, write_f64;
    }
}

impl From<Vec<u8>> for ByteCursor {
    fn from(value: Vec<u8>) -> Self {
        ByteCursor::new(value)
    }
}

impl Read for ByteCursor {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let count = self.remaining().min(buf.len());
        if count == 0 {
            return Ok(0);
        }
        buf[..count].copy_from_slice(&self.buffer[self.position..self.position + count]);
        self.position += count;
        Ok(count)
    }
}

impl Write for ByteCursor {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for ByteCursor {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let (base, offset) = match pos {
            SeekFrom::Start(n) => {
                self.set_position(n as usize);
                return Ok(n);
            }
            SeekFrom::End(n) => (self.buffer.len() as u64, n),
            SeekFrom::Current(n) => (self.position as u64, n),
        };

        match base.checked_add_signed(offset) {
            Some(n) => {
                self.set_position(n as usize);
                Ok(n)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )),
        }
    }
}
