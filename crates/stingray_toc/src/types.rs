//! Base types for the structure of a TOC file.

use binrw::{binrw, BinRead, BinWrite};

/// Identifies what a TOC entry holds
pub mod type_id {
    /// Audio kept in the stream file
    pub const STREAM: u64 = 0x504B_5523_5D21_440E;

    /// A soundbank
    pub const BANK: u64 = 0x535A_7BD3_E650_D799;

    /// The path of a soundbank
    pub const DEPENDENCY: u64 = 0xAF32_095C_82F2_B070;

    /// Localized strings
    pub const TEXT: u64 = 0x0D97_2BAB_10B4_0FD3;
}

/// TOC file header
///
/// Every TOC starts with the magic `0xF0000011`. All data is stored in little endian format.
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(magic = 0xF000_0011u32, little)]
pub struct TocHeader {
    /// The number of type rows following the header
    pub num_types: u32,

    /// The number of entries following the type rows
    pub num_files: u32,

    /// Copied through unchanged
    pub unknown: u32,

    /// Copied through unchanged
    pub reserved: [u8; 56],
}

impl Default for TocHeader {
    fn default() -> Self {
        Self {
            num_types: Default::default(),
            num_files: Default::default(),
            unknown: Default::default(),
            reserved: [0; 56],
        }
    }
}

/// Per-class summary row
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct TypeDescriptor {
    pub reserved: u64,
    pub type_id: u64,
    pub count: u64,
    pub alignment: u32,
    pub unknown: u32,
}

impl TypeDescriptor {
    pub fn new(type_id: u64, count: u64) -> Self {
        Self {
            reserved: 0,
            type_id,
            count,
            alignment: 16,
            unknown: 64,
        }
    }
}

/// TOC file entry
///
/// Locates one object's data inside the TOC file and, for streams, inside the stream file.
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct TocEntry {
    /// The id of the object, shared by a bank and its dependency
    pub file_id: u64,

    /// One of [`type_id`]
    pub type_id: u64,

    /// Offset of the object's data from the start of the TOC file
    pub data_offset: u64,

    /// Offset of the object's payload from the start of the stream file
    pub stream_offset: u64,

    pub gpu_resource_offset: u64,
    pub reserved1: u64,
    pub reserved2: u64,

    /// Size of the data in the TOC file
    pub data_size: u32,

    /// Size of the payload in the stream file
    pub stream_size: u32,

    pub gpu_resource_size: u32,
    pub reserved3: u32,
    pub reserved4: u32,

    /// Position of this entry among all entries
    pub entry_index: u32,
}

impl Default for TocEntry {
    fn default() -> Self {
        Self {
            file_id: Default::default(),
            type_id: Default::default(),
            data_offset: Default::default(),
            stream_offset: Default::default(),
            gpu_resource_offset: Default::default(),
            reserved1: Default::default(),
            reserved2: Default::default(),
            data_size: Default::default(),
            stream_size: Default::default(),
            gpu_resource_size: Default::default(),
            reserved3: 16,
            reserved4: 64,
            entry_index: Default::default(),
        }
    }
}

/// Header in front of the chunks of a bank's TOC data
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct BankWrapper {
    pub tag: u32,

    /// Size of the bank bytes that follow
    pub size: u32,

    pub bank_id: u64,
}

/// TOC data of a dependency entry: the path of the bank with the same file id
#[binrw]
#[brw(little)]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub tag: u32,

    #[br(temp)]
    #[bw(calc = path.len() as u32)]
    size: u32,

    #[br(count = size, try_map = String::from_utf8)]
    #[bw(map = |p: &String| p.as_bytes().to_vec())]
    pub path: String,
}

impl Dependency {
    pub fn new(tag: u32, path: impl Into<String>) -> Self {
        Self {
            tag,
            path: path.into(),
        }
    }

    /// Last component of the bank path
    pub fn file_name(&self) -> &str {
        self.path
            .rsplit_once('/')
            .map_or(self.path.as_str(), |(_, name)| name)
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::{BinRead, BinWrite};
    use pretty_assertions::{assert_eq, assert_str_eq};

    use crate::error::Result;
    use crate::types::{type_id, Dependency, TocEntry, TocHeader, TypeDescriptor};

    #[test]
    fn read_header() -> Result<()> {
        let mut data = vec![0x11, 0x00, 0x00, 0xF0];
        data.extend([0x01, 0x00, 0x00, 0x00]);
        data.extend([0x02, 0x00, 0x00, 0x00]);
        data.extend([0x03, 0x00, 0x00, 0x00]);
        data.extend([0xAB; 56]);

        let header = TocHeader::read(&mut Cursor::new(data))?;
        assert_eq!(
            header,
            TocHeader {
                num_types: 1,
                num_files: 2,
                unknown: 3,
                reserved: [0xAB; 56],
            }
        );

        Ok(())
    }

    #[test]
    fn bad_magic() {
        let data = vec![0x00; 72];

        assert!(matches!(
            TocHeader::read(&mut Cursor::new(data)),
            Err(binrw::Error::BadMagic { .. })
        ));
    }

    #[test]
    fn write_type_descriptor() -> Result<()> {
        #[rustfmt::skip]
        let expected = vec![
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x99, 0xD7, 0x50, 0xE6, 0xD3, 0x7B, 0x5A, 0x53,
            0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x10, 0x00, 0x00, 0x00,
            0x40, 0x00, 0x00, 0x00,
        ];

        let mut actual = Vec::new();
        TypeDescriptor::new(type_id::BANK, 2).write(&mut Cursor::new(&mut actual))?;

        assert_str_eq!(format!("{:02X?}", actual), format!("{:02X?}", expected));

        Ok(())
    }

    #[test]
    fn entry_round_trip() -> Result<()> {
        let entry = TocEntry {
            file_id: 0x1122334455667788,
            type_id: type_id::STREAM,
            data_offset: 0x1B0,
            stream_offset: 0x40,
            data_size: 0x20,
            stream_size: 0x64,
            entry_index: 3,
            ..Default::default()
        };

        let mut actual = Vec::new();
        entry.write(&mut Cursor::new(&mut actual))?;
        assert_eq!(actual.len(), 80);
        assert_eq!(actual[72..76].to_vec(), vec![0x40, 0x00, 0x00, 0x00]);
        assert_eq!(TocEntry::read(&mut Cursor::new(actual))?, entry);

        Ok(())
    }

    #[test]
    fn dependency_has_no_terminator() -> Result<()> {
        #[rustfmt::skip]
        let expected = vec![
            0x01, 0x00, 0x00, 0x00,
            0x0B, 0x00, 0x00, 0x00,
            b'a', b'u', b'd', b'i', b'o', b'/', b'm', b'u', b's', b'i', b'c',
        ];

        let dependency = Dependency::new(1, "audio/music");

        let mut actual = Vec::new();
        dependency.write(&mut Cursor::new(&mut actual))?;
        assert_str_eq!(format!("{:02X?}", actual), format!("{:02X?}", expected));
        assert_eq!(Dependency::read(&mut Cursor::new(actual))?, dependency);
        assert_eq!(dependency.file_name(), "music");

        Ok(())
    }
}
