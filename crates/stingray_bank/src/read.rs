use binrw::BinRead;
use indexmap::IndexMap;
use tracing::{debug, instrument, trace};
use winnow::binary::le_u32;
use winnow::combinator::{repeat, seq};
use winnow::token::take;
use winnow::{PResult, Parser};

use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::hirc::Hierarchy;
use crate::types::{MediaEntry, RawChunk};

/// A `tag, size, data` chunk borrowed from the bank bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub tag: [u8; 4],
    pub size: u32,
    pub data: &'a [u8],
}

impl Chunk<'_> {
    pub fn tag_str(&self) -> String {
        String::from_utf8_lossy(&self.tag).into_owned()
    }
}

fn parse_tag(s: &mut &[u8]) -> PResult<[u8; 4]> {
    take(4usize)
        .try_map(<[u8; 4]>::try_from)
        .parse_next(s)
}

fn parse_chunk<'s>(s: &mut &'s [u8]) -> PResult<Chunk<'s>> {
    seq!(Chunk {
        tag: parse_tag,
        size: le_u32,
        data: take(size),
    })
    .parse_next(s)
}

/// Splits a soundbank into its top-level chunks
pub fn parse_chunks(data: &[u8]) -> Result<Vec<Chunk<'_>>> {
    let mut input = data;
    let chunks: Vec<Chunk<'_>> = repeat(0.., parse_chunk).parse_next(&mut input)?;

    if !input.is_empty() {
        return Err(Error::MalformedBank(format!(
            "{} trailing bytes after the last chunk",
            input.len()
        )));
    }

    Ok(chunks)
}

/// Reads the `DIDX` media index
pub fn parse_media_index(data: &[u8]) -> Result<Vec<MediaEntry>> {
    if data.len() % 12 != 0 {
        return Err(Error::MalformedBank(format!(
            "media index of {} bytes is not a multiple of 12",
            data.len()
        )));
    }

    let mut cursor = ByteCursor::new(data.to_vec());
    (0..data.len() / 12)
        .map(|_| MediaEntry::read(&mut cursor).map_err(Error::from))
        .collect()
}

/// A soundbank split into the parts that can be edited independently
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bank {
    /// Contents of the `BKHD` chunk
    pub header: Vec<u8>,

    /// Media held in the `DATA` chunk, in `DIDX` order
    pub media: IndexMap<u32, Vec<u8>>,

    /// Records of the `HIRC` chunk
    pub hierarchy: Hierarchy,

    /// Every other chunk, in file order
    pub extra: Vec<RawChunk>,
}

impl Bank {
    /// Parses a complete soundbank
    #[instrument(skip_all, err, fields(size = data.len()))]
    pub fn parse(data: &[u8]) -> Result<Bank> {
        let mut header = None;
        let mut index = None;
        let mut media_data = None;
        let mut hierarchy = Hierarchy::default();
        let mut extra = Vec::new();

        for chunk in parse_chunks(data)? {
            trace!(tag = chunk.tag_str(), size = chunk.size);
            match &chunk.tag {
                b"BKHD" => header = Some(chunk.data.to_vec()),
                b"DIDX" => index = Some(parse_media_index(chunk.data)?),
                b"DATA" => media_data = Some(chunk.data),
                b"HIRC" => hierarchy = Hierarchy::parse(chunk.data)?,
                _ => extra.push(RawChunk {
                    tag: chunk.tag,
                    data: chunk.data.to_vec(),
                }),
            }
        }

        let header = header.ok_or(Error::MissingChunk("BKHD"))?;

        let mut media = IndexMap::new();
        if let Some(index) = index {
            let data = media_data.ok_or(Error::MissingChunk("DATA"))?;
            for entry in index {
                let start = entry.offset as usize;
                let end = start + entry.size as usize;
                let bytes = data.get(start..end).ok_or_else(|| {
                    Error::MalformedBank(format!(
                        "media {} spans {start}..{end} outside a DATA chunk of {} bytes",
                        entry.id,
                        data.len()
                    ))
                })?;
                media.insert(entry.id, bytes.to_vec());
            }
        }

        debug!(
            media = media.len(),
            records = hierarchy.len(),
            extra = extra.len(),
            "parsed soundbank"
        );

        Ok(Bank {
            header,
            media,
            hierarchy,
            extra,
        })
    }
}
