//! Serialization of a [`SoundGraph`] into a TOC file and its stream file

use binrw::BinWrite;
use bon::Builder;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, trace, warn};

use crate::error::{Error, NotFoundError, Result};
use crate::graph::SoundGraph;
use crate::types::{type_id, TocEntry, TocHeader, TypeDescriptor};

/// Alignment of every data block and stream payload
pub const ALIGNMENT: usize = 16;

const HEADER_SIZE: usize = 72;
const TYPE_SIZE: usize = 32;
const ENTRY_SIZE: usize = 80;

/// Zero bytes between the entry table and the first data block, absent when there are no entries
const TABLE_PADDING: usize = 8;

fn pad(buf: &mut Vec<u8>) {
    let padded = buf.len().next_multiple_of(ALIGNMENT);
    buf.resize(padded, 0);
}

fn to_u32(len: usize, file_id: u64) -> Result<u32> {
    u32::try_from(len).map_err(|_| {
        Error::MalformedContainer(format!("entry {file_id:#018x} grew past 4 GiB"))
    })
}

/// A TOC file and its stream file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrittenArchive {
    pub toc: Vec<u8>,

    /// Empty when no stream entry was written
    pub stream: Vec<u8>,
}

impl WrittenArchive {
    /// Writes `<dir>/<name>` and, when there is stream data, `<dir>/<name>.stream`
    ///
    /// Returns the path of the TOC file.
    #[instrument(skip(self), err)]
    pub fn write_to(&self, dir: &Path, name: &str) -> Result<PathBuf> {
        let path = dir.join(name);
        fs::write(&path, &self.toc)?;
        if !self.stream.is_empty() {
            fs::write(dir.join(format!("{name}.stream")), &self.stream)?;
        }
        Ok(path)
    }
}

struct Planned {
    entry: TocEntry,
    data: Vec<u8>,
}

/// Serializes a selection of the containers of a graph
///
/// Entries are written streams first, then banks, dependencies and text banks, each in
/// the order given. Offsets are assigned while the data is laid out, so the entry table
/// always matches the bytes that follow it.
#[derive(Builder)]
pub struct TocWriter<'a> {
    graph: &'a SoundGraph,

    /// Copied except for the counts
    #[builder(default)]
    header: TocHeader,

    #[builder(default)]
    streams: Vec<u64>,

    #[builder(default)]
    banks: Vec<u64>,

    #[builder(default)]
    text_banks: Vec<u64>,
}

impl<'a> TocWriter<'a> {
    /// Writer selecting every container of `graph`
    pub fn all(graph: &'a SoundGraph, header: TocHeader) -> Self {
        TocWriter::builder()
            .graph(graph)
            .header(header)
            .streams(graph.streams.keys().copied().collect())
            .banks(graph.banks.keys().copied().collect())
            .text_banks(graph.text_banks.keys().copied().collect())
            .build()
    }

    #[instrument(skip(self), err, fields(streams = self.streams.len(), banks = self.banks.len(), text_banks = self.text_banks.len()))]
    pub fn write(&self) -> Result<WrittenArchive> {
        let mut stream = Vec::new();

        let mut streams = Vec::with_capacity(self.streams.len());
        for id in &self.streams {
            let entry = self
                .graph
                .streams
                .get(id)
                .ok_or_else(|| NotFoundError::Archive(format!("stream {id:#018x}")))?;
            let payload = self
                .graph
                .audio
                .get(&entry.audio_id())
                .ok_or(NotFoundError::Audio(entry.audio_id()))?;

            let size = to_u32(payload.size(), *id)?;
            let offset = stream.len() as u64;
            stream.extend_from_slice(payload.bytes());
            pad(&mut stream);

            streams.push(Planned {
                entry: TocEntry {
                    type_id: type_id::STREAM,
                    stream_offset: offset,
                    stream_size: size,
                    ..entry.entry
                },
                data: entry.header_for(size),
            });
        }

        let mut banks = Vec::with_capacity(self.banks.len());
        let mut dependencies = Vec::new();
        for id in &self.banks {
            let bank = self
                .graph
                .banks
                .get(id)
                .ok_or_else(|| NotFoundError::Archive(format!("bank {id:#018x}")))?;

            banks.push(Planned {
                entry: TocEntry {
                    type_id: type_id::BANK,
                    ..bank.entry
                },
                data: bank.generate(self.graph)?,
            });

            match &bank.dependency {
                Some(dependency) => {
                    let mut data = Cursor::new(Vec::new());
                    dependency.dependency.write(&mut data)?;
                    dependencies.push(Planned {
                        entry: TocEntry {
                            type_id: type_id::DEPENDENCY,
                            ..dependency.entry
                        },
                        data: data.into_inner(),
                    });
                }
                None => warn!(bank = id, "writing bank without a dependency entry"),
            }
        }

        let mut texts = Vec::with_capacity(self.text_banks.len());
        for id in &self.text_banks {
            let text_bank = self
                .graph
                .text_banks
                .get(id)
                .ok_or_else(|| NotFoundError::Archive(format!("text bank {id:#018x}")))?;

            texts.push(Planned {
                entry: TocEntry {
                    type_id: type_id::TEXT,
                    ..text_bank.entry
                },
                data: text_bank.generate(self.graph)?,
            });
        }

        let types = [
            (type_id::STREAM, streams.len()),
            (type_id::BANK, banks.len()),
            (type_id::DEPENDENCY, dependencies.len()),
            (type_id::TEXT, texts.len()),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(type_id, count)| TypeDescriptor::new(type_id, count as u64))
        .collect::<Vec<_>>();

        let planned = streams
            .into_iter()
            .chain(banks)
            .chain(dependencies)
            .chain(texts)
            .collect::<Vec<_>>();

        let padding = if planned.is_empty() { 0 } else { TABLE_PADDING };
        let data_start =
            HEADER_SIZE + TYPE_SIZE * types.len() + ENTRY_SIZE * planned.len() + padding;

        let mut entries = Vec::with_capacity(planned.len());
        let mut data = Vec::new();
        for (index, item) in planned.into_iter().enumerate() {
            let offset = (data_start + data.len()) as u64;
            let size = to_u32(item.data.len(), item.entry.file_id)?;
            data.extend_from_slice(&item.data);
            pad(&mut data);

            trace!(
                file_id = item.entry.file_id,
                type_id = item.entry.type_id,
                offset,
                size,
                "laid out entry"
            );
            entries.push(TocEntry {
                data_offset: offset,
                data_size: size,
                entry_index: index as u32,
                ..item.entry
            });
        }

        let header = TocHeader {
            num_types: types.len() as u32,
            num_files: entries.len() as u32,
            ..self.header
        };

        let mut toc = Cursor::new(Vec::with_capacity(data_start + data.len()));
        header.write(&mut toc)?;
        for row in &types {
            row.write(&mut toc)?;
        }
        for entry in &entries {
            entry.write(&mut toc)?;
        }

        let mut toc = toc.into_inner();
        toc.resize(data_start, 0);
        toc.extend_from_slice(&data);

        debug!(
            entries = entries.len(),
            toc = toc.len(),
            stream = stream.len(),
            "wrote archive"
        );
        Ok(WrittenArchive { toc, stream })
    }
}
