//! Loading a TOC file and its stream file into a [`SoundGraph`]

use binrw::BinRead;
use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use stingray_bank::hirc::HircRecord;
use stingray_bank::read::Bank;
use stingray_text::TextTable;
use tracing::{debug, instrument, trace, warn};

use crate::audio::{AudioId, AudioPayload};
use crate::bank::{BankDependency, SoundBank};
use crate::error::{Error, Result};
use crate::graph::{SoundGraph, StringKey, TrackKey};
use crate::stream::StreamEntry;
use crate::text::TextBank;
use crate::tracked::{ModificationCounter, Owner, Tracked};
use crate::types::{type_id, BankWrapper, Dependency, TocEntry, TocHeader, TypeDescriptor};

/// Size of the [`BankWrapper`] in front of every bank
const BANK_WRAPPER_SIZE: usize = 16;

fn slice<'a>(data: &'a [u8], offset: u64, size: u32, what: &str, file_id: u64) -> Result<&'a [u8]> {
    usize::try_from(offset)
        .ok()
        .and_then(|start| data.get(start..start.checked_add(size as usize)?))
        .ok_or_else(|| {
            Error::MalformedContainer(format!(
                "{what} of {file_id:#018x} at {offset}+{size} is outside of {} bytes",
                data.len()
            ))
        })
}

/// Reads the header, type rows and entries of a TOC file
#[instrument(skip_all, err)]
pub fn read_entries(toc: &[u8]) -> Result<(TocHeader, Vec<TocEntry>)> {
    let mut reader = Cursor::new(toc);

    let header = TocHeader::read(&mut reader).map_err(|e| match e {
        binrw::Error::BadMagic { .. } => Error::InvalidArchive,
        e => Error::from(e),
    })?;

    let types = (0..header.num_types)
        .map(|_| TypeDescriptor::read(&mut reader))
        .collect::<binrw::BinResult<Vec<_>>>()?;
    for row in &types {
        trace!(type_id = row.type_id, count = row.count, "type row");
    }

    let entries = (0..header.num_files)
        .map(|_| TocEntry::read(&mut reader))
        .collect::<binrw::BinResult<Vec<_>>>()?;

    debug!(
        types = types.len(),
        entries = entries.len(),
        "read table of contents"
    );
    Ok((header, entries))
}

fn read_bank(entry: TocEntry, data: &[u8]) -> Result<(SoundBank, Bank)> {
    let wrapper = BankWrapper::read(&mut Cursor::new(data))?;
    let bytes = data
        .get(BANK_WRAPPER_SIZE..BANK_WRAPPER_SIZE + wrapper.size as usize)
        .ok_or_else(|| {
            Error::MalformedContainer(format!(
                "bank {:#018x} declares {} bytes but holds {}",
                entry.file_id,
                wrapper.size,
                data.len().saturating_sub(BANK_WRAPPER_SIZE)
            ))
        })?;
    let mut bank = Bank::parse(bytes)?;

    let sound_bank = SoundBank {
        id: entry.file_id,
        entry,
        wrapper,
        header: std::mem::take(&mut bank.header),
        hierarchy: std::mem::take(&mut bank.hierarchy),
        extra: std::mem::take(&mut bank.extra),
        dependency: None,
        content: Vec::new(),
        counter: ModificationCounter::default(),
    };
    Ok((sound_bank, bank))
}

/// Builds the object graph of an archive
///
/// Streams, banks and text banks are read first; bank media is collected into one
/// lookup table so that a bank can reference media stored in another bank. Afterwards
/// every Vorbis source of every bank is resolved to a payload of the pool, which fills
/// the owner sets used for change propagation. Unresolvable sources are logged and
/// skipped, a malformed entry fails the whole load.
#[instrument(skip_all, err, fields(toc = toc.len(), stream = stream.len()))]
pub fn read_graph(toc: &[u8], stream: &[u8], language: u32) -> Result<(TocHeader, SoundGraph)> {
    let (header, entries) = read_entries(toc)?;

    let mut graph = SoundGraph {
        language,
        ..Default::default()
    };
    let mut media: HashMap<u32, Vec<u8>> = HashMap::new();
    let mut bank_media: HashMap<u64, Vec<u32>> = HashMap::new();
    let mut dependencies = Vec::new();

    for entry in entries {
        let data = slice(toc, entry.data_offset, entry.data_size, "data", entry.file_id)?;

        match entry.type_id {
            type_id::STREAM => {
                let payload = slice(
                    stream,
                    entry.stream_offset,
                    entry.stream_size,
                    "stream payload",
                    entry.file_id,
                )?;
                let mut audio = AudioPayload::streamed(entry.file_id, payload.to_vec());
                audio.data.add_owner(Owner::Stream(entry.file_id));
                graph.audio.insert(audio.id(), audio);
                graph
                    .streams
                    .insert(entry.file_id, StreamEntry::new(entry, data.to_vec()));
            }
            type_id::BANK => {
                let (sound_bank, bank) = read_bank(entry, data)?;
                bank_media.insert(sound_bank.id, bank.media.keys().copied().collect());
                for (id, bytes) in bank.media {
                    media.entry(id).or_insert(bytes);
                }
                graph.banks.insert(sound_bank.id, sound_bank);
            }
            type_id::DEPENDENCY => {
                let dependency = Dependency::read(&mut Cursor::new(data))?;
                dependencies.push(BankDependency { entry, dependency });
            }
            type_id::TEXT => {
                let table = TextTable::from_bytes(data)?;
                let owner = Owner::TextBank(entry.file_id);
                let language = table.language;
                let string_ids = table.keys().copied().collect();

                for (id, text) in table.entries {
                    graph
                        .strings
                        .entry(StringKey::new(language, id))
                        .or_insert_with(|| Tracked::new(text))
                        .add_owner(owner);
                }
                graph.text_banks.insert(
                    entry.file_id,
                    TextBank {
                        id: entry.file_id,
                        entry,
                        language,
                        string_ids,
                        counter: ModificationCounter::default(),
                    },
                );
            }
            other => warn!(
                type_id = other,
                file_id = entry.file_id,
                "skipping entry of unknown type"
            ),
        }
    }

    for dependency in dependencies {
        match graph.banks.get_mut(&dependency.entry.file_id) {
            Some(bank) => bank.dependency = Some(dependency),
            None => warn!(
                file_id = dependency.entry.file_id,
                path = %dependency.dependency.path,
                "dependency without a bank"
            ),
        }
    }

    let SoundGraph {
        banks,
        audio,
        short_index,
        tracks,
        segments,
        ..
    } = &mut graph;

    for bank in banks.values_mut() {
        let owner = Owner::Bank(bank.id);
        if bank.dependency.is_none() {
            let error = Error::MissingDependency(bank.id);
            warn!(%error, "streamed sources of this bank stay unresolved");
        }

        let mut content = Vec::new();
        let mut claimed = HashSet::new();
        for record in bank.hierarchy.records() {
            for source in record.sources() {
                let Some((id, media_id)) = bank.resolve_media(source) else {
                    if !source.is_vorbis() {
                        trace!(
                            plugin = source.plugin_id,
                            source = source.source_id,
                            "plugin source names no bank media"
                        );
                    }
                    continue;
                };

                if !audio.contains_key(&id) {
                    match (id, media.get(&media_id)) {
                        (AudioId::Short(short_id), Some(bytes)) => {
                            audio.insert(id, AudioPayload::in_bank(short_id, bytes.clone()));
                        }
                        _ => {
                            let error = Error::UnresolvedAudioReference {
                                bank: bank.id,
                                source: media_id,
                            };
                            warn!(%error, "skipping source");
                            continue;
                        }
                    }
                }

                if let Some(payload) = audio.get_mut(&id) {
                    payload.data.add_owner(owner);
                    if payload.short_id == 0 {
                        payload.short_id = media_id;
                    }
                    if let AudioId::Resource(_) = id {
                        payload.stream_type = source.stream_type;
                    }
                }
                claimed.insert(media_id);
                short_index.entry(media_id).or_insert(id);
                if !content.contains(&id) {
                    content.push(id);
                }
            }

            for info in record.track_info() {
                if let Some(key) = TrackKey::of(info) {
                    tracks
                        .entry(key)
                        .or_insert_with(|| Tracked::new(info.timing))
                        .add_owner(owner);
                }
            }

            if let HircRecord::MusicSegment(segment) = record {
                segments
                    .entry(segment.id)
                    .or_insert_with(|| Tracked::new(segment.timing()))
                    .add_owner(owner);
            }
        }

        // media no source reaches stays in the bank
        for media_id in bank_media.remove(&bank.id).unwrap_or_default() {
            if claimed.contains(&media_id) {
                continue;
            }
            let id = AudioId::Short(media_id);
            let Some(bytes) = media.get(&media_id) else {
                continue;
            };
            let payload = audio
                .entry(id)
                .or_insert_with(|| AudioPayload::in_bank(media_id, bytes.clone()));
            debug!(bank = bank.id, media = media_id, "keeping unreferenced media");
            payload.data.add_owner(owner);
            short_index.entry(media_id).or_insert(id);
            if !content.contains(&id) {
                content.push(id);
            }
        }

        trace!(bank = bank.id, payloads = content.len(), "resolved sources");
        bank.content = content;
    }

    debug!(
        banks = graph.banks.len(),
        streams = graph.streams.len(),
        text_banks = graph.text_banks.len(),
        audio = graph.audio.len(),
        "loaded archive"
    );
    Ok((header, graph))
}
