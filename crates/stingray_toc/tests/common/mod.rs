#![allow(dead_code)]

use binrw::NullString;
use byteorder::{LittleEndian, WriteBytesExt};
use indexmap::IndexMap;
use stingray_bank::hirc::{Generic, MusicSegment, MusicTrack, Sound};
use stingray_bank::types::{BankSource, Marker, StreamType, TrackInfo, TrackTiming, VORBIS};
use stingray_bank::{BankBuilder, Hierarchy, HircRecord};
use stingray_text::TextTable;
use stingray_toc::hash::stream_resource_id;
use stingray_toc::language::EN_US;
use stingray_toc::types::type_id;

pub const BANK_ID: u64 = 1000;
pub const BANK_PATH: &str = "content/audio/weapons";
pub const DLC_BANK_ID: u64 = 1001;
pub const DLC_BANK_PATH: &str = "content/audio/dlc/weapons_dlc";
pub const TEXT_ID: u64 = 3000;

pub const BANK_MEDIA: u32 = 42;
pub const STREAMED: u32 = 43;
pub const PREFETCHED: u32 = 44;
pub const PREFETCH_SIZE: u32 = 8;
pub const PLUGIN_MEDIA: u32 = 45;
pub const LOOSE_MEDIA: u32 = 46;

pub const EFFECT: u32 = 0x3000;
pub const SEGMENT: u32 = 0x4000;
pub const EVENT: u32 = 0x7000;

const REVERB_PLUGIN: u32 = 0x0076_0003;

const STREAM_HEADER: [u8; 8] = [0x01, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00];

fn align(buf: &mut Vec<u8>) {
    while buf.len() % 16 != 0 {
        buf.push(0);
    }
}

pub fn source(source_id: u32, stream_type: StreamType, prefetch_size: u32) -> BankSource {
    BankSource {
        plugin_id: VORBIS,
        stream_type,
        source_id,
        prefetch_size,
        flags: 0,
    }
}

pub fn sound(id: u32, source: BankSource) -> HircRecord {
    HircRecord::Sound(Sound {
        id,
        source,
        tail: vec![0x00; 6],
    })
}

pub fn track(id: u32, source_id: u32, duration: f64) -> HircRecord {
    HircRecord::MusicTrack(MusicTrack {
        id,
        flags: 0,
        sources: vec![source(source_id, StreamType::Stream, 0)],
        track_info: vec![TrackInfo {
            track_id: 0,
            source_id,
            event_id: 0,
            timing: TrackTiming {
                source_duration: duration,
                ..Default::default()
            },
        }],
        tail: vec![0x00; 4],
    })
}

/// A music track whose playlist entry is keyed by `event_id` instead of a source
pub fn event_track(id: u32, event_id: u32, duration: f64) -> HircRecord {
    HircRecord::MusicTrack(MusicTrack {
        id,
        flags: 0,
        sources: Vec::new(),
        track_info: vec![TrackInfo {
            track_id: 0,
            source_id: 0,
            event_id,
            timing: TrackTiming {
                source_duration: duration,
                ..Default::default()
            },
        }],
        tail: vec![0x00; 4],
    })
}

pub fn segment(id: u32, tracks: Vec<u32>, duration: f64, entry: f64, exit: f64) -> HircRecord {
    let mut prefix = vec![0x11; 15];
    prefix.extend([0x00, 0x00]);
    prefix.extend([0x00; 16]);

    let mut meter = vec![0x33; 23];
    meter.extend(0u32.to_le_bytes());

    HircRecord::MusicSegment(MusicSegment {
        id,
        prefix,
        tracks,
        meter,
        duration,
        markers: vec![
            Marker {
                id: 1,
                position: entry,
                name: NullString::from("entry"),
            },
            Marker {
                id: 2,
                position: exit,
                name: NullString::from("exit"),
            },
        ],
        tail: Vec::new(),
    })
}

/// A sound played by an effect plugin instead of the Vorbis decoder
pub fn plugin_sound(id: u32, effect_id: u32) -> HircRecord {
    HircRecord::Sound(Sound {
        id,
        source: BankSource {
            plugin_id: REVERB_PLUGIN,
            stream_type: StreamType::Bank,
            source_id: effect_id,
            prefetch_size: 0,
            flags: 0,
        },
        tail: vec![0x00; 6],
    })
}

/// An effect plugin record with three parameter bytes, playing `media_id`
pub fn effect(id: u32, media_id: u32) -> HircRecord {
    let mut data = REVERB_PLUGIN.to_le_bytes().to_vec();
    data.extend(3u32.to_le_bytes());
    data.extend([0xAA, 0xBB, 0xCC]);
    data.extend([0x00, 0x01]);
    data.extend(media_id.to_le_bytes());

    HircRecord::Generic(Generic {
        kind: 0x12,
        id,
        data,
    })
}

pub fn payload(fill: u8, len: usize) -> Vec<u8> {
    vec![fill; len]
}

/// Assembles TOC and stream files entry by entry
#[derive(Default)]
pub struct TocBuilder {
    streams: Vec<(u64, Vec<u8>)>,
    banks: Vec<(u64, Vec<u8>)>,
    dependencies: Vec<(u64, Vec<u8>)>,
    texts: Vec<(u64, Vec<u8>)>,
}

impl TocBuilder {
    pub fn stream(mut self, id: u64, payload: Vec<u8>) -> Self {
        self.streams.push((id, payload));
        self
    }

    /// Adds a bank holding `media`, with a dependency entry when `path` is given
    pub fn bank(
        mut self,
        id: u64,
        records: Vec<HircRecord>,
        media: &[(u32, &[u8])],
        path: Option<&str>,
    ) -> Self {
        let hierarchy = records.into_iter().collect::<Hierarchy>();
        let mut builder = BankBuilder::new(vec![0x8D, 0x00, 0x00, 0x00, 0x11, 0x22, 0x33, 0x44]);
        for (media_id, bytes) in media {
            builder.add_media(*media_id, bytes).unwrap();
        }
        let bank = builder.finish(&hierarchy, &[]).unwrap();

        let mut data = Vec::new();
        data.write_u32::<LittleEndian>(0x0000_0001).unwrap();
        data.write_u32::<LittleEndian>(bank.len() as u32).unwrap();
        data.write_u64::<LittleEndian>(id).unwrap();
        data.extend(bank);
        self.banks.push((id, data));

        if let Some(path) = path {
            let mut data = Vec::new();
            data.write_u32::<LittleEndian>(0x0000_0001).unwrap();
            data.write_u32::<LittleEndian>(path.len() as u32).unwrap();
            data.extend(path.as_bytes());
            self.dependencies.push((id, data));
        }
        self
    }

    pub fn text(mut self, id: u64, language: u32, strings: &[(u32, &str)]) -> Self {
        let entries = strings
            .iter()
            .map(|(id, text)| (*id, text.to_string()))
            .collect::<IndexMap<_, _>>();
        let data = TextTable::new(language, entries).to_bytes().unwrap();
        self.texts.push((id, data));
        self
    }

    /// Returns the TOC and stream files
    pub fn build(&self) -> (Vec<u8>, Vec<u8>) {
        let mut stream = Vec::new();
        let mut items = Vec::new();
        for (id, payload) in &self.streams {
            let mut header = STREAM_HEADER.to_vec();
            header.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
            header.write_u32::<LittleEndian>(0).unwrap();

            items.push((type_id::STREAM, *id, header, stream.len() as u64, payload.len() as u32));
            stream.extend(payload);
            align(&mut stream);
        }
        for (kind, list) in [
            (type_id::BANK, &self.banks),
            (type_id::DEPENDENCY, &self.dependencies),
            (type_id::TEXT, &self.texts),
        ] {
            for (id, data) in list {
                items.push((kind, *id, data.clone(), 0, 0));
            }
        }

        let types = [
            (type_id::STREAM, self.streams.len()),
            (type_id::BANK, self.banks.len()),
            (type_id::DEPENDENCY, self.dependencies.len()),
            (type_id::TEXT, self.texts.len()),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .collect::<Vec<_>>();

        let mut toc = Vec::new();
        toc.write_u32::<LittleEndian>(0xF000_0011).unwrap();
        toc.write_u32::<LittleEndian>(types.len() as u32).unwrap();
        toc.write_u32::<LittleEndian>(items.len() as u32).unwrap();
        toc.write_u32::<LittleEndian>(0).unwrap();
        toc.extend([0u8; 56]);

        for (kind, count) in &types {
            toc.write_u64::<LittleEndian>(0).unwrap();
            toc.write_u64::<LittleEndian>(*kind).unwrap();
            toc.write_u64::<LittleEndian>(*count as u64).unwrap();
            toc.write_u32::<LittleEndian>(16).unwrap();
            toc.write_u32::<LittleEndian>(64).unwrap();
        }

        let mut offset = 80 + 32 * types.len() + 80 * items.len();
        let mut data = Vec::new();
        for (index, (kind, id, bytes, stream_offset, stream_size)) in items.iter().enumerate() {
            toc.write_u64::<LittleEndian>(*id).unwrap();
            toc.write_u64::<LittleEndian>(*kind).unwrap();
            toc.write_u64::<LittleEndian>(offset as u64).unwrap();
            toc.write_u64::<LittleEndian>(*stream_offset).unwrap();
            toc.extend([0u8; 24]);
            toc.write_u32::<LittleEndian>(bytes.len() as u32).unwrap();
            toc.write_u32::<LittleEndian>(*stream_size).unwrap();
            toc.write_u32::<LittleEndian>(0).unwrap();
            toc.write_u32::<LittleEndian>(16).unwrap();
            toc.write_u32::<LittleEndian>(64).unwrap();
            toc.write_u32::<LittleEndian>(index as u32).unwrap();

            data.extend(bytes);
            align(&mut data);
            offset = 80 + 32 * types.len() + 80 * items.len() + data.len();
        }

        toc.extend([0u8; 8]);
        toc.extend(data);
        (toc, stream)
    }
}

pub fn streamed_id() -> u64 {
    stream_resource_id(BANK_PATH, STREAMED)
}

pub fn prefetched_id() -> u64 {
    stream_resource_id(BANK_PATH, PREFETCHED)
}

/// One bank with in-bank, prefetched and streamed media, plus a text bank
///
/// - bank media 42: 100 bytes of `0x42`
/// - streamed 43: 64 bytes of `0x43`, played by music track `0x2000`
/// - prefetched 44: 32 bytes of `0x44`, the first 8 also stored in the bank
pub fn weapons() -> TocBuilder {
    let bank_media = payload(0x42, 100);
    let prefetched = payload(0x44, 32);

    TocBuilder::default()
        .stream(streamed_id(), payload(0x43, 64))
        .stream(prefetched_id(), prefetched.clone())
        .bank(
            BANK_ID,
            vec![
                sound(0x1000, source(BANK_MEDIA, StreamType::Bank, 0)),
                sound(
                    0x1001,
                    source(PREFETCHED, StreamType::PrefetchStream, PREFETCH_SIZE),
                ),
                track(0x2000, STREAMED, 1500.0),
            ],
            &[
                (BANK_MEDIA, &bank_media),
                (PREFETCHED, &prefetched[..PREFETCH_SIZE as usize]),
            ],
            Some(BANK_PATH),
        )
        .text(TEXT_ID, EN_US, &[(10, "Reload"), (11, "Fire")])
}

/// A second archive whose bank reuses media 42
pub fn weapons_dlc() -> TocBuilder {
    TocBuilder::default().bank(
        DLC_BANK_ID,
        vec![sound(0x5000, source(BANK_MEDIA, StreamType::Bank, 0))],
        &[(BANK_MEDIA, &payload(0x42, 100))],
        Some(DLC_BANK_PATH),
    )
}

/// A bank whose media reach the sounds through an effect plugin, or nothing at all
///
/// - plugin media 45: 24 bytes of `0x45`, played by sound `0x1000` through effect `EFFECT`
/// - loose media 46: 12 bytes of `0x46`, referenced by no record
pub fn effects() -> TocBuilder {
    TocBuilder::default().bank(
        BANK_ID,
        vec![plugin_sound(0x1000, EFFECT), effect(EFFECT, PLUGIN_MEDIA)],
        &[
            (PLUGIN_MEDIA, &payload(0x45, 24)),
            (LOOSE_MEDIA, &payload(0x46, 12)),
        ],
        Some(BANK_PATH),
    )
}

/// A music bank with one segment over two tracks
///
/// - track `0x2000` plays streamed media 43 for 1500 ms
/// - track `0x2001` is keyed by event `EVENT` and lasts 800 ms
/// - segment `SEGMENT` lasts 5000 ms, entering at 0 and exiting at 4800
pub fn score() -> TocBuilder {
    TocBuilder::default()
        .stream(streamed_id(), payload(0x43, 64))
        .bank(
            BANK_ID,
            vec![
                track(0x2000, STREAMED, 1500.0),
                event_track(0x2001, EVENT, 800.0),
                segment(SEGMENT, vec![0x2000, 0x2001], 5000.0, 0.0, 4800.0),
            ],
            &[],
            Some(BANK_PATH),
        )
}
