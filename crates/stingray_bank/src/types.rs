//! Fixed-size structures shared by the soundbank chunks.

use binrw::{BinRead, BinWrite, NullString};

/// Plugin id of the Vorbis codec, the only media this workspace knows how to locate
pub const VORBIS: u32 = 0x0004_0001;

/// Where a source keeps its media
#[derive(BinRead, BinWrite, Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[brw(repr = u8)]
pub enum StreamType {
    /// Media stored in the owning bank's `DATA` chunk
    #[default]
    Bank = 0,

    /// Media streamed from the stream file, with the first `prefetch_size` bytes also kept in the bank
    PrefetchStream = 1,

    /// Media streamed from the stream file only
    Stream = 2,
}

/// Media source reference carried by sounds and music tracks (14 bytes)
#[derive(BinRead, BinWrite, Debug, Copy, Clone, Default, PartialEq, Eq)]
#[brw(little)]
pub struct BankSource {
    /// Codec plugin, [`VORBIS`] for audio this workspace can patch
    pub plugin_id: u32,

    /// Where the media bytes live
    pub stream_type: StreamType,

    /// Short id of the media
    pub source_id: u32,

    /// Bytes of streamed media duplicated in the bank
    pub prefetch_size: u32,

    /// Source flags, kept verbatim
    pub flags: u8,
}

impl BankSource {
    /// Whether this source points at Vorbis media
    pub fn is_vorbis(&self) -> bool {
        self.plugin_id == VORBIS
    }
}

/// Playback window of a music track's source
#[derive(BinRead, BinWrite, Debug, Copy, Clone, Default, PartialEq)]
#[brw(little)]
pub struct TrackTiming {
    pub play_at: f64,
    pub begin_trim: f64,
    pub end_trim: f64,
    pub source_duration: f64,
}

/// Per-source playlist entry of a music track (44 bytes)
#[derive(BinRead, BinWrite, Debug, Copy, Clone, Default, PartialEq)]
#[brw(little)]
pub struct TrackInfo {
    pub track_id: u32,
    pub source_id: u32,
    pub event_id: u32,
    pub timing: TrackTiming,
}

/// Entry of the `DIDX` media index (12 bytes)
#[derive(BinRead, BinWrite, Debug, Copy, Clone, Default, PartialEq, Eq)]
#[brw(little)]
pub struct MediaEntry {
    /// Short id of the media
    pub id: u32,

    /// Offset of the media inside the `DATA` chunk
    pub offset: u32,

    /// Size of the media in bytes
    pub size: u32,
}

/// Named position inside a music segment
#[derive(BinRead, BinWrite, Debug, Clone, Default, PartialEq)]
#[brw(little)]
pub struct Marker {
    pub id: u32,
    pub position: f64,
    pub name: NullString,
}

/// The editable timing of a music segment: its duration and the positions of its entry and exit markers
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct SegmentTiming {
    pub duration: f64,
    pub entry: f64,
    pub exit: f64,
}

/// Chunk of a soundbank this workspace does not interpret
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawChunk {
    pub tag: [u8; 4],
    pub data: Vec<u8>,
}
