//! Records of the `HIRC` chunk.
//!
//! Every record starts with `kind: u8, size: u32, id: u32` where `size` counts the
//! bytes following the size field. Only the kinds needed to locate and retime audio
//! are modelled, their remaining fields are kept as opaque spans. Any other kind, or
//! a modelled kind whose body does not decode, is kept as [`Generic`] and written
//! back untouched.

use binrw::{BinRead, BinWrite};
use indexmap::IndexMap;
use tracing::{debug, instrument, warn};

use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::types::{BankSource, Marker, SegmentTiming, TrackInfo};

/// Discriminants of the modelled record kinds
pub mod kind {
    pub const SOUND: u8 = 0x02;
    pub const RANDOM_SEQUENCE_CONTAINER: u8 = 0x05;
    pub const MUSIC_SEGMENT: u8 = 0x0A;
    pub const MUSIC_TRACK: u8 = 0x0B;
}

/// A sound effect or voice playing exactly one source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sound {
    pub id: u32,
    pub source: BankSource,
    pub tail: Vec<u8>,
}

/// An interactive music track with its sources and playlist
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MusicTrack {
    pub id: u32,
    pub flags: u8,
    pub sources: Vec<BankSource>,
    pub track_info: Vec<TrackInfo>,
    pub tail: Vec<u8>,
}

/// An interactive music segment grouping tracks between an entry and an exit marker
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MusicSegment {
    pub id: u32,
    /// Node parameters, property lists and the empty state/RTPC counts
    pub prefix: Vec<u8>,
    pub tracks: Vec<u32>,
    /// Tempo, time signature and stingers
    pub meter: Vec<u8>,
    pub duration: f64,
    pub markers: Vec<Marker>,
    pub tail: Vec<u8>,
}

/// A random or sequence container and the ids of its children
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RandomSequenceContainer {
    pub id: u32,
    pub prefix: Vec<u8>,
    pub children: Vec<u32>,
    pub tail: Vec<u8>,
}

/// Any record kept as raw bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generic {
    pub kind: u8,
    pub id: u32,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HircRecord {
    Sound(Sound),
    MusicTrack(MusicTrack),
    MusicSegment(MusicSegment),
    RandomSequenceContainer(RandomSequenceContainer),
    Generic(Generic),
}

fn rest(cursor: &mut ByteCursor) -> Result<Vec<u8>> {
    let remaining = cursor.remaining();
    Ok(cursor.read_bytes(remaining)?.to_vec())
}

fn span(cursor: &mut ByteCursor, start: usize) -> Result<Vec<u8>> {
    let end = cursor.position();
    cursor.set_position(start);
    Ok(cursor.read_bytes(end - start)?.to_vec())
}

fn read_ids(cursor: &mut ByteCursor) -> Result<Vec<u32>> {
    let count = cursor.read_u32()?;
    (0..count).map(|_| cursor.read_u32()).collect()
}

fn write_ids(cursor: &mut ByteCursor, ids: &[u32]) -> Result<()> {
    cursor.write_u32(count(ids.len())?);
    ids.iter().for_each(|id| cursor.write_u32(*id));
    Ok(())
}

fn count(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::MalformedBank(format!("{len} does not fit a u32 count")))
}

impl Sound {
    fn decode(body: &mut ByteCursor) -> Result<Self> {
        Ok(Sound {
            id: body.read_u32()?,
            source: BankSource::read(body)?,
            tail: rest(body)?,
        })
    }

    fn encode(&self, body: &mut ByteCursor) -> Result<()> {
        body.write_u32(self.id);
        self.source.write(body)?;
        body.write_bytes(&self.tail);
        Ok(())
    }
}

impl MusicTrack {
    fn decode(body: &mut ByteCursor) -> Result<Self> {
        let id = body.read_u32()?;
        let flags = body.read_u8()?;

        let sources = (0..body.read_u32()?)
            .map(|_| BankSource::read(&mut *body).map_err(Error::from))
            .collect::<Result<Vec<_>>>()?;
        let track_info = (0..body.read_u32()?)
            .map(|_| TrackInfo::read(&mut *body).map_err(Error::from))
            .collect::<Result<Vec<_>>>()?;

        Ok(MusicTrack {
            id,
            flags,
            sources,
            track_info,
            tail: rest(body)?,
        })
    }

    fn encode(&self, body: &mut ByteCursor) -> Result<()> {
        body.write_u32(self.id);
        body.write_u8(self.flags);
        body.write_u32(count(self.sources.len())?);
        for source in &self.sources {
            source.write(body)?;
        }
        body.write_u32(count(self.track_info.len())?);
        for info in &self.track_info {
            info.write(body)?;
        }
        body.write_bytes(&self.tail);
        Ok(())
    }
}

impl MusicSegment {
    fn decode(body: &mut ByteCursor) -> Result<Self> {
        let id = body.read_u32()?;

        let start = body.position();
        body.skip(15)?;
        let props = body.peek_u8()? as usize;
        body.skip(5 * props + 1)?;
        let props = body.peek_u8()? as usize;
        body.skip(5 * props + 1 + 16)?;
        let prefix = span(body, start)?;

        let tracks = read_ids(body)?;

        let start = body.position();
        body.skip(23)?;
        let stingers = body.peek_u32()? as usize;
        body.skip(24 * stingers + 4)?;
        let meter = span(body, start)?;

        let duration = body.read_f64()?;
        let markers = (0..body.read_u32()?)
            .map(|_| Marker::read(&mut *body).map_err(Error::from))
            .collect::<Result<Vec<_>>>()?;

        Ok(MusicSegment {
            id,
            prefix,
            tracks,
            meter,
            duration,
            markers,
            tail: rest(body)?,
        })
    }

    fn encode(&self, body: &mut ByteCursor) -> Result<()> {
        body.write_u32(self.id);
        body.write_bytes(&self.prefix);
        write_ids(body, &self.tracks)?;
        body.write_bytes(&self.meter);
        body.write_f64(self.duration);
        body.write_u32(count(self.markers.len())?);
        for marker in &self.markers {
            marker.write(body)?;
        }
        body.write_bytes(&self.tail);
        Ok(())
    }

    /// Duration plus the positions of the first (entry) and last (exit) markers
    pub fn timing(&self) -> SegmentTiming {
        SegmentTiming {
            duration: self.duration,
            entry: self.markers.first().map_or(0.0, |m| m.position),
            exit: self.markers.last().map_or(0.0, |m| m.position),
        }
    }

    /// Writes `timing` back into the duration and the entry/exit markers
    ///
    /// A segment with a single marker uses it as both entry and exit, the exit position wins.
    pub fn set_timing(&mut self, timing: &SegmentTiming) {
        self.duration = timing.duration;
        if let Some(entry) = self.markers.first_mut() {
            entry.position = timing.entry;
        }
        if let Some(exit) = self.markers.last_mut() {
            exit.position = timing.exit;
        }
    }
}

impl RandomSequenceContainer {
    /// Walks the node parameters to find where the child list starts.
    fn skip_parameters(body: &mut ByteCursor) -> Result<()> {
        body.skip(1)?;
        match body.read_u8()? as usize {
            0 => body.skip(12)?,
            effects => body.skip(7 * effects + 13)?,
        }
        let props = body.read_u8()? as usize;
        body.skip(5 * props)?;
        let ranged = body.read_u8()? as usize;
        body.skip(9 * ranged)?;

        if body.read_u8()? & 0b0000_0010 != 0 && body.read_u8()? & 0b0100_0000 != 0 {
            body.skip(5)?;
            let vertices = body.read_u32()? as usize;
            body.skip(16 * vertices)?;
            let items = body.read_u32()? as usize;
            body.skip(20 * items)?;
        }

        if body.read_u8()? & 0b0000_1000 != 0 {
            body.skip(26)?;
        } else {
            body.skip(10)?;
        }

        let state_props = body.read_u8()? as usize;
        body.skip(3 * state_props)?;
        for _ in 0..body.read_u8()? {
            body.skip(5)?;
            let states = body.read_u8()? as usize;
            body.skip(8 * states)?;
        }
        for _ in 0..body.read_u16()? {
            body.skip(12)?;
            let points = body.read_u16()? as usize;
            body.skip(12 * points)?;
        }
        Ok(())
    }

    fn decode(body: &mut ByteCursor) -> Result<Self> {
        let id = body.read_u32()?;

        let start = body.position();
        Self::skip_parameters(body)?;
        body.skip(24)?;
        let prefix = span(body, start)?;

        Ok(RandomSequenceContainer {
            id,
            prefix,
            children: read_ids(body)?,
            tail: rest(body)?,
        })
    }

    fn encode(&self, body: &mut ByteCursor) -> Result<()> {
        body.write_u32(self.id);
        body.write_bytes(&self.prefix);
        write_ids(body, &self.children)?;
        body.write_bytes(&self.tail);
        Ok(())
    }
}

impl Generic {
    fn decode(kind: u8, body: &mut ByteCursor) -> Result<Self> {
        Ok(Generic {
            kind,
            id: body.read_u32()?,
            data: rest(body)?,
        })
    }

    fn encode(&self, body: &mut ByteCursor) -> Result<()> {
        body.write_u32(self.id);
        body.write_bytes(&self.data);
        Ok(())
    }

    /// Bank media played by a plugin effect record
    ///
    /// The body starts with the plugin id and the size of the plugin parameters. Two
    /// bytes after the parameters comes the id of the media in the bank.
    pub fn plugin_media_id(&self) -> Option<u32> {
        let mut body = ByteCursor::new(self.data.as_slice());
        body.skip(4).ok()?;
        let params = body.read_u32().ok()?;
        body.skip((params as usize).checked_add(2)?).ok()?;
        body.read_u32().ok()
    }
}

impl HircRecord {
    /// Reads one record, falling back to [`Generic`] when its kind is unknown or its body does not decode
    pub fn decode(cursor: &mut ByteCursor) -> Result<HircRecord> {
        let kind = cursor.read_u8()?;
        let size = cursor.read_u32()? as usize;
        if size < 4 {
            return Err(Error::MalformedBank(format!(
                "record of kind {kind:#04x} is only {size} bytes"
            )));
        }
        let mut body = ByteCursor::new(cursor.read_bytes(size)?.to_vec());

        let decoded = match kind {
            kind::SOUND => Sound::decode(&mut body).map(HircRecord::Sound),
            kind::MUSIC_TRACK => MusicTrack::decode(&mut body).map(HircRecord::MusicTrack),
            kind::MUSIC_SEGMENT => MusicSegment::decode(&mut body).map(HircRecord::MusicSegment),
            kind::RANDOM_SEQUENCE_CONTAINER => {
                RandomSequenceContainer::decode(&mut body).map(HircRecord::RandomSequenceContainer)
            }
            _ => {
                debug!(kind, size, "keeping unmodelled record");
                return Generic::decode(kind, &mut body).map(HircRecord::Generic);
            }
        };

        decoded.or_else(|error| {
            warn!(kind, size, %error, "record did not decode, falling back to raw bytes");
            body.set_position(0);
            Generic::decode(kind, &mut body).map(HircRecord::Generic)
        })
    }

    /// Writes the record, recomputing its size from the current fields
    pub fn encode(&self, cursor: &mut ByteCursor) -> Result<()> {
        let mut body = ByteCursor::default();
        match self {
            HircRecord::Sound(r) => r.encode(&mut body)?,
            HircRecord::MusicTrack(r) => r.encode(&mut body)?,
            HircRecord::MusicSegment(r) => r.encode(&mut body)?,
            HircRecord::RandomSequenceContainer(r) => r.encode(&mut body)?,
            HircRecord::Generic(r) => r.encode(&mut body)?,
        }

        cursor.write_u8(self.kind());
        cursor.write_u32(count(body.len())?);
        cursor.write_bytes(body.get_ref());
        Ok(())
    }

    /// Encodes the record on its own
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = ByteCursor::default();
        self.encode(&mut cursor)?;
        Ok(cursor.into_inner())
    }

    pub fn kind(&self) -> u8 {
        match self {
            HircRecord::Sound(_) => kind::SOUND,
            HircRecord::MusicTrack(_) => kind::MUSIC_TRACK,
            HircRecord::MusicSegment(_) => kind::MUSIC_SEGMENT,
            HircRecord::RandomSequenceContainer(_) => kind::RANDOM_SEQUENCE_CONTAINER,
            HircRecord::Generic(r) => r.kind,
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            HircRecord::Sound(r) => r.id,
            HircRecord::MusicTrack(r) => r.id,
            HircRecord::MusicSegment(r) => r.id,
            HircRecord::RandomSequenceContainer(r) => r.id,
            HircRecord::Generic(r) => r.id,
        }
    }

    /// Media sources referenced by this record
    pub fn sources(&self) -> &[BankSource] {
        match self {
            HircRecord::Sound(r) => std::slice::from_ref(&r.source),
            HircRecord::MusicTrack(r) => &r.sources,
            _ => &[],
        }
    }

    /// Playlist entries of a music track
    pub fn track_info(&self) -> &[TrackInfo] {
        match self {
            HircRecord::MusicTrack(r) => &r.track_info,
            _ => &[],
        }
    }

    pub fn track_info_mut(&mut self) -> &mut [TrackInfo] {
        match self {
            HircRecord::MusicTrack(r) => &mut r.track_info,
            _ => &mut [],
        }
    }
}

/// Ordered set of records of a bank, keyed by record id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hierarchy {
    records: IndexMap<u32, HircRecord>,
}

impl Hierarchy {
    /// Parses the contents of a `HIRC` chunk
    #[instrument(skip_all, err, fields(size = data.len()))]
    pub fn parse(data: &[u8]) -> Result<Hierarchy> {
        let mut cursor = ByteCursor::new(data.to_vec());
        let count = cursor.read_u32()?;

        let mut records = IndexMap::with_capacity(count as usize);
        for _ in 0..count {
            let record = HircRecord::decode(&mut cursor)?;
            records.insert(record.id(), record);
        }

        if cursor.remaining() > 0 {
            debug!(trailing = cursor.remaining(), "ignoring bytes after the last record");
        }

        Ok(Hierarchy { records })
    }

    /// Encodes the contents of a `HIRC` chunk
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = ByteCursor::default();
        cursor.write_u32(count(self.records.len())?);
        for record in self.records.values() {
            record.encode(&mut cursor)?;
        }
        Ok(cursor.into_inner())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&HircRecord> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut HircRecord> {
        self.records.get_mut(&id)
    }

    /// Adds a record, replacing any record with the same id in place
    pub fn insert(&mut self, record: HircRecord) -> Option<HircRecord> {
        self.records.insert(record.id(), record)
    }

    pub fn records(&self) -> impl Iterator<Item = &HircRecord> {
        self.records.values()
    }

    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut HircRecord> {
        self.records.values_mut()
    }
}

impl FromIterator<HircRecord> for Hierarchy {
    fn from_iter<T: IntoIterator<Item = HircRecord>>(iter: T) -> Self {
        Hierarchy {
            records: iter.into_iter().map(|r| (r.id(), r)).collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use binrw::NullString;
    use pretty_assertions::{assert_eq, assert_str_eq};
    use tracing_test::traced_test;

    use crate::cursor::ByteCursor;
    use crate::error::Result;
    use crate::hirc::{kind, Hierarchy, HircRecord};
    use crate::types::{BankSource, SegmentTiming, StreamType, VORBIS};

    fn record(kind: u8, body: &[u8]) -> Vec<u8> {
        let mut out = vec![kind];
        out.extend((body.len() as u32).to_le_bytes());
        out.extend(body);
        out
    }

    fn decode(bytes: &[u8]) -> Result<HircRecord> {
        HircRecord::decode(&mut ByteCursor::new(bytes.to_vec()))
    }

    fn segment_body() -> Vec<u8> {
        let mut body = Vec::new();
        body.extend(0x300u32.to_le_bytes());
        body.extend([0x11; 15]);
        // one property, then none
        body.extend([0x01, 0x22, 0x22, 0x22, 0x22, 0x22]);
        body.push(0x00);
        body.extend([0x00; 16]);
        // one child track
        body.extend(1u32.to_le_bytes());
        body.extend(0x77u32.to_le_bytes());
        body.extend([0x33; 23]);
        body.extend(0u32.to_le_bytes());
        body.extend(5000.0f64.to_le_bytes());
        body.extend(2u32.to_le_bytes());
        body.extend(1u32.to_le_bytes());
        body.extend(0.0f64.to_le_bytes());
        body.extend(b"entry\0");
        body.extend(2u32.to_le_bytes());
        body.extend(4800.0f64.to_le_bytes());
        body.extend(b"exit\0");
        body
    }

    fn container_body() -> Vec<u8> {
        let mut body = Vec::new();
        body.extend(0x400u32.to_le_bytes());
        body.push(0x00);
        // no effects
        body.push(0x00);
        body.extend([0x00; 12]);
        // no props, no ranged props
        body.extend([0x00, 0x00]);
        // no positioning, no aux
        body.push(0x00);
        body.push(0x00);
        body.extend([0x00; 10]);
        // no state props, state groups or RTPCs
        body.extend([0x00, 0x00, 0x00, 0x00]);
        body.extend([0x44; 24]);
        body.extend(2u32.to_le_bytes());
        body.extend(100u32.to_le_bytes());
        body.extend(200u32.to_le_bytes());
        body.extend([0xAA, 0xBB, 0xCC]);
        body
    }

    #[test]
    fn sound_round_trip() -> Result<()> {
        #[rustfmt::skip]
        let input = record(kind::SOUND, &[
            0x00, 0x01, 0x00, 0x00,
            0x01, 0x00, 0x04, 0x00,
            0x00,
            0x2A, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00,
            0xDE, 0xAD, 0xBE, 0xEF, 0x01,
        ]);

        let record = decode(&input)?;
        let HircRecord::Sound(sound) = &record else {
            panic!("expected a sound, got {record:?}");
        };
        assert_eq!(sound.id, 0x100);
        assert_eq!(
            sound.source,
            BankSource {
                plugin_id: VORBIS,
                stream_type: StreamType::Bank,
                source_id: 42,
                prefetch_size: 0,
                flags: 0,
            }
        );
        assert_eq!(sound.tail, vec![0xDE, 0xAD, 0xBE, 0xEF, 0x01]);

        assert_str_eq!(
            format!("{:02X?}", record.to_bytes()?),
            format!("{:02X?}", input)
        );

        Ok(())
    }

    #[test]
    fn music_track_recomputes_counts() -> Result<()> {
        let mut body = Vec::new();
        body.extend(0x200u32.to_le_bytes());
        body.push(0x04);
        body.extend(1u32.to_le_bytes());
        body.extend([0x01, 0x00, 0x04, 0x00, 0x02, 0x2B, 0x00, 0x00, 0x00]);
        body.extend([0x00, 0x00, 0x00, 0x00, 0x00]);
        body.extend(1u32.to_le_bytes());
        body.extend(1u32.to_le_bytes());
        body.extend(43u32.to_le_bytes());
        body.extend(0u32.to_le_bytes());
        for value in [0.0f64, 0.0, 0.0, 2500.0] {
            body.extend(value.to_le_bytes());
        }
        body.extend([0x09, 0x09]);
        let input = record(kind::MUSIC_TRACK, &body);

        let mut record = decode(&input)?;
        assert_eq!(record.to_bytes()?, input);
        assert_eq!(record.sources().len(), 1);
        assert_eq!(record.sources()[0].stream_type, StreamType::Stream);
        assert_eq!(record.track_info()[0].timing.source_duration, 2500.0);

        let HircRecord::MusicTrack(track) = &mut record else {
            panic!("expected a music track, got {record:?}");
        };
        let extra = track.sources[0];
        track.sources.push(extra);

        let output = record.to_bytes()?;
        assert_eq!(output.len(), input.len() + 14);
        // size field and source count follow the new list
        assert_eq!(
            output[1..5].to_vec(),
            ((body.len() + 14) as u32).to_le_bytes().to_vec()
        );
        assert_eq!(output[10..14].to_vec(), 2u32.to_le_bytes().to_vec());
        assert_eq!(decode(&output)?, record);

        Ok(())
    }

    #[test]
    fn music_segment_timing() -> Result<()> {
        let input = record(kind::MUSIC_SEGMENT, &segment_body());

        let mut record = decode(&input)?;
        assert_eq!(record.to_bytes()?, input);

        let HircRecord::MusicSegment(segment) = &mut record else {
            panic!("expected a music segment, got {record:?}");
        };
        assert_eq!(segment.tracks, vec![0x77]);
        assert_eq!(segment.markers[0].name, NullString::from("entry"));
        assert_eq!(
            segment.timing(),
            SegmentTiming {
                duration: 5000.0,
                entry: 0.0,
                exit: 4800.0
            }
        );

        let timing = SegmentTiming {
            duration: 6000.0,
            entry: 100.0,
            exit: 5900.0,
        };
        segment.set_timing(&timing);

        let output = record.to_bytes()?;
        assert_eq!(output.len(), input.len());
        let HircRecord::MusicSegment(decoded) = decode(&output)? else {
            panic!("expected a music segment");
        };
        assert_eq!(decoded.timing(), timing);

        Ok(())
    }

    #[test]
    fn random_sequence_container_round_trip() -> Result<()> {
        let input = record(kind::RANDOM_SEQUENCE_CONTAINER, &container_body());

        let record = decode(&input)?;
        let HircRecord::RandomSequenceContainer(container) = &record else {
            panic!("expected a container, got {record:?}");
        };
        assert_eq!(container.prefix.len(), 56);
        assert_eq!(container.children, vec![100, 200]);
        assert_eq!(container.tail, vec![0xAA, 0xBB, 0xCC]);
        assert_eq!(record.to_bytes()?, input);

        Ok(())
    }

    #[test]
    fn unknown_kind_is_generic() -> Result<()> {
        #[rustfmt::skip]
        let input = record(0x07, &[
            0x10, 0x00, 0x00, 0x00,
            0x01, 0x02, 0x03, 0x04,
        ]);

        let record = decode(&input)?;
        assert_eq!(record.kind(), 0x07);
        assert_eq!(record.id(), 0x10);
        assert!(record.sources().is_empty());
        assert_eq!(record.to_bytes()?, input);

        Ok(())
    }

    #[traced_test]
    #[test]
    fn truncated_sound_falls_back_to_generic() -> Result<()> {
        let input = record(kind::SOUND, &[0x01, 0x00, 0x00, 0x00, 0xFF, 0xFF]);

        let record = decode(&input)?;
        assert!(matches!(record, HircRecord::Generic(_)));
        assert_eq!(record.kind(), kind::SOUND);
        assert_eq!(record.to_bytes()?, input);
        assert!(logs_contain("falling back to raw bytes"));

        Ok(())
    }

    #[test]
    fn record_past_end_is_an_error() {
        let mut input = record(0x07, &[0x10, 0x00, 0x00, 0x00, 0x01]);
        input.truncate(input.len() - 1);

        assert!(decode(&input).is_err());
    }

    #[test]
    fn hierarchy_round_trip() -> Result<()> {
        let mut input = 3u32.to_le_bytes().to_vec();
        input.extend(record(kind::MUSIC_SEGMENT, &segment_body()));
        input.extend(record(kind::RANDOM_SEQUENCE_CONTAINER, &container_body()));
        input.extend(record(0x07, &[0x10, 0x00, 0x00, 0x00]));

        let hierarchy = Hierarchy::parse(&input)?;
        assert_eq!(hierarchy.len(), 3);
        assert_eq!(
            hierarchy.records().map(HircRecord::id).collect::<Vec<_>>(),
            vec![0x300, 0x400, 0x10]
        );
        assert_str_eq!(
            format!("{:02X?}", hierarchy.to_bytes()?),
            format!("{:02X?}", input)
        );

        Ok(())
    }

    #[test]
    fn plugin_effect_media() -> Result<()> {
        #[rustfmt::skip]
        let input = record(0x12, &[
            0x20, 0x00, 0x00, 0x00,
            0x99, 0x00, 0x1A, 0x01,
            0x03, 0x00, 0x00, 0x00,
            0xAA, 0xBB, 0xCC,
            0x00, 0x01,
            0x2D, 0x00, 0x00, 0x00,
        ]);

        let HircRecord::Generic(effect) = decode(&input)? else {
            panic!("effect records are generic");
        };
        assert_eq!(effect.plugin_media_id(), Some(45));

        let HircRecord::Generic(short) = decode(&record(0x12, &[0x20, 0x00, 0x00, 0x00, 0x01]))?
        else {
            panic!("effect records are generic");
        };
        assert_eq!(short.plugin_media_id(), None);

        Ok(())
    }
}
