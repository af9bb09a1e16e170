//! The editable object graph of one or more archives.
//!
//! Every object lives in a table keyed by its id. Values that can be edited are
//! [`Tracked`] and list the containers ([`Owner`]) embedding them; editing a value for
//! the first time raises the modification counter of each owner and reverting it lowers
//! them again. A container with a non-zero counter is what a patch has to rewrite.

use derive_more::derive::{Constructor, Display};
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;
use stingray_bank::types::{SegmentTiming, TrackInfo, TrackTiming};
use tracing::{debug, instrument};

use crate::audio::{AudioId, AudioPayload};
use crate::bank::SoundBank;
use crate::error::{NotFoundError, Result};
use crate::stream::StreamEntry;
use crate::text::TextBank;
use crate::tracked::{ModificationCounter, Owner, Tracked};

/// Key of a music track's playback window
///
/// Windows attached to a source are shared by every track playing that source, windows
/// without a source are keyed by the event that plays them.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrackKey {
    #[display("source {_0}")]
    Source(u32),

    #[display("event {_0}")]
    Event(u32),
}

impl TrackKey {
    pub fn of(info: &TrackInfo) -> Option<TrackKey> {
        match (info.source_id, info.event_id) {
            (0, 0) => None,
            (0, event) => Some(TrackKey::Event(event)),
            (source, _) => Some(TrackKey::Source(source)),
        }
    }
}

/// Key of a localized string
#[derive(Debug, Display, Constructor, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("{id} in language {language:#010x}")]
pub struct StringKey {
    pub language: u32,
    pub id: u32,
}

/// A pending change to one value, detached from the graph it was made in
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Audio(AudioId, Vec<u8>),
    TrackTiming(TrackKey, TrackTiming),
    SegmentTiming(u32, SegmentTiming),
    Text(StringKey, String),
}

/// Ids of every object of a graph, table by table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphKeys {
    pub banks: Vec<u64>,
    pub streams: Vec<u64>,
    pub text_banks: Vec<u64>,
    pub audio: Vec<AudioId>,
    pub tracks: Vec<TrackKey>,
    pub segments: Vec<u32>,
    pub strings: Vec<StringKey>,
}

impl GraphKeys {
    /// Containers listed in these keys
    pub fn owners(&self) -> BTreeSet<Owner> {
        self.banks
            .iter()
            .map(|id| Owner::Bank(*id))
            .chain(self.streams.iter().map(|id| Owner::Stream(*id)))
            .chain(self.text_banks.iter().map(|id| Owner::TextBank(*id)))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoundGraph {
    /// Language used when comparing strings with another archive
    pub language: u32,

    pub banks: IndexMap<u64, SoundBank>,
    pub streams: IndexMap<u64, StreamEntry>,
    pub text_banks: IndexMap<u64, TextBank>,

    pub audio: IndexMap<AudioId, AudioPayload>,

    /// Short id of every referenced payload, including streamed ones
    pub short_index: HashMap<u32, AudioId>,

    pub tracks: IndexMap<TrackKey, Tracked<TrackTiming>>,
    pub segments: IndexMap<u32, Tracked<SegmentTiming>>,
    pub strings: IndexMap<StringKey, Tracked<String>>,
}

fn take_tracked_edits<K: Copy, T>(
    table: &mut IndexMap<K, Tracked<T>>,
    owners: &mut Vec<Owner>,
    edit: impl Fn(K, T) -> Edit,
) -> Vec<Edit> {
    table
        .iter_mut()
        .filter_map(|(key, value)| {
            let change = value.take_edit()?;
            owners.extend(value.owners().iter().copied());
            Some(edit(*key, change))
        })
        .collect()
}

fn merge_tracked<K: Hash + Eq, T>(
    table: &mut IndexMap<K, Tracked<T>>,
    incoming: IndexMap<K, Tracked<T>>,
    raise: &mut Vec<Owner>,
) {
    for (key, value) in incoming {
        match table.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                for owner in value.owners() {
                    if existing.add_owner(*owner) && existing.is_modified() {
                        raise.push(*owner);
                    }
                }
            }
        }
    }
}

fn evict_tracked<K: Hash + Eq, T>(
    table: &mut IndexMap<K, Tracked<T>>,
    keys: &[K],
    evicted: &BTreeSet<Owner>,
    lower: &mut Vec<Owner>,
) {
    for key in keys {
        let Some(value) = table.shift_remove(key) else {
            continue;
        };
        if value.is_modified() {
            lower.extend(value.owners().iter().filter(|o| !evicted.contains(*o)));
        }
    }
    for value in table.values_mut() {
        value.retain_owners(|o| !evicted.contains(o));
    }
}

impl SoundGraph {
    pub fn keys(&self) -> GraphKeys {
        GraphKeys {
            banks: self.banks.keys().copied().collect(),
            streams: self.streams.keys().copied().collect(),
            text_banks: self.text_banks.keys().copied().collect(),
            audio: self.audio.keys().copied().collect(),
            tracks: self.tracks.keys().copied().collect(),
            segments: self.segments.keys().copied().collect(),
            strings: self.strings.keys().copied().collect(),
        }
    }

    fn counter_mut(&mut self, owner: Owner) -> Option<&mut ModificationCounter> {
        match owner {
            Owner::Bank(id) => self.banks.get_mut(&id).map(|b| &mut b.counter),
            Owner::Stream(id) => self.streams.get_mut(&id).map(|s| &mut s.counter),
            Owner::TextBank(id) => self.text_banks.get_mut(&id).map(|t| &mut t.counter),
        }
    }

    fn raise(&mut self, owners: impl IntoIterator<Item = Owner>) {
        for owner in owners {
            match self.counter_mut(owner) {
                Some(counter) => counter.raise(),
                None => debug!(%owner, "owner is not part of this graph"),
            }
        }
    }

    fn lower(&mut self, owners: impl IntoIterator<Item = Owner>) -> Result<()> {
        for owner in owners {
            if let Some(counter) = self.counter_mut(owner) {
                counter.lower(owner)?;
            }
        }
        Ok(())
    }

    /// Whether any container has a modified value
    pub fn is_modified(&self) -> bool {
        self.banks.values().any(SoundBank::is_modified)
            || self.streams.values().any(StreamEntry::is_modified)
            || self.text_banks.values().any(TextBank::is_modified)
    }

    pub fn modified_banks(&self) -> Vec<u64> {
        self.banks
            .values()
            .filter(|b| b.is_modified())
            .map(|b| b.id)
            .collect()
    }

    pub fn modified_streams(&self) -> Vec<u64> {
        self.streams
            .values()
            .filter(|s| s.is_modified())
            .map(|s| s.id)
            .collect()
    }

    pub fn modified_text_banks(&self) -> Vec<u64> {
        self.text_banks
            .values()
            .filter(|t| t.is_modified())
            .map(|t| t.id)
            .collect()
    }

    /// Pool key for `id`, looking short ids up in the short id index when needed
    pub fn resolve_audio(&self, id: AudioId) -> Option<AudioId> {
        if self.audio.contains_key(&id) {
            return Some(id);
        }
        match id {
            AudioId::Short(short_id) => self.short_index.get(&short_id).copied(),
            AudioId::Resource(_) => None,
        }
    }

    pub fn audio(&self, id: AudioId) -> Option<&AudioPayload> {
        self.resolve_audio(id).and_then(|id| self.audio.get(&id))
    }

    /// Looks `id` up as a short id first, then as a resource id
    pub fn find_audio(&self, id: u64) -> Option<&AudioPayload> {
        u32::try_from(id)
            .ok()
            .and_then(|short_id| self.audio(AudioId::Short(short_id)))
            .or_else(|| self.audio.get(&AudioId::Resource(id)))
    }

    pub fn track_timing(&self, key: TrackKey) -> Option<&TrackTiming> {
        self.tracks.get(&key).map(Tracked::get)
    }

    pub fn segment_timing(&self, id: u32) -> Option<&SegmentTiming> {
        self.segments.get(&id).map(Tracked::get)
    }

    pub fn text(&self, language: u32, id: u32) -> Option<&str> {
        self.strings
            .get(&StringKey::new(language, id))
            .map(|t| t.get().as_str())
    }

    /// Every string of `language` as `(id, text)`
    pub fn strings(&self, language: u32) -> impl Iterator<Item = (u32, &str)> {
        self.strings
            .iter()
            .filter(move |(key, _)| key.language == language)
            .map(|(key, text)| (key.id, text.get().as_str()))
    }

    /// Replaces the bytes of a payload
    pub fn set_audio(&mut self, id: AudioId, data: Vec<u8>) -> Result<()> {
        let key = self.resolve_audio(id).ok_or(NotFoundError::Audio(id))?;
        let audio = self.audio.get_mut(&key).ok_or(NotFoundError::Audio(id))?;

        if audio.data.set(data) {
            let owners = audio.data.owners().clone();
            self.raise(owners);
        }
        Ok(())
    }

    pub fn revert_audio(&mut self, id: AudioId) -> Result<()> {
        let key = self.resolve_audio(id).ok_or(NotFoundError::Audio(id))?;
        let audio = self.audio.get_mut(&key).ok_or(NotFoundError::Audio(id))?;

        if audio.data.revert() {
            let owners = audio.data.owners().clone();
            self.lower(owners)?;
        }
        Ok(())
    }

    pub fn set_track_timing(&mut self, key: TrackKey, timing: TrackTiming) -> Result<()> {
        let track = self
            .tracks
            .get_mut(&key)
            .ok_or(NotFoundError::TrackTiming(key))?;

        if track.set(timing) {
            let owners = track.owners().clone();
            self.raise(owners);
        }
        Ok(())
    }

    pub fn revert_track_timing(&mut self, key: TrackKey) -> Result<()> {
        let track = self
            .tracks
            .get_mut(&key)
            .ok_or(NotFoundError::TrackTiming(key))?;

        if track.revert() {
            let owners = track.owners().clone();
            self.lower(owners)?;
        }
        Ok(())
    }

    /// Changes any of the duration, entry marker or exit marker of a music segment
    pub fn set_segment_timing(
        &mut self,
        id: u32,
        duration: Option<f64>,
        entry: Option<f64>,
        exit: Option<f64>,
    ) -> Result<()> {
        let segment = self
            .segments
            .get_mut(&id)
            .ok_or(NotFoundError::Segment(id))?;

        let current = segment.get();
        let timing = SegmentTiming {
            duration: duration.unwrap_or(current.duration),
            entry: entry.unwrap_or(current.entry),
            exit: exit.unwrap_or(current.exit),
        };

        if segment.set(timing) {
            let owners = segment.owners().clone();
            self.raise(owners);
        }
        Ok(())
    }

    pub fn revert_segment_timing(&mut self, id: u32) -> Result<()> {
        let segment = self
            .segments
            .get_mut(&id)
            .ok_or(NotFoundError::Segment(id))?;

        if segment.revert() {
            let owners = segment.owners().clone();
            self.lower(owners)?;
        }
        Ok(())
    }

    pub fn set_text(&mut self, key: StringKey, text: impl Into<String>) -> Result<()> {
        let string = self.strings.get_mut(&key).ok_or(NotFoundError::Text(key))?;

        if string.set(text.into()) {
            let owners = string.owners().clone();
            self.raise(owners);
        }
        Ok(())
    }

    pub fn revert_text(&mut self, key: StringKey) -> Result<()> {
        let string = self.strings.get_mut(&key).ok_or(NotFoundError::Text(key))?;

        if string.revert() {
            let owners = string.owners().clone();
            self.lower(owners)?;
        }
        Ok(())
    }

    /// Reverts every modified value
    pub fn revert_all(&mut self) -> Result<()> {
        self.take_edits().map(|_| ())
    }

    /// Reverts every modified value and returns the edits that were undone
    pub fn take_edits(&mut self) -> Result<Vec<Edit>> {
        let mut owners = Vec::new();

        let mut edits = Vec::new();
        for (id, audio) in self.audio.iter_mut() {
            if let Some(data) = audio.data.take_edit() {
                owners.extend(audio.data.owners().iter().copied());
                edits.push(Edit::Audio(*id, data));
            }
        }
        edits.extend(take_tracked_edits(
            &mut self.tracks,
            &mut owners,
            Edit::TrackTiming,
        ));
        edits.extend(take_tracked_edits(
            &mut self.segments,
            &mut owners,
            Edit::SegmentTiming,
        ));
        edits.extend(take_tracked_edits(
            &mut self.strings,
            &mut owners,
            Edit::Text,
        ));

        self.lower(owners)?;
        Ok(edits)
    }

    /// Applies edits through the regular setters
    pub fn apply_edits(&mut self, edits: impl IntoIterator<Item = Edit>) -> Result<()> {
        for edit in edits {
            match edit {
                Edit::Audio(id, data) => self.set_audio(id, data)?,
                Edit::TrackTiming(key, timing) => self.set_track_timing(key, timing)?,
                Edit::SegmentTiming(id, timing) => self.set_segment_timing(
                    id,
                    Some(timing.duration),
                    Some(timing.entry),
                    Some(timing.exit),
                )?,
                Edit::Text(key, text) => self.set_text(key, text)?,
            }
        }
        Ok(())
    }

    /// Adds the objects of `other` that this graph does not have yet
    ///
    /// Objects already present win; their owner sets are extended with the owners from
    /// `other`, and newly listed owners of a modified value are raised. `other` must not
    /// carry edits, take them out with [`SoundGraph::take_edits`] first.
    #[instrument(skip_all, fields(banks = other.banks.len(), audio = other.audio.len()))]
    pub fn merge(&mut self, other: SoundGraph) {
        let SoundGraph {
            banks,
            streams,
            text_banks,
            audio,
            short_index,
            tracks,
            segments,
            strings,
            ..
        } = other;

        for (id, bank) in banks {
            self.banks.entry(id).or_insert(bank);
        }
        for (id, stream) in streams {
            self.streams.entry(id).or_insert(stream);
        }
        for (id, text_bank) in text_banks {
            self.text_banks.entry(id).or_insert(text_bank);
        }

        let mut raise = Vec::new();
        for (id, payload) in audio {
            match self.audio.entry(id) {
                Entry::Vacant(entry) => {
                    entry.insert(payload);
                }
                Entry::Occupied(mut entry) => {
                    let existing = entry.get_mut();
                    for owner in payload.data.owners() {
                        if existing.data.add_owner(*owner) && existing.is_modified() {
                            raise.push(*owner);
                        }
                    }
                    if existing.short_id == 0 {
                        existing.short_id = payload.short_id;
                    }
                }
            }
        }
        for (short_id, id) in short_index {
            self.short_index.entry(short_id).or_insert(id);
        }
        merge_tracked(&mut self.tracks, tracks, &mut raise);
        merge_tracked(&mut self.segments, segments, &mut raise);
        merge_tracked(&mut self.strings, strings, &mut raise);

        self.raise(raise);
    }

    /// Removes the objects listed in `keys`
    ///
    /// Removed containers disappear from the owner sets of the remaining values, and
    /// remaining containers that embedded a removed, modified value are lowered.
    #[instrument(skip_all, err)]
    pub fn evict(&mut self, keys: &GraphKeys) -> Result<()> {
        let evicted = keys.owners();

        let mut lower = Vec::new();
        for id in &keys.audio {
            let Some(audio) = self.audio.shift_remove(id) else {
                continue;
            };
            if audio.is_modified() {
                lower.extend(audio.data.owners().iter().filter(|o| !evicted.contains(*o)));
            }
        }
        for audio in self.audio.values_mut() {
            audio.data.retain_owners(|o| !evicted.contains(o));
        }
        evict_tracked(&mut self.tracks, &keys.tracks, &evicted, &mut lower);
        evict_tracked(&mut self.segments, &keys.segments, &evicted, &mut lower);
        evict_tracked(&mut self.strings, &keys.strings, &evicted, &mut lower);

        for id in &keys.banks {
            self.banks.shift_remove(id);
        }
        for id in &keys.streams {
            self.streams.shift_remove(id);
        }
        for id in &keys.text_banks {
            self.text_banks.shift_remove(id);
        }

        self.lower(lower)?;

        for bank in self.banks.values_mut() {
            bank.content.retain(|id| self.audio.contains_key(id));
        }
        self.short_index.retain(|_, id| self.audio.contains_key(id));

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use stingray_bank::types::{SegmentTiming, TrackTiming};
    use stingray_bank::Hierarchy;

    use crate::audio::{AudioId, AudioPayload};
    use crate::bank::SoundBank;
    use crate::error::{Error, NotFoundError, Result};
    use crate::graph::{Edit, SoundGraph, StringKey, TrackKey};
    use crate::stream::StreamEntry;
    use crate::tracked::{ModificationCounter, Owner, Tracked};
    use crate::types::{BankWrapper, TocEntry};

    fn bank(id: u64) -> SoundBank {
        SoundBank {
            id,
            entry: TocEntry::default(),
            wrapper: BankWrapper::default(),
            header: Vec::new(),
            hierarchy: Hierarchy::default(),
            extra: Vec::new(),
            dependency: None,
            content: Vec::new(),
            counter: ModificationCounter::default(),
        }
    }

    fn owned<T>(value: T, owners: &[Owner]) -> Tracked<T> {
        let mut tracked = Tracked::new(value);
        for owner in owners {
            tracked.add_owner(*owner);
        }
        tracked
    }

    /// Two banks sharing payload 42, bank 1 also holding track and segment timings
    fn graph() -> SoundGraph {
        let mut graph = SoundGraph::default();
        graph.banks.insert(1, bank(1));
        graph.banks.insert(2, bank(2));

        let mut audio = AudioPayload::in_bank(42, vec![0; 100]);
        audio.data.add_owner(Owner::Bank(1));
        audio.data.add_owner(Owner::Bank(2));
        graph.audio.insert(AudioId::Short(42), audio);
        graph.short_index.insert(42, AudioId::Short(42));

        graph.tracks.insert(
            TrackKey::Source(42),
            owned(TrackTiming::default(), &[Owner::Bank(1)]),
        );
        graph.segments.insert(
            7,
            owned(
                SegmentTiming {
                    duration: 1000.0,
                    entry: 0.0,
                    exit: 1000.0,
                },
                &[Owner::Bank(1)],
            ),
        );
        graph
    }

    #[test]
    fn audio_edit_propagates_to_every_owner() -> Result<()> {
        let mut graph = graph();

        graph.set_audio(AudioId::Short(42), vec![1; 200])?;
        graph.set_audio(AudioId::Short(42), vec![2; 300])?;
        assert_eq!(graph.banks[&1].counter.count(), 1);
        assert_eq!(graph.banks[&2].counter.count(), 1);
        assert_eq!(graph.modified_banks(), vec![1, 2]);

        graph.revert_audio(AudioId::Short(42))?;
        assert!(!graph.is_modified());
        assert_eq!(graph.find_audio(42).map(AudioPayload::size), Some(100));

        Ok(())
    }

    #[test]
    fn counters_add_up_per_value() -> Result<()> {
        let mut graph = graph();

        graph.set_audio(AudioId::Short(42), vec![1])?;
        graph.set_segment_timing(7, None, Some(250.0), None)?;
        assert_eq!(graph.banks[&1].counter.count(), 2);
        assert_eq!(graph.banks[&2].counter.count(), 1);
        assert_eq!(
            graph.segment_timing(7),
            Some(&SegmentTiming {
                duration: 1000.0,
                entry: 250.0,
                exit: 1000.0,
            })
        );

        graph.revert_audio(AudioId::Short(42))?;
        assert_eq!(graph.modified_banks(), vec![1]);

        graph.revert_all()?;
        assert!(!graph.is_modified());

        Ok(())
    }

    #[test]
    fn missing_objects_are_reported() {
        let mut graph = graph();

        let error = graph.set_audio(AudioId::Short(9), vec![]).unwrap_err();
        assert!(matches!(
            error,
            Error::NotFound(NotFoundError::Audio(AudioId::Short(9)))
        ));

        let error = graph
            .set_text(StringKey::new(1, 1), "missing")
            .unwrap_err();
        assert!(matches!(error, Error::NotFound(NotFoundError::Text(_))));
    }

    #[test]
    fn streamed_audio_is_found_by_short_id() -> Result<()> {
        let mut graph = SoundGraph::default();
        graph.streams.insert(
            0xABCD,
            StreamEntry::new(
                TocEntry {
                    file_id: 0xABCD,
                    ..Default::default()
                },
                vec![0; 16],
            ),
        );
        let mut audio = AudioPayload::streamed(0xABCD, vec![3; 10]);
        audio.short_id = 5;
        audio.data.add_owner(Owner::Stream(0xABCD));
        graph.audio.insert(audio.id(), audio);
        graph.short_index.insert(5, AudioId::Resource(0xABCD));

        graph.set_audio(AudioId::Short(5), vec![4; 20])?;
        assert_eq!(graph.modified_streams(), vec![0xABCD]);
        assert_eq!(graph.find_audio(0xABCD).map(AudioPayload::size), Some(20));
        assert_eq!(graph.find_audio(5).map(AudioPayload::size), Some(20));

        Ok(())
    }

    #[test]
    fn edits_move_between_graphs() -> Result<()> {
        let mut graph = graph();
        graph.set_track_timing(
            TrackKey::Source(42),
            TrackTiming {
                play_at: 10.0,
                ..Default::default()
            },
        )?;

        let edits = graph.take_edits()?;
        assert!(!graph.is_modified());
        assert_eq!(
            edits,
            vec![Edit::TrackTiming(
                TrackKey::Source(42),
                TrackTiming {
                    play_at: 10.0,
                    ..Default::default()
                }
            )]
        );

        graph.apply_edits(edits)?;
        assert_eq!(graph.modified_banks(), vec![1]);

        Ok(())
    }

    #[test]
    fn merge_keeps_existing_objects_and_raises_new_owners() -> Result<()> {
        let mut graph = graph();
        graph.set_audio(AudioId::Short(42), vec![9; 10])?;

        let mut other = SoundGraph::default();
        other.banks.insert(3, bank(3));
        let mut audio = AudioPayload::in_bank(42, vec![0; 100]);
        audio.data.add_owner(Owner::Bank(3));
        other.audio.insert(AudioId::Short(42), audio);

        graph.merge(other);
        assert_eq!(graph.banks.len(), 3);
        assert_eq!(graph.modified_banks(), vec![1, 2, 3]);
        assert_eq!(graph.find_audio(42).map(AudioPayload::size), Some(10));

        Ok(())
    }

    #[test]
    fn evict_lowers_surviving_owners() -> Result<()> {
        let mut graph = graph();
        graph.banks.insert(3, bank(3));
        let mut audio = AudioPayload::in_bank(43, vec![0; 4]);
        audio.data.add_owner(Owner::Bank(2));
        audio.data.add_owner(Owner::Bank(3));
        graph.audio.insert(AudioId::Short(43), audio);
        graph.set_audio(AudioId::Short(43), vec![1])?;
        assert_eq!(graph.modified_banks(), vec![2, 3]);

        let mut keys = SoundGraph::default().keys();
        keys.banks = vec![3];
        keys.audio = vec![AudioId::Short(43)];
        graph.evict(&keys)?;

        assert_eq!(graph.banks.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert!(!graph.is_modified());
        assert!(graph.audio(AudioId::Short(43)).is_none());

        Ok(())
    }

    #[test]
    fn strings_filter_by_language() -> Result<()> {
        let mut graph = SoundGraph::default();
        graph
            .strings
            .insert(StringKey::new(1, 10), Tracked::new("one".to_string()));
        graph
            .strings
            .insert(StringKey::new(2, 10), Tracked::new("two".to_string()));

        assert_eq!(graph.strings(2).collect::<Vec<_>>(), vec![(10, "two")]);
        assert_eq!(graph.text(1, 10), Some("one"));
        assert_eq!(graph.text(1, 11), None);

        Ok(())
    }
}
