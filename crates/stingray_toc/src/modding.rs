//! Several archives edited together and written out as one patch.
//!
//! Archives added to a [`Mod`] share a single [`SoundGraph`]: a payload, timing or
//! string present in more than one archive exists once, and editing it marks every
//! container of every archive that embeds it. Each object is reference counted by the
//! archives holding it, so removing an archive only drops what no other archive uses.

use bon::Builder;
use derive_more::derive::{Deref, DerefMut};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt::Display;
use std::fs;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::archive::{Archive, LoadOptions};
use crate::audio::AudioId;
use crate::error::{Error, NotFoundError, Result};
use crate::graph::{GraphKeys, SoundGraph, StringKey, TrackKey};
use crate::language::EN_US;
use crate::types::TocHeader;
use crate::write::{TocWriter, WrittenArchive};

/// Options of a [`Mod`]
#[derive(Builder, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ModOptions {
    /// Language whose strings are compared when importing
    #[builder(default = EN_US)]
    pub language: u32,

    /// Suffix of the patch name, `<archive>.patch_<index>`
    #[builder(default)]
    pub patch_index: u32,
}

impl Default for ModOptions {
    fn default() -> Self {
        ModOptions::builder().build()
    }
}

/// Number of holders of each key
#[derive(Debug, Clone)]
pub struct RefCount<K> {
    counts: HashMap<K, u32>,
}

impl<K> Default for RefCount<K> {
    fn default() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq + Copy + Display> RefCount<K> {
    /// Returns the count after acquiring
    pub fn acquire(&mut self, key: K) -> u32 {
        let count = self.counts.entry(key).or_insert(0);
        *count += 1;
        *count
    }

    /// Returns the count after releasing, `None` when `key` was not held
    pub fn release(&mut self, key: K) -> Option<u32> {
        let count = self.counts.get_mut(&key)?;
        *count -= 1;
        let remaining = *count;
        if remaining == 0 {
            self.counts.remove(&key);
        }
        Some(remaining)
    }

    pub fn get(&self, key: K) -> u32 {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    fn acquire_all(&mut self, keys: &[K]) {
        for key in keys {
            self.acquire(*key);
        }
    }

    /// Releases `keys`, returning those that are no longer held
    fn release_all(&mut self, keys: &[K]) -> Vec<K> {
        keys.iter()
            .copied()
            .filter(|key| match self.release(*key) {
                Some(remaining) => remaining == 0,
                None => {
                    warn!(key = %key, "released a key no archive holds");
                    false
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
struct Counts {
    banks: RefCount<u64>,
    streams: RefCount<u64>,
    text_banks: RefCount<u64>,
    audio: RefCount<AudioId>,
    tracks: RefCount<TrackKey>,
    segments: RefCount<u32>,
    strings: RefCount<StringKey>,
}

impl Counts {
    fn acquire(&mut self, keys: &GraphKeys) {
        self.banks.acquire_all(&keys.banks);
        self.streams.acquire_all(&keys.streams);
        self.text_banks.acquire_all(&keys.text_banks);
        self.audio.acquire_all(&keys.audio);
        self.tracks.acquire_all(&keys.tracks);
        self.segments.acquire_all(&keys.segments);
        self.strings.acquire_all(&keys.strings);
    }

    fn release(&mut self, keys: &GraphKeys) -> GraphKeys {
        GraphKeys {
            banks: self.banks.release_all(&keys.banks),
            streams: self.streams.release_all(&keys.streams),
            text_banks: self.text_banks.release_all(&keys.text_banks),
            audio: self.audio.release_all(&keys.audio),
            tracks: self.tracks.release_all(&keys.tracks),
            segments: self.segments.release_all(&keys.segments),
            strings: self.strings.release_all(&keys.strings),
        }
    }
}

#[derive(Debug, Clone)]
struct Member {
    header: TocHeader,
    keys: GraphKeys,
}

/// Removes the first `patch_` component from a dotted file name
pub fn strip_patch_index(name: &str) -> String {
    let mut parts = name.split('.').collect::<Vec<_>>();
    if let Some(index) = parts.iter().position(|part| part.contains("patch_")) {
        parts.remove(index);
    }
    parts.join(".")
}

/// Id encoded in the name of an audio file
///
/// An ordering prefix like `03_` is skipped, then the leading digits are the id:
/// `03_12345.wem` and `12345 footsteps.wem` both give `12345`.
pub fn audio_id_from_file_name(name: &str) -> Option<u64> {
    let stem = match name.split_once('_') {
        Some((prefix, rest)) if prefix.parse::<u32>().is_ok_and(|n| n < 10_000) => rest,
        _ => name,
    };
    let end = stem
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(stem.len());
    stem[..end].parse().ok()
}

/// A set of archives edited together
///
/// The shared graph is reachable through `Deref`, edits are made on the mod directly.
#[derive(Debug, Default, Deref, DerefMut)]
pub struct Mod {
    options: ModOptions,
    archives: IndexMap<String, Member>,
    counts: Counts,

    #[deref]
    #[deref_mut]
    graph: SoundGraph,
}

impl Mod {
    pub fn new(options: ModOptions) -> Self {
        Self {
            options,
            graph: SoundGraph {
                language: options.language,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn options(&self) -> &ModOptions {
        &self.options
    }

    pub fn archive_names(&self) -> impl Iterator<Item = &str> {
        self.archives.keys().map(String::as_str)
    }

    /// Number of archives holding a bank
    pub fn bank_holders(&self, id: u64) -> u32 {
        self.counts.banks.get(id)
    }

    /// Number of archives holding a payload
    pub fn audio_holders(&self, id: AudioId) -> u32 {
        self.counts.audio.get(id)
    }

    /// Merges an archive into the shared graph
    ///
    /// Edits already made on `archive` are carried over and mark the containers of
    /// every archive sharing the edited values.
    #[instrument(skip_all, err, fields(archive = %archive.name))]
    pub fn add_archive(&mut self, archive: Archive) -> Result<()> {
        let Archive {
            name,
            header,
            mut graph,
        } = archive;
        if self.archives.contains_key(&name) {
            return Err(Error::DuplicateArchive(name));
        }

        let edits = graph.take_edits()?;
        let keys = graph.keys();

        self.graph.merge(graph);
        self.counts.acquire(&keys);
        self.graph.apply_edits(edits)?;

        info!(
            banks = keys.banks.len(),
            streams = keys.streams.len(),
            text_banks = keys.text_banks.len(),
            "added archive"
        );
        self.archives.insert(name, Member { header, keys });
        Ok(())
    }

    /// Drops an archive, keeping the objects other archives still hold
    #[instrument(skip(self), err)]
    pub fn remove_archive(&mut self, name: &str) -> Result<()> {
        let member = self
            .archives
            .shift_remove(name)
            .ok_or_else(|| NotFoundError::Archive(name.to_string()))?;

        let unused = self.counts.release(&member.keys);
        debug!(
            banks = unused.banks.len(),
            audio = unused.audio.len(),
            "evicting objects"
        );
        self.graph.evict(&unused)
    }

    /// `<first archive>.patch_<index>`, with any patch index of the archive name removed
    pub fn patch_name(&self) -> Result<String> {
        let name = self.archives.keys().next().ok_or(Error::NoArchives)?;
        Ok(format!(
            "{}.patch_{}",
            strip_patch_index(name),
            self.options.patch_index
        ))
    }

    /// Serializes every modified container
    pub fn patch_bytes(&self) -> Result<WrittenArchive> {
        let header = self
            .archives
            .values()
            .next()
            .map(|member| member.header)
            .unwrap_or_default();

        TocWriter::builder()
            .graph(&self.graph)
            .header(header)
            .streams(self.graph.modified_streams())
            .banks(self.graph.modified_banks())
            .text_banks(self.graph.modified_text_banks())
            .build()
            .write()
    }

    /// Writes the patch into `dir`, returning the path of its TOC file
    #[instrument(skip(self), err)]
    pub fn write_patch(&self, dir: &Path) -> Result<PathBuf> {
        let name = self.patch_name()?;
        let path = self.patch_bytes()?.write_to(dir, &name)?;
        info!(path = %path.display(), "wrote patch");
        Ok(path)
    }

    /// Loads a patch from disk and imports its differences
    pub fn import_patch(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let options = LoadOptions::builder()
            .language(self.options.language)
            .build();
        let patch = Archive::from_file(path, options)?;
        self.import_archive(&patch)
    }

    /// Applies every value of `patch` that differs from the original value here
    ///
    /// Values are compared with the state before any edit, so importing the same patch
    /// twice, or importing a patch over an edited value, still applies it.
    #[instrument(skip_all, err, fields(patch = patch.name()))]
    pub fn import_archive(&mut self, patch: &Archive) -> Result<()> {
        let mut applied = 0;

        for (id, payload) in &patch.audio {
            let target = self.graph.resolve_audio(*id).or_else(|| {
                (payload.short_id != 0)
                    .then(|| self.graph.resolve_audio(AudioId::Short(payload.short_id)))
                    .flatten()
            });
            let Some(target) = target else {
                debug!(audio = %id, "audio of the patch is not part of this mod");
                continue;
            };
            let Some(live) = self.graph.audio.get(&target) else {
                continue;
            };
            if live.data.original() != payload.data.get() {
                self.graph.set_audio(target, payload.data.get().clone())?;
                applied += 1;
            }
        }

        for (key, timing) in &patch.tracks {
            let Some(live) = self.graph.tracks.get(key) else {
                continue;
            };
            if live.original() != timing.get() {
                self.graph.set_track_timing(*key, *timing.get())?;
                applied += 1;
            }
        }

        for (id, timing) in &patch.segments {
            let Some(live) = self.graph.segments.get(id) else {
                continue;
            };
            let new = timing.get();
            if live.original() != new {
                self.graph.set_segment_timing(
                    *id,
                    Some(new.duration),
                    Some(new.entry),
                    Some(new.exit),
                )?;
                applied += 1;
            }
        }

        for (key, text) in &patch.strings {
            if key.language != self.options.language {
                continue;
            }
            let Some(live) = self.graph.strings.get(key) else {
                continue;
            };
            if live.original() != text.get() {
                self.graph.set_text(*key, text.get().clone())?;
                applied += 1;
            }
        }

        info!(applied, "imported patch");
        Ok(())
    }

    /// Replaces payloads with the contents of audio files named after their ids
    ///
    /// Files whose name carries no id, or an id unknown to this mod, are skipped.
    /// Returns the number of payloads replaced.
    #[instrument(skip_all, err)]
    pub fn import_audio_files<P: AsRef<Path>>(
        &mut self,
        paths: impl IntoIterator<Item = P>,
    ) -> Result<usize> {
        let mut imported = 0;
        for path in paths {
            let path = path.as_ref();
            let Some(id) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(audio_id_from_file_name)
            else {
                warn!(path = %path.display(), "file name carries no audio id");
                continue;
            };
            let Some(target) = self.graph.find_audio(id).map(|audio| audio.id()) else {
                warn!(path = %path.display(), id, "no audio with this id");
                continue;
            };

            self.graph.set_audio(target, fs::read(path)?)?;
            imported += 1;
        }
        Ok(imported)
    }
}
