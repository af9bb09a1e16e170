use binrw::BinWrite;
use stingray_bank::hirc::HircRecord;
use stingray_bank::types::{BankSource, RawChunk, StreamType};
use stingray_bank::{BankBuilder, ByteCursor, Hierarchy};
use tracing::{instrument, trace};

use crate::audio::AudioId;
use crate::error::{Error, Result};
use crate::graph::{SoundGraph, TrackKey};
use crate::hash::stream_resource_id;
use crate::tracked::ModificationCounter;
use crate::types::{BankWrapper, Dependency, TocEntry};

/// Dependency entry paired with its bank
#[derive(Debug, Clone, PartialEq)]
pub struct BankDependency {
    pub entry: TocEntry,
    pub dependency: Dependency,
}

/// A soundbank of the archive
#[derive(Debug, Clone, PartialEq)]
pub struct SoundBank {
    pub id: u64,
    pub entry: TocEntry,
    pub wrapper: BankWrapper,

    /// Contents of the `BKHD` chunk
    pub header: Vec<u8>,
    pub hierarchy: Hierarchy,

    /// Chunks written after `HIRC`, in their original order
    pub extra: Vec<RawChunk>,
    pub dependency: Option<BankDependency>,

    /// Payloads referenced by this bank's Vorbis sources
    pub content: Vec<AudioId>,
    pub counter: ModificationCounter,
}

impl SoundBank {
    pub fn is_modified(&self) -> bool {
        self.counter.is_modified()
    }

    /// Path of the bank inside the game data, when its dependency entry was found
    pub fn path(&self) -> Option<&str> {
        self.dependency.as_ref().map(|d| d.dependency.path.as_str())
    }

    /// Last path component, or the hex id when the path is unknown
    pub fn name(&self) -> String {
        self.dependency
            .as_ref()
            .map(|d| d.dependency.file_name().to_string())
            .unwrap_or_else(|| format!("{:016x}", self.id))
    }

    /// Pool key of the payload behind `source`
    ///
    /// Streamed sources can only be located through the bank path, so they resolve to
    /// `None` for a bank without a dependency.
    pub fn resolve(&self, source: &BankSource) -> Option<AudioId> {
        match source.stream_type {
            StreamType::Bank => Some(AudioId::Short(source.source_id)),
            StreamType::PrefetchStream | StreamType::Stream => self
                .path()
                .map(|path| AudioId::Resource(stream_resource_id(path, source.source_id))),
        }
    }

    /// Bank media played by a non-Vorbis source
    ///
    /// Plugin sources point at an effect record of this bank, which names the media.
    pub fn resolve_plugin(&self, source: &BankSource) -> Option<u32> {
        if source.is_vorbis() || source.stream_type != StreamType::Bank {
            return None;
        }
        match self.hierarchy.get(source.source_id)? {
            HircRecord::Generic(effect) => effect.plugin_media_id(),
            _ => None,
        }
    }

    /// Pool key and media id of any source, Vorbis or plugin
    pub fn resolve_media(&self, source: &BankSource) -> Option<(AudioId, u32)> {
        if source.is_vorbis() {
            return self.resolve(source).map(|id| (id, source.source_id));
        }
        self.resolve_plugin(source)
            .map(|media_id| (AudioId::Short(media_id), media_id))
    }

    /// Copy of the hierarchy with the modified timings of `graph` written into it
    fn overlay(&self, graph: &SoundGraph) -> Hierarchy {
        let mut hierarchy = self.hierarchy.clone();
        for record in hierarchy.records_mut() {
            for info in record.track_info_mut() {
                let Some(timing) = TrackKey::of(info).and_then(|key| graph.tracks.get(&key)) else {
                    continue;
                };
                if timing.is_modified() {
                    info.timing = *timing.get();
                }
            }

            if let HircRecord::MusicSegment(segment) = record {
                if let Some(timing) = graph.segments.get(&segment.id) {
                    if timing.is_modified() {
                        segment.set_timing(timing.get());
                    }
                }
            }
        }
        hierarchy
    }

    /// Builds this bank's TOC data from the current state of `graph`
    ///
    /// Every source whose payload is in the pool contributes its media once, in
    /// hierarchy order: bank and plugin sources the whole payload, prefetch sources the
    /// first `prefetch_size` bytes. In-bank payloads of the content list that no source
    /// reaches follow unchanged.
    #[instrument(skip_all, err, fields(bank = self.id))]
    pub fn generate(&self, graph: &SoundGraph) -> Result<Vec<u8>> {
        let hierarchy = self.overlay(graph);

        let mut builder = BankBuilder::new(self.header.clone());
        for source in hierarchy.records().flat_map(HircRecord::sources) {
            if source.stream_type == StreamType::Stream {
                continue;
            }
            let Some((audio, media_id)) = self
                .resolve_media(source)
                .and_then(|(id, media_id)| Some((graph.audio.get(&id)?, media_id)))
            else {
                continue;
            };

            let bytes = audio.bytes();
            let bytes = match source.stream_type {
                StreamType::PrefetchStream => {
                    &bytes[..bytes.len().min(source.prefetch_size as usize)]
                }
                _ => bytes,
            };
            if builder.add_media(media_id, bytes)? {
                trace!(media = media_id, size = bytes.len(), "packed media");
            }
        }

        for id in &self.content {
            let AudioId::Short(media_id) = *id else {
                continue;
            };
            let Some(audio) = graph.audio.get(id) else {
                continue;
            };
            if builder.add_media(media_id, audio.bytes())? {
                trace!(media = media_id, size = audio.size(), "packed unreferenced media");
            }
        }

        let data = builder.finish(&hierarchy, &self.extra)?;

        let size = u32::try_from(data.len()).map_err(|_| {
            Error::MalformedContainer(format!("bank {:#018x} grew past 4 GiB", self.id))
        })?;

        let mut out = ByteCursor::default();
        BankWrapper {
            size,
            ..self.wrapper
        }
        .write(&mut out)?;
        out.write_bytes(&data);

        Ok(out.into_inner())
    }
}
