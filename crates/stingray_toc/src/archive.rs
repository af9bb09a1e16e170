use bon::Builder;
use derive_more::derive::{Deref, DerefMut};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::graph::SoundGraph;
use crate::language::EN_US;
use crate::read::read_graph;
use crate::types::TocHeader;
use crate::write::{TocWriter, WrittenArchive};

/// Options used when loading an archive
#[derive(Builder, Debug, Copy, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Language used when comparing strings with another archive
    #[builder(default = EN_US)]
    pub language: u32,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions::builder().build()
    }
}

/// One TOC file and its stream file, loaded into a [`SoundGraph`]
///
/// The graph is reachable through `Deref`, so lookups and edits are called on the
/// archive directly:
///
/// ```no_run
/// # use stingray_toc::{Archive, AudioId, LoadOptions};
/// # fn doit() -> stingray_toc::error::Result<()> {
/// let mut archive = Archive::from_file("data/9ba626afa44a3aa3", LoadOptions::default())?;
/// archive.set_audio(AudioId::Short(42), std::fs::read("42.wem")?)?;
/// archive.to_file("out".as_ref())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deref, DerefMut)]
pub struct Archive {
    pub(crate) name: String,
    pub(crate) header: TocHeader,

    #[deref]
    #[deref_mut]
    pub(crate) graph: SoundGraph,
}

impl Archive {
    /// Parses an archive from its TOC and stream bytes
    ///
    /// `stream` may be empty for archives without stream entries.
    #[instrument(skip_all, err, fields(name = tracing::field::Empty))]
    pub fn load(
        name: impl Into<String>,
        toc: &[u8],
        stream: &[u8],
        options: LoadOptions,
    ) -> Result<Archive> {
        let name = name.into();
        tracing::Span::current().record("name", name.as_str());

        let (header, graph) = read_graph(toc, stream, options.language)?;
        Ok(Archive {
            name,
            header,
            graph,
        })
    }

    /// Reads an archive from disk
    ///
    /// `path` may point at the TOC file or at its `.stream` or `.gpu_resources`
    /// sibling. The stream file is read when it exists.
    pub fn from_file(path: impl AsRef<Path>, options: LoadOptions) -> Result<Archive> {
        let path = path.as_ref();
        let toc_path = match path.extension().and_then(|e| e.to_str()) {
            Some("stream" | "gpu_resources") => path.with_extension(""),
            _ => path.to_path_buf(),
        };

        let name = toc_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                Error::CustomError(format!("{} does not name a file", toc_path.display()))
            })?;

        let toc = fs::read(&toc_path)?;
        let stream_path = stream_path(&toc_path);
        let stream = if stream_path.exists() {
            fs::read(&stream_path)?
        } else {
            debug!(path = %stream_path.display(), "no stream file");
            Vec::new()
        };

        Archive::load(name, &toc, &stream, options)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn header(&self) -> &TocHeader {
        &self.header
    }

    pub fn graph(&self) -> &SoundGraph {
        &self.graph
    }

    pub fn into_graph(self) -> SoundGraph {
        self.graph
    }

    /// Serializes every container with its current values
    pub fn to_bytes(&self) -> Result<WrittenArchive> {
        TocWriter::all(&self.graph, self.header).write()
    }

    /// Writes the archive into `dir` under its own name, returning the TOC path
    #[instrument(skip(self), err, fields(name = %self.name))]
    pub fn to_file(&self, dir: &Path) -> Result<PathBuf> {
        self.to_bytes()?.write_to(dir, &self.name)
    }
}

/// `<toc>.stream`
pub fn stream_path(toc_path: &Path) -> PathBuf {
    let mut path = OsString::from(toc_path.as_os_str());
    path.push(".stream");
    PathBuf::from(path)
}
