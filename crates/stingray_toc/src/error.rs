//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

use crate::audio::AudioId;
use crate::graph::{StringKey, TrackKey};
use crate::tracked::Owner;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// Transparent warpper for [`stingray_bank::error::Error`]
    #[error(transparent)]
    BankError(#[from] stingray_bank::error::Error),

    /// Transparent warpper for [`stingray_text::error::Error`]
    #[error(transparent)]
    TextError(#[from] stingray_text::error::Error),

    /// file is an invalid toc archive
    #[error("file is an invalid toc archive")]
    InvalidArchive,

    /// An entry points outside the archive or its contents do not parse
    #[error("malformed archive: {0}")]
    MalformedContainer(String),

    /// A bank has no dependency entry, so its streamed sources cannot be located
    #[error("bank {0:#018x} has no dependency entry")]
    MissingDependency(u64),

    /// A source of a bank has no matching payload
    #[error("bank {bank:#018x} references audio {source} which is not in the archive")]
    UnresolvedAudioReference {
        /// The bank holding the reference
        bank: u64,
        /// Short id of the missing source
        r#source: u32,
    },

    /// A container was marked unmodified more often than it was marked modified
    #[error("modification counter of {0} dropped below zero")]
    ReferenceCountUnderflow(Owner),

    /// unable to find requested object
    #[error("unable to find requested object")]
    NotFound(#[from] NotFoundError),

    /// An archive with the same name was already added
    #[error("archive {0} was already added")]
    DuplicateArchive(String),

    /// A patch needs at least one archive to name it after
    #[error("no archive has been added")]
    NoArchives,

    /// {0}
    #[error("{0}")]
    CustomError(String),
}

/// Error type to provide further information when an object has not been found
#[derive(Error, Diagnostic, Debug)]
#[error("unable to find requested object")]
pub enum NotFoundError {
    /// audio {0}
    #[error("audio {0}")]
    Audio(AudioId),

    /// track timing of {0}
    #[error("track timing of {0}")]
    TrackTiming(TrackKey),

    /// music segment {0}
    #[error("music segment {0}")]
    Segment(u32),

    /// string {0}
    #[error("string {0}")]
    Text(StringKey),

    /// archive {0}
    #[error("archive {0}")]
    Archive(String),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
