//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// Transparent warpper for [`std::str::Utf8Error`]
    #[error(transparent)]
    Utf8Error(#[from] std::str::Utf8Error),

    /// {0}
    #[error("{0}")]
    WinnowError(winnow::error::ErrMode<winnow::error::ContextError>),

    /// A read went past the end of the buffer
    #[error("unexpected end of buffer: wanted {requested} bytes at {position}, {available} available")]
    UnexpectedEof {
        /// Cursor position when the read was attempted
        position: usize,
        /// Number of bytes the read asked for
        requested: usize,
        /// Number of bytes left in the buffer
        available: usize,
    },

    /// The bank chunk layout is inconsistent
    #[error("malformed soundbank: {0}")]
    MalformedBank(String),

    /// A chunk every bank must carry is absent
    #[error("soundbank is missing its {0} chunk")]
    MissingChunk(&'static str),
}

impl From<winnow::error::ErrMode<winnow::error::ContextError>> for Error {
    fn from(value: winnow::error::ErrMode<winnow::error::ContextError>) -> Self {
        Error::WinnowError(value)
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
