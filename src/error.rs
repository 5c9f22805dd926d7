//! Error types for uploadkit.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for uploadkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while sweeping or converting.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The sweep directory exists but could not be listed.
    #[error("Cannot read directory {}: {source}", path.display())]
    DirectoryRead {
        /// Directory that failed to list
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// An external program required by a backend is not installed.
    #[error("Required program not found: {0}")]
    ToolNotFound(String),

    /// Rasterizing the input PDF failed.
    #[error("Rasterization error: {0}")]
    Rasterize(String),

    /// Text recognition failed for a page.
    #[error("Recognition failed on page {page}: {message}")]
    Recognize {
        /// 0-based page ordinal
        page: usize,
        /// Backend message
        message: String,
    },

    /// The recognizer produced something that is not a usable single-page PDF.
    #[error("Invalid recognized page {page}: {message}")]
    Fragment {
        /// 0-based page ordinal
        page: usize,
        /// What was wrong with it
        message: String,
    },

    /// The input produced no pages at all.
    #[error("Document has no pages")]
    EmptyDocument,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Error serializing the output PDF.
    #[error("PDF write error: {0}")]
    PdfWrite(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
