//! Error types for the unsheet library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for unsheet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a workbook.
///
/// The variants split into two stages: failures opening the container
/// ([`FileNotFound`](Error::FileNotFound), [`PermissionDenied`](Error::PermissionDenied),
/// [`Io`](Error::Io), [`UnknownFormat`](Error::UnknownFormat)) and failures
/// parsing its contents (everything else). No variant is ever recovered from
/// internally; the first error aborts the whole load.
#[derive(Error, Debug)]
pub enum Error {
    /// The input path does not resolve to an existing file.
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// The input file exists but cannot be read.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Other I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not a ZIP-based container at all.
    #[error("not a spreadsheet container (ZIP signature missing)")]
    UnknownFormat,

    /// The container is a valid OOXML package but not a workbook.
    #[error("not a spreadsheet: {0}")]
    NotASpreadsheet(String),

    /// Error reading the ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A required package part is missing.
    #[error("missing component: {0}")]
    MissingComponent(String),

    /// Structurally valid XML with content that cannot be interpreted.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A sheet name was requested that the workbook does not declare.
    #[error("no such sheet: {0}")]
    SheetNotFound(String),
}

impl Error {
    /// Classify an I/O error raised while opening `path` into the
    /// dedicated open-stage variants.
    pub(crate) fn from_open(err: io::Error, path: &std::path::Path) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Error::PermissionDenied(path.to_path_buf()),
            _ => Error::Io(err),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}
