use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LocaleError {
    #[error("Empty locale")]
    Empty,

    #[error("Invalid locale: {0}")]
    Invalid(String),
}

/// A source that could not be opened at all
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid region: offset {offset}, length {length}")]
    InvalidRegion { offset: u64, length: u64 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Structural defects found while validating a dictionary region.
///
/// These never propagate out of an open; they mark the handle invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Region too short for header: {0} bytes")]
    Truncated(u64),

    #[error("Bad magic number: {0:#010x}")]
    BadMagic(u32),

    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(u16),

    #[error("Header size {header_size} out of bounds for region of {length} bytes")]
    HeaderSize { header_size: u32, length: u64 },

    #[error("Entry {index} runs past the end of the region")]
    EntryOverrun { index: u32 },

    #[error("Entry {index} is not valid UTF-8")]
    InvalidWord { index: u32 },
}
