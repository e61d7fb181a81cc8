//! Error types for PSF decoding and glyph sheet rendering

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PsfError {
    // === I/O Errors ===
    #[error("Failed to open '{path}': {source}")]
    OpenFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Header Errors ===
    #[error("Failed to read header: expected {expected} bytes, got {actual}")]
    TruncatedHeader { expected: usize, actual: usize },

    #[error("Invalid PSF file: magic number 0x{magic:08x} does not match 0x{expected:08x}")]
    MagicMismatch { magic: u32, expected: u32 },

    #[error("Glyph data seems to be too small: {bytes_per_glyph} bytes per glyph for {width}x{height} pixels")]
    GlyphDataTooSmall { bytes_per_glyph: u32, width: u32, height: u32 },

    // === Unicode Table Errors ===
    #[error("Data underflow reading glyph table at glyph {glyph}")]
    UnexpectedEndOfTable { glyph: u32 },

    #[error("Failed to decode UTF-8 code point in table at glyph {glyph}: {bytes:02X?}")]
    InvalidCodepointEncoding { glyph: u32, bytes: Vec<u8> },

    // === Bitmap Errors ===
    #[error("Failed to read glyph {glyph}: expected {expected} bytes, got {actual}")]
    ShortGlyphRead { glyph: u32, expected: usize, actual: usize },

    #[error("Glyph sheet of {width}x{height} pixels exceeds the canvas limits")]
    CanvasTooLarge { width: u64, height: u64 },

    // === Output Errors ===
    #[error("Failed to write png: {0}")]
    EncodeFailure(#[from] png::EncodingError),
}

/// Result type alias for PSF operations
pub type Result<T> = std::result::Result<T, PsfError>;

impl PsfError {
    /// Create an open failure for the given path
    pub fn open_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OpenFailure { path: path.into(), source }
    }
}
