use thiserror::Error;

/// Errors raised while encoding, decoding, or materializing templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("invalid magic bytes (expected STRA)")]
    InvalidMagic,

    #[error("unsupported template format version {0}")]
    UnsupportedVersion(u16),

    #[error("truncated template: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("LZ4 decompression failed: {0}")]
    DecompressError(String),

    #[error("chunk payload size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("invalid utf-8 in template string field")]
    InvalidString,
}
