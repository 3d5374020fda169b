use alloc::string::String;
use enough::StopReason;

use crate::file::Section;

/// Errors from TGA loading, writing and RLE unpacking.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TgaError {
    #[error("truncated header: need 18 bytes, got {actual}")]
    TruncatedHeader { actual: usize },

    #[error("incomplete file body: header declares {expected} bytes, got {actual}")]
    IncompleteBody { expected: usize, actual: usize },

    #[cfg(feature = "std")]
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{section} buffer holds {actual} bytes, header declares {expected}")]
    SectionLength {
        section: Section,
        expected: usize,
        actual: usize,
    },

    #[error("RLE data ends early: produced {actual} of {expected} bytes")]
    TruncatedRle { expected: usize, actual: usize },

    #[error("unsupported format variant: {0}")]
    UnsupportedVariant(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for TgaError {
    fn from(r: StopReason) -> Self {
        TgaError::Cancelled(r)
    }
}
