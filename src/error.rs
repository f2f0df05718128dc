//! Crate error type.
//!
//! The format has a closed failure taxonomy (bad magic, truncated input,
//! out-of-range block coordinates, allocation failure); this enum gives each
//! of those a distinct variant instead of collapsing everything into a
//! string, so callers can match on `kind` the way `std::io::Error::kind`
//! lets them.

use std::io;

/// Errors produced while decoding, encoding or manipulating RL data.
#[derive(Debug, thiserror::Error)]
pub enum RlError {
    /// Bad magic, unknown version, an out-of-range field, or any other
    /// structurally invalid input that isn't simply short.
    #[error("malformed input: {0}")]
    MalformedInput(&'static str),

    /// A declared length reaches past the end of the available bytes.
    #[error("truncated input: need {needed} more byte(s), have {available}")]
    Truncated {
        /// Bytes required to proceed.
        needed: usize,
        /// Bytes actually remaining.
        available: usize,
    },

    /// `BlockIo` was asked to address a block outside the image. This is a
    /// programming error in the caller, not a property of untrusted input,
    /// but it is still surfaced as a `Result` rather than a panic.
    #[error("block coordinates ({bx}, {by}) out of bounds for a {width}x{height} image")]
    BlockBounds {
        /// Block-space column.
        bx: u32,
        /// Block-space row.
        by: u32,
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// A scratch allocation (palette row buffer, conversion buffer) failed.
    #[error("allocation failed: {0}")]
    OutOfMemory(&'static str),

    /// Propagated I/O failure (short read/write, file-system error).
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RlError>;

impl RlError {
    pub(crate) fn truncated(needed: usize, available: usize) -> Self {
        RlError::Truncated { needed, available }
    }
}
