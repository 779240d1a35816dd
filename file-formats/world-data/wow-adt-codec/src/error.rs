//! Error types for ADT chunk decoding and encoding.
//!
//! Decoding and encoding are fail-fast: the first critical failure aborts the
//! current document and is returned to the caller. Nothing is retried, since a
//! pure in-memory transform has no transient failure mode.
//!
//! # Error Categories
//!
//! ## Data errors (malformed or truncated input)
//!
//! - [`AdtError::TruncatedInput`] - A read ran past the end of the buffer
//! - [`AdtError::ChunkSignatureMismatch`] - A required slot found the wrong tag (or none)
//! - [`AdtError::InvalidOffset`] - An internal offset points outside its payload
//! - [`AdtError::InvalidChunkSize`] - A flat record's payload has the wrong length
//! - [`AdtError::InvalidWaterStructure`] - Liquid sub-rectangle leaves the 8×8 grid
//!
//! ## Consistency errors (raised while encoding)
//!
//! - [`AdtError::SizeMismatch`] - Bytes written disagree with the recomputed size
//! - [`AdtError::PayloadTooLarge`] - Payload no longer addressable by `u32` offsets
//! - [`AdtError::MissingRequiredChunk`] - A required slot is empty at encode time
//!
//! ## API misuse
//!
//! - [`AdtError::UnknownSlot`], [`AdtError::DuplicateSlot`], [`AdtError::SlotKindMismatch`]
//!
//! An optional slot whose tag is absent is *not* an error; the container
//! resolves it to an empty slot before any error is built.
//!
//! # Examples
//!
//! ```
//! use wow_adt_codec::error::{AdtError, Result};
//! use wow_adt_codec::ChunkId;
//!
//! fn expect_tag(found: ChunkId, expected: ChunkId, offset: u64) -> Result<()> {
//!     if found != expected {
//!         return Err(AdtError::ChunkSignatureMismatch {
//!             expected,
//!             found: Some(found),
//!             offset,
//!         });
//!     }
//!     Ok(())
//! }
//!
//! assert!(expect_tag(ChunkId::MVER, ChunkId::MHDR, 0).is_err());
//! ```

use thiserror::Error;

use crate::ChunkId;

/// Result type alias using [`AdtError`] as the error type.
pub type Result<T> = std::result::Result<T, AdtError>;

/// Errors that can occur while decoding or encoding ADT chunk data.
#[derive(Error, Debug)]
pub enum AdtError {
    /// Underlying I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A read needed more bytes than the buffer holds.
    ///
    /// # Example
    ///
    /// ```text
    /// MH2O instance record at offset 3100 needs 24 bytes, only 10 remain.
    /// ```
    #[error("Truncated input at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedInput {
        /// Position of the failed read within its buffer.
        offset: u64,
        /// Bytes the read required.
        needed: usize,
        /// Bytes left in the buffer at that position.
        available: usize,
    },

    /// A required slot's chunk tag was absent or different.
    ///
    /// `found` is `None` when the input ended before the slot was reached.
    #[error("Chunk signature mismatch at offset {offset}: expected {expected}, found {}", describe_found(.found))]
    ChunkSignatureMismatch {
        /// Tag the slot declares.
        expected: ChunkId,
        /// Tag actually present at the read position.
        found: Option<ChunkId>,
        /// Stream offset of the peeked chunk header.
        offset: u64,
    },

    /// An internal offset points outside the payload it is relative to.
    ///
    /// # Example
    ///
    /// ```text
    /// MH2O header 17 references instances at 0x9000, payload is 0x1200 bytes.
    /// ```
    #[error("Invalid offset {offset} in {} payload of {size} bytes", describe_chunk(.chunk))]
    InvalidOffset {
        /// Chunk whose payload the offset is relative to.
        chunk: Option<ChunkId>,
        /// Offending offset.
        offset: u64,
        /// Payload size in bytes.
        size: usize,
    },

    /// Encoded byte count disagrees with the size recomputed from the document.
    ///
    /// This is an internal consistency check and indicates a codec bug.
    #[error("Size mismatch for {chunk}: computed {expected} bytes, wrote {actual}")]
    SizeMismatch {
        /// Chunk being encoded.
        chunk: ChunkId,
        /// Size computed by replaying the layout.
        expected: usize,
        /// Bytes actually written.
        actual: usize,
    },

    /// Flat record payload has the wrong length.
    ///
    /// # Example
    ///
    /// ```text
    /// MVER chunk must be exactly 4 bytes, found 8 bytes instead.
    /// ```
    #[error("Invalid chunk size for {chunk}: expected {expected}, got {actual}")]
    InvalidChunkSize {
        /// Chunk with invalid size.
        chunk: ChunkId,
        /// Expected size in bytes (entry size for list chunks).
        expected: usize,
        /// Actual size in bytes.
        actual: usize,
    },

    /// Payload grew past what `u32` offsets and sizes can address.
    #[error("Payload of {chunk} is too large: {size} bytes")]
    PayloadTooLarge {
        /// Chunk being encoded.
        chunk: ChunkId,
        /// Size reached.
        size: usize,
    },

    /// Liquid data cannot be laid out on the 8×8 tile grid.
    #[error("Invalid water structure: {0}")]
    InvalidWaterStructure(String),

    /// A required slot was empty when encoding.
    #[error("Missing required chunk: {0}")]
    MissingRequiredChunk(ChunkId),

    /// No slot with this name exists in the document's layout.
    #[error("Unknown slot: {0}")]
    UnknownSlot(String),

    /// A layout declared the same slot name twice.
    #[error("Duplicate slot in layout: {0}")]
    DuplicateSlot(String),

    /// A value of the wrong chunk type was stored into a slot.
    #[error("Slot {slot} holds {expected} chunks, got {found}")]
    SlotKindMismatch {
        /// Slot name.
        slot: String,
        /// Chunk type declared by the slot.
        expected: ChunkId,
        /// Chunk type of the supplied value.
        found: ChunkId,
    },

    /// Binary parsing library error.
    #[error("binrw error: {0}")]
    BinrwError(String),
}

impl From<binrw::Error> for AdtError {
    fn from(err: binrw::Error) -> Self {
        AdtError::BinrwError(format!("{err}"))
    }
}

fn describe_found(found: &Option<ChunkId>) -> String {
    found.map_or_else(|| "end of input".to_string(), |id| id.to_string())
}

fn describe_chunk(chunk: &Option<ChunkId>) -> String {
    chunk.map_or_else(|| "chunk".to_string(), |id| id.to_string())
}
