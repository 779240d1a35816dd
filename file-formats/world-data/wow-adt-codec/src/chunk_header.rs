//! ADT chunk header parsing
//!
//! Every chunk in the stream starts with an 8-byte header: a 4-byte magic
//! identifier and a 4-byte payload size. The container peeks this header to
//! decide whether the chunk belongs to the slot it is filling.

use binrw::{BinRead, BinWrite};

use crate::chunk_id::ChunkId;
use crate::cursor::ByteCursor;

/// Standard ADT chunk header (8 bytes)
///
/// # Binary Layout
///
/// ```text
/// Offset | Size | Field | Description
/// -------|------|-------|------------------------------------------
/// 0x00   |  4   | id    | Chunk magic identifier (reversed)
/// 0x04   |  4   | size  | Payload size in bytes (excludes header)
/// ```
///
/// # Size Field Semantics
///
/// The size field counts payload bytes only. If size = 100, the payload
/// occupies bytes [8..108] relative to the chunk start and the next chunk
/// starts at offset 108.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct ChunkHeader {
    /// Chunk magic identifier (4 bytes, reversed)
    pub id: ChunkId,

    /// Size of chunk payload in bytes (excludes 8-byte header)
    pub size: u32,
}

impl ChunkHeader {
    /// Encoded size of the header itself.
    pub const SIZE: usize = 8;

    /// Total size including header (size + 8)
    ///
    /// ```rust
    /// use wow_adt_codec::{ChunkHeader, ChunkId};
    ///
    /// let header = ChunkHeader { id: ChunkId::MVER, size: 100 };
    /// assert_eq!(header.total_size(), 108);
    /// ```
    #[must_use]
    pub const fn total_size(&self) -> u64 {
        self.size as u64 + Self::SIZE as u64
    }

    /// Check if chunk ID matches expected value
    #[must_use]
    pub fn is_chunk(&self, expected: ChunkId) -> bool {
        self.id == expected
    }
}

/// Outcome of looking at the next chunk header without consuming it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkPeek {
    /// A complete 8-byte header is available at the current position.
    Found(ChunkHeader),
    /// Fewer than 8 bytes remain, so no chunk can start here.
    NotPresent,
}

/// Read the header at the cursor position and rewind.
///
/// The payload length is not checked here; that happens when the chunk is
/// actually consumed.
pub fn peek_chunk(cursor: &mut ByteCursor<'_>) -> ChunkPeek {
    let start = cursor.position();
    let peeked = cursor.read::<ChunkHeader>();
    cursor.set_position(start);
    match peeked {
        Ok(header) => ChunkPeek::Found(header),
        Err(_) => ChunkPeek::NotPresent,
    }
}
