//! Record codec capability shared by every chunk and nested record type.
//!
//! Flat records (MVER, MHDR, MFBO, …) and the fixed-size MH2O records are
//! binrw structures; [`impl_binrw_record!`] wires them into [`RecordCodec`].
//! Chunk payload types additionally implement [`ChunkRecord`], which adds the
//! chunk tag and the payload-size checks the container relies on.

use crate::chunk_id::ChunkId;
use crate::cursor::{ByteCursor, ByteWriter};
use crate::error::{AdtError, Result};

/// Decode/encode capability of a binary record.
pub trait RecordCodec: Sized {
    /// Encoded size when it does not depend on the record's content.
    fn fixed_size() -> Option<usize> {
        None
    }

    /// Decode one record at the cursor position.
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self>;

    /// Append the encoded record to `writer`.
    fn encode(&self, writer: &mut ByteWriter) -> Result<()>;
}

/// A record stored as the whole payload of a tagged chunk.
pub trait ChunkRecord: RecordCodec {
    /// Chunk tag the payload is stored under.
    const ID: ChunkId;

    /// Decode a complete chunk payload.
    ///
    /// Fixed-size records reject payloads of any other length.
    fn decode_payload(payload: &[u8]) -> Result<Self> {
        if let Some(expected) = Self::fixed_size()
            && payload.len() != expected
        {
            return Err(AdtError::InvalidChunkSize {
                chunk: Self::ID,
                expected,
                actual: payload.len(),
            });
        }
        let mut cursor = ByteCursor::for_chunk(payload, Self::ID);
        Self::decode(&mut cursor)
    }

    /// Encode the record as a chunk payload (without the 8-byte header).
    fn encode_payload(&self) -> Result<Vec<u8>> {
        let mut writer = ByteWriter::new();
        self.encode(&mut writer)?;
        Ok(writer.into_inner())
    }
}

/// Decode a payload made of back-to-back fixed-size entries.
pub(crate) fn decode_entries<T: RecordCodec>(
    cursor: &mut ByteCursor<'_>,
    chunk: ChunkId,
    entry_size: usize,
) -> Result<Vec<T>> {
    if cursor.remaining() % entry_size != 0 {
        return Err(AdtError::InvalidChunkSize {
            chunk,
            expected: entry_size,
            actual: cursor.remaining(),
        });
    }
    let count = cursor.remaining() / entry_size;
    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        entries.push(T::decode(cursor)?);
    }
    Ok(entries)
}

/// Implement [`RecordCodec`] for fixed-size binrw records.
macro_rules! impl_binrw_record {
    ($($ty:ty => $size:expr),* $(,)?) => {
        $(
            impl $crate::record::RecordCodec for $ty {
                fn fixed_size() -> Option<usize> {
                    Some($size)
                }

                fn decode(cursor: &mut $crate::cursor::ByteCursor<'_>) -> $crate::error::Result<Self> {
                    cursor.read()
                }

                fn encode(&self, writer: &mut $crate::cursor::ByteWriter) -> $crate::error::Result<()> {
                    writer.write(self)
                }
            }
        )*
    };
}

pub(crate) use impl_binrw_record;
