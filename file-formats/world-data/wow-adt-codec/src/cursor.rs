//! Bounds-checked byte cursor and patchable byte writer.
//!
//! Every decoder reads through [`ByteCursor`] and every encoder writes through
//! [`ByteWriter`]. The cursor supports random access inside an already
//! buffered payload, which the liquid chunk needs because its offsets may
//! point backwards or interleave. The writer supports reserving fixed-width
//! fields and patching them once the referenced data has been placed.

use std::io::Cursor;

use binrw::{BinRead, BinWrite};

use crate::chunk_id::ChunkId;
use crate::error::{AdtError, Result};

/// Seekable little-endian reader over a borrowed byte buffer.
///
/// All reads are bounds-checked and fail with [`AdtError::TruncatedInput`].
/// Seeks outside the buffer fail with [`AdtError::InvalidOffset`], naming the
/// chunk the cursor was created for.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    chunk: Option<ChunkId>,
}

impl<'a> ByteCursor<'a> {
    /// Cursor over a whole chunk stream.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            chunk: None,
        }
    }

    /// Cursor over one chunk's payload; offsets are relative to its start.
    pub fn for_chunk(data: &'a [u8], chunk: ChunkId) -> Self {
        Self {
            data,
            pos: 0,
            chunk: Some(chunk),
        }
    }

    /// Current read position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total buffer length.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left after the current position.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Check if every byte has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    /// Move to an absolute position, which may equal the buffer length.
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.data.len() {
            return Err(AdtError::InvalidOffset {
                chunk: self.chunk,
                offset: offset as u64,
                size: self.data.len(),
            });
        }
        self.pos = offset;
        Ok(())
    }

    /// Rewind to a position previously returned by [`Self::position`].
    pub(crate) fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.data.len());
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(AdtError::TruncatedInput {
                offset: self.pos as u64,
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Borrow the next `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Borrow up to `len` bytes, stopping early at the end of the buffer.
    pub fn read_bytes_lenient(&mut self, len: usize) -> &'a [u8] {
        let take = len.min(self.remaining());
        let bytes = &self.data[self.pos..self.pos + take];
        self.pos += take;
        bytes
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Read a little-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian `f32`.
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Decode a binrw record at the current position.
    ///
    /// Running out of input maps to [`AdtError::TruncatedInput`] instead of an
    /// opaque binrw error. The record size is not known up front, so `needed`
    /// reports the smallest count that would have exceeded the buffer.
    pub fn read<T>(&mut self) -> Result<T>
    where
        T: for<'b> BinRead<Args<'b> = ()>,
    {
        let mut inner = Cursor::new(self.data);
        inner.set_position(self.pos as u64);
        match T::read_le(&mut inner) {
            Ok(value) => {
                self.pos = inner.position() as usize;
                Ok(value)
            }
            Err(err) if err.is_eof() => Err(AdtError::TruncatedInput {
                offset: self.pos as u64,
                needed: self.remaining() + 1,
                available: self.remaining(),
            }),
            Err(err) => Err(err.into()),
        }
    }
}

/// Position of a reserved `u32` field inside a [`ByteWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchSlot(usize);

impl PatchSlot {
    /// Byte position of the reserved field.
    pub fn position(self) -> usize {
        self.0
    }
}

/// Growable little-endian writer with back-patching.
#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty writer with preallocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Current write position (always the end of the buffer).
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    /// Bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer and return its buffer.
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    /// Append raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    /// Append a little-endian `u32`.
    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Append a little-endian `f32`.
    pub fn write_f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Append `len` zero bytes and return where they start.
    pub fn reserve(&mut self, len: usize) -> usize {
        let start = self.buf.len();
        self.buf.resize(start + len, 0);
        start
    }

    /// Append a zero `u32` placeholder to be filled by [`Self::patch_u32`].
    pub fn reserve_u32(&mut self) -> PatchSlot {
        PatchSlot(self.reserve(4))
    }

    /// Patch slot for a `u32` field already written at `pos`.
    pub fn slot_at(&self, pos: usize) -> Result<PatchSlot> {
        if pos + 4 > self.buf.len() {
            return Err(AdtError::InvalidOffset {
                chunk: None,
                offset: pos as u64,
                size: self.buf.len(),
            });
        }
        Ok(PatchSlot(pos))
    }

    /// Overwrite a reserved `u32`.
    pub fn patch_u32(&mut self, slot: PatchSlot, value: u32) -> Result<()> {
        self.overwrite(slot.0, &value.to_le_bytes())
    }

    /// Overwrite already-written bytes starting at `pos`.
    pub fn overwrite(&mut self, pos: usize, bytes: &[u8]) -> Result<()> {
        let end = pos + bytes.len();
        let target = self
            .buf
            .get_mut(pos..end)
            .ok_or(AdtError::InvalidOffset {
                chunk: None,
                offset: pos as u64,
                size: end,
            })?;
        target.copy_from_slice(bytes);
        Ok(())
    }

    /// Encode a binrw record at the end of the buffer.
    pub fn write<T>(&mut self, value: &T) -> Result<()>
    where
        T: for<'b> BinWrite<Args<'b> = ()>,
    {
        let end = self.buf.len() as u64;
        let mut inner = Cursor::new(&mut self.buf);
        inner.set_position(end);
        value.write_le(&mut inner)?;
        Ok(())
    }
}
