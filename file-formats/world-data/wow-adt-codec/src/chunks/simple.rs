//! Simple ADT chunk structures with binrw derives
//!
//! These chunks are flat fixed-layout records with no internal addressing.

use binrw::{BinRead, BinWrite};
use bitflags::bitflags;

use crate::chunk_id::ChunkId;
use crate::record::{ChunkRecord, impl_binrw_record};

/// MVER - Version chunk (always 18 for ADT files)
///
/// Reference: <https://wowdev.wiki/ADT/v18#MVER_chunk>
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct MverChunk {
    /// Version number (always 18)
    pub version: u32,
}

impl Default for MverChunk {
    fn default() -> Self {
        Self { version: 18 }
    }
}

bitflags! {
    /// MHDR flags announcing optional root chunks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MhdrFlags: u32 {
        /// File contains an MFBO chunk
        const MFBO      = 0x0001;
        /// Tile belongs to a Northrend map
        const NORTHREND = 0x0002;
    }
}

/// MHDR - Header chunk with offsets to all major chunks (64 bytes)
///
/// Contains 16 u32 fields: flags followed by chunk offsets relative to the
/// MHDR payload. A value of 0 means the chunk is not present.
///
/// The offsets are carried through unchanged; this crate does not recompute
/// them when the surrounding file is re-encoded.
///
/// Reference: <https://wowdev.wiki/ADT/v18#MHDR_chunk>
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct MhdrChunk {
    /// Raw flag bits, see [`MhdrChunk::flags`]
    pub flags: u32,
    /// Offset to MCIN chunk
    pub mcin_offset: u32,
    /// Offset to MTEX chunk
    pub mtex_offset: u32,
    /// Offset to MMDX chunk
    pub mmdx_offset: u32,
    /// Offset to MMID chunk
    pub mmid_offset: u32,
    /// Offset to MWMO chunk
    pub mwmo_offset: u32,
    /// Offset to MWID chunk
    pub mwid_offset: u32,
    /// Offset to MDDF chunk
    pub mddf_offset: u32,
    /// Offset to MODF chunk
    pub modf_offset: u32,
    /// Offset to MFBO chunk
    pub mfbo_offset: u32,
    /// Offset to MH2O chunk
    pub mh2o_offset: u32,
    /// Offset to MTXF chunk
    pub mtxf_offset: u32,
    /// Reserved
    pub unused: [u32; 4],
}

impl MhdrChunk {
    /// Encoded payload size.
    pub const SIZE: usize = 64;

    /// Known flag bits; unknown bits are retained.
    pub fn flags(&self) -> MhdrFlags {
        MhdrFlags::from_bits_retain(self.flags)
    }

    /// Replace the flag bits.
    pub fn set_flags(&mut self, flags: MhdrFlags) {
        self.flags = flags.bits();
    }
}

/// MCIN - MCNK chunk index entry (16 bytes)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct McinEntry {
    /// Absolute file offset to MCNK chunk
    pub offset: u32,
    /// Size of MCNK chunk in bytes
    pub size: u32,
    /// Flags (usually 0)
    pub flags: u32,
    /// Async object ID
    pub async_id: u32,
}

/// MCIN - MCNK chunk index (4096 bytes = 256 entries × 16 bytes)
///
/// Reference: <https://wowdev.wiki/ADT/v18#MCIN_chunk>
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct McinChunk {
    /// 256 index entries (16x16 tile grid)
    #[br(count = McinChunk::ENTRY_COUNT)]
    pub entries: Vec<McinEntry>,
}

impl Default for McinChunk {
    fn default() -> Self {
        Self {
            entries: vec![McinEntry::default(); Self::ENTRY_COUNT],
        }
    }
}

impl McinChunk {
    /// Number of entries (16×16 grid).
    pub const ENTRY_COUNT: usize = 256;

    /// Encoded payload size.
    pub const SIZE: usize = Self::ENTRY_COUNT * 16;

    /// Get MCIN entry for tile at (x, y); coordinates are 0-15.
    pub fn get_entry(&self, x: usize, y: usize) -> Option<&McinEntry> {
        if x >= 16 || y >= 16 {
            return None;
        }
        self.entries.get(y * 16 + x)
    }
}

/// MFBO - Flight boundaries (36 bytes)
///
/// Maximum and minimum height planes, each 9 `i16` values on a 3×3 grid.
///
/// Reference: <https://wowdev.wiki/ADT/v18#MFBO_chunk>
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct MfboChunk {
    /// Maximum height plane
    pub max_plane: [i16; 9],
    /// Minimum height plane
    pub min_plane: [i16; 9],
}

impl MfboChunk {
    /// Encoded payload size.
    pub const SIZE: usize = 36;
}

impl_binrw_record! {
    MverChunk => 4,
    MhdrChunk => MhdrChunk::SIZE,
    McinChunk => McinChunk::SIZE,
    MfboChunk => MfboChunk::SIZE,
}

impl ChunkRecord for MverChunk {
    const ID: ChunkId = ChunkId::MVER;
}

impl ChunkRecord for MhdrChunk {
    const ID: ChunkId = ChunkId::MHDR;
}

impl ChunkRecord for McinChunk {
    const ID: ChunkId = ChunkId::MCIN;
}

impl ChunkRecord for MfboChunk {
    const ID: ChunkId = ChunkId::MFBO;
}
