//! Object placement chunks (MODF) and model extents (MLDX).
//!
//! Both are plain arrays of fixed-size entries; the payload size must be a
//! whole number of entries.

use binrw::{BinRead, BinWrite};

use crate::chunk_id::ChunkId;
use crate::cursor::{ByteCursor, ByteWriter};
use crate::error::Result;
use crate::record::{ChunkRecord, RecordCodec, decode_entries, impl_binrw_record};

/// WMO placement entry (64 bytes)
///
/// # Binary Layout
///
/// ```text
/// Offset | Size | Field        | Description
/// -------|------|--------------|----------------------------------
/// 0x00   |  4   | nameId       | Index into MWID
/// 0x04   |  4   | uniqueId     | Unique instance ID
/// 0x08   | 12   | position     | World position (X, Y, Z)
/// 0x14   | 12   | rotation     | Rotation in degrees (X, Y, Z)
/// 0x20   | 12   | extents_min  | Bounding box minimum (X, Y, Z)
/// 0x2C   | 12   | extents_max  | Bounding box maximum (X, Y, Z)
/// 0x38   |  2   | flags        | MODFFlags
/// 0x3A   |  2   | doodadSet    | WMO doodad set index
/// 0x3C   |  2   | nameSet      | WMO name set index
/// 0x3E   |  2   | scale        | 1024 = 1.0 (Legion+)
/// ```
///
/// Reference: <https://wowdev.wiki/ADT/v18#MODF_chunk>
#[derive(Debug, Clone, Copy, Default, PartialEq, BinRead, BinWrite)]
#[brw(little)]
pub struct WmoPlacement {
    /// Reference to MWID chunk entry
    pub name_id: u32,
    /// Unique identifier across all loaded ADT files
    pub unique_id: u32,
    /// World position [X, Y, Z]
    pub position: [f32; 3],
    /// Rotation angles in degrees [X, Y, Z]
    pub rotation: [f32; 3],
    /// Bounding box minimum corner [X, Y, Z]
    pub extents_min: [f32; 3],
    /// Bounding box maximum corner [X, Y, Z]
    pub extents_max: [f32; 3],
    /// MODFFlags bitfield
    pub flags: u16,
    /// WMO doodad set index
    pub doodad_set: u16,
    /// WMO name set index
    pub name_set: u16,
    /// Scale factor (1024 = 1.0, Legion+)
    pub scale: u16,
}

impl WmoPlacement {
    /// Encoded entry size.
    pub const SIZE: usize = 64;

    /// Convert scale to floating point (1024 = 1.0).
    #[must_use]
    pub fn get_scale(&self) -> f32 {
        f32::from(self.scale) / 1024.0
    }
}

/// MODF chunk - WMO placement array
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModfChunk {
    /// Array of WMO placements
    pub placements: Vec<WmoPlacement>,
}

impl ModfChunk {
    /// Get number of placed WMOs.
    #[must_use]
    pub fn count(&self) -> usize {
        self.placements.len()
    }
}

/// Model extent entry (28 bytes): bounding box and radius of one model.
///
/// Reference: <https://wowdev.wiki/ADT/v18#MLDX_(Legion+)>
#[derive(Debug, Clone, Copy, Default, PartialEq, BinRead, BinWrite)]
#[brw(little)]
pub struct ModelExtent {
    /// Bounding box minimum corner [X, Y, Z]
    pub bounds_min: [f32; 3],
    /// Bounding box maximum corner [X, Y, Z]
    pub bounds_max: [f32; 3],
    /// Bounding sphere radius
    pub radius: f32,
}

impl ModelExtent {
    /// Encoded entry size.
    pub const SIZE: usize = 28;
}

/// MLDX chunk - model extents for LOD object files (Legion+)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MldxChunk {
    /// One extent per referenced model
    pub entries: Vec<ModelExtent>,
}

impl_binrw_record! {
    WmoPlacement => WmoPlacement::SIZE,
    ModelExtent => ModelExtent::SIZE,
}

impl RecordCodec for ModfChunk {
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Self {
            placements: decode_entries(cursor, ChunkId::MODF, WmoPlacement::SIZE)?,
        })
    }

    fn encode(&self, writer: &mut ByteWriter) -> Result<()> {
        self.placements.iter().try_for_each(|p| p.encode(writer))
    }
}

impl ChunkRecord for ModfChunk {
    const ID: ChunkId = ChunkId::MODF;
}

impl RecordCodec for MldxChunk {
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Self {
            entries: decode_entries(cursor, ChunkId::MLDX, ModelExtent::SIZE)?,
        })
    }

    fn encode(&self, writer: &mut ByteWriter) -> Result<()> {
        self.entries.iter().try_for_each(|e| e.encode(writer))
    }
}

impl ChunkRecord for MldxChunk {
    const ID: ChunkId = ChunkId::MLDX;
}
