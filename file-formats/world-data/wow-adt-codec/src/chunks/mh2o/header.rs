//! MH2O header table and per-chunk attribute records.
//!
//! The payload starts with 256 contiguous headers (16×16 grid), one per map
//! chunk. Each header points at that chunk's instance array and optional
//! attribute block.

use binrw::{BinRead, BinWrite};

use crate::cursor::{ByteCursor, ByteWriter};
use crate::error::{AdtError, Result};
use crate::record::{RecordCodec, impl_binrw_record};

/// MH2O header entry for one map chunk (1/256 of ADT, WotLK+).
///
/// # Binary Layout
///
/// ```text
/// Offset | Size | Field              | Description
/// -------|------|--------------------|---------------------------------
/// 0x00   |  4   | offset_instances   | Offset to instance array
/// 0x04   |  4   | layer_count        | Number of liquid layers (0 = none)
/// 0x08   |  4   | offset_attributes  | Offset to attributes (0 = none)
/// ```
///
/// All offsets are relative to the start of MH2O chunk data. Decoded headers
/// are informational; the encoder recomputes every field.
///
/// Reference: <https://wowdev.wiki/ADT/v18#MH2O_chunk>
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct Mh2oHeader {
    /// Offset to instance array (relative to MH2O data start)
    ///
    /// Points to an array of `layer_count` instance records.
    pub offset_instances: u32,

    /// Number of liquid layers (0 = no liquids)
    ///
    /// Most chunks have 0-1 layers, but multiple layers are possible
    /// (e.g., water surface above lava).
    pub layer_count: u32,

    /// Offset to attributes (relative to MH2O data start), 0 if absent
    pub offset_attributes: u32,
}

impl Mh2oHeader {
    /// Grid size: 16×16 headers per ADT.
    pub const GRID_SIZE: usize = 16;

    /// Total header count per ADT.
    pub const TOTAL_COUNT: usize = Self::GRID_SIZE * Self::GRID_SIZE;

    /// Encoded header size.
    pub const SIZE: usize = 12;

    /// Size of the whole header table at the start of the payload.
    pub const TABLE_SIZE: usize = Self::TOTAL_COUNT * Self::SIZE;

    /// Header of a map chunk without liquid.
    pub const EMPTY: Self = Self {
        offset_instances: 0,
        layer_count: 0,
        offset_attributes: 0,
    };

    /// Check if chunk has liquid data.
    ///
    /// Only the layer count decides; stale offsets next to a zero count are
    /// never followed.
    pub fn has_liquid(&self) -> bool {
        self.layer_count > 0
    }

    /// Check if chunk has attributes.
    pub fn has_attributes(&self) -> bool {
        self.offset_attributes != 0
    }
}

/// MH2O attributes for visibility and gameplay (WotLK+).
///
/// Two 8×8 bitmaps, one bit per tile, row-major starting at the lowest bit.
///
/// # Binary Layout
///
/// ```text
/// Offset | Size | Field    | Description
/// -------|------|----------|----------------------------------
/// 0x00   |  8   | fishable | Fishable area bitmap (8×8 bits)
/// 0x08   |  8   | deep     | Fatigue area bitmap (8×8 bits)
/// ```
///
/// An all-zero block carries no information and is omitted on encode.
///
/// Reference: <https://wowdev.wiki/ADT/v18#mh2o_chunk_attributes>
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct Mh2oAttributes {
    /// Fishable area bitmap (8×8 = 64 bits)
    ///
    /// Bit set = area is fishable. Access: `(fishable >> (row * 8 + col)) & 1`
    pub fishable: u64,

    /// Deep water/fatigue area bitmap (8×8 = 64 bits)
    ///
    /// Bit set = area causes fatigue. Access: `(deep >> (row * 8 + col)) & 1`
    pub deep: u64,
}

impl Mh2oAttributes {
    /// Tile grid resolution (8×8 tiles).
    pub const TILE_SIZE: usize = 8;

    /// Encoded block size.
    pub const SIZE: usize = 16;

    /// Check whether both bitmaps are empty.
    pub fn has_only_zeroes(&self) -> bool {
        self.fishable == 0 && self.deep == 0
    }

    /// Check if tile is fishable.
    ///
    /// # Arguments
    ///
    /// * `x` - Column index (0-7)
    /// * `y` - Row index (0-7)
    pub fn is_fishable(&self, x: usize, y: usize) -> bool {
        Self::bit(self.fishable, x, y)
    }

    /// Check if tile is deep (causes fatigue).
    pub fn is_deep(&self, x: usize, y: usize) -> bool {
        Self::bit(self.deep, x, y)
    }

    /// Count fishable tiles.
    pub fn fishable_count(&self) -> u32 {
        self.fishable.count_ones()
    }

    /// Count deep tiles.
    pub fn deep_count(&self) -> u32 {
        self.deep.count_ones()
    }

    fn bit(bits: u64, x: usize, y: usize) -> bool {
        if x >= Self::TILE_SIZE || y >= Self::TILE_SIZE {
            return false;
        }
        (bits >> (y * Self::TILE_SIZE + x)) & 1 != 0
    }
}

impl_binrw_record! {
    Mh2oHeader => Mh2oHeader::SIZE,
    Mh2oAttributes => Mh2oAttributes::SIZE,
}

/// Read the 256 contiguous headers at the cursor position.
pub fn read_header_table(cursor: &mut ByteCursor<'_>) -> Result<Vec<Mh2oHeader>> {
    if cursor.remaining() < Mh2oHeader::TABLE_SIZE {
        return Err(AdtError::TruncatedInput {
            offset: cursor.position() as u64,
            needed: Mh2oHeader::TABLE_SIZE,
            available: cursor.remaining(),
        });
    }

    (0..Mh2oHeader::TOTAL_COUNT)
        .map(|_| Mh2oHeader::decode(cursor))
        .collect()
}

/// Write a header table over the bytes reserved at `pos`.
pub(crate) fn write_header_table(
    writer: &mut ByteWriter,
    pos: usize,
    headers: &[Mh2oHeader],
) -> Result<()> {
    let mut table = ByteWriter::with_capacity(Mh2oHeader::TABLE_SIZE);
    for header in headers {
        header.encode(&mut table)?;
    }
    writer.overwrite(pos, table.as_slice())
}
