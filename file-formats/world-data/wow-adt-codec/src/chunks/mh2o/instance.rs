//! MH2O instance records and decoded liquid layers.
//!
//! An instance places one liquid layer on a rectangular region of the map
//! chunk's 8×8 tile grid and points at two optional bodies: the exists bitmap
//! and the vertex block. [`Mh2oLayer`] owns the instance together with those
//! bodies.

use binrw::{BinRead, BinWrite};

use super::vertex::LiquidVertexData;
use crate::cursor::{ByteCursor, ByteWriter, PatchSlot};
use crate::error::{AdtError, Result};
use crate::record::{RecordCodec, impl_binrw_record};

/// MH2O instance - defines one liquid layer (WotLK+).
///
/// # Binary Layout
///
/// ```text
/// Offset | Size | Field                  | Description
/// -------|------|------------------------|----------------------------
/// 0x00   |  2   | liquid_type            | LiquidTypeRec foreign key
/// 0x02   |  2   | liquid_vertex_format   | Vertex block layout selector
/// 0x04   |  4   | min_height_level       | Minimum elevation
/// 0x08   |  4   | max_height_level       | Maximum elevation
/// 0x0C   |  1   | x_offset               | Tile X offset (0-7)
/// 0x0D   |  1   | y_offset               | Tile Y offset (0-7)
/// 0x0E   |  1   | width                  | Tile width (1-8)
/// 0x0F   |  1   | height                 | Tile height (1-8)
/// 0x10   |  4   | offset_exists_bitmap   | Exists bitmap offset (0 = none)
/// 0x14   |  4   | offset_vertex_data     | Vertex block offset (0 = none)
/// ```
///
/// Total: 24 bytes
///
/// Reference: <https://wowdev.wiki/ADT/v18#mh2o_instance>
#[derive(Debug, Clone, Copy, PartialEq, BinRead, BinWrite)]
#[brw(little)]
pub struct Mh2oInstance {
    /// Liquid type ID from LiquidTypeRec.dbc
    pub liquid_type: u16,

    /// Vertex block layout; [`Mh2oInstance::DEPTH_ONLY_FORMAT`] stores depths only
    pub liquid_vertex_format: u16,

    /// Minimum height level
    pub min_height_level: f32,

    /// Maximum height level
    pub max_height_level: f32,

    /// X offset within 8×8 tile grid (0-7)
    pub x_offset: u8,

    /// Y offset within 8×8 tile grid (0-7)
    pub y_offset: u8,

    /// Width in tiles (1-8)
    pub width: u8,

    /// Height in tiles (1-8)
    pub height: u8,

    /// Offset to exists bitmap (relative to MH2O data start)
    ///
    /// Bitmap size: `(width * height + 7) / 8` bytes.
    pub offset_exists_bitmap: u32,

    /// Offset to vertex data (relative to MH2O data start)
    pub offset_vertex_data: u32,
}

impl Default for Mh2oInstance {
    fn default() -> Self {
        Self {
            liquid_type: 0,
            liquid_vertex_format: 0,
            min_height_level: 0.0,
            max_height_level: 0.0,
            x_offset: 0,
            y_offset: 0,
            width: 1,
            height: 1,
            offset_exists_bitmap: 0,
            offset_vertex_data: 0,
        }
    }
}

impl Mh2oInstance {
    /// Instance structure size in bytes.
    pub const SIZE: usize = 24;

    /// Maximum tile grid size.
    pub const MAX_TILE_SIZE: usize = 8;

    /// Vertex format whose block holds depths only.
    pub const DEPTH_ONLY_FORMAT: u16 = 2;

    const EXISTS_BITMAP_FIELD: usize = 0x10;
    const VERTEX_DATA_FIELD: usize = 0x14;

    /// Check if instance has vertex data.
    pub fn has_vertex_data(&self) -> bool {
        self.offset_vertex_data != 0
    }

    /// Check if instance has exists bitmap.
    pub fn has_exists_bitmap(&self) -> bool {
        self.offset_exists_bitmap != 0
    }

    /// Check whether the vertex block omits heights.
    pub fn is_depth_only(&self) -> bool {
        self.liquid_vertex_format == Self::DEPTH_ONLY_FORMAT
    }

    /// Calculate tile quad count.
    ///
    /// Returns `width * height` for renderable tile quads.
    pub fn tile_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Calculate exists bitmap size in bytes.
    ///
    /// Returns `(width * height + 7) / 8` bytes.
    pub fn bitmap_size(&self) -> usize {
        self.tile_count().div_ceil(8)
    }

    /// Validate instance dimensions: non-empty and inside the 8×8 grid.
    pub fn validate_dimensions(&self) -> bool {
        self.width >= 1 && self.height >= 1 && self.check_grid_fit().is_ok()
    }

    /// Fail unless the sub-rectangle lies inside the 8×8 grid.
    pub fn check_grid_fit(&self) -> Result<()> {
        let right = self.x_offset as usize + self.width as usize;
        let bottom = self.y_offset as usize + self.height as usize;
        if right > Self::MAX_TILE_SIZE || bottom > Self::MAX_TILE_SIZE {
            return Err(AdtError::InvalidWaterStructure(format!(
                "sub-rectangle {}x{} at ({}, {}) exceeds the {}x{} tile grid",
                self.width,
                self.height,
                self.x_offset,
                self.y_offset,
                Self::MAX_TILE_SIZE,
                Self::MAX_TILE_SIZE
            )));
        }
        Ok(())
    }

    /// Tile coordinates `(x, y)` of the sub-rectangle in storage order.
    pub(crate) fn tiles(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let xs = self.x_offset as usize..self.x_offset as usize + self.width as usize;
        let ys = self.y_offset as usize..self.y_offset as usize + self.height as usize;
        ys.flat_map(move |y| xs.clone().map(move |x| (x, y)))
    }
}

impl_binrw_record! {
    Mh2oInstance => Mh2oInstance::SIZE,
}

/// One liquid layer: the instance record plus the bodies it points at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mh2oLayer {
    /// Instance record; its offset fields are informational after decode
    pub instance: Mh2oInstance,

    /// Exists bitmap, one bit per tile of the sub-rectangle
    pub exists_bitmap: Option<Vec<u8>>,

    /// Heights and depths of the sub-rectangle
    pub vertex_data: Option<LiquidVertexData>,
}

/// Offset fields of an instance record written with placeholder values.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LayerSlots {
    pub exists_bitmap: PatchSlot,
    pub vertex_data: PatchSlot,
}

impl Mh2oLayer {
    /// Layer without bodies.
    pub fn new(instance: Mh2oInstance) -> Self {
        Self {
            instance,
            exists_bitmap: None,
            vertex_data: None,
        }
    }

    /// Decode the instance record at the cursor and follow its body offsets.
    ///
    /// The cursor is left just past the 24-byte record so that consecutive
    /// instances can be read back to back.
    pub fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let instance = Mh2oInstance::decode(cursor)?;
        let next_record = cursor.position();

        let exists_bitmap = if instance.has_exists_bitmap() {
            cursor.seek(instance.offset_exists_bitmap as usize)?;
            let expected = instance.bitmap_size();
            let bytes = cursor.read_bytes_lenient(expected);
            if bytes.len() < expected {
                log::warn!(
                    "MH2O exists bitmap at offset {} is truncated: expected {} bytes, got {}",
                    instance.offset_exists_bitmap,
                    expected,
                    bytes.len()
                );
            }
            Some(bytes.to_vec())
        } else {
            None
        };

        let vertex_data = if instance.has_vertex_data() {
            cursor.seek(instance.offset_vertex_data as usize)?;
            Some(LiquidVertexData::decode(cursor, &instance)?)
        } else {
            None
        };

        cursor.seek(next_record)?;
        Ok(Self {
            instance,
            exists_bitmap,
            vertex_data,
        })
    }

    /// Bitmap that will be written on encode.
    ///
    /// An empty bitmap, or one whose length disagrees with the current
    /// sub-rectangle, is dropped.
    pub fn encodable_bitmap(&self) -> Option<&[u8]> {
        self.exists_bitmap
            .as_deref()
            .filter(|bitmap| !bitmap.is_empty() && bitmap.len() == self.instance.bitmap_size())
    }

    /// Write the instance record with zeroed body offsets.
    pub(crate) fn encode_record(&self, writer: &mut ByteWriter) -> Result<LayerSlots> {
        let start = writer.position();
        let record = Mh2oInstance {
            offset_exists_bitmap: 0,
            offset_vertex_data: 0,
            ..self.instance
        };
        record.encode(writer)?;

        Ok(LayerSlots {
            exists_bitmap: writer.slot_at(start + Mh2oInstance::EXISTS_BITMAP_FIELD)?,
            vertex_data: writer.slot_at(start + Mh2oInstance::VERTEX_DATA_FIELD)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_with(record: &Mh2oInstance, body_at: usize, body: &[u8]) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        record.encode(&mut writer).unwrap();
        writer.reserve(body_at - writer.position());
        writer.write_bytes(body);
        writer.into_inner()
    }

    #[test]
    fn instance_record_layout() {
        let instance = Mh2oInstance {
            liquid_type: 5,
            liquid_vertex_format: 2,
            min_height_level: 1.5,
            max_height_level: 2.5,
            x_offset: 1,
            y_offset: 2,
            width: 3,
            height: 4,
            offset_exists_bitmap: 0x100,
            offset_vertex_data: 0x200,
        };
        let mut writer = ByteWriter::new();
        instance.encode(&mut writer).unwrap();
        let bytes = writer.into_inner();

        assert_eq!(bytes.len(), Mh2oInstance::SIZE);
        assert_eq!(&bytes[0..4], &[5, 0, 2, 0]);
        assert_eq!(&bytes[12..16], &[1, 2, 3, 4]);
        assert_eq!(&bytes[16..20], &[0, 1, 0, 0]);
        assert_eq!(&bytes[20..24], &[0, 2, 0, 0]);
    }

    #[test]
    fn instance_sizes() {
        let instance = Mh2oInstance {
            width: 3,
            height: 3,
            ..Default::default()
        };
        assert_eq!(instance.tile_count(), 9);
        assert_eq!(instance.bitmap_size(), 2);
        assert!(!instance.is_depth_only());
    }

    #[test]
    fn dimension_checks() {
        let fits = Mh2oInstance {
            x_offset: 4,
            width: 4,
            ..Default::default()
        };
        assert!(fits.validate_dimensions());

        let overflow = Mh2oInstance {
            x_offset: 5,
            width: 4,
            ..Default::default()
        };
        assert!(!overflow.validate_dimensions());
        assert!(matches!(
            overflow.check_grid_fit(),
            Err(AdtError::InvalidWaterStructure(_))
        ));

        let empty = Mh2oInstance {
            width: 0,
            ..Default::default()
        };
        assert!(!empty.validate_dimensions());
        assert!(empty.check_grid_fit().is_ok());
    }

    #[test]
    fn tiles_in_row_major_order() {
        let instance = Mh2oInstance {
            x_offset: 6,
            y_offset: 1,
            width: 2,
            height: 2,
            ..Default::default()
        };
        let tiles: Vec<_> = instance.tiles().collect();
        assert_eq!(tiles, vec![(6, 1), (7, 1), (6, 2), (7, 2)]);
    }

    #[test]
    fn layer_decode_follows_offsets() {
        let record = Mh2oInstance {
            liquid_vertex_format: 2,
            width: 2,
            height: 1,
            offset_exists_bitmap: 32,
            offset_vertex_data: 33,
            ..Default::default()
        };
        let data = payload_with(&record, 32, &[0b11, 4, 5]);

        let mut cursor = ByteCursor::new(&data);
        let layer = Mh2oLayer::decode(&mut cursor).unwrap();

        assert_eq!(layer.exists_bitmap.as_deref(), Some(&[0b11u8][..]));
        let vertex = layer.vertex_data.unwrap();
        assert_eq!(vertex.depth(0, 0), Some(4));
        assert_eq!(vertex.depth(1, 0), Some(5));
        assert_eq!(cursor.position(), Mh2oInstance::SIZE);
    }

    #[test]
    fn short_bitmap_is_kept() {
        let record = Mh2oInstance {
            width: 8,
            height: 8,
            offset_exists_bitmap: 28,
            ..Default::default()
        };
        let data = payload_with(&record, 28, &[0xFF, 0xFF, 0xFF]);

        let mut cursor = ByteCursor::new(&data);
        let layer = Mh2oLayer::decode(&mut cursor).unwrap();

        assert_eq!(layer.exists_bitmap.as_ref().map(Vec::len), Some(3));
        assert!(layer.encodable_bitmap().is_none());
    }

    #[test]
    fn bitmap_offset_past_payload() {
        let record = Mh2oInstance {
            offset_exists_bitmap: 500,
            ..Default::default()
        };
        let data = payload_with(&record, 24, &[]);

        let mut cursor = ByteCursor::new(&data);
        let err = Mh2oLayer::decode(&mut cursor).unwrap_err();
        assert!(matches!(err, AdtError::InvalidOffset { offset: 500, .. }));
    }

    #[test]
    fn encodable_bitmap_requires_exact_length() {
        let mut layer = Mh2oLayer::new(Mh2oInstance {
            width: 4,
            height: 4,
            ..Default::default()
        });
        layer.exists_bitmap = Some(vec![0xFF, 0x0F]);
        assert_eq!(layer.encodable_bitmap(), Some(&[0xFF, 0x0F][..]));

        layer.exists_bitmap = Some(vec![0xFF]);
        assert!(layer.encodable_bitmap().is_none());

        layer.exists_bitmap = Some(Vec::new());
        assert!(layer.encodable_bitmap().is_none());
    }

    #[test]
    fn record_encoded_with_placeholders() {
        let layer = Mh2oLayer::new(Mh2oInstance {
            offset_exists_bitmap: 0xAAAA,
            offset_vertex_data: 0xBBBB,
            ..Default::default()
        });
        let mut writer = ByteWriter::new();
        writer.write_u32(0xFFFF_FFFF);

        let slots = layer.encode_record(&mut writer).unwrap();
        assert_eq!(slots.exists_bitmap.position(), 4 + 16);
        assert_eq!(slots.vertex_data.position(), 4 + 20);
        assert_eq!(&writer.as_slice()[20..28], &[0; 8]);

        writer.patch_u32(slots.vertex_data, 77).unwrap();
        assert_eq!(&writer.as_slice()[24..28], &[77, 0, 0, 0]);
    }
}
