//! MH2O vertex block: heights and depths over an instance's sub-rectangle.
//!
//! The block stores one value per tile of the instance's `width × height`
//! sub-rectangle, row-major, rows `y_offset..y_offset + height` and columns
//! `x_offset..x_offset + width`:
//!
//! ```text
//! liquid_vertex_format != 2:  [f32 height; width*height] [u8 depth; width*height]
//! liquid_vertex_format == 2:  [u8 depth; width*height]
//! ```
//!
//! In memory both grids are always a full 8×8. Cells outside the
//! sub-rectangle are neither read nor written; their contents carry no
//! meaning.
//!
//! Reference: <https://wowdev.wiki/ADT/v18#mh2o_chunk_instances>

use super::instance::Mh2oInstance;
use crate::cursor::{ByteCursor, ByteWriter};
use crate::error::Result;

const GRID: usize = Mh2oInstance::MAX_TILE_SIZE;

/// Height and depth grids of one liquid layer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LiquidVertexData {
    /// Heights indexed `[row][column]`
    pub heights: [[f32; GRID]; GRID],
    /// Depths indexed `[row][column]`
    pub depths: [[u8; GRID]; GRID],
}

impl LiquidVertexData {
    /// Encoded size of the block for `instance`'s current sub-rectangle and
    /// vertex format.
    pub fn byte_size(instance: &Mh2oInstance) -> usize {
        let per_tile = if instance.is_depth_only() { 1 } else { 5 };
        instance.tile_count() * per_tile
    }

    /// Decode the block laid out by `instance`.
    pub fn decode(cursor: &mut ByteCursor<'_>, instance: &Mh2oInstance) -> Result<Self> {
        instance.check_grid_fit()?;

        let mut data = Self::default();
        if !instance.is_depth_only() {
            for (x, y) in instance.tiles() {
                data.heights[y][x] = cursor.read_f32()?;
            }
        }
        for (x, y) in instance.tiles() {
            data.depths[y][x] = cursor.read_u8()?;
        }
        Ok(data)
    }

    /// Encode the sub-rectangle selected by `instance`.
    pub fn encode(&self, writer: &mut ByteWriter, instance: &Mh2oInstance) -> Result<()> {
        instance.check_grid_fit()?;

        if !instance.is_depth_only() {
            for (x, y) in instance.tiles() {
                writer.write_f32(self.heights[y][x]);
            }
        }
        for (x, y) in instance.tiles() {
            writer.write_u8(self.depths[y][x]);
        }
        Ok(())
    }

    /// Height at column `x`, row `y`.
    pub fn height(&self, x: usize, y: usize) -> Option<f32> {
        self.heights.get(y)?.get(x).copied()
    }

    /// Depth at column `x`, row `y`.
    pub fn depth(&self, x: usize, y: usize) -> Option<u8> {
        self.depths.get(y)?.get(x).copied()
    }

    /// Set the height at column `x`, row `y`; returns `false` outside the grid.
    pub fn set_height(&mut self, x: usize, y: usize, height: f32) -> bool {
        match self.heights.get_mut(y).and_then(|row| row.get_mut(x)) {
            Some(cell) => {
                *cell = height;
                true
            }
            None => false,
        }
    }

    /// Set the depth at column `x`, row `y`; returns `false` outside the grid.
    pub fn set_depth(&mut self, x: usize, y: usize, depth: u8) -> bool {
        match self.depths.get_mut(y).and_then(|row| row.get_mut(x)) {
            Some(cell) => {
                *cell = depth;
                true
            }
            None => false,
        }
    }
}
