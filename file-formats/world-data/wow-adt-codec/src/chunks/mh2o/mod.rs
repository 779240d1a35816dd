//! MH2O - Multi-layer water system (WotLK+).
//!
//! ## Structure Hierarchy
//!
//! ```text
//! MH2O Chunk
//! ├─ 256 Headers (16×16 grid)
//! │  ├─ offset_instances → Instance array
//! │  ├─ layer_count (usually 0-1, occasionally 2+)
//! │  └─ offset_attributes → Mh2oAttributes (optional)
//! │
//! ├─ Instances (per layer)
//! │  ├─ liquid_type, liquid_vertex_format
//! │  ├─ Position/dimensions in 8×8 tile grid
//! │  ├─ offset_exists_bitmap → Tile presence bitmap
//! │  └─ offset_vertex_data → Heights and depths
//! │
//! └─ Attributes (optional, 8×8 bitmaps)
//!    ├─ fishable - Fishing allowed
//!    └─ deep - Fatigue/deep water
//! ```
//!
//! ## Offset System
//!
//! All offsets are relative to the start of MH2O chunk **data** (after the
//! 8-byte chunk header). Decoding follows them with random access inside the
//! buffered payload. Encoding ignores every stored offset: bodies are placed
//! after the header table in [`layout`] order and the offsets are back-patched.
//!
//! ## Normalisation
//!
//! Re-encoding is canonical rather than byte-preserving for arbitrary input:
//! all-zero attribute blocks and bitmaps whose length disagrees with the
//! sub-rectangle are dropped, and bodies are packed in a fixed order. A payload
//! produced by this encoder re-encodes to identical bytes.
//!
//! ## Usage Example
//!
//! ```rust
//! use wow_adt_codec::chunks::mh2o::{Mh2oChunk, Mh2oInstance, Mh2oLayer};
//!
//! # fn main() -> wow_adt_codec::Result<()> {
//! let mut water = Mh2oChunk::new();
//! water.entries[0].layers.push(Mh2oLayer::new(Mh2oInstance {
//!     width: 8,
//!     height: 8,
//!     ..Default::default()
//! }));
//!
//! let payload = water.encode()?;
//! assert_eq!(payload.len(), water.encoded_size());
//!
//! let decoded = Mh2oChunk::decode(&payload)?;
//! assert_eq!(decoded.liquid_chunk_count(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! Reference: <https://wowdev.wiki/ADT/v18#MH2O_chunk>

pub mod header;
pub mod instance;
pub(crate) mod layout;
pub mod vertex;

pub use header::{Mh2oAttributes, Mh2oHeader, read_header_table};
pub use instance::{Mh2oInstance, Mh2oLayer};
pub use vertex::LiquidVertexData;

use crate::chunk_id::ChunkId;
use crate::cursor::{ByteCursor, ByteWriter};
use crate::error::{AdtError, Result};
use crate::record::{ChunkRecord, RecordCodec};
use header::write_header_table;
use instance::LayerSlots;
use layout::Mh2oBlock;

/// Complete MH2O chunk with 256 entries (16×16 grid, WotLK+).
///
/// Entry index `y * 16 + x` corresponds to the map chunk at column `x`,
/// row `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct Mh2oChunk {
    /// Water data entries for each map chunk (256 entries for 16×16 grid)
    pub entries: Vec<Mh2oEntry>,
}

impl Default for Mh2oChunk {
    fn default() -> Self {
        Self::new()
    }
}

impl Mh2oChunk {
    /// Number of entries in MH2O chunk (one per MCNK chunk)
    pub const ENTRY_COUNT: usize = Mh2oHeader::TOTAL_COUNT;

    /// Grid size (16×16 chunks)
    pub const GRID_SIZE: usize = Mh2oHeader::GRID_SIZE;

    /// Create empty chunk with 256 default entries
    pub fn new() -> Self {
        Self {
            entries: vec![Mh2oEntry::default(); Self::ENTRY_COUNT],
        }
    }

    /// Get entry for specific grid position
    ///
    /// # Arguments
    ///
    /// * `x` - Column index (0-15)
    /// * `y` - Row index (0-15)
    pub fn get_entry(&self, x: usize, y: usize) -> Option<&Mh2oEntry> {
        if x >= Self::GRID_SIZE || y >= Self::GRID_SIZE {
            return None;
        }
        self.entries.get(y * Self::GRID_SIZE + x)
    }

    /// Mutable entry for specific grid position
    pub fn get_entry_mut(&mut self, x: usize, y: usize) -> Option<&mut Mh2oEntry> {
        if x >= Self::GRID_SIZE || y >= Self::GRID_SIZE {
            return None;
        }
        self.entries.get_mut(y * Self::GRID_SIZE + x)
    }

    /// Count entries with liquid data
    pub fn liquid_chunk_count(&self) -> usize {
        self.entries.iter().filter(|e| e.has_liquid()).count()
    }

    /// Check if any chunk has liquid data
    pub fn has_any_liquid(&self) -> bool {
        self.entries.iter().any(Mh2oEntry::has_liquid)
    }

    /// Decode a complete MH2O payload.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        <Self as ChunkRecord>::decode_payload(payload)
    }

    /// Encode the chunk into a fresh payload.
    ///
    /// # Errors
    ///
    /// - [`AdtError::InvalidWaterStructure`] if the chunk does not have exactly
    ///   256 entries or a layer with vertex data has a sub-rectangle outside
    ///   the 8×8 grid
    /// - [`AdtError::PayloadTooLarge`] if an offset no longer fits in `u32`
    /// - [`AdtError::SizeMismatch`] if the written length disagrees with
    ///   [`Self::encoded_size`]
    pub fn encode(&self) -> Result<Vec<u8>> {
        let payload = <Self as ChunkRecord>::encode_payload(self)?;
        log::debug!(
            "Encoded MH2O: {} entries with liquid, {} bytes",
            self.liquid_chunk_count(),
            payload.len()
        );
        Ok(payload)
    }

    /// Payload size [`Self::encode`] will produce.
    pub fn encoded_size(&self) -> usize {
        layout::payload_size(self)
    }

    fn encode_into(&self, writer: &mut ByteWriter) -> Result<()> {
        if self.entries.len() != Self::ENTRY_COUNT {
            return Err(AdtError::InvalidWaterStructure(format!(
                "expected {} entries, found {}",
                Self::ENTRY_COUNT,
                self.entries.len()
            )));
        }

        // Bodies are addressed relative to the payload start
        let base = writer.position();
        let table = writer.reserve(Mh2oHeader::TABLE_SIZE);
        let mut headers = vec![Mh2oHeader::EMPTY; Self::ENTRY_COUNT];
        let mut slots: Vec<LayerSlots> = Vec::new();

        for (index, entry) in self.entries.iter().enumerate() {
            entry.log_normalisations(index);
        }

        for block in layout::blocks(self) {
            let offset = payload_offset(writer.position() - base)?;
            match block {
                Mh2oBlock::Instances { entry, layers } => {
                    log::trace!("MH2O entry {entry}: {} instances at {offset}", layers.len());
                    headers[entry].offset_instances = offset;
                    headers[entry].layer_count = payload_offset(layers.len())?;
                    slots = layers
                        .iter()
                        .map(|layer| layer.encode_record(writer))
                        .collect::<Result<_>>()?;
                }
                Mh2oBlock::ExistsBitmap { layer, bitmap } => {
                    writer.patch_u32(slots[layer].exists_bitmap, offset)?;
                    writer.write_bytes(bitmap);
                }
                Mh2oBlock::VertexData {
                    layer,
                    instance,
                    data,
                } => {
                    writer.patch_u32(slots[layer].vertex_data, offset)?;
                    data.encode(writer, instance)?;
                }
                Mh2oBlock::Attributes { entry, attributes } => {
                    log::trace!("MH2O entry {entry}: attributes at {offset}");
                    headers[entry].offset_attributes = offset;
                    attributes.encode(writer)?;
                }
            }
        }

        // The total must also fit the chunk header's size field
        payload_offset(writer.position() - base)?;
        write_header_table(writer, table, &headers)
    }
}

fn payload_offset(pos: usize) -> Result<u32> {
    u32::try_from(pos).map_err(|_| AdtError::PayloadTooLarge {
        chunk: ChunkId::MH2O,
        size: pos,
    })
}

impl RecordCodec for Mh2oChunk {
    fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let headers = read_header_table(cursor)?;

        let entries = headers
            .into_iter()
            .map(|header| Mh2oEntry::decode(cursor, header))
            .collect::<Result<Vec<_>>>()?;

        // Bodies were reached by offset; the whole payload is consumed
        cursor.seek(cursor.len())?;

        let chunk = Self { entries };
        log::debug!(
            "Decoded MH2O: {} of {} entries with liquid",
            chunk.liquid_chunk_count(),
            Self::ENTRY_COUNT
        );
        Ok(chunk)
    }

    fn encode(&self, writer: &mut ByteWriter) -> Result<()> {
        let start = writer.position();
        self.encode_into(writer)?;

        let expected = self.encoded_size();
        let actual = writer.position() - start;
        if actual != expected {
            return Err(AdtError::SizeMismatch {
                chunk: ChunkId::MH2O,
                expected,
                actual,
            });
        }
        Ok(())
    }
}

impl ChunkRecord for Mh2oChunk {
    const ID: ChunkId = ChunkId::MH2O;
}

/// Water data for a single map chunk (1/256 of ADT).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mh2oEntry {
    /// Header as decoded; ignored and recomputed on encode
    pub header: Mh2oHeader,

    /// Liquid layers for this chunk
    pub layers: Vec<Mh2oLayer>,

    /// Optional attributes (fishable/deep water zones)
    pub attributes: Option<Mh2oAttributes>,
}

impl Mh2oEntry {
    /// Check if entry has liquid data
    pub fn has_liquid(&self) -> bool {
        !self.layers.is_empty()
    }

    /// Check if entry has attributes
    pub fn has_attributes(&self) -> bool {
        self.attributes.is_some()
    }

    /// Get total layer count
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn decode(cursor: &mut ByteCursor<'_>, header: Mh2oHeader) -> Result<Self> {
        if !header.has_liquid() {
            return Ok(Self {
                header,
                ..Default::default()
            });
        }

        cursor.seek(header.offset_instances as usize)?;

        // A corrupt count must not drive the allocation below
        let needed = (header.layer_count as usize).saturating_mul(Mh2oInstance::SIZE);
        if cursor.remaining() < needed {
            return Err(AdtError::TruncatedInput {
                offset: u64::from(header.offset_instances),
                needed,
                available: cursor.remaining(),
            });
        }

        let mut layers = Vec::with_capacity(header.layer_count as usize);
        for _ in 0..header.layer_count {
            layers.push(Mh2oLayer::decode(cursor)?);
        }

        let attributes = if header.has_attributes() {
            cursor.seek(header.offset_attributes as usize)?;
            Some(Mh2oAttributes::decode(cursor)?)
        } else {
            None
        };

        Ok(Self {
            header,
            layers,
            attributes,
        })
    }

    fn log_normalisations(&self, index: usize) {
        if let Some(attributes) = &self.attributes {
            if self.layers.is_empty() {
                log::debug!("MH2O entry {index}: attributes without layers not written");
            } else if attributes.has_only_zeroes() {
                log::debug!("MH2O entry {index}: all-zero attributes omitted");
            }
        }
        for (layer_index, layer) in self.layers.iter().enumerate() {
            if let Some(bitmap) = &layer.exists_bitmap
                && layer.encodable_bitmap().is_none()
            {
                log::debug!(
                    "MH2O entry {index} layer {layer_index}: dropping {}-byte exists bitmap, {} expected",
                    bitmap.len(),
                    layer.instance.bitmap_size()
                );
            }
        }
    }
}
