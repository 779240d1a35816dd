//! Ordered chunk container for ADT-style files.
//!
//! A file variant is described by a [`ChunkLayout`]: an ordered list of named
//! slots, each expecting one chunk type and marked required or optional.
//! [`TerrainDocument`] decodes a byte stream against a layout and holds at most
//! one decoded chunk per slot.
//!
//! ## Decoding
//!
//! Slots are filled strictly in declared order. For each slot the next chunk
//! header is peeked without consuming it:
//!
//! - tag matches: header and payload are consumed and decoded
//! - tag differs, or the input is exhausted, on an optional slot: the slot
//!   stays empty and the same position is tried against the next slot
//! - the same on a required slot: [`AdtError::ChunkSignatureMismatch`]
//!
//! Bytes left over after the last slot are logged and ignored.
//!
//! ## Encoding
//!
//! Populated slots are written in declared order as `tag, size, payload`.
//! Empty optional slots are skipped. All offsets inside payloads are
//! recomputed by the chunk codecs.
//!
//! ```rust
//! use wow_adt_codec::{ChunkLayout, TerrainChunk, TerrainDocument};
//! use wow_adt_codec::chunks::{MhdrChunk, MverChunk, Mh2oChunk};
//!
//! # fn main() -> wow_adt_codec::Result<()> {
//! let mut doc = TerrainDocument::new(ChunkLayout::terrain());
//! doc.set("version", TerrainChunk::Version(MverChunk::default()))?;
//! doc.set("header", TerrainChunk::Header(MhdrChunk::default()))?;
//! doc.set("liquid", TerrainChunk::Liquid(Mh2oChunk::new()))?;
//!
//! let bytes = doc.encode()?;
//! let decoded = TerrainDocument::decode(&bytes, &ChunkLayout::terrain())?;
//! assert_eq!(decoded.version().map(|v| v.version), Some(18));
//! assert!(decoded.get("flight_bounds")?.is_none());
//! # Ok(())
//! # }
//! ```

use crate::chunk_header::{ChunkHeader, ChunkPeek, peek_chunk};
use crate::chunk_id::ChunkId;
use crate::chunks::{
    McinChunk, MfboChunk, Mh2oChunk, MhdrChunk, MldxChunk, ModfChunk, MverChunk,
};
use crate::cursor::{ByteCursor, ByteWriter};
use crate::error::{AdtError, Result};
use crate::record::ChunkRecord;

/// Chunk type a slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkKind {
    /// MVER
    Version,
    /// MHDR
    Header,
    /// MCIN
    ChunkIndex,
    /// MODF
    WmoPlacements,
    /// MFBO
    FlightBounds,
    /// MH2O
    Liquid,
    /// MLDX
    ModelExtents,
    /// Any other tag, kept as an opaque payload
    Raw(ChunkId),
}

impl ChunkKind {
    /// Tag expected on disk for this kind.
    pub fn id(self) -> ChunkId {
        match self {
            Self::Version => MverChunk::ID,
            Self::Header => MhdrChunk::ID,
            Self::ChunkIndex => McinChunk::ID,
            Self::WmoPlacements => ModfChunk::ID,
            Self::FlightBounds => MfboChunk::ID,
            Self::Liquid => Mh2oChunk::ID,
            Self::ModelExtents => MldxChunk::ID,
            Self::Raw(id) => id,
        }
    }

    /// Decode a payload of this kind.
    pub fn decode(self, payload: &[u8]) -> Result<TerrainChunk> {
        Ok(match self {
            Self::Version => TerrainChunk::Version(MverChunk::decode_payload(payload)?),
            Self::Header => TerrainChunk::Header(MhdrChunk::decode_payload(payload)?),
            Self::ChunkIndex => TerrainChunk::ChunkIndex(McinChunk::decode_payload(payload)?),
            Self::WmoPlacements => {
                TerrainChunk::WmoPlacements(ModfChunk::decode_payload(payload)?)
            }
            Self::FlightBounds => TerrainChunk::FlightBounds(MfboChunk::decode_payload(payload)?),
            Self::Liquid => TerrainChunk::Liquid(Mh2oChunk::decode_payload(payload)?),
            Self::ModelExtents => TerrainChunk::ModelExtents(MldxChunk::decode_payload(payload)?),
            Self::Raw(id) => TerrainChunk::Raw {
                id,
                data: payload.to_vec(),
            },
        })
    }
}

/// Decoded value held by a slot.
#[derive(Debug, Clone, PartialEq)]
pub enum TerrainChunk {
    /// MVER
    Version(MverChunk),
    /// MHDR
    Header(MhdrChunk),
    /// MCIN
    ChunkIndex(McinChunk),
    /// MODF
    WmoPlacements(ModfChunk),
    /// MFBO
    FlightBounds(MfboChunk),
    /// MH2O
    Liquid(Mh2oChunk),
    /// MLDX
    ModelExtents(MldxChunk),
    /// Opaque payload stored under `id`
    Raw {
        /// Chunk tag
        id: ChunkId,
        /// Payload bytes
        data: Vec<u8>,
    },
}

impl TerrainChunk {
    /// Kind of this value.
    pub fn kind(&self) -> ChunkKind {
        match self {
            Self::Version(_) => ChunkKind::Version,
            Self::Header(_) => ChunkKind::Header,
            Self::ChunkIndex(_) => ChunkKind::ChunkIndex,
            Self::WmoPlacements(_) => ChunkKind::WmoPlacements,
            Self::FlightBounds(_) => ChunkKind::FlightBounds,
            Self::Liquid(_) => ChunkKind::Liquid,
            Self::ModelExtents(_) => ChunkKind::ModelExtents,
            Self::Raw { id, .. } => ChunkKind::Raw(*id),
        }
    }

    /// Tag written for this value.
    pub fn id(&self) -> ChunkId {
        self.kind().id()
    }

    /// Encode the payload (without chunk header).
    pub fn encode_payload(&self) -> Result<Vec<u8>> {
        match self {
            Self::Version(c) => c.encode_payload(),
            Self::Header(c) => c.encode_payload(),
            Self::ChunkIndex(c) => c.encode_payload(),
            Self::WmoPlacements(c) => c.encode_payload(),
            Self::FlightBounds(c) => c.encode_payload(),
            Self::Liquid(c) => c.encode_payload(),
            Self::ModelExtents(c) => c.encode_payload(),
            Self::Raw { data, .. } => Ok(data.clone()),
        }
    }
}

/// One named position in a [`ChunkLayout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDescriptor {
    /// Unique slot name
    pub name: String,
    /// Chunk type the slot accepts
    pub kind: ChunkKind,
    /// Sort key; lower orders come first in the stream
    pub order: u32,
    /// Whether decode fails when the chunk is missing
    pub required: bool,
}

impl SlotDescriptor {
    /// Slot that must be present.
    pub fn required(name: impl Into<String>, kind: ChunkKind, order: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            order,
            required: true,
        }
    }

    /// Slot that may be absent.
    pub fn optional(name: impl Into<String>, kind: ChunkKind, order: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            order,
            required: false,
        }
    }
}

/// Ordered slot list describing one file variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkLayout {
    slots: Vec<SlotDescriptor>,
}

impl ChunkLayout {
    /// Build a layout, sorting by `order`.
    ///
    /// Slots with equal order keep their given relative order.
    pub fn new(slots: Vec<SlotDescriptor>) -> Result<Self> {
        for (i, slot) in slots.iter().enumerate() {
            if slots[..i].iter().any(|other| other.name == slot.name) {
                return Err(AdtError::DuplicateSlot(slot.name.clone()));
            }
        }
        Ok(Self::sorted(slots))
    }

    fn sorted(mut slots: Vec<SlotDescriptor>) -> Self {
        slots.sort_by_key(|slot| slot.order);
        Self { slots }
    }

    /// Root terrain tile: MVER, MHDR, MCIN, MODF, MH2O, MFBO.
    pub fn terrain() -> Self {
        Self::sorted(vec![
            SlotDescriptor::required("version", ChunkKind::Version, 1),
            SlotDescriptor::required("header", ChunkKind::Header, 2),
            SlotDescriptor::optional("chunk_index", ChunkKind::ChunkIndex, 3),
            SlotDescriptor::optional("wmo_placements", ChunkKind::WmoPlacements, 4),
            SlotDescriptor::optional("liquid", ChunkKind::Liquid, 5),
            SlotDescriptor::optional("flight_bounds", ChunkKind::FlightBounds, 99),
        ])
    }

    /// LOD object tile: MVER, MODF, MLDX.
    pub fn object_lod() -> Self {
        Self::sorted(vec![
            SlotDescriptor::required("version", ChunkKind::Version, 1),
            SlotDescriptor::optional("wmo_placements", ChunkKind::WmoPlacements, 2),
            SlotDescriptor::optional("model_extents", ChunkKind::ModelExtents, 3),
        ])
    }

    /// Slots in stream order.
    pub fn slots(&self) -> &[SlotDescriptor] {
        &self.slots
    }

    /// Index of the slot called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot.name == name)
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the layout declares no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// A decoded file: one optional chunk per layout slot.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainDocument {
    layout: ChunkLayout,
    chunks: Vec<Option<TerrainChunk>>,
}

impl TerrainDocument {
    /// Document with every slot empty.
    pub fn new(layout: ChunkLayout) -> Self {
        let chunks = vec![None; layout.len()];
        Self { layout, chunks }
    }

    /// Decode `bytes` against `layout`.
    pub fn decode(bytes: &[u8], layout: &ChunkLayout) -> Result<Self> {
        let mut doc = Self::new(layout.clone());
        let mut cursor = ByteCursor::new(bytes);

        for (slot, value) in doc.layout.slots.iter().zip(doc.chunks.iter_mut()) {
            let offset = cursor.position();
            let expected = slot.kind.id();

            let header = match peek_chunk(&mut cursor) {
                ChunkPeek::Found(header) if header.is_chunk(expected) => header,
                peek if slot.required => {
                    return Err(AdtError::ChunkSignatureMismatch {
                        expected,
                        found: match peek {
                            ChunkPeek::Found(header) => Some(header.id),
                            ChunkPeek::NotPresent => None,
                        },
                        offset: offset as u64,
                    });
                }
                _ => {
                    log::debug!("Optional slot '{}' ({expected}) absent at offset {offset}", slot.name);
                    continue;
                }
            };

            cursor.read::<ChunkHeader>()?;
            let payload = cursor.read_bytes(header.size as usize)?;
            *value = Some(slot.kind.decode(payload)?);
            log::debug!(
                "Decoded {expected} into slot '{}' at offset {offset} ({} bytes)",
                slot.name,
                header.size
            );
        }

        if !cursor.is_at_end() {
            log::warn!(
                "Ignoring {} trailing bytes at offset {} after the last slot",
                cursor.remaining(),
                cursor.position()
            );
        }
        Ok(doc)
    }

    /// Encode populated slots in layout order.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut writer = ByteWriter::new();

        for (slot, value) in self.layout.slots.iter().zip(&self.chunks) {
            let Some(chunk) = value else {
                if slot.required {
                    return Err(AdtError::MissingRequiredChunk(slot.kind.id()));
                }
                continue;
            };

            let id = slot.kind.id();
            let payload = chunk.encode_payload()?;
            let size = u32::try_from(payload.len()).map_err(|_| AdtError::PayloadTooLarge {
                chunk: id,
                size: payload.len(),
            })?;
            writer.write(&ChunkHeader { id, size })?;
            writer.write_bytes(&payload);
            log::debug!("Encoded {id} from slot '{}' ({size} bytes)", slot.name);
        }

        Ok(writer.into_inner())
    }

    /// Layout the document was built with.
    pub fn layout(&self) -> &ChunkLayout {
        &self.layout
    }

    fn index(&self, name: &str) -> Result<usize> {
        self.layout
            .index_of(name)
            .ok_or_else(|| AdtError::UnknownSlot(name.to_string()))
    }

    /// Value held by slot `name`.
    pub fn get(&self, name: &str) -> Result<Option<&TerrainChunk>> {
        let index = self.index(name)?;
        Ok(self.chunks[index].as_ref())
    }

    /// Store `chunk` in slot `name`, returning the previous value.
    pub fn set(&mut self, name: &str, chunk: TerrainChunk) -> Result<Option<TerrainChunk>> {
        let index = self.index(name)?;
        let slot = &self.layout.slots[index];
        if chunk.kind() != slot.kind {
            return Err(AdtError::SlotKindMismatch {
                slot: slot.name.clone(),
                expected: slot.kind.id(),
                found: chunk.id(),
            });
        }
        Ok(self.chunks[index].replace(chunk))
    }

    /// Empty slot `name`, returning its value.
    pub fn take(&mut self, name: &str) -> Result<Option<TerrainChunk>> {
        let index = self.index(name)?;
        Ok(self.chunks[index].take())
    }

    /// Slots in layout order with their values.
    pub fn slots(&self) -> impl Iterator<Item = (&SlotDescriptor, Option<&TerrainChunk>)> {
        self.layout.slots.iter().zip(self.chunks.iter().map(Option::as_ref))
    }

    /// First MVER value in the document.
    pub fn version(&self) -> Option<&MverChunk> {
        self.chunks.iter().flatten().find_map(|chunk| match chunk {
            TerrainChunk::Version(mver) => Some(mver),
            _ => None,
        })
    }

    /// First MH2O value in the document.
    pub fn liquid(&self) -> Option<&Mh2oChunk> {
        self.chunks.iter().flatten().find_map(|chunk| match chunk {
            TerrainChunk::Liquid(mh2o) => Some(mh2o),
            _ => None,
        })
    }

    /// Mutable access to the first MH2O value.
    pub fn liquid_mut(&mut self) -> Option<&mut Mh2oChunk> {
        self.chunks.iter_mut().flatten().find_map(|chunk| match chunk {
            TerrainChunk::Liquid(mh2o) => Some(mh2o),
            _ => None,
        })
    }
}
