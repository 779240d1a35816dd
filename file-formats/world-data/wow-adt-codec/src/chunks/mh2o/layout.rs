//! Body layout of an encoded MH2O payload.
//!
//! After the header table, each map chunk that has liquid contributes, in
//! order:
//!
//! ```text
//! [instance records × layer_count]
//! for each layer: [exists bitmap]? [vertex block]?
//! [attributes]?
//! ```
//!
//! [`blocks`] yields that sequence. The encoder writes it and
//! [`Mh2oChunk::encoded_size`](super::Mh2oChunk::encoded_size) sums it, so the
//! two always agree on what gets written.

use super::header::{Mh2oAttributes, Mh2oHeader};
use super::instance::{Mh2oInstance, Mh2oLayer};
use super::vertex::LiquidVertexData;
use super::{Mh2oChunk, Mh2oEntry};

/// One contiguous run of bytes in the payload body.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Mh2oBlock<'a> {
    /// Instance records of one entry.
    Instances {
        entry: usize,
        layers: &'a [Mh2oLayer],
    },
    /// Exists bitmap of one layer.
    ExistsBitmap { layer: usize, bitmap: &'a [u8] },
    /// Vertex block of one layer.
    VertexData {
        layer: usize,
        instance: &'a Mh2oInstance,
        data: &'a LiquidVertexData,
    },
    /// Non-zero attribute block of one entry.
    Attributes {
        entry: usize,
        attributes: &'a Mh2oAttributes,
    },
}

impl Mh2oBlock<'_> {
    /// Encoded size of the block.
    pub(crate) fn size(&self) -> usize {
        match self {
            Self::Instances { layers, .. } => layers.len() * Mh2oInstance::SIZE,
            Self::ExistsBitmap { bitmap, .. } => bitmap.len(),
            Self::VertexData { instance, .. } => LiquidVertexData::byte_size(instance),
            Self::Attributes { .. } => Mh2oAttributes::SIZE,
        }
    }
}

/// Attribute block that will be written for `entry`, if any.
pub(crate) fn encodable_attributes(entry: &Mh2oEntry) -> Option<&Mh2oAttributes> {
    if entry.layers.is_empty() {
        return None;
    }
    entry.attributes.as_ref().filter(|a| !a.has_only_zeroes())
}

/// Body blocks of `chunk` in write order.
pub(crate) fn blocks(chunk: &Mh2oChunk) -> impl Iterator<Item = Mh2oBlock<'_>> {
    chunk
        .entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| !entry.layers.is_empty())
        .flat_map(|(index, entry)| entry_blocks(index, entry))
}

fn entry_blocks(index: usize, entry: &Mh2oEntry) -> impl Iterator<Item = Mh2oBlock<'_>> {
    let instances = Mh2oBlock::Instances {
        entry: index,
        layers: &entry.layers,
    };

    let bodies = entry
        .layers
        .iter()
        .enumerate()
        .flat_map(|(layer, l)| {
            let bitmap = l
                .encodable_bitmap()
                .map(|bitmap| Mh2oBlock::ExistsBitmap { layer, bitmap });
            let vertex = l.vertex_data.as_ref().map(|data| Mh2oBlock::VertexData {
                layer,
                instance: &l.instance,
                data,
            });
            bitmap.into_iter().chain(vertex)
        });

    let attributes = encodable_attributes(entry).map(|attributes| Mh2oBlock::Attributes {
        entry: index,
        attributes,
    });

    std::iter::once(instances).chain(bodies).chain(attributes)
}

/// Total payload size: header table plus every body block.
pub(crate) fn payload_size(chunk: &Mh2oChunk) -> usize {
    Mh2oHeader::TABLE_SIZE + blocks(chunk).map(|block| block.size()).sum::<usize>()
}
