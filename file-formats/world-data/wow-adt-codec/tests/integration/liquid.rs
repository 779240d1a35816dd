//! Integration tests for MH2O payload encoding.
//!
//! These tests verify:
//! 1. Canonical payloads round-trip byte for byte
//! 2. Re-encoding foreign layouts is idempotent after the first pass
//! 3. Empty entries, zero attributes and malformed bitmaps are normalised
//! 4. Vertex block sizes follow the vertex format
//! 5. The computed size always equals the encoded length

use pretty_assertions::assert_eq;
use wow_adt_codec::chunks::mh2o::{
    LiquidVertexData, Mh2oAttributes, Mh2oChunk, Mh2oHeader, Mh2oInstance, Mh2oLayer,
};

fn u32_at(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
}

/// Helper: layer with a full bitmap and a height ramp over its sub-rectangle
fn layer(x: u8, y: u8, w: u8, h: u8, format: u16) -> Mh2oLayer {
    let instance = Mh2oInstance {
        liquid_type: 2,
        liquid_vertex_format: format,
        min_height_level: 100.0,
        max_height_level: 104.0,
        x_offset: x,
        y_offset: y,
        width: w,
        height: h,
        ..Default::default()
    };

    let mut data = LiquidVertexData::default();
    for row in y as usize..(y + h) as usize {
        for col in x as usize..(x + w) as usize {
            if format != Mh2oInstance::DEPTH_ONLY_FORMAT {
                data.set_height(col, row, 100.0 + row as f32 * 0.5);
            }
            data.set_depth(col, row, (row * 8 + col) as u8);
        }
    }

    Mh2oLayer {
        instance,
        exists_bitmap: Some(vec![0xFF; instance.bitmap_size()]),
        vertex_data: Some(data),
    }
}

/// Helper: chunk with liquid in a handful of map chunks
fn populated_chunk() -> Mh2oChunk {
    let mut chunk = Mh2oChunk::new();

    chunk.entries[0].layers.push(layer(0, 0, 8, 8, 0));
    chunk.entries[0].attributes = Some(Mh2oAttributes {
        fishable: u64::MAX,
        deep: 0,
    });

    chunk.entries[17].layers.push(layer(2, 2, 4, 3, 2));
    chunk.entries[17].layers.push(layer(0, 5, 8, 3, 1));

    let mut bare = Mh2oLayer::new(Mh2oInstance {
        width: 8,
        height: 8,
        ..Default::default()
    });
    bare.instance.liquid_type = 7;
    chunk.entries[200].layers.push(bare);
    chunk.entries[200].attributes = Some(Mh2oAttributes {
        fishable: 0,
        deep: 0xF0F0,
    });

    chunk
}

#[test]
fn canonical_payload_round_trips_byte_for_byte() {
    let payload = populated_chunk().encode().unwrap();

    let decoded = Mh2oChunk::decode(&payload).unwrap();
    assert_eq!(decoded.liquid_chunk_count(), 3);
    assert_eq!(decoded.entries[17].layer_count(), 2);

    let reencoded = decoded.encode().unwrap();
    assert_eq!(reencoded, payload);
}

/// Helper: layers with the informational offset fields cleared
fn without_offsets(layers: &[Mh2oLayer]) -> Vec<Mh2oLayer> {
    layers
        .iter()
        .map(|l| {
            let mut l = l.clone();
            l.instance.offset_exists_bitmap = 0;
            l.instance.offset_vertex_data = 0;
            l
        })
        .collect()
}

#[test]
fn decoded_values_survive_round_trip() {
    let original = populated_chunk();
    let decoded = Mh2oChunk::decode(&original.encode().unwrap()).unwrap();

    for (index, (a, b)) in original.entries.iter().zip(&decoded.entries).enumerate() {
        assert_eq!(a.layers, without_offsets(&b.layers), "entry {index}");
        assert_eq!(a.attributes, b.attributes, "entry {index}");
    }
}

/// Builds a payload whose bodies are ordered vertex data, bitmap, attributes,
/// instances, with an all-zero attribute block.
fn foreign_payload() -> Vec<u8> {
    let mut payload = vec![0u8; Mh2oHeader::TABLE_SIZE];

    // Vertex block for a 2x2 sub-rectangle at (1, 1), format 0
    let vertex_at = payload.len();
    for h in [1.0f32, 2.0, 3.0, 4.0] {
        payload.extend_from_slice(&h.to_le_bytes());
    }
    payload.extend_from_slice(&[10, 20, 30, 40]);

    let bitmap_at = payload.len();
    payload.push(0x0F);

    let attributes_at = payload.len();
    payload.extend_from_slice(&[0u8; 16]);

    let instance_at = payload.len();
    payload.extend_from_slice(&3u16.to_le_bytes()); // liquid_type
    payload.extend_from_slice(&0u16.to_le_bytes()); // liquid_vertex_format
    payload.extend_from_slice(&1.0f32.to_le_bytes());
    payload.extend_from_slice(&4.0f32.to_le_bytes());
    payload.extend_from_slice(&[1, 1, 2, 2]);
    payload.extend_from_slice(&(bitmap_at as u32).to_le_bytes());
    payload.extend_from_slice(&(vertex_at as u32).to_le_bytes());

    // Header 5
    let header = 5 * Mh2oHeader::SIZE;
    payload[header..header + 4].copy_from_slice(&(instance_at as u32).to_le_bytes());
    payload[header + 4..header + 8].copy_from_slice(&1u32.to_le_bytes());
    payload[header + 8..header + 12].copy_from_slice(&(attributes_at as u32).to_le_bytes());

    payload
}

#[test]
fn foreign_layout_normalises_and_is_idempotent() {
    let foreign = foreign_payload();

    let decoded = Mh2oChunk::decode(&foreign).unwrap();
    let entry = &decoded.entries[5];
    assert_eq!(entry.layer_count(), 1);
    assert_eq!(entry.attributes, Some(Mh2oAttributes::default()));

    let vertex = entry.layers[0].vertex_data.unwrap();
    assert_eq!(vertex.height(2, 2), Some(4.0));
    assert_eq!(vertex.depth(1, 1), Some(10));

    let first = decoded.encode().unwrap();
    assert_eq!(first.len(), 3072 + 24 + 1 + 20);
    assert_eq!(first.len(), foreign.len() - 16);

    // Canonical order: instances, bitmap, vertex data; zero attributes gone
    let header = 5 * Mh2oHeader::SIZE;
    assert_eq!(u32_at(&first, header), 3072);
    assert_eq!(u32_at(&first, header + 4), 1);
    assert_eq!(u32_at(&first, header + 8), 0);
    assert_eq!(u32_at(&first, 3072 + 16), 3096);
    assert_eq!(u32_at(&first, 3072 + 20), 3097);

    let second = Mh2oChunk::decode(&first).unwrap().encode().unwrap();
    assert_eq!(second, first);
}

#[test]
fn empty_entries_encode_as_zero_headers() {
    let mut chunk = Mh2oChunk::new();
    chunk.entries[1].layers.push(layer(0, 0, 1, 1, 0));

    let payload = chunk.encode().unwrap();

    assert!(payload[0..12].iter().all(|&b| b == 0));
    assert_eq!(u32_at(&payload, 12), 3072);
    assert!(payload[24..3072].iter().all(|&b| b == 0));
}

#[test]
fn zero_attributes_are_omitted() {
    let mut chunk = Mh2oChunk::new();
    chunk.entries[0].layers.push(Mh2oLayer::new(Mh2oInstance::default()));
    chunk.entries[0].attributes = Some(Mh2oAttributes::default());

    let with_zero = chunk.encode().unwrap();
    chunk.entries[0].attributes = None;
    let without = chunk.encode().unwrap();

    assert_eq!(with_zero, without);
    assert_eq!(u32_at(&with_zero, 8), 0);
}

#[test]
fn vertex_block_size_follows_format() {
    for (format, expected) in [(0u16, 5 * 12), (1, 5 * 12), (2, 12), (3, 5 * 12)] {
        let mut chunk = Mh2oChunk::new();
        let mut l = layer(0, 0, 4, 3, format);
        l.exists_bitmap = None;
        chunk.entries[0].layers.push(l);

        let payload = chunk.encode().unwrap();
        assert_eq!(payload.len(), 3072 + 24 + expected, "format {format}");
        assert_eq!(u32_at(&payload, 3072 + 20), 3096);
    }
}

#[test]
fn mismatched_bitmap_is_dropped() {
    let mut chunk = Mh2oChunk::new();
    let mut l = layer(0, 0, 4, 4, 2);
    l.exists_bitmap = Some(vec![0xFF; 5]);
    chunk.entries[0].layers.push(l);

    let payload = chunk.encode().unwrap();

    assert_eq!(u32_at(&payload, 3072 + 16), 0);
    assert_eq!(u32_at(&payload, 3072 + 20), 3096);
    assert_eq!(payload.len(), 3072 + 24 + 16);

    let decoded = Mh2oChunk::decode(&payload).unwrap();
    assert_eq!(decoded.entries[0].layers[0].exists_bitmap, None);
}

#[test]
fn bitmap_size_follows_resized_instance() {
    let mut chunk = Mh2oChunk::new();
    let mut l = layer(0, 0, 8, 8, 0);
    // Shrinking the sub-rectangle invalidates the old 8-byte bitmap
    l.instance.width = 2;
    l.instance.height = 2;
    chunk.entries[0].layers.push(l);

    let payload = chunk.encode().unwrap();
    assert_eq!(payload.len(), 3072 + 24 + 20);
    assert_eq!(u32_at(&payload, 3072 + 16), 0);
}

#[test]
fn empty_chunk_is_3072_bytes() {
    let chunk = Mh2oChunk::new();
    assert_eq!(chunk.encoded_size(), 3072);
    assert_eq!(chunk.encode().unwrap(), vec![0u8; 3072]);
}

#[test]
fn encoded_size_matches_output() {
    let mut chunks = vec![Mh2oChunk::new(), populated_chunk()];

    let mut dense = Mh2oChunk::new();
    for (i, entry) in dense.entries.iter_mut().enumerate() {
        entry.layers.push(layer((i % 4) as u8, 0, 4, 8, (i % 4) as u16));
        if i % 3 == 0 {
            entry.attributes = Some(Mh2oAttributes {
                fishable: i as u64,
                deep: 0,
            });
        }
    }
    chunks.push(dense);

    for chunk in &chunks {
        assert_eq!(chunk.encode().unwrap().len(), chunk.encoded_size());
    }
}
