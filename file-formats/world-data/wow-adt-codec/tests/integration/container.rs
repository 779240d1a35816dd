//! Integration tests for complete chunk streams (decode-modify-encode).
//!
//! These tests verify:
//! 1. A full root terrain stream round-trips byte for byte
//! 2. Optional chunks may be absent anywhere in the layout
//! 3. Liquid edits made through the document are written back
//! 4. LOD object streams decode with their own layout

use pretty_assertions::assert_eq;
use wow_adt_codec::chunks::{
    McinChunk, MfboChunk, Mh2oAttributes, Mh2oChunk, Mh2oInstance, Mh2oLayer, MhdrChunk,
    MhdrFlags, MldxChunk, ModelExtent, ModfChunk, MverChunk, WmoPlacement,
};
use wow_adt_codec::{AdtError, ChunkId, ChunkLayout, TerrainChunk, TerrainDocument};

/// Helper: raw `tag, size, payload` bytes
fn chunk_bytes(id: ChunkId, payload: &[u8]) -> Vec<u8> {
    let mut bytes = id.0.to_vec();
    bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    bytes.extend_from_slice(payload);
    bytes
}

fn full_terrain() -> TerrainDocument {
    let mut mhdr = MhdrChunk::default();
    mhdr.set_flags(MhdrFlags::MFBO);
    mhdr.mcin_offset = 0x40;

    let mut mcin = McinChunk::default();
    mcin.entries[0].offset = 0x1234;
    mcin.entries[0].size = 0x200;

    let modf = ModfChunk {
        placements: vec![WmoPlacement {
            name_id: 0,
            unique_id: 42,
            position: [17_000.0, 120.0, 17_000.0],
            scale: 1024,
            ..Default::default()
        }],
    };

    let mut water = Mh2oChunk::new();
    let mut surface = Mh2oLayer::new(Mh2oInstance {
        liquid_type: 1,
        width: 8,
        height: 8,
        ..Default::default()
    });
    surface.exists_bitmap = Some(vec![0xFF; 8]);
    water.entries[34].layers.push(surface);
    water.entries[34].attributes = Some(Mh2oAttributes {
        fishable: u64::MAX,
        deep: 0,
    });

    let mut doc = TerrainDocument::new(ChunkLayout::terrain());
    doc.set("version", TerrainChunk::Version(MverChunk::default()))
        .unwrap();
    doc.set("header", TerrainChunk::Header(mhdr)).unwrap();
    doc.set("chunk_index", TerrainChunk::ChunkIndex(mcin)).unwrap();
    doc.set("wmo_placements", TerrainChunk::WmoPlacements(modf))
        .unwrap();
    doc.set("liquid", TerrainChunk::Liquid(water)).unwrap();
    doc.set(
        "flight_bounds",
        TerrainChunk::FlightBounds(MfboChunk {
            max_plane: [500; 9],
            min_plane: [-500; 9],
        }),
    )
    .unwrap();
    doc
}

#[test]
fn full_terrain_round_trip() {
    let bytes = full_terrain().encode().unwrap();

    // Stream starts with the reversed MVER tag and version 18
    assert_eq!(&bytes[0..12], &[b'R', b'E', b'V', b'M', 4, 0, 0, 0, 18, 0, 0, 0]);

    let decoded = TerrainDocument::decode(&bytes, &ChunkLayout::terrain()).unwrap();
    assert_eq!(decoded.slots().filter(|(_, v)| v.is_some()).count(), 6);
    assert_eq!(decoded.encode().unwrap(), bytes);

    match decoded.get("header").unwrap() {
        Some(TerrainChunk::Header(mhdr)) => assert!(mhdr.flags().contains(MhdrFlags::MFBO)),
        other => panic!("unexpected header slot: {other:?}"),
    }
}

#[test]
fn chunk_sizes_in_stream() {
    let bytes = full_terrain().encode().unwrap();

    let mut offset = 0;
    let mut seen = Vec::new();
    while offset < bytes.len() {
        let id = ChunkId(bytes[offset..offset + 4].try_into().unwrap());
        let size = u32::from_le_bytes(bytes[offset + 4..offset + 8].try_into().unwrap());
        seen.push((id.as_str(), size));
        offset += 8 + size as usize;
    }

    assert_eq!(offset, bytes.len());
    assert_eq!(
        seen,
        vec![
            ("MVER".to_string(), 4),
            ("MHDR".to_string(), 64),
            ("MCIN".to_string(), 4096),
            ("MODF".to_string(), 64),
            ("MH2O".to_string(), 3072 + 24 + 8 + 16),
            ("MFBO".to_string(), 36),
        ]
    );
}

#[test]
fn optional_chunks_absent() {
    let mut bytes = chunk_bytes(ChunkId::MVER, &18u32.to_le_bytes());
    bytes.extend(chunk_bytes(ChunkId::MHDR, &[0u8; 64]));
    bytes.extend(chunk_bytes(ChunkId::MFBO, &[0u8; 36]));

    let doc = TerrainDocument::decode(&bytes, &ChunkLayout::terrain()).unwrap();

    assert!(doc.get("chunk_index").unwrap().is_none());
    assert!(doc.get("wmo_placements").unwrap().is_none());
    assert!(doc.liquid().is_none());
    assert!(doc.get("flight_bounds").unwrap().is_some());
    assert_eq!(doc.encode().unwrap(), bytes);
}

#[test]
fn missing_header_is_an_error() {
    let mut bytes = chunk_bytes(ChunkId::MVER, &18u32.to_le_bytes());
    bytes.extend(chunk_bytes(ChunkId::MCIN, &[0u8; 4096]));

    let err = TerrainDocument::decode(&bytes, &ChunkLayout::terrain()).unwrap_err();
    assert!(matches!(
        err,
        AdtError::ChunkSignatureMismatch {
            expected: ChunkId::MHDR,
            found: Some(ChunkId::MCIN),
            offset: 12
        }
    ));
}

#[test]
fn corrupt_liquid_payload_fails_whole_document() {
    let mut mh2o = vec![0u8; 3072];
    mh2o[0..4].copy_from_slice(&9999u32.to_le_bytes());
    mh2o[4..8].copy_from_slice(&1u32.to_le_bytes());

    let mut bytes = chunk_bytes(ChunkId::MVER, &18u32.to_le_bytes());
    bytes.extend(chunk_bytes(ChunkId::MHDR, &[0u8; 64]));
    bytes.extend(chunk_bytes(ChunkId::MH2O, &mh2o));

    let err = TerrainDocument::decode(&bytes, &ChunkLayout::terrain()).unwrap_err();
    assert!(matches!(
        err,
        AdtError::InvalidOffset {
            chunk: Some(ChunkId::MH2O),
            offset: 9999,
            ..
        }
    ));
}

#[test]
fn liquid_edit_is_written_back() {
    let bytes = full_terrain().encode().unwrap();
    let mut doc = TerrainDocument::decode(&bytes, &ChunkLayout::terrain()).unwrap();

    let water = doc.liquid_mut().unwrap();
    water.entries[34].attributes = None;
    water.entries[35]
        .layers
        .push(Mh2oLayer::new(Mh2oInstance::default()));

    let edited = doc.encode().unwrap();
    let reread = TerrainDocument::decode(&edited, &ChunkLayout::terrain()).unwrap();
    let water = reread.liquid().unwrap();

    assert_eq!(water.liquid_chunk_count(), 2);
    assert!(water.entries[34].attributes.is_none());
    assert_eq!(edited.len(), bytes.len() + 24 - 16);
}

#[test]
fn object_lod_stream() {
    let mldx = MldxChunk {
        entries: vec![
            ModelExtent {
                bounds_min: [0.0, 0.0, 0.0],
                bounds_max: [10.0, 10.0, 30.0],
                radius: 32.0,
            },
            ModelExtent::default(),
        ],
    };

    let mut doc = TerrainDocument::new(ChunkLayout::object_lod());
    doc.set("version", TerrainChunk::Version(MverChunk::default()))
        .unwrap();
    doc.set("model_extents", TerrainChunk::ModelExtents(mldx.clone()))
        .unwrap();

    let bytes = doc.encode().unwrap();
    assert_eq!(bytes.len(), 12 + 8 + 56);

    let decoded = TerrainDocument::decode(&bytes, &ChunkLayout::object_lod()).unwrap();
    assert!(decoded.get("wmo_placements").unwrap().is_none());
    assert_eq!(
        decoded.get("model_extents").unwrap(),
        Some(&TerrainChunk::ModelExtents(mldx))
    );
}

#[test]
fn batch_reencode_normalises_each_file() {
    let canonical = full_terrain().encode().unwrap();
    let inputs = vec![canonical.clone(), canonical.clone()];

    let results = wow_adt_codec::reencode_batch(&inputs, &ChunkLayout::terrain());

    for result in results {
        assert_eq!(result.unwrap(), canonical);
    }
}
