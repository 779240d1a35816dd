//! Codec for World of Warcraft ADT terrain tile chunk streams
//!
//! ADT files are sequences of tagged, length-prefixed chunks. This crate
//! decodes such a stream into a [`TerrainDocument`] driven by a declared
//! [`ChunkLayout`] and encodes it back, recomputing every size and internal
//! offset. Its centerpiece is the MH2O liquid chunk, whose payload is an
//! offset-addressed graph of headers, instances, bitmaps and vertex blocks.
//!
//! The crate works on byte buffers only; reading and writing files is up to
//! the caller.
//!
//! ## Features
//!
//! - Decode and encode MVER, MHDR, MCIN, MODF, MFBO, MLDX and MH2O chunks
//! - Pass unknown chunks through as raw payloads
//! - Canonical MH2O re-encoding (dropped zero attributes and malformed bitmaps)
//! - Batch processing on the rayon pool (with `parallel` feature)
//!
//! ## Example
//!
//! ```no_run
//! use wow_adt_codec::{ChunkLayout, TerrainDocument};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("Azeroth_32_48.adt")?;
//! let mut doc = TerrainDocument::decode(&bytes, &ChunkLayout::terrain())?;
//!
//! if let Some(water) = doc.liquid_mut() {
//!     println!("{} map chunks with liquid", water.liquid_chunk_count());
//!     for entry in &mut water.entries {
//!         entry.attributes = None;
//!     }
//! }
//!
//! std::fs::write("Azeroth_32_48.adt", doc.encode()?)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## References
//!
//! Based on information from:
//! - <https://wowdev.wiki/ADT/v18>

pub mod chunk_header;
pub mod chunk_id;
pub mod chunks;
pub mod container;
pub mod cursor;
pub mod error;
pub mod parallel;
pub mod record;

pub use chunk_header::{ChunkHeader, ChunkPeek, peek_chunk};
pub use chunk_id::ChunkId;
pub use container::{ChunkKind, ChunkLayout, SlotDescriptor, TerrainChunk, TerrainDocument};
pub use cursor::{ByteCursor, ByteWriter, PatchSlot};
pub use error::{AdtError, Result};
pub use record::{ChunkRecord, RecordCodec};

pub use parallel::{decode_batch, reencode_batch};
