//! Batch decoding and re-encoding of independent files.
//!
//! With the `parallel` feature the work is spread over the rayon thread
//! pool; without it the same functions run sequentially. Results are returned
//! in input order, one per input, so a corrupt file does not abort the batch.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::container::{ChunkLayout, TerrainDocument};
use crate::error::Result;

/// Decode every buffer against `layout`.
#[cfg(feature = "parallel")]
pub fn decode_batch<B>(inputs: &[B], layout: &ChunkLayout) -> Vec<Result<TerrainDocument>>
where
    B: AsRef<[u8]> + Sync,
{
    inputs
        .par_iter()
        .map(|bytes| TerrainDocument::decode(bytes.as_ref(), layout))
        .collect()
}

/// Decode every buffer against `layout`.
#[cfg(not(feature = "parallel"))]
pub fn decode_batch<B>(inputs: &[B], layout: &ChunkLayout) -> Vec<Result<TerrainDocument>>
where
    B: AsRef<[u8]>,
{
    inputs
        .iter()
        .map(|bytes| TerrainDocument::decode(bytes.as_ref(), layout))
        .collect()
}

/// Decode and re-encode every buffer, normalising its contents.
#[cfg(feature = "parallel")]
pub fn reencode_batch<B>(inputs: &[B], layout: &ChunkLayout) -> Vec<Result<Vec<u8>>>
where
    B: AsRef<[u8]> + Sync,
{
    log::debug!("Re-encoding {} files on the rayon pool", inputs.len());
    inputs
        .par_iter()
        .map(|bytes| reencode(bytes.as_ref(), layout))
        .collect()
}

/// Decode and re-encode every buffer, normalising its contents.
#[cfg(not(feature = "parallel"))]
pub fn reencode_batch<B>(inputs: &[B], layout: &ChunkLayout) -> Vec<Result<Vec<u8>>>
where
    B: AsRef<[u8]>,
{
    inputs
        .iter()
        .map(|bytes| reencode(bytes.as_ref(), layout))
        .collect()
}

fn reencode(bytes: &[u8], layout: &ChunkLayout) -> Result<Vec<u8>> {
    TerrainDocument::decode(bytes, layout)?.encode()
}
