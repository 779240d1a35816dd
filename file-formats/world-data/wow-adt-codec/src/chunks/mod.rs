//! ADT chunk structure definitions.
//!
//! ## Organization
//!
//! - [`simple`] - Flat fixed-layout chunks (MVER, MHDR, MCIN, MFBO)
//! - [`placement`] - Entry-array chunks (MODF, MLDX)
//! - [`mh2o`] - Multi-level water structure (WotLK+)

pub mod mh2o;
pub mod placement;
pub mod simple;

// Re-export simple chunk structures
pub use simple::{McinChunk, McinEntry, MfboChunk, MhdrChunk, MhdrFlags, MverChunk};

// Re-export placement chunk structures
pub use placement::{MldxChunk, ModelExtent, ModfChunk, WmoPlacement};

// Re-export MH2O chunk structures
pub use mh2o::{
    LiquidVertexData, Mh2oAttributes, Mh2oChunk, Mh2oEntry, Mh2oHeader, Mh2oInstance, Mh2oLayer,
};
