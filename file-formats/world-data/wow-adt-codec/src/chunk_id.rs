use binrw::{BinRead, BinWrite};

/// 4-byte chunk identifier (magic bytes).
///
/// ADT files store magic bytes reversed. When documentation refers to a chunk
/// as "MVER", the bytes in the file are `[0x52, 0x45, 0x56, 0x4D]` ("REVM").
/// `ChunkId` holds the stored order and displays the documented name.
///
/// # Usage
///
/// ```rust
/// use wow_adt_codec::ChunkId;
///
/// let mver = ChunkId::MVER;
/// assert_eq!(mver.as_str(), "MVER");
///
/// // Create from string (automatically reverses)
/// let mh2o = ChunkId::from_str("MH2O").unwrap();
/// assert_eq!(mh2o, ChunkId::MH2O);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, BinRead, BinWrite)]
pub struct ChunkId(pub [u8; 4]);

impl ChunkId {
    /// Version chunk - stores ADT format version number
    pub const MVER: Self = Self::from_name(*b"MVER");

    /// Header chunk - contains offsets to other chunks
    pub const MHDR: Self = Self::from_name(*b"MHDR");

    /// Chunk index - MCNK offset table
    pub const MCIN: Self = Self::from_name(*b"MCIN");

    /// WMO placement definitions
    pub const MODF: Self = Self::from_name(*b"MODF");

    /// Flight bounds (TBC 2.0+) - min/max height planes
    pub const MFBO: Self = Self::from_name(*b"MFBO");

    /// Water/liquid data (WotLK 3.0+)
    pub const MH2O: Self = Self::from_name(*b"MH2O");

    /// Model extents for LOD object files (Legion+)
    pub const MLDX: Self = Self::from_name(*b"MLDX");

    /// Build an identifier from its documented name at compile time.
    ///
    /// ```rust
    /// use wow_adt_codec::ChunkId;
    ///
    /// const MTEX: ChunkId = ChunkId::from_name(*b"MTEX");
    /// assert_eq!(MTEX.0, *b"XETM");
    /// ```
    #[must_use]
    pub const fn from_name(name: [u8; 4]) -> Self {
        Self([name[3], name[2], name[1], name[0]])
    }

    /// Convert to human-readable string.
    ///
    /// Reverses the stored bytes to display the chunk name as it appears
    /// in documentation.
    #[must_use]
    pub fn as_str(&self) -> String {
        let reversed = [self.0[3], self.0[2], self.0[1], self.0[0]];
        String::from_utf8_lossy(&reversed).to_string()
    }

    /// Create from string (reverses bytes for file storage).
    ///
    /// Returns `None` unless the string is exactly 4 bytes.
    ///
    /// ```rust
    /// use wow_adt_codec::ChunkId;
    ///
    /// assert_eq!(ChunkId::from_str("MODF"), Some(ChunkId::MODF));
    /// assert!(ChunkId::from_str("ABC").is_none());
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let bytes: [u8; 4] = s.as_bytes().try_into().ok()?;
        Some(Self::from_name(bytes))
    }
}

impl std::fmt::Display for ChunkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
