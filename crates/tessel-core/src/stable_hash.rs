#![forbid(unsafe_code)]

//! FNV-1a hashes that are stable across runs, platforms and releases.
//!
//! `std`'s `DefaultHasher` is randomly keyed per process, which makes it
//! useless for reproducible orderings or persisted diagnostics. Everything
//! here is plain FNV-1a over explicit little-endian byte encodings.

const FNV32_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV32_PRIME: u32 = 0x0100_0193;

const FNV64_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV64_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 32-bit FNV-1a over raw bytes.
#[must_use]
pub fn fnv1a32(bytes: &[u8]) -> u32 {
    let mut hash = FNV32_OFFSET_BASIS;
    for byte in bytes {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(FNV32_PRIME);
    }
    hash
}

/// 32-bit FNV-1a over the UTF-8 bytes of a string.
///
/// Non-ASCII ids hash their UTF-8 encoding, not UTF-16 code units.
#[inline]
#[must_use]
pub fn fnv1a32_str(s: &str) -> u32 {
    fnv1a32(s.as_bytes())
}

/// Incremental 64-bit FNV-1a hasher for state digests.
///
/// Variable-length fields should go through [`StableHasher::write_str`],
/// which length-prefixes its input so adjacent fields cannot alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StableHasher {
    state: u64,
}

impl StableHasher {
    /// Start a new digest.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: FNV64_OFFSET_BASIS,
        }
    }

    #[inline]
    fn mix(&mut self, byte: u8) {
        self.state ^= u64::from(byte);
        self.state = self.state.wrapping_mul(FNV64_PRIME);
    }

    /// Mix raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.mix(*byte);
        }
    }

    /// Mix a length-prefixed string.
    pub fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.write_bytes(s.as_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.mix(u8::from(value));
    }

    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Final digest value.
    #[must_use]
    pub const fn finish(&self) -> u64 {
        self.state
    }
}

impl Default for StableHasher {
    fn default() -> Self {
        Self::new()
    }
}
