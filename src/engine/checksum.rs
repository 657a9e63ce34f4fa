//! FNV-1a 64-bit checksum used as the per-file integrity tag and CPU workload.

use std::hash::Hasher;

/// FNV-1a 64-bit offset basis; also the checksum of an empty buffer.
pub const FNV_OFFSET_BASIS: u64 = 14_695_981_039_346_656_037;
/// FNV 64-bit prime.
pub const FNV_PRIME: u64 = 1_099_511_628_211;

/// Checksum a whole buffer.
pub fn checksum(data: &[u8]) -> u64 {
    let mut h = Fnv1a::default();
    h.write(data);
    h.finish()
}

/// Streaming FNV-1a state. Feeding the same bytes in any chunking yields the same value as [`checksum`].
#[derive(Clone, Copy, Debug)]
pub struct Fnv1a(u64);

impl Default for Fnv1a {
    fn default() -> Self {
        Self(FNV_OFFSET_BASIS)
    }
}

impl Hasher for Fnv1a {
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= u64::from(b);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }

    fn finish(&self) -> u64 {
        self.0
    }
}

/// Sidecar body for a checksum: `checksum:<decimal>\n`.
pub fn sidecar_contents(sum: u64) -> String {
    format!("checksum:{sum}\n")
}
