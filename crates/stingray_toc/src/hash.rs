//! 64-bit MurmurHash2 (`MurmurHash64A`) as used to name streamed audio.

use byteorder::{ByteOrder, LittleEndian};

const M: u64 = 0xc6a4_a793_5bd1_e995;
const R: u32 = 47;

/// Hashes `key` with a seed of zero
pub fn murmur64(key: &[u8]) -> u64 {
    murmur64_with_seed(key, 0)
}

pub fn murmur64_with_seed(key: &[u8], seed: u64) -> u64 {
    let mut h = seed ^ (key.len() as u64).wrapping_mul(M);

    let mut blocks = key.chunks_exact(8);
    for block in &mut blocks {
        let mut k = LittleEndian::read_u64(block);
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);

        h ^= k;
        h = h.wrapping_mul(M);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        for (i, byte) in tail.iter().enumerate() {
            h ^= (*byte as u64) << (8 * i);
        }
        h = h.wrapping_mul(M);
    }

    h ^= h >> R;
    h = h.wrapping_mul(M);
    h ^= h >> R;
    h
}

/// Resource id of the stream holding `source_id` for a bank stored at `bank_path`
///
/// The id is the hash of the bank's directory joined with the decimal source id, e.g.
/// `content/audio/43` for source 43 of `content/audio/weapons`.
pub fn stream_resource_id(bank_path: &str, source_id: u32) -> u64 {
    let directory = bank_path.rsplit_once('/').map_or("", |(dir, _)| dir);
    murmur64(format!("{directory}/{source_id}").as_bytes())
}
