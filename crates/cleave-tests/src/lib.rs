//! Test support for the cleave chunkers.
//!
//! Deterministic data generators, a fragmenting reader for exercising
//! arbitrary read patterns, and chunking-profile capture/compare helpers.

pub mod profile;

use std::io::Read;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Every built-in algorithm name.
pub const ALL_ALGORITHMS: [&str; 7] = [
    "fastcdc",
    "fastcdc-v1.0.0",
    "fastcdc4stadia",
    "kfastcdc",
    "jc",
    "jc-v1.0.0",
    "ultracdc",
];

/// Key used wherever a suite needs some 32-byte secret.
pub const TEST_KEY: [u8; 32] = [0xA5; 32];

/// Baseline options for an algorithm: defaults, plus a key where the
/// algorithm demands one.
pub fn baseline_opts(algorithm: &str) -> Option<cleave::ChunkerOpts> {
    if algorithm == "kfastcdc" {
        Some(cleave::ChunkerOpts::default().with_key(TEST_KEY))
    } else {
        None
    }
}

/// Returns `len` bytes of seeded pseudo-random data.
///
/// The same seed always yields the same bytes, so expectations stay stable
/// across runs and platforms.
pub fn seeded_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; len];
    rng.fill_bytes(&mut data);
    data
}

/// Reader that hands its data out in bounded fragments.
///
/// Chunk boundaries must not depend on how the reader slices its input;
/// this adapter reproduces pathological read patterns (single bytes,
/// random-sized reads) over in-memory data.
pub struct FragmentedReader {
    data: Vec<u8>,
    pos: usize,
    rng: Option<StdRng>,
    fragment: usize,
}

impl FragmentedReader {
    /// Reader returning exactly `fragment` bytes per call.
    pub fn fixed(data: Vec<u8>, fragment: usize) -> Self {
        assert!(fragment > 0);
        Self {
            data,
            pos: 0,
            rng: None,
            fragment,
        }
    }

    /// Reader returning a random number of bytes (1..=`max_fragment`) per
    /// call, driven by a seeded generator.
    pub fn random(data: Vec<u8>, max_fragment: usize, seed: u64) -> Self {
        assert!(max_fragment > 0);
        Self {
            data,
            pos: 0,
            rng: Some(StdRng::seed_from_u64(seed)),
            fragment: max_fragment,
        }
    }
}

impl Read for FragmentedReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let step = match &mut self.rng {
            Some(rng) => rng.gen_range(1..=self.fragment),
            None => self.fragment,
        };
        let n = step.min(self.data.len() - self.pos).min(buf.len());
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_seeded_bytes_reproducible() {
        assert_eq!(seeded_bytes(1024, 7), seeded_bytes(1024, 7));
        assert_ne!(seeded_bytes(1024, 7), seeded_bytes(1024, 8));
    }

    #[test]
    fn test_fragmented_reader_yields_everything() {
        let data = seeded_bytes(10_000, 1);
        for reader in [
            FragmentedReader::fixed(data.clone(), 1),
            FragmentedReader::fixed(data.clone(), 17),
            FragmentedReader::random(data.clone(), 97, 2),
        ] {
            let mut reader = reader;
            let mut out = Vec::new();
            reader.read_to_end(&mut out).unwrap();
            assert_eq!(out, data);
        }
    }
}
