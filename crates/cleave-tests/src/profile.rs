//! Chunking profile capture and comparison.
//!
//! A profile records everything needed to check that two chunker builds cut
//! a stream identically: the algorithm, the size parameters, the ordered
//! chunk lengths with per-chunk digests, and a digest of the whole stream.

use std::io::Read;
use std::time::Instant;

use cleave::{Chunker, ChunkerError, ChunkerOpts};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Captured chunking run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdcProfile {
    /// Algorithm name the stream was chunked with.
    pub algorithm: String,
    /// Whether a keyed gear table was in use.
    pub keyed: bool,
    /// Effective minimum chunk size.
    pub min_size: usize,
    /// Effective normal chunk size.
    pub normal_size: usize,
    /// Effective maximum chunk size.
    pub max_size: usize,
    /// Ordered chunk lengths.
    pub cutpoints: Vec<usize>,
    /// Hex SHA-256 digest per chunk, parallel to `cutpoints`.
    pub digests: Vec<String>,
    /// Hex SHA-256 digest of the concatenated stream.
    pub digest: String,
    /// Wall-clock duration of the run, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// Differences found when matching a stream against a profile.
#[derive(Debug, Error)]
pub enum ProfileMismatch {
    /// Re-chunking failed outright.
    #[error(transparent)]
    Chunker(#[from] ChunkerError),

    /// The chunk counts differ.
    #[error("chunk count mismatch: expected {expected}, got {got}")]
    ChunkCount { expected: usize, got: usize },

    /// A chunk length differs.
    #[error("cutpoint mismatch at index {index}: expected {expected}, got {got}")]
    Cutpoint {
        index: usize,
        expected: usize,
        got: usize,
    },

    /// A chunk digest differs.
    #[error("chunk digest mismatch at index {index}")]
    ChunkDigest { index: usize },

    /// The whole-stream digest differs.
    #[error("stream digest mismatch: expected {expected}, got {got}")]
    StreamDigest { expected: String, got: String },
}

/// Chunks `reader` with the named algorithm and records the run.
pub fn generate_profile<R: Read>(
    reader: R,
    algorithm: &str,
    opts: Option<ChunkerOpts>,
) -> Result<CdcProfile, ChunkerError> {
    let keyed = opts.as_ref().is_some_and(|o| o.key.is_some());
    let started = Instant::now();
    let mut chunker = Chunker::new(algorithm, reader, opts)?;

    let mut profile = CdcProfile {
        algorithm: algorithm.to_string(),
        keyed,
        min_size: chunker.min_size(),
        normal_size: chunker.normal_size(),
        max_size: chunker.max_size(),
        cutpoints: Vec::new(),
        digests: Vec::new(),
        digest: String::new(),
        duration_ms: None,
    };

    let mut stream_hasher = Sha256::new();
    let mut first = true;
    while let Some(chunk) = chunker.next_chunk()? {
        stream_hasher.update(chunk.data);

        // Record a zero-length entry only for the empty-stream emission.
        if !chunk.data.is_empty() || first {
            profile.cutpoints.push(chunk.data.len());
            profile
                .digests
                .push(hex::encode(Sha256::digest(chunk.data)));
        }
        first = false;
        if chunk.last {
            break;
        }
    }

    profile.digest = hex::encode(stream_hasher.finalize());
    profile.duration_ms = Some(started.elapsed().as_millis() as u64);
    Ok(profile)
}

/// Re-chunks `reader` and verifies the run matches `expected`.
///
/// Comparison covers chunk count, every chunk length and digest in order,
/// and the whole-stream digest. Returns the freshly captured profile.
pub fn match_profile<R: Read>(
    reader: R,
    expected: &CdcProfile,
    opts: Option<ChunkerOpts>,
) -> Result<CdcProfile, ProfileMismatch> {
    let got = generate_profile(reader, &expected.algorithm, opts)?;

    if got.cutpoints.len() != expected.cutpoints.len() {
        return Err(ProfileMismatch::ChunkCount {
            expected: expected.cutpoints.len(),
            got: got.cutpoints.len(),
        });
    }
    for (index, (want, have)) in expected
        .cutpoints
        .iter()
        .zip(got.cutpoints.iter())
        .enumerate()
    {
        if want != have {
            return Err(ProfileMismatch::Cutpoint {
                index,
                expected: *want,
                got: *have,
            });
        }
        if expected.digests[index] != got.digests[index] {
            return Err(ProfileMismatch::ChunkDigest { index });
        }
    }
    if expected.digest != got.digest {
        return Err(ProfileMismatch::StreamDigest {
            expected: expected.digest.clone(),
            got: got.digest.clone(),
        });
    }
    Ok(got)
}
