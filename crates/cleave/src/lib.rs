//! Cleave - content-defined chunking for deduplicating storage.
//!
//! Splits a byte stream into variable-length chunks whose boundaries are
//! derived from the local byte content rather than fixed offsets. Inserting
//! or deleting bytes shifts only the chunks around the edit; everything else
//! keeps its identity, which is what makes downstream deduplication work.
//!
//! # Design
//!
//! A [`Chunker`] wraps any [`std::io::Read`] with a bounded look-ahead
//! buffer and drives one of several boundary algorithms over it. The
//! algorithms are pure cutpoint searches over a sliding window; the
//! framework owns all buffering and enforces the size bounds. Algorithms
//! are resolved by name through a [`Registry`].
//!
//! Available algorithms: `fastcdc`, `fastcdc-v1.0.0`, `fastcdc4stadia`,
//! `kfastcdc` (keyed), `jc`, `jc-v1.0.0`, `ultracdc`.
//!
//! # Example
//!
//! ```
//! use cleave::Chunker;
//!
//! let data: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
//! let mut chunker = Chunker::new("fastcdc", data.as_slice(), None).unwrap();
//!
//! let mut total = 0;
//! while let Some(chunk) = chunker.next_chunk().unwrap() {
//!     total += chunk.data.len();
//!     if chunk.last {
//!         break;
//!     }
//! }
//! assert_eq!(total, data.len());
//! ```
//!
//! Chunks borrow the chunker's internal buffer and are only valid until the
//! next call; copy them out to retain them.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod algorithms;
mod buffer;
mod chunker;
mod error;
pub mod gear;
mod options;
mod registry;

pub use algorithms::BoundaryAlgorithm;
pub use chunker::{Chunk, Chunker};
pub use error::{ChunkerError, OptionsError};
pub use options::ChunkerOpts;
pub use registry::{AlgorithmFactory, Registry, DEFAULT_REGISTRY};
