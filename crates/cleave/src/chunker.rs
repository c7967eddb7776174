//! Streaming framework.
//!
//! Wraps a reader with a bounded look-ahead buffer and drives a boundary
//! algorithm over it: peek up to `max_size` bytes, ask the algorithm for a
//! cutpoint, emit the prefix, advance, repeat. Emitted chunks borrow from
//! the look-ahead buffer, so each is valid until the next framework call;
//! callers that retain chunks must copy them out.

use std::io::{Read, Write};

use tracing::{debug, trace};

use crate::algorithms::BoundaryAlgorithm;
use crate::buffer::LookAhead;
use crate::error::ChunkerError;
use crate::options::ChunkerOpts;
use crate::registry::{Registry, DEFAULT_REGISTRY};

/// One emitted chunk.
///
/// `data` aliases the chunker's internal buffer. `last` marks the final
/// chunk of the stream, so the terminal emission is both delivered and
/// flagged; after a `last` chunk, [`Chunker::next_chunk`] yields `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// The chunk payload, valid until the next framework call.
    pub data: &'a [u8],
    /// Whether this is the final chunk of the stream.
    pub last: bool,
}

/// Content-defined chunker over a byte reader.
///
/// Every chunk except possibly the last is between `min_size` and
/// `max_size` bytes long; the final chunk may be shorter than `min_size`.
/// Boundaries depend only on the byte content and the configured options,
/// never on how the reader fragments its reads.
///
/// A chunker is single-owner state and not meant for concurrent use;
/// separate instances are fully independent.
///
/// # Example
///
/// ```
/// use cleave::Chunker;
///
/// let data = vec![0u8; 100_000];
/// let mut chunker = Chunker::new("fastcdc", data.as_slice(), None).unwrap();
/// let max = chunker.max_size();
/// while let Some(chunk) = chunker.next_chunk().unwrap() {
///     assert!(chunk.data.len() <= max);
///     if chunk.last {
///         break;
///     }
/// }
/// ```
pub struct Chunker<R> {
    buffer: LookAhead<R>,
    options: ChunkerOpts,
    algorithm: Box<dyn BoundaryAlgorithm>,
    /// Bytes to discard before the next peek.
    pending: usize,
    is_first: bool,
}

impl<R: Read> Chunker<R> {
    /// Creates a chunker for the named algorithm from the default registry.
    ///
    /// Size fields left at zero in `opts` adopt the algorithm defaults;
    /// passing `None` uses the defaults wholesale. The merged options are
    /// validated and the algorithm is set up before any byte is read.
    pub fn new(
        algorithm: &str,
        reader: R,
        opts: Option<ChunkerOpts>,
    ) -> Result<Self, ChunkerError> {
        Self::with_registry(&DEFAULT_REGISTRY, algorithm, reader, opts)
    }

    /// Creates a chunker resolving the algorithm in a caller-owned registry.
    pub fn with_registry(
        registry: &Registry,
        algorithm: &str,
        reader: R,
        opts: Option<ChunkerOpts>,
    ) -> Result<Self, ChunkerError> {
        let mut implementation = registry.instantiate(algorithm)?;

        let mut options = opts.unwrap_or_default();
        options.merge_defaults(&implementation.default_options());
        implementation.validate(&options)?;
        implementation.setup(&options)?;

        debug!(
            algorithm,
            min_size = options.min_size,
            normal_size = options.normal_size,
            max_size = options.max_size,
            keyed = options.key.is_some(),
            "created chunker"
        );

        Ok(Self {
            buffer: LookAhead::new(reader, options.max_size * 2),
            options,
            algorithm: implementation,
            pending: 0,
            is_first: true,
        })
    }

    /// Lower bound on chunk length (except the final chunk).
    pub fn min_size(&self) -> usize {
        self.options.min_size
    }

    /// Upper bound on chunk length.
    pub fn max_size(&self) -> usize {
        self.options.max_size
    }

    /// Target mean chunk length.
    pub fn normal_size(&self) -> usize {
        self.options.normal_size
    }

    /// Emits the next chunk.
    ///
    /// Returns `Ok(None)` once the stream is exhausted. An empty stream
    /// yields a single empty chunk flagged `last`. Reader errors other than
    /// end-of-input surface unchanged; the chunker may be reused afterwards
    /// only via [`reset`](Self::reset).
    pub fn next_chunk(&mut self) -> Result<Option<Chunk<'_>>, ChunkerError> {
        if self.pending != 0 {
            self.buffer.consume(self.pending);
            self.pending = 0;
        }

        let n = self.buffer.peek(self.options.max_size)?.len();
        let was_first = self.is_first;
        self.is_first = false;

        if n == 0 {
            if was_first {
                return Ok(Some(Chunk {
                    data: &[],
                    last: true,
                }));
            }
            return Ok(None);
        }

        let window = self.buffer.buffered(n);
        let cutpoint = self.algorithm.cutpoint(&self.options, window, n);
        debug_assert!(cutpoint >= 1 && cutpoint <= n);
        self.pending = cutpoint;

        let last = cutpoint < self.options.min_size;
        trace!(cutpoint, last, "emitted chunk");

        Ok(Some(Chunk {
            data: self.buffer.buffered(cutpoint),
            last,
        }))
    }

    /// Writes every chunk of the stream into `writer`.
    ///
    /// The sink is trusted to accept each chunk whole. Returns the total
    /// number of bytes written.
    pub fn copy<W: Write>(&mut self, writer: &mut W) -> Result<u64, ChunkerError> {
        let mut written = 0u64;
        loop {
            let Some(chunk) = self.next_chunk()? else {
                break;
            };
            if !chunk.data.is_empty() {
                writer.write_all(chunk.data)?;
                written += chunk.data.len() as u64;
            }
            if chunk.last {
                break;
            }
        }
        Ok(written)
    }

    /// Invokes `callback(offset, length, data)` for every chunk.
    ///
    /// The offset is the running byte position of the chunk within the
    /// stream. Iteration stops at the last chunk or on the first error from
    /// the reader or the callback.
    pub fn split<F>(&mut self, mut callback: F) -> Result<(), ChunkerError>
    where
        F: FnMut(u64, usize, &[u8]) -> std::io::Result<()>,
    {
        let mut offset = 0u64;
        loop {
            let Some(chunk) = self.next_chunk()? else {
                break;
            };
            callback(offset, chunk.data.len(), chunk.data)?;
            if chunk.last {
                break;
            }
            offset += chunk.data.len() as u64;
        }
        Ok(())
    }

    /// Rebinds the chunker to a new reader.
    ///
    /// Buffered bytes and stream position are dropped; prepared masks and
    /// gear tables are kept.
    pub fn reset(&mut self, reader: R) {
        self.pending = 0;
        self.is_first = true;
        self.buffer.reset(reader);
        debug!("chunker reset");
    }
}
