//! Error types for chunker construction and streaming.

use thiserror::Error;

/// Errors surfaced by the streaming framework and the registry.
#[derive(Debug, Error)]
pub enum ChunkerError {
    /// The requested algorithm name is not registered.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// An algorithm with this name is already registered.
    #[error("algorithm already registered: {0}")]
    AlreadyRegistered(String),

    /// The merged options failed validation or setup.
    #[error("invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),

    /// An I/O error from the underlying reader or writer.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-field option validation and setup failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OptionsError {
    /// NormalSize out of range.
    #[error("normal size must be between 64 B and 1 GiB")]
    NormalSize,

    /// MinSize out of range or not below NormalSize.
    #[error("min size must be between 64 B and 1 GiB and below normal size")]
    MinSize,

    /// MaxSize out of range or not above NormalSize.
    #[error("max size must be between 64 B and 1 GiB and above normal size")]
    MaxSize,

    /// NormalSize must be a power of two for this algorithm.
    #[error("normal size must be a power of two")]
    NotPowerOfTwo,

    /// Normalization level out of range for the configured sizes.
    #[error("normalization level must be between 0 and 31 and at most log2(min size)")]
    NormalLevel,

    /// The algorithm requires a key and none was supplied.
    #[error("a 32-byte key is required")]
    KeyRequired,

    /// The keyed gear table could not be derived.
    #[error("keyed gear derivation failed: {0}")]
    KeyDerivation(String),
}
