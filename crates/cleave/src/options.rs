//! Chunker configuration.

use crate::error::OptionsError;

/// Smallest accepted value for any size parameter.
pub const SIZE_FLOOR: usize = 64;

/// Largest accepted value for any size parameter (1 GiB).
pub const SIZE_CEILING: usize = 1024 * 1024 * 1024;

/// Configuration for one chunker instance.
///
/// A size field left at zero adopts the algorithm's default when the chunker
/// is constructed. After merging, the sizes satisfy
/// `64 <= min_size < normal_size < max_size <= 1 GiB`.
///
/// The optional key diversifies the gear table so that two parties holding
/// different keys produce unlinkable chunk boundaries on the same content.
/// It must be exactly 32 bytes when present.
#[derive(Debug, Clone, Default)]
pub struct ChunkerOpts {
    /// Lower bound on chunk length in bytes (except the final chunk).
    pub min_size: usize,
    /// Upper bound on chunk length in bytes.
    pub max_size: usize,
    /// Target mean chunk length in bytes.
    pub normal_size: usize,
    /// Optional 32-byte secret for keyed gear-table derivation.
    pub key: Option<Vec<u8>>,
}

impl ChunkerOpts {
    /// Builds options from the size triple, leaving the key unset.
    pub fn new(min_size: usize, normal_size: usize, max_size: usize) -> Self {
        Self {
            min_size,
            max_size,
            normal_size,
            ..Self::default()
        }
    }

    /// Returns a copy with the given key installed.
    pub fn with_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Fills any zero size field from the algorithm defaults.
    pub(crate) fn merge_defaults(&mut self, defaults: &ChunkerOpts) {
        if self.min_size == 0 {
            self.min_size = defaults.min_size;
        }
        if self.max_size == 0 {
            self.max_size = defaults.max_size;
        }
        if self.normal_size == 0 {
            self.normal_size = defaults.normal_size;
        }
    }

    /// Shared size-range checks applied by every algorithm.
    pub(crate) fn validate_sizes(&self) -> Result<(), OptionsError> {
        if self.normal_size < SIZE_FLOOR || self.normal_size > SIZE_CEILING {
            return Err(OptionsError::NormalSize);
        }
        if self.min_size < SIZE_FLOOR
            || self.min_size > SIZE_CEILING
            || self.min_size >= self.normal_size
        {
            return Err(OptionsError::MinSize);
        }
        if self.max_size < SIZE_FLOOR
            || self.max_size > SIZE_CEILING
            || self.max_size <= self.normal_size
        {
            return Err(OptionsError::MaxSize);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_defaults_fills_zero_fields() {
        let defaults = ChunkerOpts::new(2048, 8192, 65536);

        let mut opts = ChunkerOpts::default();
        opts.merge_defaults(&defaults);
        assert_eq!(opts.min_size, 2048);
        assert_eq!(opts.normal_size, 8192);
        assert_eq!(opts.max_size, 65536);

        let mut opts = ChunkerOpts::new(1024, 0, 0);
        opts.merge_defaults(&defaults);
        assert_eq!(opts.min_size, 1024);
        assert_eq!(opts.normal_size, 8192);
        assert_eq!(opts.max_size, 65536);
    }

    #[test]
    fn test_merge_preserves_key() {
        let defaults = ChunkerOpts::new(2048, 8192, 65536);
        let mut opts = ChunkerOpts::default().with_key([7u8; 32]);
        opts.merge_defaults(&defaults);
        assert_eq!(opts.key.as_deref(), Some(&[7u8; 32][..]));
    }

    #[test]
    fn test_validate_sizes_accepts_defaults() {
        assert!(ChunkerOpts::new(2048, 8192, 65536).validate_sizes().is_ok());
        assert!(ChunkerOpts::new(64, 65, 66).validate_sizes().is_ok());
    }

    #[test]
    fn test_validate_sizes_rejects_out_of_range() {
        // NormalSize violations.
        for opts in [
            ChunkerOpts::new(2048, 0, 65536),
            ChunkerOpts::new(2048, 63, 65536),
            ChunkerOpts::new(2048, SIZE_CEILING + 1, 65536),
        ] {
            assert_eq!(opts.validate_sizes(), Err(OptionsError::NormalSize));
        }

        // MinSize violations.
        for opts in [
            ChunkerOpts::new(0, 8192, 65536),
            ChunkerOpts::new(63, 8192, 65536),
            ChunkerOpts::new(SIZE_CEILING + 1, 8192, 65536),
            ChunkerOpts::new(8192, 8192, 65536),
            ChunkerOpts::new(9000, 8192, 65536),
        ] {
            assert_eq!(opts.validate_sizes(), Err(OptionsError::MinSize));
        }

        // MaxSize violations.
        for opts in [
            ChunkerOpts::new(2048, 8192, 0),
            ChunkerOpts::new(2048, 8192, 63),
            ChunkerOpts::new(2048, 8192, SIZE_CEILING + 1),
            ChunkerOpts::new(2048, 8192, 8192),
            ChunkerOpts::new(2048, 8192, 8000),
        ] {
            assert_eq!(opts.validate_sizes(), Err(OptionsError::MaxSize));
        }
    }
}
