//! FastCDC boundary detection.
//!
//! Three registered flavours share this implementation: the legacy variant
//! with the original hand-tuned masks, the v1.0.0 variant that spaces mask
//! bits evenly from the configured normal size, and the keyed variant that
//! requires a secret and chunks with a derived gear table.

use crate::algorithms::{spaced_mask, BoundaryAlgorithm};
use crate::error::OptionsError;
use crate::gear::{derive_keyed_table, GearTable, GEAR};
use crate::options::ChunkerOpts;

/// Hand-tuned mask applied below the normal size.
pub const MASK_S: u64 = 0x0003590703530000;

/// Hand-tuned mask applied at and above the normal size.
pub const MASK_L: u64 = 0x0000d90003530000;

const DEFAULT_MIN: usize = 2 * 1024;
const DEFAULT_NORMAL: usize = 8 * 1024;
const DEFAULT_MAX: usize = 64 * 1024;

/// Chunk-size normalization level for the v1.0.0 mask computation.
const NORMAL_LEVEL: u32 = 2;

/// Derives the small and large masks by spreading bits across the word.
///
/// The small mask carries `log2(normal) + level` ones and so matches less
/// often, discouraging cuts before the normal size; the large mask carries
/// `log2(normal) - level` ones and encourages cuts before the maximum.
fn computed_masks(normal_size: usize, level: u32) -> (u64, u64) {
    let bits = normal_size.ilog2();
    (spaced_mask(bits + level), spaced_mask(bits - level))
}

/// FastCDC cutpoint search over a gear rolling hash.
pub struct FastCdc {
    gear: GearTable,
    mask_s: u64,
    mask_l: u64,
    normal_level: u32,
    keyed: bool,
    legacy: bool,
}

impl FastCdc {
    /// The `fastcdc` flavour: fixed legacy masks.
    pub fn legacy() -> Self {
        Self {
            gear: GEAR,
            mask_s: MASK_S,
            mask_l: MASK_L,
            normal_level: NORMAL_LEVEL,
            keyed: false,
            legacy: true,
        }
    }

    /// The `fastcdc-v1.0.0` flavour: masks computed from the normal size.
    pub fn v1() -> Self {
        Self {
            legacy: false,
            ..Self::legacy()
        }
    }

    /// The `kfastcdc` flavour: legacy masks over a keyed gear table.
    pub fn keyed() -> Self {
        Self {
            keyed: true,
            ..Self::legacy()
        }
    }
}

impl BoundaryAlgorithm for FastCdc {
    fn default_options(&self) -> ChunkerOpts {
        ChunkerOpts::new(DEFAULT_MIN, DEFAULT_NORMAL, DEFAULT_MAX)
    }

    fn validate(&self, opts: &ChunkerOpts) -> Result<(), OptionsError> {
        opts.validate_sizes()?;

        if !self.legacy {
            if !opts.normal_size.is_power_of_two() {
                return Err(OptionsError::NotPowerOfTwo);
            }
            if self.normal_level > 31 || opts.min_size.ilog2() < self.normal_level {
                return Err(OptionsError::NormalLevel);
            }
        }

        if self.keyed && opts.key.is_none() {
            return Err(OptionsError::KeyRequired);
        }

        Ok(())
    }

    fn setup(&mut self, opts: &ChunkerOpts) -> Result<(), OptionsError> {
        let exact_defaults = opts.min_size == DEFAULT_MIN
            && opts.max_size == DEFAULT_MAX
            && opts.normal_size == DEFAULT_NORMAL;

        if self.legacy || exact_defaults {
            self.mask_s = MASK_S;
            self.mask_l = MASK_L;
        } else {
            (self.mask_s, self.mask_l) = computed_masks(opts.normal_size, self.normal_level);
        }

        match &opts.key {
            None if self.keyed => return Err(OptionsError::KeyRequired),
            None => self.gear = GEAR,
            Some(key) => self.gear = derive_keyed_table(key)?,
        }

        Ok(())
    }

    fn cutpoint(&self, opts: &ChunkerOpts, data: &[u8], n: usize) -> usize {
        let min_size = opts.min_size;
        let mut normal_size = opts.normal_size;
        let mut n = n;

        if n <= min_size {
            return n;
        }
        if n >= opts.max_size {
            n = opts.max_size;
        } else if n <= normal_size {
            normal_size = n;
        }

        let mut fp = 0u64;
        let mut mask = self.mask_s;
        for i in min_size..n {
            if i == normal_size {
                mask = self.mask_l;
            }
            fp = (fp << 1).wrapping_add(self.gear[data[i] as usize]);
            if fp & mask == 0 {
                return i;
            }
        }
        n
    }
}
