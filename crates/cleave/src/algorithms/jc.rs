//! JC boundary detection.
//!
//! JC layers a cheap pre-filter over the gear hash: a sparse jump mask that
//! is a strict subset of the cut mask. A window position matching the jump
//! mask but not the cut mask is statistically unlikely to cut soon, so the
//! scan leaps ahead by a calibrated distance instead of walking byte by
//! byte. The jump length is chosen so the leap does not bias the chunk-size
//! distribution.

use crate::algorithms::{spaced_mask, BoundaryAlgorithm};
use crate::error::OptionsError;
use crate::gear::{derive_keyed_table, GearTable, GEAR};
use crate::options::ChunkerOpts;

/// Hand-tuned cut mask for the legacy flavour.
pub const MASK_C: u64 = 0x590003570000;

/// Hand-tuned jump mask for the legacy flavour.
pub const MASK_J: u64 = 0x590003560000;

const DEFAULT_MIN: usize = 2 * 1024;
const DEFAULT_NORMAL: usize = 8 * 1024;
const DEFAULT_MAX: usize = 64 * 1024;

/// Clears the least-significant set bit, embedding the jump mask in the cut
/// mask so every cut candidate is also a jump candidate.
fn embed_mask(mask_c: u64) -> u64 {
    if mask_c == 0 {
        return 0;
    }
    mask_c & (mask_c - 1)
}

/// JC cutpoint search with jump-ahead on weak matches.
pub struct Jc {
    gear: GearTable,
    mask_c: u64,
    mask_j: u64,
    jump_length: usize,
    legacy: bool,
}

impl Jc {
    /// The `jc` flavour: fixed legacy masks.
    pub fn legacy() -> Self {
        Self {
            gear: GEAR,
            mask_c: MASK_C,
            mask_j: MASK_J,
            jump_length: 0,
            legacy: true,
        }
    }

    /// The `jc-v1.0.0` flavour: masks computed from the normal size.
    pub fn v1() -> Self {
        Self {
            legacy: false,
            ..Self::legacy()
        }
    }
}

impl BoundaryAlgorithm for Jc {
    fn default_options(&self) -> ChunkerOpts {
        ChunkerOpts::new(DEFAULT_MIN, DEFAULT_NORMAL, DEFAULT_MAX)
    }

    fn validate(&self, opts: &ChunkerOpts) -> Result<(), OptionsError> {
        opts.validate_sizes()
    }

    fn setup(&mut self, opts: &ChunkerOpts) -> Result<(), OptionsError> {
        let bits = opts.normal_size.ilog2();
        let c_ones = bits - 1;
        let j_ones = c_ones - 1;
        let numerator = 1usize << (c_ones + j_ones);
        let denominator = (1usize << c_ones) - (1usize << j_ones);
        self.jump_length = numerator / denominator;

        let exact_defaults = opts.min_size == DEFAULT_MIN
            && opts.max_size == DEFAULT_MAX
            && opts.normal_size == DEFAULT_NORMAL;

        if self.legacy || exact_defaults {
            self.mask_c = MASK_C;
            self.mask_j = MASK_J;
        } else {
            self.mask_c = spaced_mask(c_ones);
            self.mask_j = embed_mask(self.mask_c);
        }

        self.gear = match &opts.key {
            None => GEAR,
            Some(key) => derive_keyed_table(key)?,
        };

        Ok(())
    }

    fn cutpoint(&self, opts: &ChunkerOpts, data: &[u8], n: usize) -> usize {
        let mut n = n;

        if n <= opts.normal_size {
            return n;
        }
        if n >= opts.max_size {
            n = opts.max_size;
        }

        let mut fp = 0u64;
        let mut i = opts.min_size;

        while i < n {
            fp = (fp << 1).wrapping_add(self.gear[data[i] as usize]);
            if fp & self.mask_j == 0 {
                if fp & self.mask_c == 0 {
                    return i;
                }
                // Weak match: unlikely to cut nearby, leap ahead.
                fp = 0;
                i += self.jump_length;
            } else {
                i += 1;
            }
        }
        i.min(n)
    }
}
