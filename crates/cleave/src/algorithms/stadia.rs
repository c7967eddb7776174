//! FastCDC variant used by Stadia's content-addressed asset pipeline.
//!
//! Identical to the legacy FastCDC scan, with one addition: each step also
//! compares the fingerprint against a fixed threshold. The threshold is the
//! inverse of the distance between the minimum and normal sizes, so the scan
//! cuts in expectation even on inputs the masks never match.

use crate::algorithms::fastcdc::{MASK_L, MASK_S};
use crate::algorithms::BoundaryAlgorithm;
use crate::error::OptionsError;
use crate::gear::{derive_keyed_table, GearTable, GEAR};
use crate::options::ChunkerOpts;

const DEFAULT_MIN: usize = 2 * 1024;
const DEFAULT_NORMAL: usize = 8 * 1024;
const DEFAULT_MAX: usize = 64 * 1024;

/// FastCDC scan with a probabilistic early-cut fallback.
pub struct FastCdcStadia {
    gear: GearTable,
}

impl FastCdcStadia {
    /// Creates the algorithm with the canonical gear table.
    pub fn new() -> Self {
        Self { gear: GEAR }
    }
}

impl Default for FastCdcStadia {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundaryAlgorithm for FastCdcStadia {
    fn default_options(&self) -> ChunkerOpts {
        ChunkerOpts::new(DEFAULT_MIN, DEFAULT_NORMAL, DEFAULT_MAX)
    }

    fn validate(&self, opts: &ChunkerOpts) -> Result<(), OptionsError> {
        opts.validate_sizes()
    }

    fn setup(&mut self, opts: &ChunkerOpts) -> Result<(), OptionsError> {
        self.gear = match &opts.key {
            None => GEAR,
            Some(key) => derive_keyed_table(key)?,
        };
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

        // One cut expected per (normal - min + 1) bytes of fallback scan.
        let thresh = u64::MAX / (opts.normal_size - min_size + 1) as u64;

        let mut fp = 0u64;
        let mut mask = MASK_S;
        for i in min_size..n {
            if i == normal_size {
                mask = MASK_L;
            }
            fp = (fp << 1).wrapping_add(self.gear[data[i] as usize]);
            if fp & mask == 0 {
                return i;
            }
            if fp <= thresh {
                return i;
            }
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gear::KEY_LEN;

    #[test]
    fn test_default_options() {
        let opts = FastCdcStadia::new().default_options();
        assert_eq!(opts.min_size, 2048);
        assert_eq!(opts.normal_size, 8192);
        assert_eq!(opts.max_size, 65536);
    }

    #[test]
    fn test_cutpoint_short_window_returns_n() {
        let algo = FastCdcStadia::new();
        let opts = algo.default_options();
        let data = vec![0u8; opts.min_size - 128];
        assert_eq!(algo.cutpoint(&opts, &data, data.len()), data.len());
    }

    #[test]
    fn test_cutpoint_within_bounds_on_large_window() {
        let algo = FastCdcStadia::new();
        let opts = algo.default_options();
        let data = vec![0x13u8; opts.max_size * 2];
        let cut = algo.cutpoint(&opts, &data, data.len());
        assert!(cut >= opts.min_size && cut <= opts.max_size, "cut={cut}");
    }

    #[test]
    fn test_threshold_cut_on_first_step() {
        // A minimal min/normal gap maximizes the threshold to half the hash
        // range, so a single gear contribution with a clear top bit cuts on
        // the very first step even though the mask check fails.
        let algo = FastCdcStadia::new();
        let opts = ChunkerOpts::new(64, 65, 4096);
        assert!(algo.validate(&opts).is_ok());

        let mut data = vec![0u8; 192];
        data[64] = 2; // GEAR[2] has a clear top bit and does not match MASK_S
        assert_ne!(GEAR[2] & MASK_S, 0);
        assert!(GEAR[2] <= u64::MAX / 2);
        assert_eq!(algo.cutpoint(&opts, &data, data.len()), 64);
    }

    #[test]
    fn test_zero_window_cuts_at_min_via_mask() {
        // A zero fingerprint matches the mask before the threshold applies.
        let algo = FastCdcStadia::new();
        let opts = algo.default_options();
        let data = vec![0u8; opts.max_size];
        assert_eq!(algo.cutpoint(&opts, &data, data.len()), opts.min_size);
    }

    #[test]
    fn test_keyed_setup_changes_boundaries() {
        let mut keyed = FastCdcStadia::new();
        let opts = ChunkerOpts::new(2048, 8192, 65536).with_key([5u8; KEY_LEN]);
        keyed.setup(&opts).unwrap();
        let plain = FastCdcStadia::new();

        let mut state = 0xDEADBEEFu64;
        let data: Vec<u8> = (0..65536)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                (state >> 33) as u8
            })
            .collect();

        let diverged = (0..8).any(|i| {
            let window = &data[i * 512..];
            plain.cutpoint(&opts, window, window.len())
                != keyed.cutpoint(&opts, window, window.len())
        });
        assert!(diverged);
    }
}
