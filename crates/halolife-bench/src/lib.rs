//! Benchmark profiles for halolife.
//!
//! - [`reference_grid`]: 256x256 soup (64K cells)
//! - [`stress_grid`]: 1024x1024 soup (~1M cells)
//!
//! Both heights divide evenly by 1, 2, 4 and 8 workers.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use halolife_core::Grid;
use halolife_test_utils::random_grid;

/// Side length of [`reference_grid`].
pub const REFERENCE_SIDE: usize = 256;

/// Side length of [`stress_grid`].
pub const STRESS_SIDE: usize = 1024;

/// A 256x256 grid with about a third of its cells alive.
pub fn reference_grid(seed: u64) -> Grid {
    random_grid(REFERENCE_SIDE, REFERENCE_SIDE, 33, seed)
}

/// A 1024x1024 grid with about a third of its cells alive.
pub fn stress_grid(seed: u64) -> Grid {
    random_grid(STRESS_SIDE, STRESS_SIDE, 33, seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_are_deterministic() {
        assert_eq!(reference_grid(7), reference_grid(7));
        assert_ne!(reference_grid(7), reference_grid(8));
    }

    #[test]
    fn reference_shape() {
        let g = reference_grid(1);
        assert_eq!((g.height(), g.width()), (REFERENCE_SIDE, REFERENCE_SIDE));
        assert!(g.population() > 0);
    }
}
