//! Row decomposition of the grid across workers.
//!
//! Worker `rank` of `size` owns rows `[rank * H/size, (rank+1) * H/size)`,
//! with the last worker's upper bound pinned to `H`. Only even splits
//! (`H % size == 0`) are supported; [`check_decomposition`] rejects the
//! rest before any generation runs.

use std::ops::Range;

use crate::error::DecompositionError;
use crate::topology::WorkerTopology;

/// Inclusive lower bound of the rows owned by `rank`.
pub fn lower_bound(height: usize, size: usize, rank: usize) -> usize {
    rank * (height / size)
}

/// Exclusive upper bound of the rows owned by `rank`.
pub fn upper_bound(height: usize, size: usize, rank: usize) -> usize {
    if rank + 1 == size {
        height
    } else {
        (rank + 1) * (height / size)
    }
}

/// Reject grids whose height is not a multiple of the worker count.
pub fn check_decomposition(height: usize, size: usize) -> Result<(), DecompositionError> {
    if size == 0 || height % size != 0 {
        return Err(DecompositionError {
            height,
            workers: size,
        });
    }
    Ok(())
}

/// The contiguous row range `[lower, upper)` a worker owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Partition {
    lower: usize,
    upper: usize,
}

impl Partition {
    /// Compute the partition for `topology` over a grid of `height` rows.
    pub fn for_worker(
        height: usize,
        topology: WorkerTopology,
    ) -> Result<Self, DecompositionError> {
        let size = topology.size();
        check_decomposition(height, size)?;
        Ok(Self {
            lower: lower_bound(height, size, topology.rank()),
            upper: upper_bound(height, size, topology.rank()),
        })
    }

    /// First owned row.
    pub fn lower(&self) -> usize {
        self.lower
    }

    /// One past the last owned row.
    pub fn upper(&self) -> usize {
        self.upper
    }

    /// Number of owned rows.
    pub fn len(&self) -> usize {
        self.upper - self.lower
    }

    /// Always `false` for partitions built by [`Partition::for_worker`].
    pub fn is_empty(&self) -> bool {
        self.lower == self.upper
    }

    /// Owned rows as a range.
    pub fn rows(&self) -> Range<usize> {
        self.lower..self.upper
    }

    /// Whether `row` is owned.
    pub fn contains(&self, row: usize) -> bool {
        self.rows().contains(&row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn topo(rank: usize, size: usize) -> WorkerTopology {
        WorkerTopology::new(rank, size).unwrap()
    }

    #[test]
    fn four_rows_two_workers() {
        let p0 = Partition::for_worker(4, topo(0, 2)).unwrap();
        let p1 = Partition::for_worker(4, topo(1, 2)).unwrap();
        assert_eq!(p0.rows(), 0..2);
        assert_eq!(p1.rows(), 2..4);
    }

    #[test]
    fn single_worker_owns_everything() {
        let p = Partition::for_worker(7, WorkerTopology::solo()).unwrap();
        assert_eq!(p.rows(), 0..7);
        assert_eq!(p.len(), 7);
    }

    #[test]
    fn one_row_per_worker() {
        for rank in 0..8 {
            let p = Partition::for_worker(8, topo(rank, 8)).unwrap();
            assert_eq!(p.rows(), rank..rank + 1);
        }
    }

    #[test]
    fn uneven_split_rejected() {
        assert_eq!(
            Partition::for_worker(10, topo(0, 3)),
            Err(DecompositionError {
                height: 10,
                workers: 3
            })
        );
        assert!(check_decomposition(3, 4).is_err());
        assert!(check_decomposition(8, 0).is_err());
    }

    proptest! {
        #[test]
        fn partitions_tile_the_grid(size in 1usize..16, per_worker in 1usize..16) {
            let height = size * per_worker;
            let mut covered = vec![0u32; height];
            let mut next = 0;
            for rank in 0..size {
                let p = Partition::for_worker(height, topo(rank, size)).unwrap();
                prop_assert_eq!(p.lower(), next);
                prop_assert_eq!(p.len(), per_worker);
                for row in p.rows() {
                    covered[row] += 1;
                }
                next = p.upper();
            }
            prop_assert_eq!(next, height);
            prop_assert!(covered.iter().all(|&c| c == 1));
        }

        #[test]
        fn uneven_heights_always_rejected(size in 2usize..16, height in 1usize..256) {
            prop_assume!(height % size != 0);
            for rank in 0..size {
                prop_assert!(Partition::for_worker(height, topo(rank, size)).is_err());
            }
        }
    }
}
