//! Shard distribution for the parallel team search.

use rayon::prelude::*;

use crate::data::roster::RosterEntry;
use crate::optimizer::team_generator::{BacktrackingTeams, Team};
use crate::parallel::pool::WorkerPool;

/// Split `total` items into up to `num_batches` ranges `[start, end)`.
/// Batches are as equal in size as possible; later batches may be smaller.
///
/// # Example
/// ```
/// # use soulbox::parallel::batch_ranges;
/// let ranges = batch_ranges(100, 4);
/// assert_eq!(ranges, vec![(0, 25), (25, 50), (50, 75), (75, 100)]);
/// ```
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let num_batches = num_batches.min(total);
    let base = total / num_batches;
    let remainder = total % num_batches;
    let mut ranges = Vec::with_capacity(num_batches);
    let mut start = 0;
    for i in 0..num_batches {
        let size = base + if i < remainder { 1 } else { 0 };
        let end = start + size;
        ranges.push((start, end));
        start = end;
    }
    ranges
}

/// Shards per worker thread.
pub const SHARDS_PER_THREAD: usize = 4;

/// Run the backtracking search sharded on the first included entry.
///
/// Each shard covers a contiguous range of first-entry positions and shards are
/// concatenated in order, so the result equals the sequential search output.
pub fn run_team_shards<'a>(
    pool: &[&'a RosterEntry],
    size: usize,
    workers: &WorkerPool,
) -> Vec<Team<'a>> {
    if size == 0 || size > pool.len() {
        return Vec::new();
    }
    let roots = pool.len() + 1 - size;
    workers.install(|| {
        let ranges = batch_ranges(roots, rayon::current_num_threads() * SHARDS_PER_THREAD);
        log::debug!("running {} shards over {} first entries", ranges.len(), roots);
        let shards: Vec<Vec<Team<'a>>> = ranges
            .into_par_iter()
            .map(|(start, end)| {
                (start..end)
                    .flat_map(|first| BacktrackingTeams::rooted(pool.to_vec(), size, first))
                    .collect()
            })
            .collect();
        shards.into_iter().flatten().collect()
    })
}
