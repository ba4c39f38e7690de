//! Execution of a combiner over a dataset, sequentially or in parallel.
//!
//! Parallel runs split the input into contiguous partitions, build one
//! accumulator per partition on the rayon pool through
//! [`LiftableCombiner::build_from_group`], then reduce the partials with
//! [`fold_tree`] (or [`fold_linear`] when no fanout is set) and finish.

use crate::combine::{CombineFn, LiftableCombiner};
use crate::error::ProfileError;
use crate::reduce::{fold_linear, fold_tree};
use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecMode {
    /// One partition on the calling thread.
    Sequential,
    /// `partitions` chunks on a pool of `threads` workers (rayon's global
    /// pool when `threads` is `None`).
    Parallel {
        threads: Option<usize>,
        partitions: Option<usize>,
    },
}

#[derive(Clone, Debug)]
pub struct Runner {
    pub mode: ExecMode,
    pub default_partitions: usize,
    /// Max partials merged per reduce round; `None` folds them linearly.
    pub fanout: Option<usize>,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            mode: ExecMode::Parallel {
                threads: None,
                partitions: None,
            },
            default_partitions: 2 * num_cpus::get().max(2),
            fanout: None,
        }
    }
}

impl Runner {
    /// Fold every element of `data` into one output with `comb`.
    ///
    /// Empty input produces `comb.finish(comb.create())`.
    ///
    /// # Errors
    /// Fails when the worker pool cannot be built or a merge fails.
    pub fn combine_globally<T, C, A, O>(&self, data: Vec<T>, comb: &C) -> Result<O>
    where
        T: Send + Sync,
        C: LiftableCombiner<T, A, O>,
        A: Send,
    {
        let acc = match self.mode {
            ExecMode::Sequential => {
                debug!(rows = data.len(), "sequential combine");
                comb.build_from_group(&data)
            }
            ExecMode::Parallel {
                threads,
                partitions,
            } => {
                let parts = partitions.unwrap_or(self.default_partitions);
                let chunks = split_vec(data, parts);
                install(threads, || self.reduce_partitions::<T, C, A, O>(chunks, comb))??
            }
        };
        Ok(comb.finish(acc))
    }

    /// Build one partial per partition in parallel and reduce them.
    ///
    /// Used directly when the caller has already partitioned its data.
    ///
    /// # Errors
    /// The first merge error.
    pub fn reduce_partitions<T, C, A, O>(&self, partitions: Vec<Vec<T>>, comb: &C) -> Result<A>
    where
        T: Send + Sync,
        C: LiftableCombiner<T, A, O>,
        A: Send,
    {
        info!(partitions = partitions.len(), "scanning partitions");
        let partials: Vec<A> = partitions
            .into_par_iter()
            .map(|chunk| comb.build_from_group(&chunk))
            .collect();
        self.reduce_partials::<T, C, A, O>(partials, comb)
    }

    /// Reduce already-built partials with this runner's fanout.
    ///
    /// # Errors
    /// The first merge error.
    pub fn reduce_partials<V, C, A, O>(&self, partials: Vec<A>, comb: &C) -> Result<A>
    where
        C: CombineFn<V, A, O>,
        A: Send,
    {
        let n = partials.len();
        let reduced = match self.fanout {
            Some(fanout) => fold_tree::<V, A, O, C>(comb, partials, fanout),
            None => fold_linear::<V, A, O, C>(comb, partials),
        };
        reduced.with_context(|| format!("reduce {n} partials"))
    }
}

/// Run `f` on a dedicated pool of `threads` workers, or directly when unset.
fn install<R, F>(threads: Option<usize>, f: F) -> Result<R>
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    match threads {
        Some(t) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(t)
                .build()
                .map_err(|e| ProfileError::ThreadPool(e.to_string()))?;
            Ok(pool.install(f))
        }
        None => Ok(f()),
    }
}

/// Split `v` into at most `n` contiguous chunks, preserving order.
///
/// Always returns at least one chunk (possibly empty).
#[must_use]
pub fn split_vec<T>(v: Vec<T>, n: usize) -> Vec<Vec<T>> {
    let len = v.len();
    if n <= 1 || len <= 1 {
        return vec![v];
    }
    let chunk = len.div_ceil(n);
    let mut out = Vec::with_capacity(len.div_ceil(chunk));
    let mut it = v.into_iter().peekable();
    while it.peek().is_some() {
        out.push(it.by_ref().take(chunk).collect());
    }
    out
}
