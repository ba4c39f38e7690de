//! Folding partition partials into one accumulator.
//!
//! Both folds only use [`CombineFn::merge`], so any combiner whose merge is
//! associative and commutative gives the same answer from either:
//!
//! - [`fold_linear`] -- left fold in input order.
//! - [`fold_tree`] -- rounds of at most `fanout` partials merged in parallel,
//!   which keeps the critical path at `log_fanout(n)` merges.
//!
//! The Top-K merge is exact under regrouping only while no merge truncates a
//! value that a later partial would have pushed back over the floor; see
//! [`TopKSummary`](crate::topk::TopKSummary).

use crate::combine::CombineFn;
use crate::error::ProfileError;
use rayon::prelude::*;
use tracing::debug;

/// Left-fold `parts` with `comb.merge`. An empty input yields `comb.create()`.
///
/// # Errors
/// The first merge error.
pub fn fold_linear<V, A, O, C>(comb: &C, parts: Vec<A>) -> Result<A, ProfileError>
where
    C: CombineFn<V, A, O>,
{
    let mut it = parts.into_iter();
    let Some(mut acc) = it.next() else {
        return Ok(comb.create());
    };
    for part in it {
        comb.merge(&mut acc, part)?;
    }
    Ok(acc)
}

/// Tree-reduce `parts`, merging at most `fanout` partials per group and
/// running the groups of each round in parallel.
///
/// `fanout` values below 2 are treated as 2.
///
/// # Errors
/// The first merge error of the round that failed.
pub fn fold_tree<V, A, O, C>(comb: &C, mut parts: Vec<A>, fanout: usize) -> Result<A, ProfileError>
where
    C: CombineFn<V, A, O>,
    A: Send,
{
    let fanout = fanout.max(2);
    let mut round = 0usize;
    while parts.len() > 1 {
        round += 1;
        debug!(round, partials = parts.len(), fanout, "reduce round");
        let mut groups: Vec<Vec<A>> = Vec::with_capacity(parts.len().div_ceil(fanout));
        let mut it = parts.into_iter().peekable();
        while it.peek().is_some() {
            groups.push(it.by_ref().take(fanout).collect());
        }
        parts = groups
            .into_par_iter()
            .map(|group| fold_linear(comb, group))
            .collect::<Result<Vec<A>, ProfileError>>()?;
    }
    fold_linear(comb, parts)
}
