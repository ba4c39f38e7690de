//! Combiner traits shared by every statistic in the crate.
//!
//! A combiner describes a statistic as four steps: create an empty
//! accumulator, fold inputs into it, merge two accumulators, and finish into
//! an output. Partition workers run `create`/`add_input` (or the lifted
//! [`LiftableCombiner::build_from_group`]) over their own rows, and the
//! reduce phase folds the resulting accumulators with `merge` in whatever
//! order or tree shape the [`Runner`](crate::Runner) picks.
//!
//! `merge` is fallible because some accumulators carry configuration that
//! must agree across operands (a Top-K capacity, for instance).

use crate::error::ProfileError;
use std::fmt::Debug;
use std::hash::Hash;

/// Bound for values that can be counted, ranked, and shipped between workers.
pub trait ProfileValue: 'static + Send + Sync + Clone + Eq + Hash + Ord + Debug {}
impl<T> ProfileValue for T where T: 'static + Send + Sync + Clone + Eq + Hash + Ord + Debug {}

/// A mergeable aggregation from inputs `V` to an output `O` through accumulator `A`.
pub trait CombineFn<V, A, O>: Send + Sync + 'static {
    /// A fresh, empty accumulator.
    fn create(&self) -> A;

    /// Fold a single input into `acc`.
    fn add_input(&self, acc: &mut A, v: V);

    /// Fold `other` into `acc`.
    ///
    /// # Errors
    /// Returns an error when the two accumulators are incompatible.
    fn merge(&self, acc: &mut A, other: A) -> Result<(), ProfileError>;

    /// Produce the final output.
    fn finish(&self, acc: A) -> O;
}

/// Combiners that can build an accumulator from a whole partition at once.
///
/// The runner uses this on the local path so a combiner can look at every
/// value of its partition before committing anything to the accumulator
/// (the Top-K combiner counts frequencies first, then admits candidates).
pub trait LiftableCombiner<V, A, O>: CombineFn<V, A, O> {
    fn build_from_group(&self, values: &[V]) -> A;
}

/// Number of inputs folded into an accumulator.
#[derive(Clone, Copy, Debug, Default)]
pub struct Count;

impl<V> CombineFn<V, u64, u64> for Count {
    fn create(&self) -> u64 {
        0
    }
    fn add_input(&self, acc: &mut u64, _v: V) {
        *acc += 1;
    }
    fn merge(&self, acc: &mut u64, other: u64) -> Result<(), ProfileError> {
        *acc += other;
        Ok(())
    }
    fn finish(&self, acc: u64) -> u64 {
        acc
    }
}

impl<V> LiftableCombiner<V, u64, u64> for Count {
    fn build_from_group(&self, values: &[V]) -> u64 {
        values.len() as u64
    }
}
