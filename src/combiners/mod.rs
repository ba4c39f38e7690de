//! Built-in combiners for the profiling pipeline.
//!
//! Every statistic is a [`CombineFn`](crate::CombineFn), and all of them also
//! implement [`LiftableCombiner`](crate::LiftableCombiner) so the runner can
//! build a partition's accumulator from the whole partition at once:
//!
//! - [`TopValues<V>`] -- Top-K over `(value, cumulative count)` observations.
//! - [`MostFrequent<V>`] -- Top-K most frequent raw values.
//! - [`DistinctApprox<T>`] -- approximate distinct count (KMV sketch).
//! - [`Moments`] -- count, sum, mean, variance, standard deviation.
//! - [`ColumnStats`] -- every statistic of one column.
//! - [`RowStats`] -- every statistic of every column of a row.
//!
//! Each combiner documents its accumulator type (`A`) and output type (`O`).
//!
//! # Examples
//! ```
//! use ironprofile::combiners::MostFrequent;
//! use ironprofile::{ExecMode, Runner};
//!
//! let words: Vec<String> = "a b a c b a d".split(' ').map(String::from).collect();
//! let runner = Runner { mode: ExecMode::Sequential, ..Default::default() };
//! let top = runner.combine_globally(words, &MostFrequent::<String>::new(2)?)?;
//! assert_eq!(top[0].value, "a");
//! assert_eq!(top[0].count, 3);
//! assert_eq!(top[1].value, "b");
//! # anyhow::Result::<()>::Ok(())
//! ```

mod column;
mod distinct;
mod statistical;
mod topk;

pub use column::{ColumnAccumulator, ColumnStats, RowStats};
pub use distinct::{DistinctApprox, DistinctSketch};
pub use statistical::{MomentStats, Moments, MomentsAcc};
pub use topk::{FrequencyTable, FrequentValues, MostFrequent, TopValues};
