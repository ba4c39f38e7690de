//! Bounded Top-K frequency summary and its merge algebra.
//!
//! - [`TopKItem`] -- `(value, count, sequence)` with the ranking order.
//! - [`TopKSummary`] -- at most K items per column; `add`, `merge`, ranked
//!   extraction.
//! - [`Ranked`] / [`RankedEntry`] -- lazy rank-ordered view and its entries.
//! - [`render_ranked`] / [`parse_rendered`] -- delimited text form.
//!
//! # Example
//! ```
//! use ironprofile::topk::TopKSummary;
//!
//! let mut a = TopKSummary::new(3)?;
//! for (v, c) in [("cat", 5), ("dog", 3), ("bird", 1), ("fox", 9)] {
//!     a.add(v, c);
//! }
//! let mut b = TopKSummary::new(3)?;
//! for (v, c) in [("cat", 2), ("dog", 10), ("owl", 4)] {
//!     b.add(v, c);
//! }
//!
//! let merged = a.merge(&b)?;
//! let top: Vec<_> = merged.ranked().map(|e| (*e.value, e.count)).collect();
//! assert_eq!(top, vec![("dog", 13), ("fox", 9), ("cat", 7)]);
//! # Ok::<(), ironprofile::ProfileError>(())
//! ```

mod item;
mod report;
mod summary;

pub use item::TopKItem;
pub use report::{Ranked, RankedEntry, parse_rendered, render_ranked};
pub use summary::TopKSummary;
