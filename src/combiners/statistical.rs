//! Statistical combiners: `Moments`

use crate::combine::{CombineFn, LiftableCombiner};
use crate::error::ProfileError;
use serde::{Deserialize, Serialize};

/* ===================== MomentsAcc ===================== */

/// Running count, sum, mean and sum of squared deviations.
///
/// Single values use Welford's update; partials combine with Chan's
/// parallel formula, so the result does not depend on how rows were
/// partitioned beyond floating-point rounding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MomentsAcc {
    count: u64,
    sum: f64,
    mean: f64,
    m2: f64,
}

impl MomentsAcc {
    #[allow(clippy::cast_precision_loss)]
    pub fn push(&mut self, x: f64) {
        self.count += 1;
        self.sum += x;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn merge(&mut self, other: &Self) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }
        let (na, nb) = (self.count as f64, other.count as f64);
        let n = na + nb;
        let delta = other.mean - self.mean;
        self.mean += delta * nb / n;
        self.m2 += other.m2 + delta * delta * na * nb / n;
        self.sum += other.sum;
        self.count += other.count;
    }

    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Summary statistics, or `None` when nothing was pushed.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> Option<MomentStats> {
        if self.count == 0 {
            return None;
        }
        let variance = self.m2 / self.count as f64;
        Some(MomentStats {
            count: self.count,
            sum: self.sum,
            mean: self.mean,
            variance,
            stddev: variance.sqrt(),
        })
    }
}

/// Finished numeric statistics. `variance` is the population variance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MomentStats {
    pub count: u64,
    pub sum: f64,
    pub mean: f64,
    pub variance: f64,
    pub stddev: f64,
}

/* ===================== Moments ===================== */

/// Count, sum, mean, variance and standard deviation of `f64` inputs.
///
/// - Accumulator: [`MomentsAcc`]
/// - Output: `Option<MomentStats>` (`None` for empty input)
#[derive(Clone, Copy, Debug, Default)]
pub struct Moments;

impl CombineFn<f64, MomentsAcc, Option<MomentStats>> for Moments {
    fn create(&self) -> MomentsAcc {
        MomentsAcc::default()
    }

    fn add_input(&self, acc: &mut MomentsAcc, v: f64) {
        acc.push(v);
    }

    fn merge(&self, acc: &mut MomentsAcc, other: MomentsAcc) -> Result<(), ProfileError> {
        acc.merge(&other);
        Ok(())
    }

    fn finish(&self, acc: MomentsAcc) -> Option<MomentStats> {
        acc.stats()
    }
}

impl LiftableCombiner<f64, MomentsAcc, Option<MomentStats>> for Moments {
    fn build_from_group(&self, values: &[f64]) -> MomentsAcc {
        let mut acc = MomentsAcc::default();
        for &v in values {
            acc.push(v);
        }
        acc
    }
}
