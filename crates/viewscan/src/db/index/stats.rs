use crate::value::CompositeValue;
use std::cmp::Ordering;

///
/// RangeStatistics
///
/// Summary of the keys inside one range, with optional equal-width
/// sub-range bins (by row count) for finer selectivity estimates.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RangeStatistics {
    pub count: u64,
    pub distinct_count: u64,
    pub min: Option<CompositeValue>,
    pub max: Option<CompositeValue>,
    pub bins: Vec<Self>,
}

impl RangeStatistics {
    /// Summarize keys already in view order.
    ///
    /// Distinct keys are counted as adjacent changes, so the count is exact
    /// for ordered input. Bins split the keys into `bins` contiguous chunks;
    /// a run of equal keys may straddle two bins.
    #[must_use]
    pub fn from_ordered_keys(keys: &[CompositeValue], bins: usize) -> Self {
        let mut accumulator = StatsAccumulator::new(keys.len() as u64, bins);
        for key in keys {
            accumulator.push(key);
        }

        accumulator.finish()
    }

    // Fold one key that sorts at or after every key seen so far.
    fn observe(&mut self, key: &CompositeValue) {
        let repeated = self
            .max
            .as_ref()
            .is_some_and(|max| max.collate(key) == Ordering::Equal);

        self.count += 1;
        if !repeated {
            self.distinct_count += 1;
        }
        if self.min.is_none() {
            self.min = Some(key.clone());
        }
        self.max = Some(key.clone());
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }
}

///
/// StatsAccumulator
///
/// Streaming builder for `RangeStatistics`. Holds only the running totals
/// and the open bin; bins close after `ceil(total / bins)` keys.
///

#[derive(Debug)]
pub(super) struct StatsAccumulator {
    stats: RangeStatistics,
    bin: RangeStatistics,
    bin_size: u64,
}

impl StatsAccumulator {
    /// `total` is the number of keys that will be pushed; binning is off
    /// when it or `bins` is zero.
    pub(super) fn new(total: u64, bins: usize) -> Self {
        let bin_size = if bins > 0 && total > 0 {
            total.div_ceil(bins as u64)
        } else {
            0
        };

        Self {
            stats: RangeStatistics::default(),
            bin: RangeStatistics::default(),
            bin_size,
        }
    }

    pub(super) fn push(&mut self, key: &CompositeValue) {
        self.stats.observe(key);
        if self.bin_size == 0 {
            return;
        }

        self.bin.observe(key);
        if self.bin.count == self.bin_size {
            self.stats.bins.push(std::mem::take(&mut self.bin));
        }
    }

    pub(super) fn finish(mut self) -> RangeStatistics {
        if !self.bin.is_empty() {
            self.stats.bins.push(self.bin);
        }

        self.stats
    }
}

///
/// TESTS
///
