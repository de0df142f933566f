//! Percentile bucketing of the fare column.
//!
//! Boundaries are read from the sorted fare sequence at index
//! `floor((n - 1) * p / 100)` for each target percentile `p`. Every fare is
//! then counted under the lowest percentile whose boundary is at or above
//! it; fares above the highest boundary land in the highest bucket, so the
//! bucket counts always add up to the number of fares.

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::error::{Result, StoreError};

/// Target percentiles, ascending.
pub const PERCENTILES: [u32; 6] = [25, 50, 75, 90, 95, 99];

/// One percentile bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBucket {
    pub percentile: u32,
    /// Display label, e.g. `"25.00%"`.
    pub label: String,
    /// Fare at the percentile's rank in the sorted sequence.
    pub boundary: f64,
    pub count: u64,
}

/// Fare counts per percentile bucket, in ascending percentile order.
///
/// Serializes as a JSON object mapping each label to its count.
#[derive(Debug, Clone, PartialEq)]
pub struct FareHistogram {
    buckets: Vec<HistogramBucket>,
}

impl FareHistogram {
    pub fn buckets(&self) -> &[HistogramBucket] {
        &self.buckets
    }

    pub fn count(&self, label: &str) -> Option<u64> {
        self.bucket(label).map(|bucket| bucket.count)
    }

    pub fn boundary(&self, label: &str) -> Option<f64> {
        self.bucket(label).map(|bucket| bucket.boundary)
    }

    /// Sum of all bucket counts; equals the number of fares bucketed.
    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|bucket| bucket.count).sum()
    }

    fn bucket(&self, label: &str) -> Option<&HistogramBucket> {
        self.buckets.iter().find(|bucket| bucket.label == label)
    }
}

impl Serialize for FareHistogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for bucket in &self.buckets {
            map.serialize_entry(&bucket.label, &bucket.count)?;
        }
        map.end()
    }
}

/// Formats a percentile as a two-decimal label.
pub fn percentile_label(percentile: u32) -> String {
    format!("{:.2}%", f64::from(percentile))
}

/// Rank of a percentile boundary in a sorted sequence of `len` values, or
/// `None` when the sequence is empty.
pub fn percentile_index(len: usize, percentile: u32) -> Option<usize> {
    let last = len.checked_sub(1)?;
    Some(last * percentile as usize / 100)
}

/// Buckets fares by percentile.
///
/// # Errors
///
/// Returns [`StoreError::EmptyDataset`] when `fares` is empty.
pub fn compute_fare_histogram(fares: &[f64]) -> Result<FareHistogram> {
    let mut sorted = fares.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut buckets = Vec::with_capacity(PERCENTILES.len());
    for percentile in PERCENTILES {
        let idx = percentile_index(sorted.len(), percentile).ok_or(StoreError::EmptyDataset)?;
        buckets.push(HistogramBucket {
            percentile,
            label: percentile_label(percentile),
            boundary: sorted[idx],
            count: 0,
        });
    }

    let highest = buckets.len() - 1;
    for &fare in fares {
        let idx = buckets
            .iter()
            .position(|bucket| fare <= bucket.boundary)
            .unwrap_or(highest);
        buckets[idx].count += 1;
    }

    debug!(fares = fares.len(), "computed fare histogram");
    Ok(FareHistogram { buckets })
}
