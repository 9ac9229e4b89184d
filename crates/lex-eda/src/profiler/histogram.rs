//! Equal-width binning for the distribution view.

use crate::types::HistogramBin;

/// Bin sorted values into `bins` equal-width bins over `[min, max]`.
///
/// The last bin is closed on the right so the maximum is counted. A constant
/// sample yields a single bin holding every value.
pub fn build_bins(sorted: &[f64], bins: usize) -> Vec<HistogramBin> {
    if sorted.is_empty() {
        return Vec::new();
    }

    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    if (max - min).abs() < f64::EPSILON {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: sorted.len(),
        }];
    }

    let bin_count = bins.max(1);
    let width = (max - min) / bin_count as f64;
    let mut counts = vec![0usize; bin_count];

    for value in sorted {
        let index = (((value - min) / width) as usize).min(bin_count - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(idx, count)| HistogramBin {
            start: min + idx as f64 * width,
            end: if idx + 1 == bin_count {
                max
            } else {
                min + (idx as f64 + 1.0) * width
            },
            count,
        })
        .collect()
}
