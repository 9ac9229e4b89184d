//! Statistical functions over plain value slices.
//!
//! Every function works on the non-missing values of one column and returns
//! `None` where the statistic is undefined for the sample, instead of
//! producing NaN or panicking.

/// Multiplier of the IQR used for the outlier fences.
pub const IQR_FENCE: f64 = 1.5;

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sum of squared deviations from the mean.
fn sum_sq_dev(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|v| (v - mean).powi(2)).sum()
}

/// Sample standard deviation (n - 1). Undefined for fewer than 2 values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    Some((sum_sq_dev(values, m) / (values.len() as f64 - 1.0)).sqrt())
}

/// Population standard deviation (n). Undefined for an empty sample.
pub fn population_std(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    Some((sum_sq_dev(values, m) / values.len() as f64).sqrt())
}

/// Quantile of sorted values by linear interpolation between order statistics.
///
/// The position of quantile `q` is `q * (n - 1)`; between two order
/// statistics the value is interpolated linearly. This is the inclusive
/// definition used for every quartile in the crate.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() as f64 - 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    let weight = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Median of unsorted values.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    crate::utils::sort_floats(&mut sorted);
    quantile_sorted(&sorted, 0.5)
}

/// Outlier fences `[Q1 - 1.5 * IQR, Q3 + 1.5 * IQR]` of sorted values.
pub fn iqr_fences(sorted: &[f64]) -> Option<(f64, f64)> {
    let q1 = quantile_sorted(sorted, 0.25)?;
    let q3 = quantile_sorted(sorted, 0.75)?;
    let iqr = q3 - q1;
    Some((q1 - IQR_FENCE * iqr, q3 + IQR_FENCE * iqr))
}

/// Count values strictly outside the IQR fences of sorted values.
pub fn count_iqr_outliers(sorted: &[f64]) -> Option<usize> {
    let (lower, upper) = iqr_fences(sorted)?;
    Some(sorted.iter().filter(|v| **v < lower || **v > upper).count())
}

/// Adjusted Fisher-Pearson skewness (G1).
///
/// Undefined for fewer than 3 values or a constant sample.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len() as f64;
    if values.len() < 3 {
        return None;
    }
    let m = mean(values)?;
    let m2: f64 = sum_sq_dev(values, m);
    if m2 == 0.0 {
        return None;
    }
    let m3: f64 = values.iter().map(|v| (v - m).powi(3)).sum();

    Some(n * (n - 1.0).sqrt() / (n - 2.0) * (m3 / m2.powf(1.5)))
}

/// Adjusted excess kurtosis (G2).
///
/// Undefined for fewer than 4 values or a constant sample.
pub fn kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len() as f64;
    if values.len() < 4 {
        return None;
    }
    let m = mean(values)?;
    let m2: f64 = sum_sq_dev(values, m);
    if m2 == 0.0 {
        return None;
    }
    let m4: f64 = values.iter().map(|v| (v - m).powi(4)).sum();

    let numerator = n * (n + 1.0) * (n - 1.0) * m4;
    let denominator = (n - 2.0) * (n - 3.0) * m2.powi(2);
    let adjustment = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));

    Some(numerator / denominator - adjustment)
}

/// Pearson correlation of two equally long samples.
///
/// Undefined for fewer than 2 pairs or when either side is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let mx = mean(x)?;
    let my = mean(y)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return None;
    }
    Some((cov / denom).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // ==================== std tests ====================

    #[test]
    fn test_sample_std_basic() {
        // Mean = 3, Variance = 10 / 4 = 2.5
        let std = sample_std(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!(approx(std, 2.5f64.sqrt()));
    }

    #[test]
    fn test_sample_std_single_value_is_undefined() {
        assert_eq!(sample_std(&[5.0]), None);
        assert_eq!(sample_std(&[]), None);
    }

    #[test]
    fn test_population_std() {
        // Variance = 10 / 5 = 2
        let std = population_std(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!(approx(std, 2.0f64.sqrt()));
        assert_eq!(population_std(&[7.0]), Some(0.0));
    }

    // ==================== quantile tests ====================

    #[test]
    fn test_quantile_linear_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!(approx(quantile_sorted(&sorted, 0.25).unwrap(), 1.75));
        assert!(approx(quantile_sorted(&sorted, 0.5).unwrap(), 2.5));
        assert!(approx(quantile_sorted(&sorted, 0.75).unwrap(), 3.25));
        assert_eq!(quantile_sorted(&[], 0.5), None);
        assert_eq!(quantile_sorted(&[9.0], 0.25), Some(9.0));
    }

    #[test]
    fn test_median_unsorted() {
        assert_eq!(median(&[10.0, 1.0, 3.0]), Some(3.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    // ==================== outlier tests ====================

    #[test]
    fn test_iqr_outliers_single_extreme() {
        // Q1 = 2.25, Q3 = 4.75, fences = [-1.5, 8.5]
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        assert_eq!(count_iqr_outliers(&values), Some(1));
    }

    #[test]
    fn test_iqr_outliers_constant_column() {
        assert_eq!(count_iqr_outliers(&[5.0, 5.0, 5.0]), Some(0));
    }

    #[test]
    fn test_iqr_outliers_empty_is_undefined() {
        assert_eq!(count_iqr_outliers(&[]), None);
    }

    // ==================== shape tests ====================

    #[test]
    fn test_skewness_symmetric() {
        assert!(approx(skewness(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap(), 0.0));
    }

    #[test]
    fn test_skewness_right_tail() {
        // Long tail on the right: G1 = sqrt(5) for this sample
        let skew = skewness(&[1.0, 1.0, 1.0, 1.0, 10.0]).unwrap();
        assert!((skew - 5f64.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_skewness_undefined_cases() {
        assert_eq!(skewness(&[1.0, 2.0]), None);
        assert_eq!(skewness(&[5.0, 5.0, 5.0, 5.0]), None);
    }

    #[test]
    fn test_kurtosis_uniform_steps() {
        assert!(approx(kurtosis(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap(), -1.2));
    }

    #[test]
    fn test_kurtosis_undefined_cases() {
        assert_eq!(kurtosis(&[1.0, 2.0, 3.0]), None);
        assert_eq!(kurtosis(&[2.0, 2.0, 2.0, 2.0]), None);
    }

    // ==================== pearson tests ====================

    #[test]
    fn test_pearson_perfect() {
        let x = [1.0, 2.0, 3.0, 4.0];
        assert!(approx(pearson(&x, &[2.0, 4.0, 6.0, 8.0]).unwrap(), 1.0));
        assert!(approx(pearson(&x, &[4.0, 3.0, 2.0, 1.0]).unwrap(), -1.0));
    }

    #[test]
    fn test_pearson_degenerate() {
        assert_eq!(pearson(&[1.0], &[2.0]), None);
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]), None);
    }
}
