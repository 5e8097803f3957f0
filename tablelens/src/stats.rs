//! Descriptive-statistics kernel shared by the analysis passes.
//!
//! All functions operate on slices of finite `f64` values (callers strip
//! nulls and NaNs first) and return `None` whenever the statistic is
//! undefined for the sample size at hand, rather than producing NaN or
//! panicking. Sample statistics use the unbiased (ddof = 1) conventions;
//! skewness and kurtosis use the adjusted estimators so results line up
//! with the usual spreadsheet/statistics-package output.

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance (ddof = 1). `None` for fewer than two values.
pub fn variance(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some(ss / (n as f64 - 1.0))
}

/// Sample standard deviation (ddof = 1). `None` for fewer than two values.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    variance(values).map(f64::sqrt)
}

/// Central moment of the given order, with the biased 1/n denominator.
fn central_moment(values: &[f64], order: i32) -> Option<f64> {
    let m = mean(values)?;
    let n = values.len() as f64;
    Some(values.iter().map(|v| (v - m).powi(order)).sum::<f64>() / n)
}

/// Quantile by linear interpolation over a pre-sorted slice.
///
/// Uses the `pos = q * (n - 1)` convention. `q` must be in `[0, 1]`;
/// returns `None` for an empty slice or an out-of-range `q`.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    let fraction = pos - lower as f64;
    Some(sorted[lower] + fraction * (sorted[upper] - sorted[lower]))
}

/// Sorts a copy of the values and computes a quantile.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, q)
}

/// Adjusted Fisher-Pearson skewness coefficient.
///
/// `None` for fewer than three values or a zero-variance sample.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len() as f64;
    if values.len() < 3 {
        return None;
    }
    let m2 = central_moment(values, 2)?;
    let m3 = central_moment(values, 3)?;
    if m2 == 0.0 {
        return None;
    }
    let g1 = m3 / m2.powf(1.5);
    Some(g1 * (n * (n - 1.0)).sqrt() / (n - 2.0))
}

/// Unbiased excess kurtosis.
///
/// `None` for fewer than four values or a zero-variance sample.
pub fn kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len() as f64;
    if values.len() < 4 {
        return None;
    }
    let m2 = central_moment(values, 2)?;
    let m4 = central_moment(values, 4)?;
    if m2 == 0.0 {
        return None;
    }
    let g2 = m4 / (m2 * m2) - 3.0;
    Some(((n + 1.0) * g2 + 6.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0)))
}

/// Pearson correlation coefficient over paired observations.
///
/// Returns NaN when either side has zero variance, mirroring the behavior
/// of dataframe correlation matrices for constant columns. `None` for
/// fewer than two pairs.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_x2, mut sum_y2, mut sum_xy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for &(x, y) in pairs {
        sum_x += x;
        sum_y += y;
        sum_x2 += x * x;
        sum_y2 += y * y;
        sum_xy += x * y;
    }
    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator =
        ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();
    if denominator == 0.0 {
        return Some(f64::NAN);
    }
    Some(numerator / denominator)
}

/// Mode of the sample: the smallest value among the most frequent ones.
///
/// `None` for an empty slice.
pub fn mode(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut best = sorted[0];
    let mut best_count = 0usize;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        if j - i > best_count {
            best_count = j - i;
            best = sorted[i];
        }
        i = j;
    }
    Some(best)
}

/// Count of distinct values in the sample.
pub fn distinct_count(values: &[f64]) -> u64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    sorted.len() as u64
}

/// Number of values whose absolute z-score exceeds `threshold`.
///
/// Z-scores use the population standard deviation (ddof = 0); a
/// zero-variance sample has no outliers.
pub fn z_score_outlier_count(values: &[f64], threshold: f64) -> u64 {
    let n = values.len();
    if n == 0 {
        return 0;
    }
    let m = values.iter().sum::<f64>() / n as f64;
    let pop_var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / n as f64;
    let pop_std = pop_var.sqrt();
    if pop_std == 0.0 {
        return 0;
    }
    values
        .iter()
        .filter(|v| ((**v - m) / pop_std).abs() > threshold)
        .count() as u64
}

/// Coefficient of variation: sample std over mean, 0 when the mean is zero.
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let s = std_dev(values)?;
    if m == 0.0 {
        return Some(0.0);
    }
    Some(s / m)
}

/// D'Agostino-Pearson K-squared normality test.
///
/// Combines transformed skewness and kurtosis into a statistic that is
/// chi-squared with two degrees of freedom under normality, so the p-value
/// is `exp(-k2 / 2)`. Returns `(k2, p_value)`, or `None` for samples of
/// fewer than 8 values where the transforms are undefined.
pub fn normality_test(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 8 {
        return None;
    }
    let z_s = skew_test_statistic(values)?;
    let z_k = kurtosis_test_statistic(values)?;
    let k2 = z_s * z_s + z_k * z_k;
    let p_value = (-k2 / 2.0).exp();
    Some((k2, p_value))
}

/// Transformed skewness statistic, approximately standard normal under
/// normality (D'Agostino 1970).
fn skew_test_statistic(values: &[f64]) -> Option<f64> {
    let n = values.len() as f64;
    let m2 = central_moment(values, 2)?;
    let m3 = central_moment(values, 3)?;
    if m2 == 0.0 {
        return None;
    }
    let b1 = m3 / m2.powf(1.5);

    let y = b1 * (((n + 1.0) * (n + 3.0)) / (6.0 * (n - 2.0))).sqrt();
    let beta2 = 3.0 * (n * n + 27.0 * n - 70.0) * (n + 1.0) * (n + 3.0)
        / ((n - 2.0) * (n + 5.0) * (n + 7.0) * (n + 9.0));
    let w2 = -1.0 + (2.0 * (beta2 - 1.0)).sqrt();
    let delta = 1.0 / (0.5 * w2.ln()).sqrt();
    let alpha = (2.0 / (w2 - 1.0)).sqrt();
    let y = if y == 0.0 { 1.0 } else { y };
    Some(delta * (y / alpha + ((y / alpha) * (y / alpha) + 1.0).sqrt()).ln())
}

/// Transformed kurtosis statistic, approximately standard normal under
/// normality (Anscombe & Glynn 1983).
fn kurtosis_test_statistic(values: &[f64]) -> Option<f64> {
    let n = values.len() as f64;
    if values.len() < 5 {
        return None;
    }
    let m2 = central_moment(values, 2)?;
    let m4 = central_moment(values, 4)?;
    if m2 == 0.0 {
        return None;
    }
    let b2 = m4 / (m2 * m2);

    let e = 3.0 * (n - 1.0) / (n + 1.0);
    let var_b2 =
        24.0 * n * (n - 2.0) * (n - 3.0) / ((n + 1.0) * (n + 1.0) * (n + 3.0) * (n + 5.0));
    let x = (b2 - e) / var_b2.sqrt();
    let sqrt_beta1 = 6.0 * (n * n - 5.0 * n + 2.0) / ((n + 7.0) * (n + 9.0))
        * ((6.0 * (n + 3.0) * (n + 5.0)) / (n * (n - 2.0) * (n - 3.0))).sqrt();
    let a = 6.0
        + 8.0 / sqrt_beta1
            * (2.0 / sqrt_beta1 + (1.0 + 4.0 / (sqrt_beta1 * sqrt_beta1)).sqrt());
    let term1 = 1.0 - 2.0 / (9.0 * a);
    let denom = 1.0 + x * (2.0 / (a - 4.0)).sqrt();
    if denom == 0.0 {
        return None;
    }
    let term2 = denom.signum() * ((1.0 - 2.0 / a) / denom.abs()).cbrt();
    Some((term1 - term2) / (2.0 / (9.0 * a)).sqrt())
}
