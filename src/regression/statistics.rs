// Before/after segment comparison using aprender
//
// Once the EDM scan has split a history at its most likely change point,
// the two regimes are compared with Welch's t-test to decide whether the
// shift is real or just the largest wobble in a noisy series.
//
// - Uses aprender's t-tests (parametric) with unequal variances
// - Uses trueno::Vector for SIMD-optimized statistics (variance)
// - Uses aprender::stats::DescriptiveStats for quantiles/median

use anyhow::{Context, Result};
use aprender::stats::DescriptiveStats;
use serde::Serialize;
use trueno::Vector;

/// Result of comparing the samples before and after a change point
#[derive(Debug, Clone, Serialize)]
pub struct StatisticalTest {
    /// t-statistic value
    pub statistic: f32,

    /// p-value (two-tailed) - probability that difference is due to chance
    pub pvalue: f32,

    /// Degrees of freedom
    pub df: f32,

    /// Median of the segment before the change
    pub before_median: f32,

    /// Median of the segment after the change
    pub after_median: f32,

    /// Variance of the segment before the change
    pub before_variance: f32,

    /// Variance of the segment after the change
    pub after_variance: f32,
}

/// Compare two history segments using Welch's independent t-test
///
/// Two segments that are each constant cannot be t-tested (zero variance);
/// they are reported as certainly different when their values differ and
/// certainly equal otherwise.
///
/// # Example
/// ```ignore
/// use breakout::regression::compare_distributions;
///
/// let before = vec![10.0, 12.0, 11.0, 13.0, 10.0];
/// let after = vec![25.0, 27.0, 26.0, 28.0, 25.0];
///
/// let result = compare_distributions(&before, &after).unwrap();
/// assert!(result.pvalue < 0.05);
/// ```
pub fn compare_distributions(before: &[f64], after: &[f64]) -> Result<StatisticalTest> {
    if before.is_empty() || after.is_empty() {
        anyhow::bail!("Cannot compare empty segments");
    }

    if before.len() < 2 || after.len() < 2 {
        anyhow::bail!("Need at least 2 samples per segment for t-test");
    }

    let before: Vec<f32> = before.iter().map(|&v| v as f32).collect();
    let after: Vec<f32> = after.iter().map(|&v| v as f32).collect();

    let before_vec = Vector::from_slice(&before);
    let after_vec = Vector::from_slice(&after);

    let before_median = median(&before_vec)?;
    let after_median = median(&after_vec)?;

    let before_variance = before_vec
        .variance()
        .context("Failed to compute before-segment variance")?;
    let after_variance = after_vec
        .variance()
        .context("Failed to compute after-segment variance")?;

    if before_variance == 0.0 && after_variance == 0.0 {
        let differs = before_median != after_median;
        return Ok(StatisticalTest {
            statistic: if differs { f32::INFINITY } else { 0.0 },
            pvalue: if differs { 0.0 } else { 1.0 },
            df: (before.len() + after.len() - 2) as f32,
            before_median,
            after_median,
            before_variance,
            after_variance,
        });
    }

    let ttest_result = aprender::stats::hypothesis::ttest_ind(&before, &after, false)
        .context("Failed to compute t-test")?;

    Ok(StatisticalTest {
        statistic: ttest_result.statistic,
        pvalue: ttest_result.pvalue,
        df: ttest_result.df,
        before_median,
        after_median,
        before_variance,
        after_variance,
    })
}

/// Calculate median using aprender's DescriptiveStats
pub fn median(vector: &Vector<f32>) -> Result<f32> {
    let stats = DescriptiveStats::new(vector);
    stats
        .quantile(0.5)
        .map_err(|e| anyhow::anyhow!("Failed to compute median: {}", e))
}
