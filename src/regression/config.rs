// Configuration for change-point based regression flagging
//
// Loaded from a `breakout.toml` (every key optional) or built from presets.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Which way a metric improves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricDirection {
    /// Timings, memory, binary size
    #[default]
    LowerIsBetter,
    /// Throughput, operations per second
    HigherIsBetter,
}

impl MetricDirection {
    /// Whether moving from `before` to `after` made the metric worse
    pub fn is_worse(self, before: f32, after: f32) -> bool {
        match self {
            MetricDirection::LowerIsBetter => after > before,
            MetricDirection::HigherIsBetter => after < before,
        }
    }

    /// Whether moving from `before` to `after` made the metric better
    pub fn is_better(self, before: f32, after: f32) -> bool {
        match self {
            MetricDirection::LowerIsBetter => after < before,
            MetricDirection::HigherIsBetter => after > before,
        }
    }
}

/// Largest accepted `min_segment`
///
/// A scan over `n` runs costs O(n^3), so histories this long are already
/// far beyond what can be assessed.
pub const MAX_MIN_SEGMENT: usize = 1 << 20;

/// Configuration for regression flagging over benchmark histories
///
/// # Example
/// ```
/// use breakout::regression::RegressionConfig;
///
/// let config = RegressionConfig::default();
/// assert_eq!(config.min_segment, 5);
/// assert_eq!(config.min_history(), 11);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressionConfig {
    /// Minimum number of runs on each side of a change point
    ///
    /// This is the EDM `delta`. A history needs `2 * min_segment + 1` runs
    /// before it can be assessed.
    ///
    /// Default: 5
    pub min_segment: usize,

    /// Statistical significance level (alpha) for the before/after t-test
    ///
    /// - 0.05 (default): 95% confidence level
    /// - 0.01: stricter (fewer false positives, more false negatives)
    /// - 0.10: looser (more false positives, fewer false negatives)
    pub significance_level: f64,

    /// Skip histories whose baseline regime is too noisy to judge
    ///
    /// Default: true
    pub enable_noise_filtering: bool,

    /// Coefficient of variation (std_dev / mean) above which the baseline
    /// regime counts as noisy
    ///
    /// Default: 0.5
    pub noise_threshold: f64,

    /// Whether larger values are improvements or regressions
    pub direction: MetricDirection,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            min_segment: 5,
            significance_level: 0.05,
            enable_noise_filtering: true,
            noise_threshold: 0.5,
            direction: MetricDirection::LowerIsBetter,
        }
    }
}

impl RegressionConfig {
    /// Create a strict configuration (fewer false positives, more false negatives)
    pub fn strict() -> Self {
        Self {
            min_segment: 10,
            significance_level: 0.01,
            enable_noise_filtering: true,
            noise_threshold: 0.3,
            direction: MetricDirection::LowerIsBetter,
        }
    }

    /// Create a permissive configuration (more false positives, fewer false negatives)
    pub fn permissive() -> Self {
        Self {
            min_segment: 3,
            significance_level: 0.10,
            enable_noise_filtering: true,
            noise_threshold: 1.0,
            direction: MetricDirection::LowerIsBetter,
        }
    }

    /// Shortest history that can be assessed
    pub fn min_history(&self) -> usize {
        self.min_segment.saturating_mul(2).saturating_add(1)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.significance_level) {
            return Err(format!(
                "significance_level must be in [0, 1], got {}",
                self.significance_level
            ));
        }

        if self.min_segment < 2 {
            return Err(format!(
                "min_segment must be >= 2 for t-test, got {}",
                self.min_segment
            ));
        }

        if self.min_segment > MAX_MIN_SEGMENT {
            return Err(format!(
                "min_segment must be <= {}, got {}",
                MAX_MIN_SEGMENT, self.min_segment
            ));
        }

        if self.noise_threshold < 0.0 {
            return Err(format!(
                "noise_threshold must be non-negative, got {}",
                self.noise_threshold
            ));
        }

        Ok(())
    }
}
