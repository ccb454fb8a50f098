// Regression verdicts for benchmark histories
//
// This module integrates:
// - Change-point location (EDM over the whole history)
// - Noise filtering (coefficient of variation of the baseline regime)
// - Statistical testing (Welch's t-test, before vs. after the change)
//
// to decide whether a benchmark's history contains a real regression.

use crate::edm::{try_detect_change_point, ChangePoint, EdmError};
use crate::regression::config::RegressionConfig;
use crate::regression::noise_filter::BenchmarkSeries;
use crate::regression::statistics::{compare_distributions, StatisticalTest};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;

/// Verdict for a single benchmark history
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistoryVerdict {
    /// No statistically significant shift at the most likely change point
    NoChange,

    /// The metric got significantly worse starting at `change_index`
    Regression { change_index: usize },

    /// The metric got significantly better starting at `change_index`
    Improvement { change_index: usize },

    /// Baseline regime too variable to judge the change
    Noisy { coefficient_of_variation: f32 },

    /// Not enough data to make statistical determination
    InsufficientData { reason: String },
}

/// Detailed assessment of one benchmark history
#[derive(Debug, Clone, Serialize)]
pub struct HistoryAssessment {
    /// Benchmark / metric name
    pub name: String,

    /// Number of runs in the history
    pub samples: usize,

    /// Final verdict
    pub verdict: HistoryVerdict,

    /// Most likely change point, when the scan ran
    pub change_point: Option<ChangePoint>,

    /// Before/after comparison, when one was performed
    pub test: Option<StatisticalTest>,
}

impl HistoryAssessment {
    fn new(name: &str, samples: usize, verdict: HistoryVerdict) -> Self {
        Self {
            name: name.to_string(),
            samples,
            verdict,
            change_point: None,
            test: None,
        }
    }

    /// One-line summary used by the suite report
    pub fn summary_line(&self) -> String {
        let detail = match &self.verdict {
            HistoryVerdict::NoChange => "no significant change".to_string(),
            HistoryVerdict::Regression { change_index } => {
                format!("regression at run {}", change_index)
            }
            HistoryVerdict::Improvement { change_index } => {
                format!("improvement at run {}", change_index)
            }
            HistoryVerdict::Noisy {
                coefficient_of_variation,
            } => format!("noisy baseline (cv={:.2})", coefficient_of_variation),
            HistoryVerdict::InsufficientData { reason } => format!("skipped: {}", reason),
        };

        match &self.test {
            Some(test) => format!(
                "{}: {} (p={:.4}, before_median={:.3}, after_median={:.3})",
                self.name, detail, test.pvalue, test.before_median, test.after_median
            ),
            None => format!("{}: {}", self.name, detail),
        }
    }
}

/// Assess one benchmark history for a regression
///
/// # Example
/// ```
/// use breakout::regression::{assess_history, HistoryVerdict, RegressionConfig};
///
/// let history = vec![10.0, 10.2, 9.9, 10.1, 10.0, 10.1, 9.8, 10.2, 10.0, 9.9, 10.1];
/// let assessment = assess_history("go-build", &history, &RegressionConfig::default()).unwrap();
/// assert_eq!(assessment.verdict, HistoryVerdict::NoChange);
/// ```
pub fn assess_history(
    name: &str,
    history: &[f64],
    config: &RegressionConfig,
) -> Result<HistoryAssessment> {
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    if history.len() < config.min_history() {
        return Ok(HistoryAssessment::new(
            name,
            history.len(),
            HistoryVerdict::InsufficientData {
                reason: format!(
                    "{} runs, need at least {} (min_segment={})",
                    history.len(),
                    config.min_history(),
                    config.min_segment
                ),
            },
        ));
    }

    // Step 1: Locate the most likely change point
    let change_point = match try_detect_change_point(history, config.min_segment) {
        Ok(cp) => cp,
        Err(EdmError::ConstantSeries { .. }) => {
            return Ok(HistoryAssessment::new(
                name,
                history.len(),
                HistoryVerdict::NoChange,
            ));
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Change-point detection failed for {}", name))
        }
    };

    let (before, after) = history.split_at(change_point.index);
    let mut assessment = HistoryAssessment::new(name, history.len(), HistoryVerdict::NoChange);
    assessment.change_point = Some(change_point);

    // Step 2: Filter noisy baselines
    let baseline = BenchmarkSeries {
        name: name.to_string(),
        samples: before.to_vec(),
    };
    if config.enable_noise_filtering && baseline.is_noisy(config.noise_threshold) {
        assessment.verdict = HistoryVerdict::Noisy {
            coefficient_of_variation: baseline.coefficient_of_variation(),
        };
        return Ok(assessment);
    }

    // Step 3: Test the shift
    let test = compare_distributions(before, after)
        .with_context(|| format!("Failed to compare segments for {}", name))?;

    assessment.verdict = classify_shift(&test, change_point.index, config);
    assessment.test = Some(test);

    Ok(assessment)
}

/// Verdict for a tested shift: significant and worse is a regression,
/// significant and better an improvement, anything else no change
fn classify_shift(
    test: &StatisticalTest,
    change_index: usize,
    config: &RegressionConfig,
) -> HistoryVerdict {
    let significant = test.pvalue < config.significance_level as f32;
    if !significant {
        return HistoryVerdict::NoChange;
    }

    let (before, after) = (test.before_median, test.after_median);
    if config.direction.is_worse(before, after) {
        HistoryVerdict::Regression { change_index }
    } else if config.direction.is_better(before, after) {
        HistoryVerdict::Improvement { change_index }
    } else {
        HistoryVerdict::NoChange
    }
}

/// Assessment of a whole benchmark suite
#[derive(Debug, Clone, Serialize)]
pub struct SuiteAssessment {
    /// Per-benchmark assessments, sorted by name
    pub benchmarks: Vec<HistoryAssessment>,

    /// Configuration used for assessment
    pub config: RegressionConfig,
}

impl SuiteAssessment {
    /// Names of benchmarks that regressed
    pub fn regressed(&self) -> Vec<&str> {
        self.with_verdict(|v| matches!(v, HistoryVerdict::Regression { .. }))
    }

    /// Names of benchmarks that improved
    pub fn improved(&self) -> Vec<&str> {
        self.with_verdict(|v| matches!(v, HistoryVerdict::Improvement { .. }))
    }

    /// Names of benchmarks skipped as noisy
    pub fn noisy(&self) -> Vec<&str> {
        self.with_verdict(|v| matches!(v, HistoryVerdict::Noisy { .. }))
    }

    /// Whether any benchmark regressed
    pub fn has_regression(&self) -> bool {
        !self.regressed().is_empty()
    }

    fn with_verdict(&self, pred: impl Fn(&HistoryVerdict) -> bool) -> Vec<&str> {
        self.benchmarks
            .iter()
            .filter(|b| pred(&b.verdict))
            .map(|b| b.name.as_str())
            .collect()
    }

    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();
        let regressed = self.regressed();

        if regressed.is_empty() {
            report.push_str("✅ NO REGRESSION DETECTED\n\n");
        } else {
            report.push_str(&format!(
                "❌ REGRESSION DETECTED ({} benchmarks)\n\n",
                regressed.len()
            ));
            report.push_str(&format!("Regressed benchmarks: {}\n", regressed.join(", ")));
        }

        report.push_str(&format!("Benchmarks assessed: {}\n", self.benchmarks.len()));
        report.push_str(&format!(
            "Significance level: {} ({}% confidence)\n",
            self.config.significance_level,
            (1.0 - self.config.significance_level) * 100.0
        ));
        report.push_str(&format!("Minimum segment: {} runs\n", self.config.min_segment));

        let improved = self.improved();
        if !improved.is_empty() {
            report.push_str(&format!("\n📈 Improved benchmarks ({}):\n", improved.len()));
            for name in improved {
                report.push_str(&format!("  - {}\n", name));
            }
        }

        let noisy = self.noisy();
        if !noisy.is_empty() {
            report.push_str(&format!("\n🔇 Noisy benchmarks ({}):\n", noisy.len()));
            for name in noisy {
                report.push_str(&format!("  - {}\n", name));
            }
        }

        if !self.benchmarks.is_empty() {
            report.push_str("\n📊 Change Points:\n");
            for benchmark in &self.benchmarks {
                report.push_str(&format!("  {}\n", benchmark.summary_line()));
            }
        }

        report
    }
}

/// Assess every history of a suite
///
/// Histories that fail to assess are logged and reported as
/// `InsufficientData` rather than aborting the whole suite.
pub fn assess_suite(
    histories: &HashMap<String, Vec<f64>>,
    config: &RegressionConfig,
) -> Result<SuiteAssessment> {
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let mut names: Vec<&String> = histories.keys().collect();
    names.sort();

    let mut benchmarks = Vec::with_capacity(names.len());
    for name in names {
        let history = &histories[name];
        match assess_history(name, history, config) {
            Ok(assessment) => benchmarks.push(assessment),
            Err(e) => {
                tracing::warn!("Failed to assess history for {}: {:#}", name, e);
                benchmarks.push(HistoryAssessment::new(
                    name,
                    history.len(),
                    HistoryVerdict::InsufficientData {
                        reason: format!("{:#}", e),
                    },
                ));
            }
        }
    }

    Ok(SuiteAssessment {
        benchmarks,
        config: config.clone(),
    })
}
