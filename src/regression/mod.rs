// Regression flagging over benchmark histories
//
// A benchmark history is the sequence of one metric (wall time, peak RSS,
// binary size) across successive toolchain revisions. This module locates
// the most likely shift in each history with EDM, then decides whether the
// shift is a statistically significant regression.
//
// Pipeline per history:
// 1. Change-point location via `crate::edm` (min_segment = EDM delta)
// 2. Noise filtering on the regime before the change
// 3. Welch's t-test between the regimes (aprender), medians via
//    aprender's DescriptiveStats, variances via trueno

mod config;
mod noise_filter;
mod statistics;
mod verdict;

pub use config::{MetricDirection, RegressionConfig, MAX_MIN_SEGMENT};
pub use noise_filter::BenchmarkSeries;
pub use statistics::{compare_distributions, median, StatisticalTest};
pub use verdict::{
    assess_history, assess_suite, HistoryAssessment, HistoryVerdict, SuiteAssessment,
};
