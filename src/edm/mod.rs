// Change-point detection with E-Divisive with Medians (EDM)
//
// Finds the single most likely point at which a benchmark history shifts
// distribution. Medians of pairwise differences are approximated with a
// fixed-depth interval tree, so a whole scan runs with bounded memory and
// O(depth) work per tree update.
//
// Scientific Foundation:
// [1] James, N. A., Kejariwal, A., & Matteson, D. S. (2016). Leveraging
//     cloud data to mitigate user experience from "breaking bad". IEEE
//     BigData. E-Divisive with Medians for robust breakout detection.
//
// [2] Matteson, D. S., & James, N. A. (2014). A nonparametric approach for
//     multiple change point analysis of multivariate data. JASA.

mod detector;
mod error;
mod interval_tree;

pub use detector::{
    detect, detect_change_point, detect_change_point_int, resolution_for,
    try_detect_change_point, try_detect_change_point_int, ChangePoint, MIN_RESOLUTION,
};
pub use error::EdmError;
pub use interval_tree::IntervalTree;

#[cfg(test)]
mod tests;
