//! Breakout - change-point detection for benchmark histories
//!
//! This library locates the most likely distribution shift in a series of
//! benchmark results with E-Divisive with Medians (EDM), using an
//! approximate-median interval tree so a scan never stores its pairwise
//! differences. On top of the detector, the regression module decides
//! whether a shift is a significant regression.

pub mod cli;
pub mod edm;
pub mod regression;
pub mod series;

pub use edm::{
    detect_change_point, detect_change_point_int, try_detect_change_point, ChangePoint,
    EdmError, IntervalTree,
};
