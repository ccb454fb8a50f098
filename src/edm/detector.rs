// E-Divisive with Medians (EDM) single change-point search
//
// For a split `tau` and a right boundary `tau2` the scan keeps three
// approximate-median trees over pairwise absolute differences:
//
//   ta  - pairs inside the left window   [0, tau)
//   tb  - pairs inside the right window  [tau, tau2)
//   tab - cross pairs  [0, tau) x [tau, tau2)
//
// and scores the split with
//
//   stat = (2 * med(tab)^2 - med(ta)^2 - med(tb)^2) * tau * (tau2 - tau) / tau2
//
// `tau2` sweeps from `tau + delta` to the end of the series and back again,
// alternating direction every time `tau` advances, so the trees are only ever
// patched at the window boundaries instead of being rebuilt.

use serde::{Deserialize, Serialize};

use crate::edm::error::{EdmError, Result};
use crate::edm::interval_tree::IntervalTree;

/// Lowest tree depth used by the scan
pub const MIN_RESOLUTION: usize = 10;

/// Most likely change point of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangePoint {
    /// First index of the segment after the change
    pub index: usize,
    /// Divergence statistic at `index` (larger = stronger shift)
    pub statistic: f64,
}

/// Tree depth for a series of `len` samples: `max(10, ceil(log2(len)))`
pub fn resolution_for(len: usize) -> usize {
    let bits = (len as f64).log2().ceil();
    if bits > MIN_RESOLUTION as f64 {
        bits as usize
    } else {
        MIN_RESOLUTION
    }
}

/// Min-max scale `z` into `[0, 1]` in place
///
/// A constant series divides by zero and yields NaN samples.
pub(crate) fn normalize(z: &mut [f64]) {
    if z.is_empty() {
        return;
    }

    let (min, max) = z
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;

    for v in z.iter_mut() {
        *v = (*v - min) / range;
    }
}

/// Scan state for one detection call
#[derive(Debug, Clone)]
pub(crate) struct EdmScan {
    z: Vec<f64>,
    delta: usize,
    tau: usize,
    tau2: usize,
    ta: IntervalTree,
    tb: IntervalTree,
    tab: IntervalTree,
    best_stat: f64,
    best_idx: Option<usize>,
}

impl EdmScan {
    /// Normalize a private copy of `series` and seed the trees at
    /// `tau = delta`, `tau2 = 2 * delta`
    pub(crate) fn new(series: &[f64], delta: usize) -> Self {
        let mut z = series.to_vec();
        normalize(&mut z);

        let depth = resolution_for(z.len());
        let mut ta = IntervalTree::new(depth);
        let mut tb = IntervalTree::new(depth);
        let mut tab = IntervalTree::new(depth);

        let tau = delta;
        let tau2 = 2 * delta;

        for i in 0..tau {
            for j in (i + 1)..tau {
                ta.insert((z[j] - z[i]).abs());
            }
        }
        for i in tau..tau2 {
            for j in (i + 1)..tau2 {
                tb.insert((z[j] - z[i]).abs());
            }
        }
        for i in 0..tau {
            for j in tau..tau2 {
                tab.insert((z[j] - z[i]).abs());
            }
        }

        Self {
            z,
            delta,
            tau,
            tau2,
            ta,
            tb,
            tab,
            best_stat: f64::NEG_INFINITY,
            best_idx: None,
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.ta.depth()
    }

    /// Run the full alternating sweep and return the best split
    pub(crate) fn calc(mut self) -> Option<ChangePoint> {
        let n = self.z.len();

        self.record();
        self.sweep_forward();

        let mut backward = true;
        while self.tau + 1 < n - self.delta {
            if backward {
                self.backward_update();
                self.sweep_backward();
            } else {
                self.forward_update();
                self.sweep_forward();
            }
            backward = !backward;
        }

        self.best_idx.map(|index| ChangePoint {
            index,
            statistic: self.best_stat,
        })
    }

    fn stat(&self) -> f64 {
        let a = self.ta.median();
        let b = self.tb.median();
        let ab = self.tab.median();
        let tau = self.tau as f64;
        let tau2 = self.tau2 as f64;

        (2.0 * ab * ab - a * a - b * b) * tau * (tau2 - tau) / tau2
    }

    fn record(&mut self) {
        let stat = self.stat();
        if stat > self.best_stat {
            self.best_stat = stat;
            self.best_idx = Some(self.tau);
        }
    }

    /// Grow the right window by `z[tau2]`
    fn push_right(&mut self) {
        let t = self.tau2;
        let x = self.z[t];
        for j in self.tau..t {
            self.tb.insert((x - self.z[j]).abs());
        }
        for i in 0..self.tau {
            self.tab.insert((x - self.z[i]).abs());
        }
        self.tau2 += 1;
    }

    /// Shrink the right window by its last sample
    fn pop_right(&mut self) {
        self.tau2 -= 1;
        let t = self.tau2;
        let x = self.z[t];
        for j in self.tau..t {
            self.tb.remove((x - self.z[j]).abs());
        }
        for i in 0..self.tau {
            self.tab.remove((x - self.z[i]).abs());
        }
    }

    /// Move `z[tau]` from the right window into the left one
    fn advance_tau(&mut self) {
        let s = self.tau;
        let x = self.z[s];
        for i in 0..s {
            let d = (x - self.z[i]).abs();
            self.tab.remove(d);
            self.ta.insert(d);
        }
        for j in (s + 1)..self.tau2 {
            let d = (x - self.z[j]).abs();
            self.tb.remove(d);
            self.tab.insert(d);
        }
        self.tau += 1;
    }

    // Entered with tau2 == tau + delta, at the end of a backward sweep.
    fn forward_update(&mut self) {
        self.advance_tau();
        self.push_right();
        self.record();
    }

    // Entered with tau2 == len, at the end of a forward sweep.
    fn backward_update(&mut self) {
        self.advance_tau();
        self.record();
    }

    fn sweep_forward(&mut self) {
        while self.tau2 < self.z.len() {
            self.push_right();
            self.record();
        }
    }

    fn sweep_backward(&mut self) {
        while self.tau2 > self.tau + self.delta {
            self.pop_right();
            self.record();
        }
    }
}

/// Locate the most likely change point and its statistic
///
/// Contract: `series.len() >= 2 * delta + 1` and the series is not
/// constant. Shorter series panic on indexing; a constant series returns a
/// meaningless location. Use [`try_detect_change_point`] for validated input.
pub fn detect(series: &[f64], delta: usize) -> Option<ChangePoint> {
    let scan = EdmScan::new(series, delta);
    tracing::debug!(
        len = series.len(),
        delta,
        depth = scan.depth(),
        "starting EDM scan"
    );

    let best = scan.calc();
    if let Some(cp) = &best {
        tracing::debug!(index = cp.index, statistic = cp.statistic, "EDM scan finished");
    }
    best
}

/// Index of the most likely change point in `series`
///
/// `None` when no split produced a statistic above negative infinity.
/// The caller's slice is never modified.
///
/// # Example
/// ```
/// use breakout::edm::detect_change_point;
///
/// let mut series = vec![0.0; 20];
/// series.extend(vec![10.0; 20]);
/// assert_eq!(detect_change_point(&series, 5), Some(20));
/// ```
pub fn detect_change_point(series: &[f64], delta: usize) -> Option<usize> {
    detect(series, delta).map(|cp| cp.index)
}

/// [`detect_change_point`] for integer samples
pub fn detect_change_point_int(series: &[i64], delta: usize) -> Option<usize> {
    let series: Vec<f64> = series.iter().map(|&v| v as f64).collect();
    detect_change_point(&series, delta)
}

/// Validate the caller contract, then run [`detect`]
pub fn try_detect_change_point(series: &[f64], delta: usize) -> Result<ChangePoint> {
    if delta == 0 {
        return Err(EdmError::InvalidDelta(delta));
    }
    let needed = delta.checked_mul(2).and_then(|d| d.checked_add(1));
    if needed.map_or(true, |needed| series.len() < needed) {
        return Err(EdmError::SeriesTooShort {
            len: series.len(),
            delta,
        });
    }
    if let Some(index) = series.iter().position(|v| !v.is_finite()) {
        return Err(EdmError::NonFiniteSample { index });
    }

    let (min, max) = series
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;
    if range == 0.0 {
        return Err(EdmError::ConstantSeries { value: series[0] });
    }
    if !range.is_finite() {
        return Err(EdmError::RangeOverflow { min, max });
    }

    detect(series, delta).ok_or(EdmError::NoFiniteStatistic)
}

/// [`try_detect_change_point`] for integer samples
pub fn try_detect_change_point_int(series: &[i64], delta: usize) -> Result<ChangePoint> {
    let series: Vec<f64> = series.iter().map(|&v| v as f64).collect();
    try_detect_change_point(&series, delta)
}
