// Noise filtering for benchmark regimes
//
// Some benchmarks (network-bound database loads, GC-heavy workloads) are
// inherently noisy. When the regime before a change point already varies
// wildly, a "regression" at the change point is indistinguishable from the
// usual jitter, so such histories are reported as noisy instead.

use trueno::Vector;

/// Samples of one benchmark metric, in run order
#[derive(Debug, Clone)]
pub struct BenchmarkSeries {
    pub name: String,
    pub samples: Vec<f64>,
}

impl BenchmarkSeries {
    /// Calculate coefficient of variation (CV = std_dev / mean)
    ///
    /// - CV near 0: very stable (e.g., CV=0.1 means std is 10% of mean)
    /// - CV near 1: highly variable
    ///
    /// # Example
    /// ```ignore
    /// use breakout::regression::BenchmarkSeries;
    ///
    /// let stable = BenchmarkSeries {
    ///     name: "go-build".to_string(),
    ///     samples: vec![10.0, 11.0, 10.0, 12.0, 10.0],
    /// };
    /// assert!(stable.coefficient_of_variation() < 0.2);
    /// ```
    pub fn coefficient_of_variation(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }

        let samples: Vec<f32> = self.samples.iter().map(|&v| v as f32).collect();
        let vec = Vector::from_slice(&samples);

        let Ok(mean) = vec.mean() else {
            return 0.0;
        };
        let Ok(std) = vec.stddev() else {
            return 0.0;
        };

        if mean.abs() < 1e-6 {
            // all samples near zero
            return 0.0;
        }

        std / mean.abs()
    }

    /// Check if this series is "noisy" based on CV threshold
    pub fn is_noisy(&self, threshold: f64) -> bool {
        self.coefficient_of_variation() as f64 > threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(name: &str, samples: &[f64]) -> BenchmarkSeries {
        BenchmarkSeries {
            name: name.to_string(),
            samples: samples.to_vec(),
        }
    }

    #[test]
    fn test_coefficient_of_variation_stable() {
        let cv = series("go-build", &[10.0, 11.0, 10.0, 12.0, 10.0]).coefficient_of_variation();
        assert!(cv < 0.2, "Stable benchmark should have low CV, got {}", cv);
    }

    #[test]
    fn test_coefficient_of_variation_noisy() {
        let cv = series("cockroachdb-kv", &[5.0, 50.0, 3.0, 45.0, 2.0]).coefficient_of_variation();
        assert!(cv > 0.5, "Noisy benchmark should have high CV, got {}", cv);
    }

    #[test]
    fn test_coefficient_of_variation_constant() {
        let cv = series("binary-size", &[100.0, 100.0, 100.0]).coefficient_of_variation();
        assert_eq!(cv, 0.0, "Constant values should have CV=0");
    }

    #[test]
    fn test_coefficient_of_variation_empty() {
        assert_eq!(series("empty", &[]).coefficient_of_variation(), 0.0);
    }

    #[test]
    fn test_is_noisy() {
        assert!(!series("markdown", &[10.0, 11.0, 10.0, 12.0]).is_noisy(0.5));
        assert!(series("etcd-put", &[5.0, 50.0, 3.0]).is_noisy(0.5));
    }
}
