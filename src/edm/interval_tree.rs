// Approximate median over [0, 1] using an implicit interval tree
//
// The tree is a complete binary tree of fixed depth stored as a flat counter
// array: node `i` has children `2i+1` and `2i+2`, the root covers [0, 1] and
// each level halves the interval of its parent. Inserting a value bumps the
// counter of every node on its root-to-leaf path, so the median can be read
// back by descending the tree without keeping the values themselves.
//
// Memory is `2^(depth+1) - 1` counters regardless of how many values are
// inserted. Resolution is `1 / 2^depth`.

/// Counter-only binary tree for approximate medians of values in `[0, 1]`
///
/// Values are routed by magnitude (`|v|`), so the caller is expected to
/// normalize into `[0, 1]` first.
///
/// # Example
/// ```
/// use breakout::edm::IntervalTree;
///
/// let mut tree = IntervalTree::new(2);
/// tree.insert(0.09);
/// assert_eq!(tree.counts(), &[1, 1, 0, 1, 0, 0, 0]);
/// assert_eq!(tree.median(), 0.25);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalTree {
    depth: usize,
    counts: Vec<usize>,
}

impl IntervalTree {
    /// Create an empty tree with `depth` bisection levels below the root
    ///
    /// # Panics
    /// Panics if `2^(depth+1) - 1` counters cannot be addressed.
    pub fn new(depth: usize) -> Self {
        assert!(
            depth + 1 < usize::BITS as usize,
            "interval tree depth {} is too large",
            depth
        );

        Self {
            depth,
            counts: vec![0; (1usize << (depth + 1)) - 1],
        }
    }

    /// Number of bisection levels below the root
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Flat counter array in implicit-tree order (root first)
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Number of values currently held (root counter)
    pub fn num_elements(&self) -> usize {
        self.counts[0]
    }

    /// Add `|value|` to the tree
    pub fn insert(&mut self, value: f64) {
        for node in self.path(value) {
            self.counts[node] += 1;
        }
    }

    /// Remove a previously inserted `|value|`
    ///
    /// Removing a value that was never inserted corrupts the counters.
    pub fn remove(&mut self, value: f64) {
        for node in self.path(value) {
            debug_assert!(self.counts[node] > 0, "removing absent value {}", value);
            self.counts[node] -= 1;
        }
    }

    /// Approximate median of the held values, `0.0` when empty
    ///
    /// Descends towards the element of rank `ceil(n/2)`. When a node holds
    /// exactly the remaining rank the result is interpolated from the weight
    /// of its two halves; otherwise the descent stops at a leaf and the leaf
    /// midpoint is returned.
    pub fn median(&self) -> f64 {
        let total = self.num_elements();
        if total == 0 {
            return 0.0;
        }

        let mut k = total.div_ceil(2);
        let (mut lower, mut upper) = (0.0_f64, 1.0_f64);
        let mut node = 0;

        while 2 * node + 1 < self.counts.len() {
            let left = 2 * node + 1;
            let right = left + 1;
            let mid = (lower + upper) / 2.0;

            if self.counts[node] == k {
                let a = self.counts[left] as f64 / k as f64;
                let b = self.counts[right] as f64 / k as f64;
                let x = (lower + mid) / 2.0;
                let y = (mid + upper) / 2.0;
                return (a * x + b * y) / (a + b);
            }

            if self.counts[left] >= k {
                node = left;
                upper = mid;
            } else {
                k -= self.counts[left];
                node = right;
                lower = mid;
            }
        }

        (lower + upper) / 2.0
    }

    /// Node indices visited by `value`, root to leaf
    fn path(&self, value: f64) -> impl Iterator<Item = usize> {
        let value = value.abs();
        let mut node = 0;
        let mut mid = 0.5;
        let mut inc = 0.25;

        (0..=self.depth).map(move |_| {
            let current = node;
            if value > mid {
                node = 2 * node + 2;
                mid += inc;
            } else {
                node = 2 * node + 1;
                mid -= inc;
            }
            inc /= 2.0;
            current
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_sums_consistent(tree: &IntervalTree) {
        let counts = tree.counts();
        for node in 0..counts.len() {
            let left = 2 * node + 1;
            if left < counts.len() {
                assert_eq!(
                    counts[node],
                    counts[left] + counts[left + 1],
                    "node {} does not equal the sum of its children",
                    node
                );
            }
        }
    }

    #[test]
    fn test_reference_trajectory() {
        let mut tree = IntervalTree::new(2);

        tree.insert(0.09);
        assert_eq!(tree.counts(), &[1, 1, 0, 1, 0, 0, 0]);
        assert_eq!(tree.median(), 0.25);

        tree.insert(0.42);
        assert_eq!(tree.counts(), &[2, 2, 0, 1, 1, 0, 0]);
        assert_eq!(tree.median(), 0.125);

        tree.insert(0.99);
        assert_eq!(tree.counts(), &[3, 2, 1, 1, 1, 0, 1]);
        assert_eq!(tree.median(), 0.25);

        tree.insert(0.36);
        assert_eq!(tree.counts(), &[4, 3, 1, 1, 2, 0, 1]);
        assert_eq!(tree.median(), 0.375);
    }

    #[test]
    fn test_empty_tree() {
        for depth in [0, 1, 5, 10] {
            let tree = IntervalTree::new(depth);
            assert_eq!(tree.num_elements(), 0);
            assert_eq!(tree.median(), 0.0);
            assert_eq!(tree.counts().len(), (1 << (depth + 1)) - 1);
        }
    }

    #[test]
    fn test_depth_zero_tree() {
        let mut tree = IntervalTree::new(0);
        tree.insert(0.7);
        tree.insert(0.1);
        assert_eq!(tree.counts(), &[2]);
        assert_eq!(tree.median(), 0.5);
    }

    #[test]
    fn test_sign_is_ignored() {
        let mut positive = IntervalTree::new(4);
        let mut negative = IntervalTree::new(4);
        positive.insert(0.3);
        negative.insert(-0.3);
        assert_eq!(positive, negative);
    }

    #[test]
    fn test_insert_then_remove_restores_counters() {
        let mut tree = IntervalTree::new(6);
        for v in [0.1, 0.5, 0.51, 0.9, 0.0, 1.0] {
            tree.insert(v);
        }
        let before = tree.clone();

        tree.insert(0.33);
        assert_eq!(tree.num_elements(), before.num_elements() + 1);
        tree.remove(0.33);

        assert_eq!(tree, before);
    }

    #[test]
    fn test_node_sums_after_mixed_operations() {
        let mut tree = IntervalTree::new(5);
        let values = [0.02, 0.98, 0.5, 0.25, 0.75, 0.125, 0.6, 0.61];
        for v in values {
            tree.insert(v);
            assert_sums_consistent(&tree);
        }
        for v in values.iter().step_by(2) {
            tree.remove(*v);
            assert_sums_consistent(&tree);
        }
        assert_eq!(tree.num_elements(), values.len() / 2);
    }

    #[test]
    fn test_extremes_route_to_outer_leaves() {
        let mut tree = IntervalTree::new(3);
        tree.insert(0.0);
        tree.insert(1.0);
        let counts = tree.counts();
        // leaves start at index 7
        assert_eq!(counts[7], 1);
        assert_eq!(counts[14], 1);
    }

    #[test]
    fn test_median_moves_at_most_one_resolution_step_down() {
        // Inserting a value above the current median may still pull the
        // interpolated median down, but never by more than 1 / 2^depth.
        let mut tree = IntervalTree::new(2);
        let resolution = 0.25;
        let mut previous = tree.median();

        for v in [0.09, 0.42, 0.99, 0.36] {
            tree.insert(v);
            let current = tree.median();
            if v >= previous {
                assert!(current >= previous - resolution);
            }
            previous = current;
        }
    }

    #[test]
    fn test_median_of_two_clusters_tracks_majority() {
        let mut tree = IntervalTree::new(10);
        for _ in 0..10 {
            tree.insert(0.0);
        }
        for _ in 0..3 {
            tree.insert(1.0);
        }
        assert!(tree.median() < 0.01);

        for _ in 0..10 {
            tree.insert(1.0);
        }
        assert!(tree.median() > 0.99);
    }

    #[test]
    #[should_panic(expected = "too large")]
    fn test_unaddressable_depth_panics() {
        let _ = IntervalTree::new(usize::BITS as usize);
    }
}
