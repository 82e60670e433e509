//! Working set selection
//!
//! Each outer iteration picks `min(q, n_train)` indices whose dual
//! variables are most likely to improve the objective. Instances are
//! partitioned by KKT-violation direction and ranked by their gradient
//! value; the set interleaves the worst violators from both partitions
//! and keeps a share of the previously active (non-bound) indices for
//! locality and convergence stability.

/// `i` may still move "up" (increase its signed contribution)
pub fn in_upper_set(i: usize, alpha: &[f64], y: &[f64], c: &[f64]) -> bool {
    (y[i] > 0.0 && alpha[i] < c[i]) || (y[i] < 0.0 && alpha[i] > 0.0)
}

/// `i` may still move "down"
pub fn in_lower_set(i: usize, alpha: &[f64], y: &[f64], c: &[f64]) -> bool {
    (y[i] > 0.0 && alpha[i] > 0.0) || (y[i] < 0.0 && alpha[i] < c[i])
}

pub struct WorkingSetSelector {
    q: usize,
    /// Scratch index ordering reused across iterations
    order: Vec<usize>,
    /// Previous working set, source of retained active indices
    prev: Vec<usize>,
}

impl WorkingSetSelector {
    pub fn new(q: usize, n_train: usize) -> Self {
        Self {
            q: q.min(n_train),
            order: (0..n_train).collect(),
            prev: Vec::new(),
        }
    }

    /// Number of indices produced per call
    pub fn size(&self) -> usize {
        self.q
    }

    /// Select the next working set. Deterministic: candidates are ranked
    /// by a stable sort on (f_i, i), so equal violations resolve to the
    /// lower original index.
    pub fn select(&mut self, f: &[f64], alpha: &[f64], y: &[f64], c: &[f64]) -> Vec<usize> {
        let n = f.len();
        let q = self.q;
        let mut ws = Vec::with_capacity(q);
        let mut taken = vec![false; n];

        // Carry over up to q/2 previously selected indices that are still
        // free (strictly between their bounds), in their previous order.
        // Two slots always stay open so the most violating upper and
        // lower candidates are both seated; the gap reported by the
        // block solve would otherwise understate the true violation.
        let retain_cap = (q / 2).min(q.saturating_sub(2));
        for &i in self.prev.iter() {
            if ws.len() >= retain_cap {
                break;
            }
            if alpha[i] > 0.0 && alpha[i] < c[i] && !taken[i] {
                taken[i] = true;
                ws.push(i);
            }
        }

        // Rank all instances by gradient value; the front of the order
        // holds upper-set violators, the back lower-set violators.
        self.order.sort_by(|&a, &b| {
            f[a].partial_cmp(&f[b])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });

        let mut lo = 0;
        let mut hi = n;
        while ws.len() < q {
            let before = ws.len();
            // most violating upper candidate
            while lo < n {
                let i = self.order[lo];
                lo += 1;
                if !taken[i] && in_upper_set(i, alpha, y, c) {
                    taken[i] = true;
                    ws.push(i);
                    break;
                }
            }
            if ws.len() >= q {
                break;
            }
            // most violating lower candidate
            while hi > 0 {
                hi -= 1;
                let i = self.order[hi];
                if !taken[i] && in_lower_set(i, alpha, y, c) {
                    taken[i] = true;
                    ws.push(i);
                    break;
                }
            }
            if ws.len() == before {
                break;
            }
        }

        // Partitions exhausted (tiny or fully bound problems): top up with
        // the remaining lowest-gradient indices to keep the set full.
        if ws.len() < q {
            for &i in self.order.iter() {
                if ws.len() >= q {
                    break;
                }
                if !taken[i] {
                    taken[i] = true;
                    ws.push(i);
                }
            }
        }

        self.prev = ws.clone();
        ws
    }
}
