//! Restricted QP solve over the working set
//!
//! Models the cooperative group of q workers sharing a fast local buffer:
//! every sub-iteration performs one synchronous reduction to pick the
//! extreme pair, applies the optimal joint update for that pair under the
//! box and equality constraints, and refreshes the local gradients before
//! the next sub-iteration. Pair selection breaks ties toward the lower
//! working-set slot, which keeps the whole solve deterministic.

use crate::solver::working_set::{in_lower_set, in_upper_set};

/// Guard against a vanishing curvature denominator
const ETA_FLOOR: f64 = 1e-12;

/// Outcome of one block solve
#[derive(Debug)]
pub struct BlockResult {
    /// Signed coefficient deltas y_k * (alpha_k_new - alpha_k_old), one
    /// per working-set slot
    pub delta_alpha: Vec<f64>,
    /// Optimality gap observed on the first sub-iteration; this is the
    /// global violation measure because the working set contains the
    /// most violating pair
    pub gap: f64,
    /// Number of pairwise sub-iterations performed
    pub inner_iterations: usize,
}

/// Solve the QP restricted to `ws` and write updated alphas back into the
/// global vector. `tile` is the q*q working-set kernel tile (row-major).
pub fn solve_block(
    ws: &[usize],
    tile: &[f64],
    alpha: &mut [f64],
    f: &[f64],
    y: &[f64],
    c_vec: &[f64],
    tol: f64,
    max_inner_iter: usize,
) -> BlockResult {
    let q = ws.len();
    debug_assert_eq!(tile.len(), q * q);

    // local copies: the cooperative group's shared fast buffer
    let mut a_loc: Vec<f64> = ws.iter().map(|&i| alpha[i]).collect();
    let a_old = a_loc.clone();
    let mut f_loc: Vec<f64> = ws.iter().map(|&i| f[i]).collect();
    let y_loc: Vec<f64> = ws.iter().map(|&i| y[i]).collect();
    let c_loc: Vec<f64> = ws.iter().map(|&i| c_vec[i]).collect();

    let mut gap0 = 0.0;
    let mut iterations = 0;

    while iterations < max_inner_iter {
        // synchronous reduction: min gradient over the upper partition,
        // max gradient over the lower partition
        let mut u: Option<usize> = None;
        let mut l: Option<usize> = None;
        for k in 0..q {
            if in_upper_set(k, &a_loc, &y_loc, &c_loc)
                && u.map_or(true, |b| f_loc[k] < f_loc[b])
            {
                u = Some(k);
            }
            if in_lower_set(k, &a_loc, &y_loc, &c_loc)
                && l.map_or(true, |b| f_loc[k] > f_loc[b])
            {
                l = Some(k);
            }
        }
        let (u, l) = match (u, l) {
            (Some(u), Some(l)) => (u, l),
            _ => break,
        };

        let gap = f_loc[l] - f_loc[u];
        if iterations == 0 {
            gap0 = gap;
        }
        if !(gap > tol) {
            // converged locally, or gap is NaN; either way the caller
            // decides based on the first-iteration gap
            break;
        }

        let eta = tile[u * q + u] + tile[l * q + l] - 2.0 * tile[u * q + l];
        let room_u = if y_loc[u] > 0.0 {
            c_loc[u] - a_loc[u]
        } else {
            a_loc[u]
        };
        let room_l = if y_loc[l] > 0.0 {
            a_loc[l]
        } else {
            c_loc[l] - a_loc[l]
        };
        let t = (gap / eta.max(ETA_FLOOR)).min(room_u).min(room_l);
        if !(t > 0.0) {
            break;
        }

        // joint update; exact bound assignment keeps the box-membership
        // tests in the partition predicates stable
        if t >= room_u {
            a_loc[u] = if y_loc[u] > 0.0 { c_loc[u] } else { 0.0 };
        } else {
            a_loc[u] += y_loc[u] * t;
        }
        if t >= room_l {
            a_loc[l] = if y_loc[l] > 0.0 { 0.0 } else { c_loc[l] };
        } else {
            a_loc[l] -= y_loc[l] * t;
        }

        // refresh local gradients before the next pair selection
        for k in 0..q {
            f_loc[k] += t * (tile[u * q + k] - tile[l * q + k]);
        }
        iterations += 1;
    }

    let mut delta_alpha = vec![0.0; q];
    for k in 0..q {
        delta_alpha[k] = y_loc[k] * (a_loc[k] - a_old[k]);
        alpha[ws[k]] = a_loc[k];
    }

    BlockResult {
        delta_alpha,
        gap: gap0,
        inner_iterations: iterations,
    }
}
