//! First-improvement local search for Max-Cut.

use nalgebra::DMatrix;

/// Total weight of the edges crossing the cut.
pub fn cut_value(weights: &DMatrix<f64>, sides: &[bool]) -> f64 {
    let n = sides.len();
    let mut total = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            if sides[i] != sides[j] {
                total += weights[(i, j)];
            }
        }
    }
    total
}

/// Greedy starting cut. The first value goes left; each following value
/// joins the side opposite to where most of its weight (to the values placed
/// so far) lies, left on ties. Both sides are non-empty when `n >= 2`.
pub fn greedy_partition(weights: &DMatrix<f64>) -> Vec<bool> {
    let n = weights.nrows();
    let mut sides = Vec::with_capacity(n);
    for v in 0..n {
        if v == 0 {
            sides.push(true);
            continue;
        }
        let (mut to_left, mut to_right) = (0.0, 0.0);
        for (u, &left) in sides.iter().enumerate() {
            if left {
                to_left += weights[(u, v)];
            } else {
                to_right += weights[(u, v)];
            }
        }
        sides.push(!(to_left > to_right));
    }
    if n >= 2 && sides.iter().all(|&s| s) {
        sides[n - 1] = false;
    }
    sides
}

/// Moves applied by one [`LocalSearch::refine`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocalSearchStats {
    /// Single-value switches applied
    pub single_switches: usize,
    /// Pair swaps applied
    pub pair_swaps: usize,
    /// Cut value of the final partition
    pub cut_value: f64,
}

/// Single-switch and pair-swap hill climbing.
///
/// Each pass applies the first move that raises the cut by at least
/// `epsilon` and restarts; it stops when a full pass finds none. Moves never
/// leave a side empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalSearch {
    epsilon: f64,
}

impl LocalSearch {
    /// Search with the given minimum improvement.
    pub fn new(epsilon: f64) -> Self {
        LocalSearch { epsilon }
    }

    /// `gains[i]`: change of the cut value when value `i` switches sides.
    fn switch_gains(weights: &DMatrix<f64>, sides: &[bool]) -> Vec<f64> {
        let n = sides.len();
        (0..n)
            .map(|i| {
                (0..n)
                    .filter(|&j| j != i)
                    .map(|j| {
                        if sides[i] == sides[j] {
                            weights[(i, j)]
                        } else {
                            -weights[(i, j)]
                        }
                    })
                    .sum()
            })
            .collect()
    }

    /// Refines `sides` in place.
    pub fn refine(&self, weights: &DMatrix<f64>, sides: &mut [bool]) -> LocalSearchStats {
        let n = sides.len();
        let mut stats = LocalSearchStats::default();

        loop {
            let gains = Self::switch_gains(weights, sides);
            let left_size = sides.iter().filter(|&&s| s).count();
            let side_size = |left: bool| if left { left_size } else { n - left_size };

            if let Some(i) = (0..n).find(|&i| gains[i] >= self.epsilon && side_size(sides[i]) > 1) {
                sides[i] = !sides[i];
                stats.single_switches += 1;
                continue;
            }

            let swap = (0..n).find_map(|i| {
                ((i + 1)..n)
                    .find(|&j| {
                        sides[i] != sides[j]
                            && gains[i] + gains[j] + 2.0 * weights[(i, j)] >= self.epsilon
                    })
                    .map(|j| (i, j))
            });
            if let Some((i, j)) = swap {
                sides.swap(i, j);
                stats.pair_swaps += 1;
                continue;
            }

            break;
        }

        stats.cut_value = cut_value(weights, sides);
        stats
    }
}
