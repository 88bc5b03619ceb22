//! Threshold search over an ordered attribute.

use crate::core::types::ClassIndex;
use crate::split::impurity::{ClassTally, Scorer};

/// Best threshold of a numeric attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericThreshold {
    /// Largest value sent left
    pub last_left_value: f64,
    /// Smallest value sent right
    pub first_right_value: f64,
    /// Criterion value of the cut
    pub criterion_value: f64,
}

/// Sorts `(value, class)` pairs and scans every boundary between distinct
/// values, returning the best cut or `None` when there are fewer than two
/// distinct values.
///
/// `pairs` is reordered in place. Ties keep the lowest threshold.
pub fn best_threshold(
    pairs: &mut [(f64, ClassIndex)],
    num_classes: usize,
    scorer: &Scorer,
) -> Option<NumericThreshold> {
    if pairs.len() < 2 {
        return None;
    }
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let impurity = scorer.impurity();
    let policy = scorer.policy();
    let mut left = ClassTally::new(impurity, num_classes);
    let mut right = ClassTally::new(impurity, num_classes);
    for &(_, class) in pairs.iter() {
        right.add(class, 1.0);
    }
    let parent_impurity = right.impurity();

    let mut best: Option<NumericThreshold> = None;
    for i in 0..pairs.len() - 1 {
        let (value, class) = pairs[i];
        left.add(class, 1.0);
        right.add(class, -1.0);

        let next = pairs[i + 1].0;
        if !(value < next) {
            continue;
        }
        let Some(criterion_value) = scorer.score(parent_impurity, &left, &right) else {
            continue;
        };
        let improves = best
            .as_ref()
            .map_or(true, |b| policy.prefers(criterion_value, b.criterion_value));
        if improves {
            best = Some(NumericThreshold {
                last_left_value: value,
                first_right_value: next,
                criterion_value,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Objective;
    use crate::split::impurity::Impurity;
    use approx::assert_abs_diff_eq;

    fn gini() -> Scorer {
        Scorer::new(Impurity::Gini, Objective::RelativeGain)
    }

    #[test]
    fn test_perfect_threshold() {
        let mut pairs = vec![(3.0, 1), (1.0, 0), (4.0, 1), (2.0, 0)];
        let best = best_threshold(&mut pairs, 2, &gini()).unwrap();
        assert_eq!(best.last_left_value, 2.0);
        assert_eq!(best.first_right_value, 3.0);
        assert_abs_diff_eq!(best.criterion_value, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_never_cuts_between_equal_values() {
        let mut pairs = vec![(1.0, 0), (1.0, 1), (1.0, 0), (2.0, 1)];
        let best = best_threshold(&mut pairs, 2, &gini()).unwrap();
        assert_eq!(best.last_left_value, 1.0);
        assert_eq!(best.first_right_value, 2.0);
    }

    #[test]
    fn test_constant_attribute() {
        let mut pairs = vec![(5.0, 0), (5.0, 1), (5.0, 1)];
        assert!(best_threshold(&mut pairs, 2, &gini()).is_none());
        let mut single = vec![(1.0, 0)];
        assert!(best_threshold(&mut single, 2, &gini()).is_none());
    }

    #[test]
    fn test_children_impurity_objective() {
        let scorer = Scorer::new(Impurity::Gini, Objective::ChildrenImpurity);
        let mut pairs = vec![(0.0, 0), (1.0, 0), (2.0, 1), (3.0, 2)];
        let best = best_threshold(&mut pairs, 3, &scorer).unwrap();
        assert_eq!(best.last_left_value, 1.0);
        assert_abs_diff_eq!(best.criterion_value, 0.25, epsilon = 1e-12);
    }
}
