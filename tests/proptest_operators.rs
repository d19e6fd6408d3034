//! Property tests for the operator algebra and the statement evaluator

use fuzzy_rulebase::{Connective, Evaluation, FuzzyEvaluator, TConorm, TNorm, UnitInterval};
use proptest::prelude::*;

const TOLERANCE: f64 = 1e-12;

fn unit() -> impl Strategy<Value = UnitInterval> {
    (0.0..=1.0f64).prop_map(|v| UnitInterval::new(v).unwrap())
}

fn tnorm() -> impl Strategy<Value = TNorm> {
    prop::sample::select(TNorm::ALL.to_vec())
}

fn tconorm() -> impl Strategy<Value = TConorm> {
    prop::sample::select(TConorm::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1024))]

    /// Only finite values within [0, 1] are accepted
    #[test]
    fn unit_interval_is_closed(v in prop::num::f64::ANY) {
        match UnitInterval::new(v) {
            Ok(unit) => {
                prop_assert!((0. ..=1.).contains(&unit.value()));
                prop_assert!((0. ..=1.).contains(&unit.complement().value()));
            },
            Err(_) => prop_assert!(!(0. ..=1.).contains(&v)),
        }
    }

    #[test]
    fn minimum_maximum_bracket_inputs(a in unit(), b in unit()) {
        let min = TNorm::Minimum.evaluate(a, b).unwrap();
        let max = TConorm::Maximum.evaluate(a, b).unwrap();

        prop_assert!(min <= a && min <= b);
        prop_assert!(a <= max && b <= max);
    }

    #[test]
    fn product_below_minimum(a in unit(), b in unit()) {
        let product = TNorm::AlgebraicProduct.evaluate(a, b).unwrap();

        prop_assert!(product <= TNorm::Minimum.evaluate(a, b).unwrap());
    }

    #[test]
    fn probabilistic_sum_above_maximum(a in unit(), b in unit()) {
        let sum = TConorm::ProbabilisticSum.evaluate(a, b).unwrap();

        prop_assert!(sum >= TConorm::Maximum.evaluate(a, b).unwrap());
    }

    /// Every t-norm is bounded by the minimum and has 1 as identity
    #[test]
    fn tnorm_bounds(op in tnorm(), a in unit(), b in unit()) {
        let value = op.evaluate(a, b).unwrap().value();
        let swapped = op.evaluate(b, a).unwrap().value();

        prop_assert!(value <= a.min(b).value() + TOLERANCE, "{} gave {}", op, value);
        prop_assert!((value - swapped).abs() <= TOLERANCE);
        prop_assert!((op.evaluate(a, UnitInterval::ONE).unwrap().value() - a.value()).abs() <= TOLERANCE);
        prop_assert_eq!(op.evaluate(a, UnitInterval::ZERO).unwrap(), UnitInterval::ZERO);
    }

    /// Every t-conorm is bounded by the maximum and has 0 as identity
    #[test]
    fn tconorm_bounds(op in tconorm(), a in unit(), b in unit()) {
        let value = op.evaluate(a, b).unwrap().value();
        let swapped = op.evaluate(b, a).unwrap().value();

        prop_assert!(value >= a.max(b).value() - TOLERANCE, "{} gave {}", op, value);
        prop_assert!((value - swapped).abs() <= TOLERANCE);
        prop_assert!((op.evaluate(a, UnitInterval::ZERO).unwrap().value() - a.value()).abs() <= TOLERANCE);
        prop_assert!(op.evaluate(a, UnitInterval::ONE).unwrap().value() >= 1. - TOLERANCE);
    }

    /// OR splits a statement into groups that are AND-reduced first
    #[test]
    fn grouping_matches_max_of_mins(
        first in unit(),
        rest in prop::collection::vec((any::<bool>(), unit()), 0..12),
    ) {
        let mut evaluations = vec![Evaluation::new(Connective::If, first)];
        let mut groups = vec![first];

        for (or, degree) in rest {
            if or {
                evaluations.push(Evaluation::new(Connective::Or, degree));
                groups.push(degree);
            } else {
                evaluations.push(Evaluation::new(Connective::And, degree));

                let last = groups.len() - 1;
                groups[last] = groups[last].min(degree);
            }
        }

        let expected = groups.into_iter().fold(UnitInterval::ZERO, UnitInterval::max);

        prop_assert_eq!(FuzzyEvaluator::default().evaluate(&evaluations).unwrap(), expected);
    }

    /// Any operator pair keeps evaluation within [0, 1]
    #[test]
    fn substituted_algebra_stays_closed(
        and_op in tnorm(),
        or_op in tconorm(),
        first in unit(),
        rest in prop::collection::vec((any::<bool>(), unit()), 0..12),
    ) {
        let evaluations: Vec<Evaluation> = std::iter::once(Evaluation::new(Connective::If, first))
            .chain(rest.into_iter().map(|(or, degree)| {
                Evaluation::new(if or { Connective::Or } else { Connective::And }, degree)
            }))
            .collect();
        let result = FuzzyEvaluator::new(and_op, or_op).evaluate(&evaluations).unwrap();

        prop_assert!((0. ..=1.).contains(&result.value()));
    }
}
