use crate::error::{FuzzyError, FuzzyResult};
use crate::grammar::Connective;
use crate::ops::{TConorm, TNorm};
use crate::unit_interval::UnitInterval;

/// One evaluated clause: how it attaches, and how true it turned out to be
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Evaluation {
    pub connective: Connective,
    pub degree: UnitInterval,
}

impl Evaluation {
    pub fn new(connective: Connective, degree: UnitInterval) -> Self {
        Evaluation { connective, degree }
    }
}

/// Reduces a flat `IF a AND b OR c AND d` statement to a single degree.
///
/// AND binds tighter than OR and there are no parentheses: every `Or` starts
/// a new group, each group is reduced with the t-norm, and the group results
/// are reduced with the t-conorm. Swapping operators only changes the
/// arithmetic, never the grouping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FuzzyEvaluator {
    and_op: TNorm,
    or_op: TConorm,
}

impl FuzzyEvaluator {
    pub fn new(and_op: TNorm, or_op: TConorm) -> Self {
        FuzzyEvaluator { and_op, or_op }
    }

    pub fn and_op(&self) -> TNorm {
        self.and_op
    }

    pub fn or_op(&self) -> TConorm {
        self.or_op
    }

    /// The first evaluation must be `If`, and no other may be.
    pub fn evaluate(&self, evaluations: &[Evaluation]) -> FuzzyResult<UnitInterval> {
        let (first, rest) = evaluations
            .split_first()
            .ok_or(FuzzyError::InvalidConnective("nothing to evaluate"))?;

        if first.connective != Connective::If {
            return Err(FuzzyError::InvalidConnective("a statement must start with IF"));
        }

        let mut result: Option<UnitInterval> = None;
        let mut group = first.degree;

        for evaluation in rest {
            match evaluation.connective {
                Connective::If => {
                    return Err(FuzzyError::InvalidConnective("IF may only start a statement"));
                },
                Connective::And => group = self.and_op.evaluate(group, evaluation.degree)?,
                Connective::Or => {
                    result = Some(self.close_group(result, group)?);
                    group = evaluation.degree;
                },
            }
        }

        self.close_group(result, group)
    }

    fn close_group(&self, result: Option<UnitInterval>, group: UnitInterval) -> FuzzyResult<UnitInterval> {
        match result {
            Some(result) => self.or_op.evaluate(result, group),
            None => Ok(group),
        }
    }
}

#[cfg(test)]
fn evaluations(items: &[(Connective, f64)]) -> Vec<Evaluation> {
    items
        .iter()
        .map(|&(connective, degree)| Evaluation::new(connective, UnitInterval::new(degree).unwrap()))
        .collect()
}

#[test]
fn test_grouping() {
    use Connective::*;

    let evaluator = FuzzyEvaluator::default();
    let statement = evaluations(&[(If, 0.25), (And, 0.), (And, 0.2), (Or, 1.), (And, 0.9), (And, 0.8)]);

    assert_eq!(evaluator.evaluate(&statement).unwrap(), 0.8);
}

#[test]
fn test_all_zero_groups() {
    use Connective::*;

    let evaluator = FuzzyEvaluator::default();
    let statement = evaluations(&[(If, 0.), (And, 0.), (Or, 0.), (And, 0.)]);

    assert_eq!(evaluator.evaluate(&statement).unwrap(), UnitInterval::zero());
}

#[test]
fn test_single_and_or_only() {
    use Connective::*;

    let evaluator = FuzzyEvaluator::default();

    assert_eq!(evaluator.evaluate(&evaluations(&[(If, 0.4)])).unwrap(), 0.4);
    assert_eq!(
        evaluator.evaluate(&evaluations(&[(If, 0.4), (Or, 0.1), (Or, 0.7)])).unwrap(),
        0.7
    );
    assert_eq!(
        evaluator.evaluate(&evaluations(&[(If, 0.4), (And, 0.1), (And, 0.7)])).unwrap(),
        0.1
    );
}

#[test]
fn test_substituted_algebra() {
    use Connective::*;

    // (0.5 * 0.5) + 0.5 - (0.25 * 0.5)
    let evaluator = FuzzyEvaluator::new(TNorm::AlgebraicProduct, TConorm::ProbabilisticSum);
    let statement = evaluations(&[(If, 0.5), (And, 0.5), (Or, 0.5)]);

    assert_eq!(evaluator.evaluate(&statement).unwrap(), 0.625);

    // Same grouping, different arithmetic
    let evaluator = FuzzyEvaluator::new(TNorm::Lukasiewicz, TConorm::BoundedSum);

    assert_eq!(evaluator.evaluate(&statement).unwrap(), 0.5);
}

#[test]
fn test_invalid_sequences() {
    use Connective::*;

    let evaluator = FuzzyEvaluator::default();

    assert!(matches!(evaluator.evaluate(&[]), Err(FuzzyError::InvalidConnective(_))));
    assert!(matches!(
        evaluator.evaluate(&evaluations(&[(And, 0.5)])),
        Err(FuzzyError::InvalidConnective(_))
    ));
    assert!(matches!(
        evaluator.evaluate(&evaluations(&[(Or, 0.5), (And, 0.5)])),
        Err(FuzzyError::InvalidConnective(_))
    ));
    assert!(matches!(
        evaluator.evaluate(&evaluations(&[(If, 0.5), (If, 0.5)])),
        Err(FuzzyError::InvalidConnective(_))
    ));
}
