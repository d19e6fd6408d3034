use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::error::{FuzzyError, FuzzyResult};
use crate::grammar::{EvaluationOperator, Proposition};
use crate::label::{FuzzyState, Label};
use crate::membership::Membership;
use crate::set::FuzzySet;
use crate::unit_interval::UnitInterval;

/// A named quantity, ie "WaterTemp", partitioned into overlapping fuzzy states
///
/// Sets keep their declaration order, which is how ties are broken in
/// [`LinguisticVariable::dominant_state`].
#[derive(Clone, Debug, PartialEq)]
pub struct LinguisticVariable {
    subject: Label,
    lower_bound: f64,
    upper_bound: f64,
    sets: Vec<FuzzySet>,
}

impl LinguisticVariable {
    /// Every set must lie within `universe`, and no state may be declared twice.
    pub fn new(
        subject: impl AsRef<str>,
        universe: RangeInclusive<f64>,
        sets: impl IntoIterator<Item = FuzzySet>,
    ) -> FuzzyResult<Self> {
        let subject = Label::new(subject)?;
        let lower_bound = *universe.start();
        let upper_bound = *universe.end();

        for bound in [lower_bound, upper_bound] {
            if !bound.is_finite() {
                return Err(FuzzyError::NotFinite(bound));
            }
        }

        if lower_bound > upper_bound {
            return Err(FuzzyError::InvalidRange {
                lower: lower_bound,
                upper: upper_bound,
            });
        }

        let sets: Vec<FuzzySet> = sets.into_iter().collect();

        if sets.is_empty() {
            return Err(FuzzyError::EmptyVariable);
        }

        for (i, set) in sets.iter().enumerate() {
            if set.lower_bound() < lower_bound || set.upper_bound() > upper_bound {
                return Err(FuzzyError::SetOutOfBounds {
                    subject,
                    state: set.state().clone(),
                    lower: set.lower_bound(),
                    upper: set.upper_bound(),
                });
            }

            if sets[..i].iter().any(|prev| prev.state() == set.state()) {
                return Err(FuzzyError::DuplicateState {
                    subject,
                    state: set.state().clone(),
                });
            }
        }

        Ok(LinguisticVariable {
            subject,
            lower_bound,
            upper_bound,
            sets,
        })
    }

    pub fn subject(&self) -> &Label {
        &self.subject
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    pub fn sets(&self) -> &[FuzzySet] {
        &self.sets
    }

    pub fn states(&self) -> impl Iterator<Item = &FuzzyState> {
        self.sets.iter().map(FuzzySet::state)
    }

    pub fn contains_state(&self, state: &FuzzyState) -> bool {
        self.sets.iter().any(|set| set.state() == state)
    }

    pub fn get_set(&self, state: &FuzzyState) -> FuzzyResult<&FuzzySet> {
        self.sets
            .iter()
            .find(|set| set.state() == state)
            .ok_or_else(|| FuzzyError::UnknownState {
                subject: self.subject.clone(),
                state: state.clone(),
            })
    }

    pub fn membership(&self, state: &FuzzyState, input: f64) -> FuzzyResult<UnitInterval> {
        Ok(self.get_set(state)?.membership(input))
    }

    /// Every state with its degree of membership at `input`, in declaration order
    pub fn fuzzify(&self, input: f64) -> Vec<(&FuzzyState, UnitInterval)> {
        self.sets
            .iter()
            .map(|set| (set.state(), set.membership(input)))
            .collect()
    }

    /// The state with the highest membership at `input`. The first declared wins a tie.
    pub fn dominant_state(&self, input: f64) -> &FuzzyState {
        // Construction guarantees at least one set
        let mut best = &self.sets[0];
        let mut best_degree = best.membership(input);

        for set in &self.sets[1..] {
            let degree = set.membership(input);

            if degree > best_degree {
                best = set;
                best_degree = degree;
            }
        }

        best.state()
    }

    /// `subject IS state`
    pub fn is(self: &Arc<Self>, state: impl AsRef<str>) -> FuzzyResult<Proposition> {
        Proposition::new(self, EvaluationOperator::Is, FuzzyState::new(state)?)
    }

    /// `subject IS NOT state`
    pub fn is_not(self: &Arc<Self>, state: impl AsRef<str>) -> FuzzyResult<Proposition> {
        Proposition::new(self, EvaluationOperator::IsNot, FuzzyState::new(state)?)
    }
}

#[cfg(test)]
fn water_temp() -> LinguisticVariable {
    use crate::membership::{Trapezoidal, Triangular};

    LinguisticVariable::new(
        "Water Temp",
        0. ..=100.,
        [
            FuzzySet::new("frozen", Trapezoidal::left_edge(0., 10.).unwrap()).unwrap(),
            FuzzySet::new("cold", Triangular::new(0., 10., 40.).unwrap()).unwrap(),
            FuzzySet::new("warm", Triangular::new(30., 50., 70.).unwrap()).unwrap(),
            FuzzySet::new("hot", Trapezoidal::right_edge(60., 90.).unwrap()).unwrap(),
        ],
    )
    .unwrap()
}

#[test]
fn test_lookup() {
    let var = water_temp();
    let frozen = FuzzyState::new("Frozen").unwrap();
    let boiling = FuzzyState::new("boiling").unwrap();

    assert_eq!(var.subject().as_str(), "watertemp");
    assert_eq!(var.lower_bound(), 0.);
    assert_eq!(var.upper_bound(), 100.);
    assert!(var.contains_state(&frozen));
    assert!(!var.contains_state(&boiling));
    assert_eq!(var.membership(&frozen, 5.).unwrap(), 0.5);
    assert_eq!(
        var.get_set(&boiling),
        Err(FuzzyError::UnknownState {
            subject: Label::new("watertemp").unwrap(),
            state: boiling,
        })
    );
    assert_eq!(var.states().count(), 4);
}

#[test]
fn test_fuzzify_and_dominant_state() {
    let var = water_temp();
    let degrees = var.fuzzify(35.);
    let states: Vec<&str> = degrees.iter().map(|(state, _)| state.as_str()).collect();

    assert_eq!(states, vec!["frozen", "cold", "warm", "hot"]);
    approx::assert_relative_eq!(degrees[1].1.value(), 1. / 6., epsilon = 1e-12);
    assert_eq!(degrees[2].1, 0.25);
    assert_eq!(var.dominant_state(35.).as_str(), "warm");
    assert_eq!(var.dominant_state(95.).as_str(), "hot");

    // frozen and cold both sit at 0.5, the first declared wins
    assert_eq!(var.dominant_state(5.).as_str(), "frozen");
    // Nothing covers 80 but hot
    assert_eq!(var.dominant_state(80.).as_str(), "hot");
}

#[test]
fn test_invalid_variables() {
    use crate::membership::Triangular;

    let wide = FuzzySet::new("wide", Triangular::new(0., 50., 150.).unwrap()).unwrap();

    assert!(matches!(
        LinguisticVariable::new("temp", 0. ..=100., [wide]),
        Err(FuzzyError::SetOutOfBounds { .. })
    ));
    assert_eq!(
        LinguisticVariable::new("temp", 10. ..=0., Vec::<FuzzySet>::new()),
        Err(FuzzyError::InvalidRange { lower: 10., upper: 0. })
    );
    assert_eq!(
        LinguisticVariable::new("temp", 0. ..=10., Vec::<FuzzySet>::new()),
        Err(FuzzyError::EmptyVariable)
    );
    assert!(matches!(
        LinguisticVariable::new("temp", 0. ..=f64::INFINITY, Vec::<FuzzySet>::new()),
        Err(FuzzyError::NotFinite(_))
    ));

    let a = FuzzySet::new("same", Triangular::new(0., 1., 2.).unwrap()).unwrap();
    let b = FuzzySet::new("Same", Triangular::new(1., 2., 3.).unwrap()).unwrap();

    assert!(matches!(
        LinguisticVariable::new("temp", 0. ..=10., [a, b]),
        Err(FuzzyError::DuplicateState { .. })
    ));
}
