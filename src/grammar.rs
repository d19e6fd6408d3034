//! The typed clauses rules are made of.
//!
//! ```text
//! IF   food IS poor        <- Premise { If,  Proposition }
//! OR   service IS NOT good <- Premise { Or,  Proposition }
//! THEN tip IS low          <- Conclusion
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::{FuzzyError, FuzzyResult};
use crate::label::FuzzyState;
use crate::set::FuzzySet;
use crate::variable::LinguisticVariable;

/// How a clause attaches to the clauses before it
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Connective {
    /// Opens a statement. Combines like `And`
    If,
    And,
    Or,
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::If => "IF",
            Self::And => "AND",
            Self::Or => "OR",
        })
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum EvaluationOperator {
    #[default]
    Is,
    /// Takes the complement of the membership degree
    IsNot,
}

impl fmt::Display for EvaluationOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Is => "IS",
            Self::IsNot => "IS NOT",
        })
    }
}

/// `variable IS state` or `variable IS NOT state`
#[derive(Clone, Debug, PartialEq)]
pub struct Proposition {
    variable: Arc<LinguisticVariable>,
    operator: EvaluationOperator,
    state: FuzzyState,
}

impl Proposition {
    /// Fails if `state` is not one of `variable`'s states.
    pub fn new(
        variable: &Arc<LinguisticVariable>,
        operator: EvaluationOperator,
        state: FuzzyState,
    ) -> FuzzyResult<Self> {
        if !variable.contains_state(&state) {
            return Err(FuzzyError::UnknownState {
                subject: variable.subject().clone(),
                state,
            });
        }

        Ok(Proposition {
            variable: Arc::clone(variable),
            operator,
            state,
        })
    }

    pub fn variable(&self) -> &LinguisticVariable {
        &self.variable
    }

    pub fn operator(&self) -> EvaluationOperator {
        self.operator
    }

    pub fn state(&self) -> &FuzzyState {
        &self.state
    }

    /// The set named by `state`, which construction guarantees exists
    pub fn set(&self) -> FuzzyResult<&FuzzySet> {
        self.variable.get_set(&self.state)
    }
}

impl fmt::Display for Proposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.variable.subject(), self.operator, self.state)
    }
}

/// One clause of a condition
#[derive(Clone, Debug, PartialEq)]
pub struct Premise {
    connective: Connective,
    proposition: Proposition,
}

impl Premise {
    pub fn new(connective: Connective, proposition: Proposition) -> Self {
        Premise {
            connective,
            proposition,
        }
    }

    pub fn connective(&self) -> Connective {
        self.connective
    }

    pub fn proposition(&self) -> &Proposition {
        &self.proposition
    }
}

impl fmt::Display for Premise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.connective, self.proposition)
    }
}

/// `THEN variable IS state`
#[derive(Clone, Debug, PartialEq)]
pub struct Conclusion(Proposition);

impl Conclusion {
    /// Fails if `state` is not one of `variable`'s states.
    pub fn new(variable: &Arc<LinguisticVariable>, state: impl AsRef<str>) -> FuzzyResult<Self> {
        Proposition::new(variable, EvaluationOperator::Is, FuzzyState::new(state)?).map(Conclusion)
    }

    pub fn proposition(&self) -> &Proposition {
        &self.0
    }

    pub fn variable(&self) -> &LinguisticVariable {
        self.0.variable()
    }

    pub fn state(&self) -> &FuzzyState {
        self.0.state()
    }
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "THEN {}", self.0)
    }
}

#[cfg(test)]
pub(crate) fn service() -> Arc<LinguisticVariable> {
    use crate::membership::{Trapezoidal, Triangular};

    Arc::new(
        LinguisticVariable::new(
            "Service",
            0. ..=10.,
            [
                FuzzySet::new("poor", Trapezoidal::left_edge(0., 5.).unwrap()).unwrap(),
                FuzzySet::new("average", Triangular::new(0., 5., 10.).unwrap()).unwrap(),
                FuzzySet::new("good", Trapezoidal::right_edge(5., 10.).unwrap()).unwrap(),
            ],
        )
        .unwrap(),
    )
}

#[test]
fn test_proposition() {
    let service = service();
    let prop = service.is("Poor").unwrap();

    assert_eq!(prop.operator(), EvaluationOperator::Is);
    assert_eq!(prop.state().as_str(), "poor");
    assert_eq!(prop.variable().subject().as_str(), "service");
    assert_eq!(prop.set().unwrap().state(), prop.state());
    assert_eq!(prop.to_string(), "service IS poor");

    let negated = service.is_not("good").unwrap();

    assert_eq!(negated.operator(), EvaluationOperator::IsNot);
    assert_eq!(Premise::new(Connective::Or, negated).to_string(), "OR service IS NOT good");
}

#[test]
fn test_unknown_state() {
    let service = service();

    assert!(matches!(service.is("excellent"), Err(FuzzyError::UnknownState { .. })));
    assert!(matches!(Conclusion::new(&service, "meh"), Err(FuzzyError::UnknownState { .. })));
    assert!(service.is("").is_err());

    let conclusion = Conclusion::new(&service, "GOOD").unwrap();

    assert_eq!(conclusion.to_string(), "THEN service IS good");
    assert_eq!(conclusion.proposition().operator(), EvaluationOperator::Is);
}
