use crate::error::FuzzyResult;
use crate::label::FuzzyState;
use crate::membership::{Membership, MembershipFunction};
use crate::unit_interval::UnitInterval;

/// A membership function labelled with the state it describes
#[derive(Clone, Debug, PartialEq)]
pub struct FuzzySet {
    state: FuzzyState,
    function: MembershipFunction,
}

impl FuzzySet {
    pub fn new(state: impl AsRef<str>, function: impl Into<MembershipFunction>) -> FuzzyResult<Self> {
        Ok(Self::with_state(FuzzyState::new(state)?, function))
    }

    pub fn with_state(state: FuzzyState, function: impl Into<MembershipFunction>) -> Self {
        FuzzySet {
            state,
            function: function.into(),
        }
    }

    pub fn state(&self) -> &FuzzyState {
        &self.state
    }

    pub fn function(&self) -> &MembershipFunction {
        &self.function
    }

    /// Reaches full membership somewhere
    pub fn is_normal(&self) -> bool {
        self.function.max_y().is_one()
    }

    /// Heights only ever rise, or only ever fall, along the defining points
    pub fn is_convex(&self) -> bool {
        self.function.is_monotonic()
    }

    pub fn complement(&self, x: f64) -> UnitInterval {
        self.membership(x).complement()
    }

    pub fn union(&self, other: &FuzzySet, x: f64) -> UnitInterval {
        self.membership(x).max(other.membership(x))
    }

    pub fn intersection(&self, other: &FuzzySet, x: f64) -> UnitInterval {
        self.membership(x).min(other.membership(x))
    }

    pub fn centroid(&self) -> f64 {
        self.function.centroid()
    }
}

impl Membership for FuzzySet {
    fn lower_bound(&self) -> f64 {
        self.function.lower_bound()
    }

    fn upper_bound(&self) -> f64 {
        self.function.upper_bound()
    }

    fn min_y(&self) -> UnitInterval {
        self.function.min_y()
    }

    fn max_y(&self) -> UnitInterval {
        self.function.max_y()
    }

    fn membership(&self, x: f64) -> UnitInterval {
        self.function.membership(x)
    }
}

#[test]
fn test_set_operations() {
    use crate::membership::{Singleton, Trapezoidal, Triangular};

    let cold = FuzzySet::new("Cold", Trapezoidal::left_edge(0., 10.).unwrap()).unwrap();
    let warm = FuzzySet::new("warm", Triangular::new(5., 15., 25.).unwrap()).unwrap();

    assert_eq!(cold.state().as_str(), "cold");
    assert_eq!(cold.membership(7.5), 0.25);
    assert_eq!(warm.membership(7.5), 0.25);
    assert_eq!(cold.complement(7.5), 0.75);
    assert_eq!(cold.membership(5.), 0.5);
    assert_eq!(warm.membership(5.), 0.);
    assert_eq!(cold.union(&warm, 5.), 0.5);
    assert_eq!(cold.intersection(&warm, 5.), 0.);
    assert_eq!(cold.union(&warm, 10.), 0.5);
    assert_eq!(cold.intersection(&warm, 10.), 0.);

    assert!(cold.is_normal());
    assert!(cold.is_convex());
    assert!(warm.is_normal());
    assert!(!warm.is_convex());

    let spike = FuzzySet::new("exact", Singleton::new(3.).unwrap()).unwrap();

    assert!(spike.is_normal());
    assert!(spike.is_convex());
    assert_eq!(spike.complement(3.), 0.);
    assert_eq!(spike.complement(4.), 1.);
}

#[test]
fn test_not_normal() {
    use crate::membership::Triangular;

    let low = UnitInterval::new(0.).unwrap();
    let high = UnitInterval::new(0.5).unwrap();
    let partial = FuzzySet::new("partial", Triangular::with_heights(1., 2., 3., low, high).unwrap()).unwrap();

    assert!(!partial.is_normal());
    assert!(FuzzySet::new("  ", Triangular::new(1., 2., 3.).unwrap()).is_err());
}
