use thiserror::Error;

use crate::label::{FuzzyState, Label};

/// Everything that can go wrong while building or evaluating a fuzzy system.
///
/// Construction errors are raised as soon as an invalid value is seen,
/// evaluation errors abort the whole evaluation. Nothing is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FuzzyError {
    #[error("value {0} is not finite")]
    NotFinite(f64),

    #[error("value {0} is outside of the unit interval [0, 1]")]
    OutOfUnitInterval(f64),

    #[error("point x value {0} must not be negative")]
    NegativePoint(f64),

    #[error("points must be ordered by x, but {next} follows {prev}")]
    PointsOutOfOrder { prev: f64, next: f64 },

    #[error("a membership function needs at least one point")]
    EmptyPoints,

    #[error("minimum height {min_y} exceeds maximum height {max_y}")]
    InvalidBounds { min_y: f64, max_y: f64 },

    #[error("lower bound {lower} exceeds upper bound {upper}")]
    InvalidRange { lower: f64, upper: f64 },

    #[error("fuzzy set `{state}` spans [{lower}, {upper}] which leaves the bounds of `{subject}`")]
    SetOutOfBounds {
        subject: Label,
        state: FuzzyState,
        lower: f64,
        upper: f64,
    },

    #[error("state `{state}` is declared twice in `{subject}`")]
    DuplicateState { subject: Label, state: FuzzyState },

    #[error("state `{state}` is not a member of `{subject}`")]
    UnknownState { subject: Label, state: FuzzyState },

    #[error("a linguistic variable needs at least one fuzzy set")]
    EmptyVariable,

    #[error("label is empty after normalization")]
    EmptyLabel,

    #[error("label `{label}` is longer than {max} characters")]
    LabelTooLong { label: String, max: usize },

    #[error("a condition needs at least one premise")]
    EmptyCondition,

    #[error("rule `{0}` needs at least one condition and one conclusion")]
    EmptyRule(Label),

    #[error("invalid connective sequence: {0}")]
    InvalidConnective(&'static str),

    #[error("unknown operator `{0}`")]
    UnknownOperator(String),

    #[error("variable `{0}` already exists in the database")]
    DuplicateVariable(Label),

    #[error("variable `{0}` does not exist in the database")]
    MissingVariable(Label),

    #[error("rule `{0}` already exists in the rulebase")]
    DuplicateRule(Label),

    #[error("rule `{0}` does not exist in the rulebase")]
    MissingRule(Label),

    #[error("every output for `{0}` has a firing strength of zero")]
    ZeroFiringStrength(Label),

    #[error("nothing to defuzzify")]
    EmptyOutputs,

    #[error("outputs for `{expected}` and `{found}` cannot be defuzzified together")]
    MixedSubjects { expected: Label, found: Label },

    #[error("outputs for `{0}` mix singleton and continuous sets")]
    MixedSetKinds(Label),
}

pub type FuzzyResult<T> = Result<T, FuzzyError>;
