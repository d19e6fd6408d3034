//! Fuzzy rule evaluation over linguistic variables.
//!
//! Inputs are crisp numbers kept in a [`Database`]. Rules such as
//! `IF service IS poor OR food IS poor THEN tip IS low` are fuzzified
//! against [`LinguisticVariable`]s, combined with a configurable
//! [`TNorm`]/[`TConorm`] pair and reduced to one crisp value per output
//! variable by a [`Defuzzifier`].
//!
//! ```
//! use std::sync::Arc;
//!
//! use fuzzy_rulebase::{
//!     Conclusion, Condition, DefuzzificationOp, EngineConfig, FuzzyRule, FuzzySet, Label, LinguisticVariable,
//!     MamdaniEngine, Singleton, Trapezoidal, Triangular,
//! };
//!
//! # fn main() -> fuzzy_rulebase::FuzzyResult<()> {
//! let service = Arc::new(LinguisticVariable::new(
//!     "service",
//!     0. ..=10.,
//!     [
//!         FuzzySet::new("poor", Trapezoidal::left_edge(0., 5.)?)?,
//!         FuzzySet::new("average", Triangular::new(0., 5., 10.)?)?,
//!         FuzzySet::new("good", Trapezoidal::right_edge(5., 10.)?)?,
//!     ],
//! )?);
//! let tip = Arc::new(LinguisticVariable::new(
//!     "tip",
//!     0. ..=25.,
//!     [
//!         FuzzySet::new("low", Singleton::new(0.)?)?,
//!         FuzzySet::new("high", Singleton::new(25.)?)?,
//!     ],
//! )?);
//!
//! let mut engine = MamdaniEngine::mamdani(EngineConfig::default(), DefuzzificationOp::Centroid);
//!
//! engine.add_rule(
//!     FuzzyRule::builder("stingy")?
//!         .when(Condition::when(service.is("poor")?).build()?)
//!         .then(Conclusion::new(&tip, "low")?)
//!         .build()?,
//! )?;
//! engine.add_rule(
//!     FuzzyRule::builder("generous")?
//!         .when(Condition::when(service.is("good")?).build()?)
//!         .then(Conclusion::new(&tip, "high")?)
//!         .build()?,
//! )?;
//! engine.add_variable("service", 10.)?;
//!
//! assert_eq!(engine.execute()?.get(&Label::new("tip")?), Some(25.));
//! # Ok(())
//! # }
//! ```

mod database;
mod defuzz;
mod error;
mod evaluator;
mod grammar;
mod inference;
mod label;
mod linspace;
mod math;
mod membership;
mod ops;
mod outputs;
mod rulebase;
mod rules;
mod set;
mod unit_interval;
mod variable;

pub use database::{DataPoint, Database};
pub use defuzz::{DefuzzificationOp, Defuzzifier, Output, WeightedAverage, SAMPLES};
pub use error::{FuzzyError, FuzzyResult};
pub use evaluator::{Evaluation, FuzzyEvaluator};
pub use grammar::{Conclusion, Connective, EvaluationOperator, Premise, Proposition};
pub use inference::{EngineConfig, EngineKind, InferenceEngine, MamdaniEngine, SugenoEngine};
pub use label::{FuzzyState, Label, MAX_LABEL_LEN};
pub use membership::{
    Membership, MembershipFunction, PiecewiseLinear, Singleton, TrapezoidEdges, Trapezoidal, Triangular,
};
pub use ops::{TConorm, TNorm};
pub use outputs::Outputs;
pub use rulebase::{RuleKey, Rulebase};
pub use rules::{
    Condition, ConditionBuilder, Empty, FuzzyOutput, FuzzyRule, FuzzyRuleBuilder, HasConclusions, HasConditions,
};
pub use set::FuzzySet;
pub use unit_interval::{FuzzyPoint, UnitInterval};
pub use variable::LinguisticVariable;
