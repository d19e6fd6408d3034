use std::fmt;
use std::marker::PhantomData;

use tracing::trace;

use crate::database::Database;
use crate::error::{FuzzyError, FuzzyResult};
use crate::evaluator::{Evaluation, FuzzyEvaluator};
use crate::grammar::{Conclusion, Connective, EvaluationOperator, Premise, Proposition};
use crate::label::Label;
use crate::membership::Membership;
use crate::set::FuzzySet;
use crate::unit_interval::UnitInterval;

/// An AND/OR-combined group of premises, scaled by a certainty weight
#[derive(Clone, Debug, PartialEq)]
pub struct Condition {
    connective: Connective,
    premises: Vec<Premise>,
    weight: UnitInterval,
}

impl Condition {
    /// The first premise must be `If` and no other premise may be. The
    /// condition itself starts out as the `If` of its rule.
    pub fn new(premises: Vec<Premise>, weight: UnitInterval) -> FuzzyResult<Self> {
        let (first, rest) = premises.split_first().ok_or(FuzzyError::EmptyCondition)?;

        if first.connective() != Connective::If {
            return Err(FuzzyError::InvalidConnective("a condition must start with IF"));
        }

        if rest.iter().any(|premise| premise.connective() == Connective::If) {
            return Err(FuzzyError::InvalidConnective("IF may only start a condition"));
        }

        Ok(Condition {
            connective: Connective::If,
            premises,
            weight,
        })
    }

    /// Starts a condition with `IF proposition`
    pub fn when(proposition: Proposition) -> ConditionBuilder {
        ConditionBuilder {
            premises: vec![Premise::new(Connective::If, proposition)],
            weight: UnitInterval::ONE,
        }
    }

    /// How this condition attaches to the conditions before it in a rule
    pub fn connective(&self) -> Connective {
        self.connective
    }

    pub fn with_connective(mut self, connective: Connective) -> Self {
        self.connective = connective;
        self
    }

    pub fn premises(&self) -> &[Premise] {
        &self.premises
    }

    pub fn weight(&self) -> UnitInterval {
        self.weight
    }

    /// Fails if any premise's variable is missing from `database`, a rule
    /// never fires on incomplete information.
    pub fn evaluate(&self, database: &Database, evaluator: &FuzzyEvaluator) -> FuzzyResult<UnitInterval> {
        let evaluations = self
            .premises
            .iter()
            .map(|premise| {
                let proposition = premise.proposition();
                let data = database.get_data(proposition.variable().subject())?;
                let degree = proposition.set()?.membership(data.value());
                let degree = match proposition.operator() {
                    EvaluationOperator::Is => degree,
                    EvaluationOperator::IsNot => degree.complement(),
                };

                Ok(Evaluation::new(premise.connective(), degree))
            })
            .collect::<FuzzyResult<Vec<_>>>()?;

        Ok(evaluator.evaluate(&evaluations)? * self.weight)
    }
}

impl Condition {
    /// Nested in a rule, the leading `IF` is left out
    fn write_premises(&self, f: &mut fmt::Formatter<'_>, leading: bool) -> fmt::Result {
        for (i, premise) in self.premises.iter().enumerate() {
            match i {
                0 if leading => write!(f, "{premise}")?,
                0 => write!(f, "{}", premise.proposition())?,
                _ => write!(f, " {premise}")?,
            }
        }

        if !self.weight.is_one() {
            write!(f, " WITH {}", self.weight)?;
        }

        Ok(())
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_premises(f, true)
    }
}

/// Collects the premises of one condition. Created by [`Condition::when`].
#[derive(Clone, Debug)]
pub struct ConditionBuilder {
    premises: Vec<Premise>,
    weight: UnitInterval,
}

impl ConditionBuilder {
    pub fn and(mut self, proposition: Proposition) -> Self {
        self.premises.push(Premise::new(Connective::And, proposition));
        self
    }

    pub fn or(mut self, proposition: Proposition) -> Self {
        self.premises.push(Premise::new(Connective::Or, proposition));
        self
    }

    /// Certainty factor the condition's result is multiplied by. Defaults to 1
    pub fn weight(mut self, weight: UnitInterval) -> Self {
        self.weight = weight;
        self
    }

    pub fn build(self) -> FuzzyResult<Condition> {
        Condition::new(self.premises, self.weight)
    }
}

/// What one rule contributes to one output variable
#[derive(Clone, Debug, PartialEq)]
pub struct FuzzyOutput {
    pub subject: Label,
    pub set: FuzzySet,
    pub firing_strength: UnitInterval,
}

/// `IF <condition> [AND|OR <condition>]... THEN <conclusion> [THEN <conclusion>]...`
#[derive(Clone, Debug, PartialEq)]
pub struct FuzzyRule {
    label: Label,
    conditions: Vec<Condition>,
    conclusions: Vec<Conclusion>,
}

impl FuzzyRule {
    /// Fails unless there is at least one condition and one conclusion, the
    /// first condition's connective is `If` and no other condition's is.
    pub fn new(label: Label, conditions: Vec<Condition>, conclusions: Vec<Conclusion>) -> FuzzyResult<Self> {
        let Some((first, rest)) = conditions.split_first() else {
            return Err(FuzzyError::EmptyRule(label));
        };

        if conclusions.is_empty() {
            return Err(FuzzyError::EmptyRule(label));
        }

        if first.connective() != Connective::If {
            return Err(FuzzyError::InvalidConnective("a rule must start with IF"));
        }

        if rest.iter().any(|condition| condition.connective() == Connective::If) {
            return Err(FuzzyError::InvalidConnective("IF may only start a rule"));
        }

        Ok(FuzzyRule {
            label,
            conditions,
            conclusions,
        })
    }

    pub fn builder(label: impl AsRef<str>) -> FuzzyResult<FuzzyRuleBuilder<Empty>> {
        FuzzyRuleBuilder::new(label)
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn conclusions(&self) -> &[Conclusion] {
        &self.conclusions
    }

    /// Combines every condition with the same grouping as within a condition
    pub fn firing_strength(&self, database: &Database, evaluator: &FuzzyEvaluator) -> FuzzyResult<UnitInterval> {
        let evaluations = self
            .conditions
            .iter()
            .map(|condition| Ok(Evaluation::new(condition.connective(), condition.evaluate(database, evaluator)?)))
            .collect::<FuzzyResult<Vec<_>>>()?;

        evaluator.evaluate(&evaluations)
    }

    /// One output per conclusion, all carrying the rule's firing strength
    pub fn evaluate(&self, database: &Database, evaluator: &FuzzyEvaluator) -> FuzzyResult<Vec<FuzzyOutput>> {
        let firing_strength = self.firing_strength(database, evaluator)?;

        trace!(rule = %self.label, %firing_strength, "evaluated rule");

        self.conclusions
            .iter()
            .map(|conclusion| {
                Ok(FuzzyOutput {
                    subject: conclusion.variable().subject().clone(),
                    set: conclusion.proposition().set()?.clone(),
                    firing_strength,
                })
            })
            .collect()
    }
}

impl fmt::Display for FuzzyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.label)?;

        for (i, condition) in self.conditions.iter().enumerate() {
            if i == 0 {
                write!(f, " {condition}")?;
            } else {
                write!(f, " {} (", condition.connective())?;
                condition.write_premises(f, false)?;
                f.write_str(")")?;
            }
        }

        for conclusion in &self.conclusions {
            write!(f, " {conclusion}")?;
        }

        Ok(())
    }
}

/// Builder state: no condition yet
#[derive(Debug)]
pub enum Empty {}

/// Builder state: at least one condition, no conclusion yet
#[derive(Debug)]
pub enum HasConditions {}

/// Builder state: ready to build
#[derive(Debug)]
pub enum HasConclusions {}

/// Builds a [`FuzzyRule`] one clause at a time.
///
/// Each call moves the builder to the next state, so `or` before `when` or
/// `build` before `then` don't compile.
#[derive(Debug)]
pub struct FuzzyRuleBuilder<S> {
    label: Label,
    conditions: Vec<Condition>,
    conclusions: Vec<Conclusion>,
    state: PhantomData<S>,
}

impl<S> FuzzyRuleBuilder<S> {
    fn transition<T>(self) -> FuzzyRuleBuilder<T> {
        FuzzyRuleBuilder {
            label: self.label,
            conditions: self.conditions,
            conclusions: self.conclusions,
            state: PhantomData,
        }
    }
}

impl FuzzyRuleBuilder<Empty> {
    pub fn new(label: impl AsRef<str>) -> FuzzyResult<Self> {
        Ok(FuzzyRuleBuilder {
            label: Label::new(label)?,
            conditions: Vec::new(),
            conclusions: Vec::new(),
            state: PhantomData,
        })
    }

    pub fn when(mut self, condition: Condition) -> FuzzyRuleBuilder<HasConditions> {
        self.conditions.push(condition.with_connective(Connective::If));
        self.transition()
    }
}

macro_rules! attach_conditions {
    ($($state:ty),*) => {
        $(
            impl FuzzyRuleBuilder<$state> {
                pub fn and(mut self, condition: Condition) -> Self {
                    self.conditions.push(condition.with_connective(Connective::And));
                    self
                }

                pub fn or(mut self, condition: Condition) -> Self {
                    self.conditions.push(condition.with_connective(Connective::Or));
                    self
                }

                pub fn then(mut self, conclusion: Conclusion) -> FuzzyRuleBuilder<HasConclusions> {
                    self.conclusions.push(conclusion);
                    self.transition()
                }
            }
        )*
    };
}

attach_conditions!(HasConditions, HasConclusions);

impl FuzzyRuleBuilder<HasConclusions> {
    pub fn build(self) -> FuzzyResult<FuzzyRule> {
        FuzzyRule::new(self.label, self.conditions, self.conclusions)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use crate::grammar::service;
    use crate::membership::Singleton;
    use crate::set::FuzzySet;
    use crate::variable::LinguisticVariable;

    pub(crate) fn variables() -> (Arc<LinguisticVariable>, Arc<LinguisticVariable>, Arc<LinguisticVariable>) {
        let food = Arc::new(
            LinguisticVariable::new("food", 0. ..=10., service().sets().iter().cloned()).unwrap(),
        );
        let tip = Arc::new(
            LinguisticVariable::new(
                "tip",
                0. ..=25.,
                [
                    FuzzySet::new("low", Singleton::new(0.).unwrap()).unwrap(),
                    FuzzySet::new("medium", Singleton::new(13.).unwrap()).unwrap(),
                    FuzzySet::new("high", Singleton::new(25.).unwrap()).unwrap(),
                ],
            )
            .unwrap(),
        );

        (food, service(), tip)
    }
}

#[test]
fn test_condition_evaluation() {
    let (food, service, _) = fixtures::variables();
    let mut db = Database::new();

    db.add_variable("food", 2.5).unwrap();
    db.add_variable("service", 7.5).unwrap();

    // food poor = 0.5, service good = 0.5, service average = 0.5
    let condition = Condition::when(food.is("poor").unwrap())
        .and(service.is_not("good").unwrap())
        .or(service.is("average").unwrap())
        .build()
        .unwrap();

    assert_eq!(condition.evaluate(&db, &FuzzyEvaluator::default()).unwrap(), 0.5);
    assert_eq!(
        condition.to_string(),
        "IF food IS poor AND service IS NOT good OR service IS average"
    );

    let weighted = Condition::when(food.is("poor").unwrap())
        .weight(UnitInterval::new(0.5).unwrap())
        .build()
        .unwrap();

    assert_eq!(weighted.evaluate(&db, &FuzzyEvaluator::default()).unwrap(), 0.25);
}

#[test]
fn test_negated_premises() {
    use crate::ops::{TConorm, TNorm};

    let (food, service, _) = fixtures::variables();
    let mut db = Database::new();

    db.add_variable("food", 2.5).unwrap();
    db.add_variable("service", 10.).unwrap();

    // service good = 1, service poor = 0
    let not_good = Condition::when(food.is("poor").unwrap())
        .and(service.is_not("good").unwrap())
        .build()
        .unwrap();
    let not_poor = Condition::when(food.is("poor").unwrap())
        .and(service.is_not("poor").unwrap())
        .build()
        .unwrap();
    let product = FuzzyEvaluator::new(TNorm::AlgebraicProduct, TConorm::Maximum);

    assert_eq!(not_good.evaluate(&db, &FuzzyEvaluator::default()).unwrap(), 0.);
    assert_eq!(not_good.evaluate(&db, &product).unwrap(), 0.);
    assert_eq!(not_poor.evaluate(&db, &FuzzyEvaluator::default()).unwrap(), 0.5);
    assert_eq!(not_poor.evaluate(&db, &product).unwrap(), 0.5);

    db.update("service", 0.).unwrap();

    assert_eq!(not_good.evaluate(&db, &product).unwrap(), 0.5);
    assert_eq!(not_poor.evaluate(&db, &product).unwrap(), 0.);
}

#[test]
fn test_missing_variable_fails() {
    let (food, service, _) = fixtures::variables();
    let mut db = Database::new();

    db.add_variable("food", 2.5).unwrap();

    let condition = Condition::when(food.is("poor").unwrap())
        .or(service.is("good").unwrap())
        .build()
        .unwrap();

    assert_eq!(
        condition.evaluate(&db, &FuzzyEvaluator::default()),
        Err(FuzzyError::MissingVariable(Label::new("service").unwrap()))
    );
}

#[test]
fn test_invalid_conditions() {
    let (food, _, _) = fixtures::variables();
    let poor = food.is("poor").unwrap();

    assert_eq!(
        Condition::new(Vec::new(), UnitInterval::ONE),
        Err(FuzzyError::EmptyCondition)
    );
    assert!(matches!(
        Condition::new(vec![Premise::new(Connective::And, poor.clone())], UnitInterval::ONE),
        Err(FuzzyError::InvalidConnective(_))
    ));
    assert!(matches!(
        Condition::new(
            vec![Premise::new(Connective::If, poor.clone()), Premise::new(Connective::If, poor)],
            UnitInterval::ONE
        ),
        Err(FuzzyError::InvalidConnective(_))
    ));
}

#[test]
fn test_rule_evaluation() {
    let (food, service, tip) = fixtures::variables();
    let mut db = Database::new();

    db.add_variable("food", 2.5).unwrap();
    db.add_variable("service", 10.).unwrap();

    // (poor = 0.5 AND average = 0.5) OR (good = 1)
    let rule = FuzzyRule::builder("generous")
        .unwrap()
        .when(Condition::when(food.is("poor").unwrap()).build().unwrap())
        .and(Condition::when(food.is("average").unwrap()).build().unwrap())
        .or(Condition::when(service.is("good").unwrap()).build().unwrap())
        .then(Conclusion::new(&tip, "high").unwrap())
        .then(Conclusion::new(&tip, "medium").unwrap())
        .build()
        .unwrap();

    let outputs = rule.evaluate(&db, &FuzzyEvaluator::default()).unwrap();

    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0].subject.as_str(), "tip");
    assert_eq!(outputs[0].set.state().as_str(), "high");
    assert_eq!(outputs[0].firing_strength, 1.);
    assert_eq!(outputs[1].set.state().as_str(), "medium");
    assert_eq!(outputs[1].firing_strength, 1.);

    db.update("service", 0.).unwrap();

    assert_eq!(rule.firing_strength(&db, &FuzzyEvaluator::default()).unwrap(), 0.5);
    assert_eq!(
        rule.to_string(),
        "generous: IF food IS poor AND (food IS average) OR (service IS good) THEN tip IS high THEN tip IS medium"
    );
}

#[test]
fn test_rule_connective_invariants() {
    let (food, _, tip) = fixtures::variables();
    let label = Label::new("broken").unwrap();
    let condition = Condition::when(food.is("poor").unwrap()).build().unwrap();
    let conclusion = Conclusion::new(&tip, "low").unwrap();

    // First condition isn't IF
    assert!(matches!(
        FuzzyRule::new(
            label.clone(),
            vec![condition.clone().with_connective(Connective::Or)],
            vec![conclusion.clone()]
        ),
        Err(FuzzyError::InvalidConnective(_))
    ));
    // A later condition is IF
    assert!(matches!(
        FuzzyRule::new(
            label.clone(),
            vec![condition.clone(), condition.clone()],
            vec![conclusion.clone()]
        ),
        Err(FuzzyError::InvalidConnective(_))
    ));
    assert_eq!(
        FuzzyRule::new(label.clone(), Vec::new(), vec![conclusion.clone()]),
        Err(FuzzyError::EmptyRule(label.clone()))
    );
    assert_eq!(
        FuzzyRule::new(label.clone(), vec![condition.clone()], Vec::new()),
        Err(FuzzyError::EmptyRule(label.clone()))
    );
    assert!(FuzzyRule::new(label, vec![condition], vec![conclusion]).is_ok());
}
