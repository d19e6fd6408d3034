use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use crate::database::{DataPoint, Database};
use crate::defuzz::{DefuzzificationOp, Defuzzifier, WeightedAverage};
use crate::error::FuzzyResult;
use crate::evaluator::FuzzyEvaluator;
use crate::label::Label;
use crate::ops::{TConorm, TNorm};
use crate::outputs::Outputs;
use crate::rulebase::{RuleKey, Rulebase};
use crate::rules::{FuzzyOutput, FuzzyRule};

/// The operator algebra an engine evaluates rules with
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EngineConfig {
    pub and_op: TNorm,
    pub or_op: TConorm,
}

impl EngineConfig {
    pub fn new(and_op: TNorm, or_op: TConorm) -> Self {
        EngineConfig { and_op, or_op }
    }

    pub fn with_and_op(mut self, and_op: TNorm) -> Self {
        self.and_op = and_op;
        self
    }

    pub fn with_or_op(mut self, or_op: TConorm) -> Self {
        self.or_op = or_op;
        self
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EngineKind {
    Mamdani,
    Sugeno,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mamdani => "mamdani",
            Self::Sugeno => "sugeno",
        })
    }
}

pub type MamdaniEngine = InferenceEngine<DefuzzificationOp>;
pub type SugenoEngine = InferenceEngine<WeightedAverage>;

/// Ties the input facts and the rules together and hands every output
/// variable's fuzzy results to a defuzzifier.
///
/// The evaluation pipeline is the same for every kind of engine, only the
/// defuzzifier differs.
#[derive(Clone, Debug)]
pub struct InferenceEngine<D> {
    kind: Option<EngineKind>,
    database: Database,
    rulebase: Rulebase,
    evaluator: FuzzyEvaluator,
    defuzzifier: D,
}

impl MamdaniEngine {
    pub fn mamdani(config: EngineConfig, defuzz_op: DefuzzificationOp) -> Self {
        let mut engine = Self::new(config, defuzz_op);
        engine.kind = Some(EngineKind::Mamdani);
        engine
    }
}

impl SugenoEngine {
    pub fn sugeno(config: EngineConfig) -> Self {
        let mut engine = Self::new(config, WeightedAverage);
        engine.kind = Some(EngineKind::Sugeno);
        engine
    }
}

impl<D: Defuzzifier> InferenceEngine<D> {
    /// An engine with empty stores
    pub fn new(config: EngineConfig, defuzzifier: D) -> Self {
        InferenceEngine {
            kind: None,
            database: Database::new(),
            rulebase: Rulebase::new(),
            evaluator: FuzzyEvaluator::new(config.and_op, config.or_op),
            defuzzifier,
        }
    }

    /// `None` for engines built around a custom defuzzifier
    pub fn kind(&self) -> Option<EngineKind> {
        self.kind
    }

    pub fn config(&self) -> EngineConfig {
        EngineConfig::new(self.evaluator.and_op(), self.evaluator.or_op())
    }

    pub fn defuzzifier(&self) -> &D {
        &self.defuzzifier
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn database_mut(&mut self) -> &mut Database {
        &mut self.database
    }

    pub fn rulebase(&self) -> &Rulebase {
        &self.rulebase
    }

    pub fn rulebase_mut(&mut self) -> &mut Rulebase {
        &mut self.rulebase
    }

    pub fn add_variable(&mut self, label: impl AsRef<str>, value: f64) -> FuzzyResult<()> {
        self.database.add_variable(label, value)
    }

    pub fn update(&mut self, label: impl AsRef<str>, value: f64) -> FuzzyResult<()> {
        self.database.update(label, value)
    }

    pub fn delete_variable(&mut self, label: impl AsRef<str>) -> Option<DataPoint> {
        self.database.delete_variable(label)
    }

    pub fn add_rule(&mut self, rule: FuzzyRule) -> FuzzyResult<RuleKey> {
        self.rulebase.add_rule(rule)
    }

    pub fn delete_rule(&mut self, label: &Label) -> FuzzyResult<FuzzyRule> {
        self.rulebase.delete_rule(label)
    }

    /// Every rule's outputs, rule by rule in insertion order. Fails as soon
    /// as one rule references a variable missing from the database.
    pub fn evaluate_rules(&self) -> FuzzyResult<Vec<FuzzyOutput>> {
        let mut outputs = Vec::new();

        for rule in self.rulebase.get_all_rules() {
            outputs.extend(rule.evaluate(&self.database, &self.evaluator)?);
        }

        Ok(outputs)
    }

    /// Evaluates every rule, groups the results by output subject and
    /// defuzzifies each group. Subjects keep the order they first appear in.
    pub fn execute(&self) -> FuzzyResult<Outputs> {
        let groups = group_by_subject(self.evaluate_rules()?);

        debug!(
            kind = ?self.kind,
            rules = self.rulebase.len(),
            inputs = self.database.len(),
            subjects = groups.len(),
            "executing"
        );

        groups
            .iter()
            .map(|group| {
                let output = self.defuzzifier.defuzzify(group)?;

                trace!(subject = %output.subject, value = output.value, "defuzzified");

                Ok(output)
            })
            .collect::<FuzzyResult<Vec<_>>>()
            .map(Outputs::new)
    }
}

fn group_by_subject(outputs: Vec<FuzzyOutput>) -> Vec<Vec<FuzzyOutput>> {
    let mut index = HashMap::new();
    let mut groups: Vec<Vec<FuzzyOutput>> = Vec::new();

    for output in outputs {
        let i = *index.entry(output.subject.clone()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });

        groups[i].push(output);
    }

    groups
}

#[cfg(test)]
fn tipping<D: Defuzzifier>(engine: &mut InferenceEngine<D>) {
    use crate::grammar::Conclusion;
    use crate::rules::{fixtures, Condition};

    let (food, service, tip) = fixtures::variables();
    let rules = [
        ("stingy", food.is("poor").unwrap(), service.is("poor").unwrap(), "low"),
        ("generous", food.is("good").unwrap(), service.is("good").unwrap(), "high"),
    ];

    for (label, food, service, tip_state) in rules {
        let rule = FuzzyRule::builder(label)
            .unwrap()
            .when(Condition::when(food).or(service).build().unwrap())
            .then(Conclusion::new(&tip, tip_state).unwrap())
            .build()
            .unwrap();

        engine.add_rule(rule).unwrap();
    }

    let standard = FuzzyRule::builder("standard")
        .unwrap()
        .when(Condition::when(service.is("average").unwrap()).build().unwrap())
        .then(Conclusion::new(&tip, "medium").unwrap())
        .build()
        .unwrap();

    engine.add_rule(standard).unwrap();
    engine.add_variable("food", 0.).unwrap();
    engine.add_variable("service", 0.).unwrap();
}

#[test]
fn test_tipping() {
    let tip = Label::new("tip").unwrap();
    let mut engine = MamdaniEngine::mamdani(EngineConfig::default(), DefuzzificationOp::Centroid);

    tipping(&mut engine);

    for (food, service, expected) in [(5., 5., 13.), (0., 0., 0.), (10., 10., 25.)] {
        engine.update("food", food).unwrap();
        engine.update("service", service).unwrap();

        let outputs = engine.execute().unwrap();

        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs.get(&tip), Some(expected));
    }

    assert_eq!(engine.kind(), Some(EngineKind::Mamdani));
}

#[test]
fn test_sugeno_tipping() {
    let tip = Label::new("tip").unwrap();
    let mut engine = SugenoEngine::sugeno(EngineConfig::default());

    tipping(&mut engine);
    engine.update("food", 10.).unwrap();
    engine.update("service", 10.).unwrap();

    assert_eq!(engine.execute().unwrap().get(&tip), Some(25.));

    // service average = 0.5 (medium), food good = 0.5 (high)
    engine.update("food", 7.5).unwrap();
    engine.update("service", 2.5).unwrap();

    // service poor = 0.5 fires low as well
    // (0 * 0.5 + 25 * 0.5 + 13 * 0.5) / 1.5
    assert_eq!(engine.execute().unwrap().get(&tip), Some(19. / 1.5));
    assert_eq!(engine.kind(), Some(EngineKind::Sugeno));
}

#[test]
fn test_evaluate_rules() {
    let mut engine = InferenceEngine::new(EngineConfig::default(), WeightedAverage);

    tipping(&mut engine);
    engine.update("service", 5.).unwrap();

    let outputs = engine.evaluate_rules().unwrap();
    let strengths: Vec<(&str, f64)> = outputs
        .iter()
        .map(|output| (output.set.state().as_str(), output.firing_strength.value()))
        .collect();

    // food poor = 1 at 0
    assert_eq!(strengths, vec![("low", 1.), ("high", 0.), ("medium", 1.)]);
    assert_eq!(engine.kind(), None);
}

#[test]
fn test_missing_variable_fails_execution() {
    use crate::error::FuzzyError;

    let mut engine = MamdaniEngine::mamdani(EngineConfig::default(), DefuzzificationOp::Centroid);

    tipping(&mut engine);

    let food = engine.delete_variable("food").unwrap();

    assert_eq!(food.value(), 0.);
    assert_eq!(
        engine.execute(),
        Err(FuzzyError::MissingVariable(Label::new("food").unwrap()))
    );
}

#[test]
fn test_nothing_fired() {
    use crate::error::FuzzyError;

    let mut engine = MamdaniEngine::mamdani(EngineConfig::default(), DefuzzificationOp::Centroid);

    assert_eq!(engine.execute().unwrap(), Outputs::default());

    tipping(&mut engine);
    engine.delete_rule(&Label::new("stingy").unwrap()).unwrap();

    // Only "stingy" fires at (0, 0)
    assert_eq!(
        engine.execute(),
        Err(FuzzyError::ZeroFiringStrength(Label::new("tip").unwrap()))
    );
}

#[test]
fn test_substituted_operators() {
    let tip = Label::new("tip").unwrap();
    let config = EngineConfig::default()
        .with_and_op(TNorm::AlgebraicProduct)
        .with_or_op(TConorm::ProbabilisticSum);
    let mut engine = SugenoEngine::sugeno(config);

    tipping(&mut engine);
    // food poor = 0.5, service poor = 0.5: 0.5 + 0.5 - 0.25
    engine.update("food", 2.5).unwrap();
    engine.update("service", 2.5).unwrap();

    let outputs = engine.evaluate_rules().unwrap();

    assert_eq!(outputs[0].firing_strength, 0.75);
    assert_eq!(engine.config(), config);
    // (0 * 0.75 + 13 * 0.5) / 1.25
    assert_eq!(engine.execute().unwrap().get(&tip), Some(6.5 / 1.25));
}
