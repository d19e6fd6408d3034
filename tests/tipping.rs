//! The classic tipping problem, run through the public API

use std::sync::Arc;

use approx::assert_relative_eq;
use fuzzy_rulebase::{
    Conclusion, Condition, DefuzzificationOp, Defuzzifier, EngineConfig, FuzzyError, FuzzyRule, FuzzySet,
    InferenceEngine, Label, LinguisticVariable, MamdaniEngine, MembershipFunction, Singleton, SugenoEngine,
    TConorm, TNorm, Trapezoidal, Triangular,
};

fn quality(subject: &str) -> Arc<LinguisticVariable> {
    let sets = [
        FuzzySet::new("Poor", Trapezoidal::left_edge(0., 5.).unwrap()).unwrap(),
        FuzzySet::new("Average", Triangular::new(0., 5., 10.).unwrap()).unwrap(),
        FuzzySet::new("Good", Trapezoidal::right_edge(5., 10.).unwrap()).unwrap(),
    ];

    Arc::new(LinguisticVariable::new(subject, 0. ..=10., sets).unwrap())
}

fn tip(low: MembershipFunction, medium: MembershipFunction, high: MembershipFunction) -> Arc<LinguisticVariable> {
    let sets = [
        FuzzySet::new("Low", low).unwrap(),
        FuzzySet::new("Medium", medium).unwrap(),
        FuzzySet::new("High", high).unwrap(),
    ];

    Arc::new(LinguisticVariable::new("Tip", 0. ..=25., sets).unwrap())
}

fn singleton_tip() -> Arc<LinguisticVariable> {
    tip(
        Singleton::new(0.).unwrap().into(),
        Singleton::new(13.).unwrap().into(),
        Singleton::new(25.).unwrap().into(),
    )
}

fn triangle_tip() -> Arc<LinguisticVariable> {
    tip(
        Triangular::new(0., 0., 13.).unwrap().into(),
        Triangular::new(0., 13., 25.).unwrap().into(),
        Triangular::new(13., 25., 25.).unwrap().into(),
    )
}

fn add_rules<D: Defuzzifier>(engine: &mut InferenceEngine<D>, tip: &Arc<LinguisticVariable>) {
    let food = quality("Food");
    let service = quality("Service");

    let rules = [
        FuzzyRule::builder("Rule 1")
            .unwrap()
            .when(
                Condition::when(food.is("poor").unwrap())
                    .or(service.is("poor").unwrap())
                    .build()
                    .unwrap(),
            )
            .then(Conclusion::new(tip, "low").unwrap())
            .build()
            .unwrap(),
        FuzzyRule::builder("Rule 2")
            .unwrap()
            .when(Condition::when(service.is("average").unwrap()).build().unwrap())
            .then(Conclusion::new(tip, "medium").unwrap())
            .build()
            .unwrap(),
        FuzzyRule::builder("Rule 3")
            .unwrap()
            .when(
                Condition::when(food.is("good").unwrap())
                    .or(service.is("good").unwrap())
                    .build()
                    .unwrap(),
            )
            .then(Conclusion::new(tip, "high").unwrap())
            .build()
            .unwrap(),
    ];

    for rule in rules {
        engine.add_rule(rule).unwrap();
    }

    engine.add_variable("Food", 0.).unwrap();
    engine.add_variable("Service", 0.).unwrap();
}

fn run<D: Defuzzifier>(engine: &mut InferenceEngine<D>, food: f64, service: f64) -> f64 {
    engine.update("food", food).unwrap();
    engine.update("service", service).unwrap();

    let outputs = engine.execute().unwrap();

    assert_eq!(outputs.len(), 1);

    outputs.get(&Label::new("tip").unwrap()).unwrap()
}

#[test]
fn mamdani_singleton_tips() {
    let mut engine = MamdaniEngine::mamdani(EngineConfig::default(), DefuzzificationOp::Centroid);

    add_rules(&mut engine, &singleton_tip());

    assert_eq!(run(&mut engine, 5., 5.), 13.);
    assert_eq!(run(&mut engine, 0., 0.), 0.);
    assert_eq!(run(&mut engine, 10., 10.), 25.);
}

#[test]
fn sugeno_singleton_tips() {
    let mut engine = SugenoEngine::sugeno(EngineConfig::default());

    add_rules(&mut engine, &singleton_tip());

    assert_eq!(run(&mut engine, 5., 5.), 13.);
    assert_eq!(run(&mut engine, 0., 0.), 0.);
    assert_eq!(run(&mut engine, 10., 10.), 25.);
}

#[test]
fn mamdani_triangle_tips() {
    let mut engine = MamdaniEngine::mamdani(EngineConfig::default(), DefuzzificationOp::Centroid);

    add_rules(&mut engine, &triangle_tip());

    assert_relative_eq!(run(&mut engine, 0., 0.), 13. / 3., epsilon = 1e-6);
    assert_relative_eq!(run(&mut engine, 5., 5.), 38. / 3., epsilon = 1e-6);
    assert_relative_eq!(run(&mut engine, 10., 10.), 21., epsilon = 1e-6);

    // Mixed inputs fire more than one rule, the tip lands in between
    let mixed = run(&mut engine, 2.5, 7.5);

    assert!(13. / 3. < mixed && mixed < 21., "{mixed}");
}

#[test]
fn every_defuzzification_method_peaks_at_medium() {
    for op in [
        DefuzzificationOp::Centroid,
        DefuzzificationOp::Bisector,
        DefuzzificationOp::MeanOfMaximum,
        DefuzzificationOp::LargestOfMaximum,
        DefuzzificationOp::SmallestOfMaximum,
    ] {
        let mut engine = MamdaniEngine::mamdani(EngineConfig::default(), op);

        add_rules(&mut engine, &singleton_tip());

        assert_eq!(run(&mut engine, 5., 5.), 13., "{op}");
    }
}

#[test]
fn substituted_operators_keep_the_pipeline() {
    let config = EngineConfig::default()
        .with_and_op(TNorm::EinsteinProduct)
        .with_or_op(TConorm::EinsteinSum);
    let mut engine = SugenoEngine::sugeno(config);

    add_rules(&mut engine, &singleton_tip());

    // Crisp extremes give the same tips under any algebra
    assert_eq!(run(&mut engine, 5., 5.), 13.);
    assert_eq!(run(&mut engine, 10., 10.), 25.);
}

#[test]
fn missing_input_aborts_execution() {
    let mut engine = MamdaniEngine::mamdani(EngineConfig::default(), DefuzzificationOp::Centroid);

    add_rules(&mut engine, &singleton_tip());
    engine.delete_variable("service");

    assert_eq!(
        engine.execute(),
        Err(FuzzyError::MissingVariable(Label::new("service").unwrap()))
    );
    assert_eq!(engine.database().len(), 1);
    assert_eq!(engine.rulebase().len(), 3);
}
