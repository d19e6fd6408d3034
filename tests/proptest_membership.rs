//! Property tests for membership functions and fuzzification

use fuzzy_rulebase::{
    FuzzySet, LinguisticVariable, Membership, TrapezoidEdges, Trapezoidal, Triangular, UnitInterval,
};
use proptest::prelude::*;

fn sorted<const N: usize>(mut xs: [f64; N]) -> [f64; N] {
    xs.sort_unstable_by(f64::total_cmp);
    xs
}

fn heights() -> impl Strategy<Value = (UnitInterval, UnitInterval)> {
    (0.0..=0.5f64, 0.5..=1.0f64)
        .prop_map(|(min, max)| (UnitInterval::new(min).unwrap(), UnitInterval::new(max).unwrap()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn triangle_within_heights(
        xs in prop::array::uniform3(0.0..100.0f64).prop_map(sorted),
        (min_y, max_y) in heights(),
        x in -10.0..110.0f64,
    ) {
        let [x1, x2, x3] = xs;
        let triangle = Triangular::with_heights(x1, x2, x3, min_y, max_y).unwrap();
        let degree = triangle.membership(x);

        prop_assert!(min_y <= degree && degree <= max_y, "{} at {}", degree, x);

        if x < triangle.lower_bound() || x > triangle.upper_bound() {
            prop_assert_eq!(degree, min_y);
        }
    }

    #[test]
    fn trapezoid_within_heights(
        xs in prop::array::uniform4(0.0..100.0f64).prop_map(sorted),
        (min_y, max_y) in heights(),
        x in -10.0..110.0f64,
    ) {
        let [x1, x2, x3, x4] = xs;
        let trapezoid = Trapezoidal::with_heights(TrapezoidEdges::Closed(x1, x2, x3, x4), min_y, max_y).unwrap();
        let degree = trapezoid.membership(x);

        prop_assert!(min_y <= degree && degree <= max_y, "{} at {}", degree, x);

        if x < trapezoid.lower_bound() || x > trapezoid.upper_bound() {
            prop_assert_eq!(degree, min_y);
        }

        // The plateau is always at full height
        if x2 < x && x < x3 {
            prop_assert_eq!(degree, max_y);
        }
    }

    #[test]
    fn shoulders_keep_their_height(
        xs in prop::array::uniform2(0.0..100.0f64).prop_map(sorted),
        x in -10.0..110.0f64,
    ) {
        let [x1, x2] = xs;
        let left = Trapezoidal::left_edge(x1, x2).unwrap();
        let right = Trapezoidal::right_edge(x1, x2).unwrap();

        if x < x1 {
            prop_assert_eq!(left.membership(x), UnitInterval::ONE);
            prop_assert_eq!(right.membership(x), UnitInterval::ZERO);
        }
        if x > x2 {
            prop_assert_eq!(left.membership(x), UnitInterval::ZERO);
            prop_assert_eq!(right.membership(x), UnitInterval::ONE);
        }
    }

    /// Every state of a variable is fuzzified, in declaration order
    #[test]
    fn fuzzify_covers_every_state(x in -5.0..15.0f64) {
        let variable = LinguisticVariable::new(
            "temperature",
            0. ..=10.,
            [
                FuzzySet::new("cold", Trapezoidal::left_edge(0., 5.).unwrap()).unwrap(),
                FuzzySet::new("mild", Triangular::new(0., 5., 10.).unwrap()).unwrap(),
                FuzzySet::new("hot", Trapezoidal::right_edge(5., 10.).unwrap()).unwrap(),
            ],
        )
        .unwrap();
        let fuzzified = variable.fuzzify(x);
        let states: Vec<&str> = fuzzified.iter().map(|(state, _)| state.as_str()).collect();

        prop_assert_eq!(states, vec!["cold", "mild", "hot"]);

        for (_, degree) in &fuzzified {
            prop_assert!((0. ..=1.).contains(&degree.value()));
        }

        // The shoulders and the triangle partition the range
        let total: f64 = fuzzified.iter().map(|(_, degree)| degree.value()).sum();

        prop_assert!((total - 1.).abs() < 1e-9, "{} at {}", total, x);
    }
}
