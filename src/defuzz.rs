use std::fmt;

use crate::error::{FuzzyError, FuzzyResult};
use crate::label::Label;
use crate::linspace::Linspace;
use crate::math::{center_of_gravity, interp_at, segment_areas};
use crate::membership::Membership;
use crate::rules::FuzzyOutput;

/// Number of evenly spaced samples taken across an output's range
pub const SAMPLES: usize = 1001;

/// The crisp value inferred for one output variable
#[derive(Clone, Debug, PartialEq)]
pub struct Output {
    pub subject: Label,
    pub value: f64,
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.subject, self.value)
    }
}

/// Reduces the weighted fuzzy sets concluded for one output variable to one
/// crisp number.
///
/// `outputs` is never empty when called by the engine and every entry shares
/// the same subject.
pub trait Defuzzifier {
    fn defuzzify(&self, outputs: &[FuzzyOutput]) -> FuzzyResult<Output>;
}

impl<D: Defuzzifier + ?Sized> Defuzzifier for &D {
    fn defuzzify(&self, outputs: &[FuzzyOutput]) -> FuzzyResult<Output> {
        (**self).defuzzify(outputs)
    }
}

impl<D: Defuzzifier + ?Sized> Defuzzifier for Box<D> {
    fn defuzzify(&self, outputs: &[FuzzyOutput]) -> FuzzyResult<Output> {
        (**self).defuzzify(outputs)
    }
}

/// Checks the group shares one subject and that something in it fired
fn check_group(outputs: &[FuzzyOutput]) -> FuzzyResult<&Label> {
    let (first, rest) = outputs.split_first().ok_or(FuzzyError::EmptyOutputs)?;

    if let Some(other) = rest.iter().find(|output| output.subject != first.subject) {
        return Err(FuzzyError::MixedSubjects {
            expected: first.subject.clone(),
            found: other.subject.clone(),
        });
    }

    if outputs.iter().all(|output| output.firing_strength.is_zero()) {
        return Err(FuzzyError::ZeroFiringStrength(first.subject.clone()));
    }

    Ok(&first.subject)
}

/// Method for defuzzificating the aggregated output of a Mamdani system.
///
/// Every output set is clipped at its firing strength and the clipped sets
/// are merged with max. The result is sampled over the union of the sets'
/// ranges, plus every corner, before reduction. When every set is a
/// singleton only the supports are considered. A group mixing singletons
/// with continuous sets is rejected.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum DefuzzificationOp {
    /// Center of Gravity
    #[default]
    Centroid,
    /// Bisector of Area
    Bisector,
    /// Mean of the values for which the membership function is maximum
    MeanOfMaximum,
    /// Largest value for which the membership function is maximum
    LargestOfMaximum,
    /// Smallest value for which the membership function is maximum
    SmallestOfMaximum,
}

impl DefuzzificationOp {
    /// Samples the aggregated membership of `outputs`
    fn aggregate(outputs: &[FuzzyOutput], discrete: bool) -> (Vec<f64>, Vec<f64>) {
        let mut universe: Vec<f64> = outputs
            .iter()
            .flat_map(|output| output.set.function().characteristic_points())
            .collect();

        if !discrete {
            let lower = outputs.iter().map(|o| o.set.lower_bound()).fold(f64::INFINITY, f64::min);
            let upper = outputs.iter().map(|o| o.set.upper_bound()).fold(f64::NEG_INFINITY, f64::max);

            universe.extend(Linspace::new(lower, upper, SAMPLES));
        }

        universe.sort_unstable_by(f64::total_cmp);
        universe.dedup();

        let membership = universe
            .iter()
            .map(|&x| {
                outputs
                    .iter()
                    .map(|output| output.firing_strength.min(output.set.membership(x)).value())
                    .fold(0., f64::max)
            })
            .collect();

        (universe, membership)
    }

    fn reduce(self, universe: &[f64], membership: &[f64], discrete: bool) -> Option<f64> {
        let maximum = membership.iter().copied().reduce(f64::max)?;
        let at_maximum = move || {
            universe
                .iter()
                .zip(membership)
                .filter_map(move |(u, m)| if *m == maximum { Some(*u) } else { None })
        };

        match self {
            Self::Centroid => {
                let continuous = if discrete {
                    None
                } else {
                    center_of_gravity(universe, membership)
                };

                continuous.or_else(|| weighted_mean(universe.iter().copied().zip(membership.iter().copied())))
            },
            Self::Bisector if discrete => {
                let target = membership.iter().sum::<f64>() / 2.;
                let mut cumulative = 0.;

                universe.iter().zip(membership).find_map(|(u, m)| {
                    cumulative += m;
                    (cumulative >= target).then_some(*u)
                })
            },
            Self::Bisector => {
                let areas = segment_areas(universe, membership);
                let target = areas.iter().sum::<f64>() / 2.;

                if target <= 0. {
                    return Self::MeanOfMaximum.reduce(universe, membership, discrete);
                }

                let mut cum_area = 0.;

                for (i, area) in areas.iter().enumerate() {
                    cum_area += area;

                    if cum_area >= target {
                        let coords = [(cum_area - area, universe[i]), (cum_area, universe[i + 1])];

                        return interp_at(target, &coords);
                    }
                }

                universe.last().copied()
            },
            Self::MeanOfMaximum => {
                let (len, sum) = at_maximum().fold((0usize, 0.), |(len, sum), u| (len + 1, sum + u));

                (len > 0).then(|| sum / len as f64)
            },
            Self::LargestOfMaximum => at_maximum().reduce(f64::max),
            Self::SmallestOfMaximum => at_maximum().reduce(f64::min),
        }
    }
}

impl Defuzzifier for DefuzzificationOp {
    fn defuzzify(&self, outputs: &[FuzzyOutput]) -> FuzzyResult<Output> {
        let subject = check_group(outputs)?;
        let singletons = outputs
            .iter()
            .filter(|output| output.set.function().is_singleton())
            .count();

        if singletons != 0 && singletons != outputs.len() {
            return Err(FuzzyError::MixedSetKinds(subject.clone()));
        }

        let discrete = singletons != 0;
        let (universe, membership) = Self::aggregate(outputs, discrete);

        // Clipping can still zero out everything, ie strengths fired on sets
        // whose samples all sit at zero height
        if membership.iter().all(|m| *m == 0.) {
            return Err(FuzzyError::ZeroFiringStrength(subject.clone()));
        }

        let value = self
            .reduce(&universe, &membership, discrete)
            .ok_or_else(|| FuzzyError::ZeroFiringStrength(subject.clone()))?;

        Ok(Output {
            subject: subject.clone(),
            value,
        })
    }
}

impl fmt::Display for DefuzzificationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Centroid => "centroid",
            Self::Bisector => "bisector",
            Self::MeanOfMaximum => "mean_of_maximum",
            Self::LargestOfMaximum => "largest_of_maximum",
            Self::SmallestOfMaximum => "smallest_of_maximum",
        })
    }
}

fn weighted_mean(points: impl IntoIterator<Item = (f64, f64)>) -> Option<f64> {
    let (moment, total) = points
        .into_iter()
        .fold((0., 0.), |(moment, total), (x, w)| (moment + x * w, total + w));

    (total > 0.).then(|| moment / total)
}

/// Sugeno style defuzzification: the average of each set's centroid,
/// weighted by its firing strength.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct WeightedAverage;

impl Defuzzifier for WeightedAverage {
    fn defuzzify(&self, outputs: &[FuzzyOutput]) -> FuzzyResult<Output> {
        let subject = check_group(outputs)?;
        let value = weighted_mean(
            outputs
                .iter()
                .map(|output| (output.set.centroid(), output.firing_strength.value())),
        )
        .ok_or_else(|| FuzzyError::ZeroFiringStrength(subject.clone()))?;

        Ok(Output {
            subject: subject.clone(),
            value,
        })
    }
}

#[cfg(test)]
fn output(subject: &str, set: crate::set::FuzzySet, strength: f64) -> FuzzyOutput {
    use crate::unit_interval::UnitInterval;

    FuzzyOutput {
        subject: Label::new(subject).unwrap(),
        set,
        firing_strength: UnitInterval::new(strength).unwrap(),
    }
}

#[cfg(test)]
fn singletons(strengths: [f64; 3]) -> Vec<FuzzyOutput> {
    use crate::membership::Singleton;
    use crate::set::FuzzySet;

    [("low", 0.), ("medium", 13.), ("high", 25.)]
        .into_iter()
        .zip(strengths)
        .map(|((state, support), strength)| {
            output("tip", FuzzySet::new(state, Singleton::new(support).unwrap()).unwrap(), strength)
        })
        .collect()
}

#[cfg(test)]
fn triangles(strengths: [f64; 3]) -> Vec<FuzzyOutput> {
    use crate::membership::Triangular;
    use crate::set::FuzzySet;

    [("low", (0., 0., 13.)), ("medium", (0., 13., 25.)), ("high", (13., 25., 25.))]
        .into_iter()
        .zip(strengths)
        .map(|((state, (a, b, c)), strength)| {
            output("tip", FuzzySet::new(state, Triangular::new(a, b, c).unwrap()).unwrap(), strength)
        })
        .collect()
}

#[test]
fn test_singleton_centroid() {
    let op = DefuzzificationOp::Centroid;

    assert_eq!(op.defuzzify(&singletons([0., 1., 0.])).unwrap().value, 13.);
    assert_eq!(op.defuzzify(&singletons([1., 0., 0.])).unwrap().value, 0.);
    assert_eq!(op.defuzzify(&singletons([0., 0., 1.])).unwrap().value, 25.);
    // (13 * 0.5 + 25 * 0.5) / 1
    assert_eq!(op.defuzzify(&singletons([0., 0.5, 0.5])).unwrap().value, 19.);
}

#[test]
fn test_singleton_maximum_methods() {
    let outputs = singletons([0.5, 0.25, 0.5]);

    assert_eq!(DefuzzificationOp::MeanOfMaximum.defuzzify(&outputs).unwrap().value, 12.5);
    assert_eq!(DefuzzificationOp::LargestOfMaximum.defuzzify(&outputs).unwrap().value, 25.);
    assert_eq!(DefuzzificationOp::SmallestOfMaximum.defuzzify(&outputs).unwrap().value, 0.);
    // Half of 1.25 is reached at 13
    assert_eq!(DefuzzificationOp::Bisector.defuzzify(&outputs).unwrap().value, 13.);
}

#[test]
fn test_sampled_centroid() {
    use approx::assert_relative_eq;

    let op = DefuzzificationOp::Centroid;

    assert_relative_eq!(op.defuzzify(&triangles([1., 0., 0.])).unwrap().value, 13. / 3., epsilon = 1e-6);
    assert_relative_eq!(op.defuzzify(&triangles([0., 1., 0.])).unwrap().value, 38. / 3., epsilon = 1e-6);
    assert_relative_eq!(op.defuzzify(&triangles([0., 0., 1.])).unwrap().value, 21., epsilon = 1e-6);
}

#[test]
fn test_sampled_maximum_methods() {
    use approx::assert_relative_eq;

    let outputs = triangles([0., 1., 0.]);

    assert_relative_eq!(
        DefuzzificationOp::MeanOfMaximum.defuzzify(&outputs).unwrap().value,
        13.,
        epsilon = 1e-9
    );

    // Clipped at 0.5, medium is flat between 6.5 and 19
    let outputs = triangles([0., 0.5, 0.]);
    let som = DefuzzificationOp::SmallestOfMaximum.defuzzify(&outputs).unwrap().value;
    let lom = DefuzzificationOp::LargestOfMaximum.defuzzify(&outputs).unwrap().value;

    assert_relative_eq!(som, 6.5, epsilon = 0.05);
    assert_relative_eq!(lom, 19., epsilon = 0.05);

    // A symmetric shape splits its area in the middle
    let outputs = vec![output(
        "tip",
        crate::set::FuzzySet::new("mid", crate::membership::Triangular::new(5., 10., 15.).unwrap()).unwrap(),
        1.,
    )];

    assert_relative_eq!(
        DefuzzificationOp::Bisector.defuzzify(&outputs).unwrap().value,
        10.,
        epsilon = 1e-3
    );
}

#[test]
fn test_weighted_average() {
    use approx::assert_relative_eq;

    assert_eq!(WeightedAverage.defuzzify(&singletons([0., 1., 0.])).unwrap().value, 13.);
    assert_eq!(WeightedAverage.defuzzify(&singletons([0., 0.5, 0.5])).unwrap().value, 19.);
    assert_relative_eq!(
        WeightedAverage.defuzzify(&triangles([1., 0., 0.])).unwrap().value,
        13. / 3.,
        epsilon = 1e-9
    );
}

#[test]
fn test_invalid_groups() {
    let tip = Label::new("tip").unwrap();

    let defuzzifiers: [&dyn Defuzzifier; 3] = [
        &DefuzzificationOp::Centroid,
        &DefuzzificationOp::Bisector,
        &WeightedAverage,
    ];

    for defuzzifier in defuzzifiers {
        assert_eq!(defuzzifier.defuzzify(&[]), Err(FuzzyError::EmptyOutputs));
        assert_eq!(
            defuzzifier.defuzzify(&singletons([0., 0., 0.])),
            Err(FuzzyError::ZeroFiringStrength(tip.clone()))
        );

        let mut mixed = singletons([1., 0., 0.]);
        mixed[2].subject = Label::new("bonus").unwrap();

        assert_eq!(
            defuzzifier.defuzzify(&mixed),
            Err(FuzzyError::MixedSubjects {
                expected: tip.clone(),
                found: Label::new("bonus").unwrap(),
            })
        );
    }
}

#[test]
fn test_mixed_set_kinds() {
    use approx::assert_relative_eq;

    // Low triangle barely fired, high singleton fully fired
    let mut outputs = triangles([0.2, 0., 0.]);
    outputs.truncate(1);
    outputs.extend(singletons([0., 0., 1.]).into_iter().skip(2));

    for op in [
        DefuzzificationOp::Centroid,
        DefuzzificationOp::Bisector,
        DefuzzificationOp::MeanOfMaximum,
    ] {
        assert_eq!(
            op.defuzzify(&outputs),
            Err(FuzzyError::MixedSetKinds(Label::new("tip").unwrap())),
            "{op}"
        );
    }

    // (13 / 3 * 0.2 + 25 * 1) / 1.2
    assert_relative_eq!(
        WeightedAverage.defuzzify(&outputs).unwrap().value,
        (13. / 3. * 0.2 + 25.) / 1.2,
        epsilon = 1e-9
    );
}
