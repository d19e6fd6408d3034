use std::fmt;
use std::str::FromStr;

use crate::error::{FuzzyError, FuzzyResult};
use crate::unit_interval::UnitInterval;

/// T-norm used to AND together the premises of a rule.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum TNorm {
    /// `min(a, b)`
    #[default]
    Minimum,
    /// `a * b`
    AlgebraicProduct,
    /// `max(a + b - 1, 0)`
    Lukasiewicz,
    /// `min(a, b)` if either is 1, otherwise 0
    DrasticProduct,
    /// `ab / (2 - (a + b - ab))`
    EinsteinProduct,
    /// `ab / (a + b - ab)`, 0 when both are 0
    HamacherProduct,
    /// `min(a, b)` if `a + b > 1`, otherwise 0
    NilpotentMinimum,
}

impl TNorm {
    pub const ALL: [TNorm; 7] = [
        Self::Minimum,
        Self::AlgebraicProduct,
        Self::Lukasiewicz,
        Self::DrasticProduct,
        Self::EinsteinProduct,
        Self::HamacherProduct,
        Self::NilpotentMinimum,
    ];

    /// Validates raw inputs before applying the norm.
    pub fn apply(self, a: f64, b: f64) -> FuzzyResult<UnitInterval> {
        self.evaluate(UnitInterval::new(a)?, UnitInterval::new(b)?)
    }

    pub fn evaluate(self, a: UnitInterval, b: UnitInterval) -> FuzzyResult<UnitInterval> {
        let (u, v) = (a.value(), b.value());
        let value = match self {
            Self::Minimum => return Ok(a.min(b)),
            Self::AlgebraicProduct => return Ok(a * b),
            Self::Lukasiewicz => f64::max(u - (1. - v), 0.),
            Self::DrasticProduct => {
                if a.max(b).is_one() {
                    return Ok(a.min(b));
                }

                return Ok(UnitInterval::ZERO);
            },
            Self::EinsteinProduct => {
                let denominator = 2. - probabilistic_sum(u, v);

                if denominator <= 0. {
                    0.
                } else {
                    u * v / denominator
                }
            },
            Self::HamacherProduct => {
                let denominator = probabilistic_sum(u, v);

                if denominator <= 0. {
                    0.
                } else {
                    u * v / denominator
                }
            },
            Self::NilpotentMinimum => {
                if u + v > 1. {
                    return Ok(a.min(b));
                }

                0.
            },
        };

        UnitInterval::from_rounded(value)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Minimum => "minimum",
            Self::AlgebraicProduct => "algebraic_product",
            Self::Lukasiewicz => "lukasiewicz",
            Self::DrasticProduct => "drastic_product",
            Self::EinsteinProduct => "einstein_product",
            Self::HamacherProduct => "hamacher_product",
            Self::NilpotentMinimum => "nilpotent_minimum",
        }
    }
}

/// T-conorm used to OR together the premises of a rule.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum TConorm {
    /// `max(a, b)`
    #[default]
    Maximum,
    /// `a + b - ab`
    ProbabilisticSum,
    /// `min(a + b, 1)`
    BoundedSum,
    /// `max(a, b)` if either is 0, otherwise 1
    DrasticSum,
    /// `(a + b) / (1 + ab)`
    EinsteinSum,
    /// `(a + b - 2ab) / (1 - ab)`, 1 when both are 1
    HamacherSum,
    /// `max(a, b)` if `a + b < 1`, otherwise 1
    NilpotentMaximum,
}

impl TConorm {
    pub const ALL: [TConorm; 7] = [
        Self::Maximum,
        Self::ProbabilisticSum,
        Self::BoundedSum,
        Self::DrasticSum,
        Self::EinsteinSum,
        Self::HamacherSum,
        Self::NilpotentMaximum,
    ];

    /// Validates raw inputs before applying the conorm.
    pub fn apply(self, a: f64, b: f64) -> FuzzyResult<UnitInterval> {
        self.evaluate(UnitInterval::new(a)?, UnitInterval::new(b)?)
    }

    pub fn evaluate(self, a: UnitInterval, b: UnitInterval) -> FuzzyResult<UnitInterval> {
        let (u, v) = (a.value(), b.value());
        let value = match self {
            Self::Maximum => return Ok(a.max(b)),
            Self::ProbabilisticSum => probabilistic_sum(u, v),
            Self::BoundedSum => f64::min(u + v, 1.),
            Self::DrasticSum => {
                if a.min(b).is_zero() {
                    return Ok(a.max(b));
                }

                return Ok(UnitInterval::ONE);
            },
            Self::EinsteinSum => (u + v) / (1. + u * v),
            Self::HamacherSum => {
                let denominator = 1. - u * v;

                if denominator <= 0. {
                    1.
                } else {
                    // Cancels badly when both are close to 1
                    f64::min((u + v - 2. * u * v) / denominator, 1.)
                }
            },
            Self::NilpotentMaximum => {
                if u + v < 1. {
                    return Ok(a.max(b));
                }

                1.
            },
        };

        UnitInterval::from_rounded(value)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Maximum => "maximum",
            Self::ProbabilisticSum => "probabilistic_sum",
            Self::BoundedSum => "bounded_sum",
            Self::DrasticSum => "drastic_sum",
            Self::EinsteinSum => "einstein_sum",
            Self::HamacherSum => "hamacher_sum",
            Self::NilpotentMaximum => "nilpotent_maximum",
        }
    }
}

// a + b - ab, arranged so rounding can't push it below max(a, b) or above 1
fn probabilistic_sum(u: f64, v: f64) -> f64 {
    let (hi, lo) = if u >= v { (u, v) } else { (v, u) };

    hi + lo * (1. - hi)
}

fn normalize_name(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

impl FromStr for TNorm {
    type Err = FuzzyError;

    fn from_str(s: &str) -> FuzzyResult<Self> {
        let name = normalize_name(s);

        match name.as_str() {
            "min" | "and" => Ok(Self::Minimum),
            "prod" | "product" => Ok(Self::AlgebraicProduct),
            "bounded_difference" | "bounded_prod" => Ok(Self::Lukasiewicz),
            "drastic" | "drastic_prod" => Ok(Self::DrasticProduct),
            "einstein" => Ok(Self::EinsteinProduct),
            "hamacher" => Ok(Self::HamacherProduct),
            "nilpotent" => Ok(Self::NilpotentMinimum),
            _ => Self::ALL
                .into_iter()
                .find(|op| op.name() == name)
                .ok_or_else(|| FuzzyError::UnknownOperator(s.to_owned())),
        }
    }
}

impl FromStr for TConorm {
    type Err = FuzzyError;

    fn from_str(s: &str) -> FuzzyResult<Self> {
        let name = normalize_name(s);

        match name.as_str() {
            "max" | "or" => Ok(Self::Maximum),
            "prob_or" | "probor" => Ok(Self::ProbabilisticSum),
            "lukasiewicz" => Ok(Self::BoundedSum),
            "drastic" => Ok(Self::DrasticSum),
            "einstein" => Ok(Self::EinsteinSum),
            "hamacher" => Ok(Self::HamacherSum),
            "nilpotent" => Ok(Self::NilpotentMaximum),
            _ => Self::ALL
                .into_iter()
                .find(|op| op.name() == name)
                .ok_or_else(|| FuzzyError::UnknownOperator(s.to_owned())),
        }
    }
}

impl fmt::Display for TNorm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for TConorm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
fn ui(value: f64) -> UnitInterval {
    UnitInterval::new(value).unwrap()
}

#[test]
fn test_t_norms() {
    let (a, b) = (ui(0.5), ui(0.25));

    assert_eq!(TNorm::Minimum.evaluate(a, b).unwrap(), 0.25);
    assert_eq!(TNorm::AlgebraicProduct.evaluate(a, b).unwrap(), 0.125);
    assert_eq!(TNorm::Lukasiewicz.evaluate(a, b).unwrap(), 0.);
    assert_eq!(TNorm::Lukasiewicz.evaluate(ui(0.75), ui(0.5)).unwrap(), 0.25);
    assert_eq!(TNorm::DrasticProduct.evaluate(a, b).unwrap(), 0.);
    assert_eq!(TNorm::DrasticProduct.evaluate(ui(1.), b).unwrap(), 0.25);
    // 0.125 / (2 - 0.625)
    assert_eq!(TNorm::EinsteinProduct.evaluate(a, b).unwrap(), 0.125 / 1.375);
    // 0.125 / 0.625
    assert_eq!(TNorm::HamacherProduct.evaluate(a, b).unwrap(), 0.2);
    assert_eq!(TNorm::HamacherProduct.evaluate(ui(0.), ui(0.)).unwrap(), 0.);
    assert_eq!(TNorm::NilpotentMinimum.evaluate(a, b).unwrap(), 0.);
    assert_eq!(TNorm::NilpotentMinimum.evaluate(ui(0.75), a).unwrap(), 0.5);
}

#[test]
fn test_t_conorms() {
    let (a, b) = (ui(0.5), ui(0.25));

    assert_eq!(TConorm::Maximum.evaluate(a, b).unwrap(), 0.5);
    assert_eq!(TConorm::ProbabilisticSum.evaluate(a, b).unwrap(), 0.625);
    assert_eq!(TConorm::BoundedSum.evaluate(a, b).unwrap(), 0.75);
    assert_eq!(TConorm::BoundedSum.evaluate(ui(0.75), a).unwrap(), 1.);
    assert_eq!(TConorm::DrasticSum.evaluate(a, b).unwrap(), 1.);
    assert_eq!(TConorm::DrasticSum.evaluate(ui(0.), b).unwrap(), 0.25);
    // 0.75 / 1.125
    assert_eq!(TConorm::EinsteinSum.evaluate(a, b).unwrap(), 0.75 / 1.125);
    assert_eq!(TConorm::EinsteinSum.evaluate(ui(1.), ui(1.)).unwrap(), 1.);
    assert_eq!(TConorm::HamacherSum.evaluate(ui(0.), ui(0.)).unwrap(), 0.);
    assert_eq!(TConorm::HamacherSum.evaluate(ui(1.), ui(0.5)).unwrap(), 1.);
    assert_eq!(TConorm::HamacherSum.evaluate(ui(1.), ui(1.)).unwrap(), 1.);
    assert_eq!(TConorm::NilpotentMaximum.evaluate(a, b).unwrap(), 0.5);
    assert_eq!(TConorm::NilpotentMaximum.evaluate(ui(0.75), a).unwrap(), 1.);
}

#[test]
fn test_boundaries() {
    // Every t-norm has 1 as identity, every t-conorm has 0
    for x in [0., 0.3, 0.5, 1.] {
        for norm in TNorm::ALL {
            assert_eq!(norm.evaluate(ui(x), UnitInterval::ONE).unwrap(), x, "{norm}");
        }
        for conorm in TConorm::ALL {
            assert_eq!(conorm.evaluate(ui(x), UnitInterval::ZERO).unwrap(), x, "{conorm}");
        }
    }
}

#[test]
fn test_out_of_range_inputs() {
    assert_eq!(TNorm::Minimum.apply(1.5, 0.5), Err(FuzzyError::OutOfUnitInterval(1.5)));
    assert_eq!(TConorm::Maximum.apply(0.5, -0.5), Err(FuzzyError::OutOfUnitInterval(-0.5)));
    assert!(matches!(TConorm::BoundedSum.apply(f64::NAN, 0.5), Err(FuzzyError::NotFinite(_))));
    assert_eq!(TNorm::AlgebraicProduct.apply(0.5, 0.5).unwrap(), 0.25);
}

#[test]
fn test_parse_operators() {
    assert_eq!("min".parse::<TNorm>().unwrap(), TNorm::Minimum);
    assert_eq!("Hamacher Product".parse::<TNorm>().unwrap(), TNorm::HamacherProduct);
    assert_eq!("einstein-sum".parse::<TConorm>().unwrap(), TConorm::EinsteinSum);
    assert_eq!("prob_or".parse::<TConorm>().unwrap(), TConorm::ProbabilisticSum);
    assert_eq!(
        "median".parse::<TNorm>(),
        Err(FuzzyError::UnknownOperator("median".to_owned()))
    );

    for norm in TNorm::ALL {
        assert_eq!(norm.to_string().parse::<TNorm>().unwrap(), norm);
    }
    for conorm in TConorm::ALL {
        assert_eq!(conorm.to_string().parse::<TConorm>().unwrap(), conorm);
    }
}
