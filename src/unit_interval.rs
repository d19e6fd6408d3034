use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use crate::error::{FuzzyError, FuzzyResult};

/// A value between zero and one, inclusive
///
/// Every constructor checks the range, so a `UnitInterval` observed anywhere
/// is finite and lies in `[0, 1]`. Arithmetic works on the inner value and
/// re-validates whatever it produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct UnitInterval(f64);

impl UnitInterval {
    pub const ZERO: Self = UnitInterval(0.);
    pub const ONE: Self = UnitInterval(1.);

    pub fn new(value: f64) -> FuzzyResult<Self> {
        if !value.is_finite() {
            return Err(FuzzyError::NotFinite(value));
        }

        if !(0. ..=1.).contains(&value) {
            return Err(FuzzyError::OutOfUnitInterval(value));
        }

        Ok(UnitInterval(value))
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn one() -> Self {
        Self::ONE
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// `1 - self`
    pub fn complement(self) -> Self {
        UnitInterval(1. - self.0)
    }

    pub fn min(self, other: Self) -> Self {
        if other.0 < self.0 {
            other
        } else {
            self
        }
    }

    pub fn max(self, other: Self) -> Self {
        if other.0 > self.0 {
            other
        } else {
            self
        }
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.
    }

    pub fn is_one(self) -> bool {
        self.0 == 1.
    }

    /// Pins an interpolated value to `[lower, upper]`, which must be known to
    /// bound it analytically. NaN maps to `lower`.
    pub(crate) fn clamped(value: f64, lower: Self, upper: Self) -> Self {
        if value.is_nan() {
            return lower;
        }

        UnitInterval(value.clamp(lower.0, upper.0))
    }

    /// Same as `new`, except values a rounding error away from `0` or `1`
    /// are pulled back onto the bound.
    pub(crate) fn from_rounded(value: f64) -> FuzzyResult<Self> {
        const TOLERANCE: f64 = 1e-12;

        if !value.is_finite() {
            return Err(FuzzyError::NotFinite(value));
        }

        if (-TOLERANCE..0.).contains(&value) {
            return Ok(Self::ZERO);
        }

        if value > 1. && value <= 1. + TOLERANCE {
            return Ok(Self::ONE);
        }

        Self::new(value)
    }
}

impl TryFrom<f64> for UnitInterval {
    type Error = FuzzyError;

    fn try_from(value: f64) -> FuzzyResult<Self> {
        Self::new(value)
    }
}

impl From<UnitInterval> for f64 {
    fn from(value: UnitInterval) -> f64 {
        value.0
    }
}

impl From<bool> for UnitInterval {
    fn from(b: bool) -> Self {
        if b {
            Self::ONE
        } else {
            Self::ZERO
        }
    }
}

impl PartialEq<f64> for UnitInterval {
    fn eq(&self, other: &f64) -> bool {
        self.0 == *other
    }
}

impl PartialOrd<f64> for UnitInterval {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.0.partial_cmp(other)
    }
}

impl fmt::Display for UnitInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// A product of two values in [0, 1] stays in [0, 1], so this can't fail
impl Mul for UnitInterval {
    type Output = UnitInterval;

    fn mul(self, rhs: Self) -> UnitInterval {
        UnitInterval(self.0 * rhs.0)
    }
}

impl Add for UnitInterval {
    type Output = FuzzyResult<UnitInterval>;

    fn add(self, rhs: Self) -> Self::Output {
        UnitInterval::new(self.0 + rhs.0)
    }
}

impl Sub for UnitInterval {
    type Output = FuzzyResult<UnitInterval>;

    fn sub(self, rhs: Self) -> Self::Output {
        UnitInterval::new(self.0 - rhs.0)
    }
}

impl Div for UnitInterval {
    type Output = FuzzyResult<UnitInterval>;

    fn div(self, rhs: Self) -> Self::Output {
        UnitInterval::new(self.0 / rhs.0)
    }
}

/// One corner of a piecewise-linear membership function
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FuzzyPoint {
    x: f64,
    y: UnitInterval,
}

impl FuzzyPoint {
    pub fn new(x: f64, y: f64) -> FuzzyResult<Self> {
        Self::with_degree(x, UnitInterval::new(y)?)
    }

    pub fn with_degree(x: f64, y: UnitInterval) -> FuzzyResult<Self> {
        if !x.is_finite() {
            return Err(FuzzyError::NotFinite(x));
        }

        if x < 0. {
            return Err(FuzzyError::NegativePoint(x));
        }

        Ok(FuzzyPoint { x, y })
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> UnitInterval {
        self.y
    }
}

/// Fails unless the points are ordered by non-decreasing x.
pub(crate) fn check_ordered(points: &[FuzzyPoint]) -> FuzzyResult<()> {
    for pair in points.windows(2) {
        if pair[1].x < pair[0].x {
            return Err(FuzzyError::PointsOutOfOrder {
                prev: pair[0].x,
                next: pair[1].x,
            });
        }
    }

    Ok(())
}

#[test]
fn test_unit_interval_range() {
    assert!(UnitInterval::new(0.).is_ok());
    assert!(UnitInterval::new(1.).is_ok());
    assert_eq!(UnitInterval::new(0.25).unwrap().value(), 0.25);
    assert_eq!(UnitInterval::new(-0.001), Err(FuzzyError::OutOfUnitInterval(-0.001)));
    assert_eq!(UnitInterval::new(1.001), Err(FuzzyError::OutOfUnitInterval(1.001)));
    assert!(matches!(UnitInterval::new(f64::NAN), Err(FuzzyError::NotFinite(_))));
    assert_eq!(
        UnitInterval::new(f64::INFINITY),
        Err(FuzzyError::NotFinite(f64::INFINITY))
    );
    assert_eq!(
        UnitInterval::new(f64::NEG_INFINITY),
        Err(FuzzyError::NotFinite(f64::NEG_INFINITY))
    );
}

#[test]
fn test_unit_interval_arithmetic() {
    let half = UnitInterval::new(0.5).unwrap();
    let quarter = UnitInterval::new(0.25).unwrap();

    assert_eq!(half * half, quarter);
    assert_eq!((half + quarter).unwrap(), 0.75);
    assert_eq!((half - quarter).unwrap(), quarter);
    assert_eq!((quarter / half).unwrap(), half);
    assert!((UnitInterval::ONE + half).is_err());
    assert!((quarter - half).is_err());
    assert!((half / quarter).is_err());
    assert!((half / UnitInterval::ZERO).is_err());
    assert_eq!(quarter.complement(), 0.75);
    assert!(quarter < half);
    assert_eq!(quarter.max(half), half);
    assert_eq!(quarter.min(half), quarter);
}

#[test]
fn test_rounding_snap() {
    assert_eq!(UnitInterval::from_rounded(1. + 1e-15).unwrap(), UnitInterval::ONE);
    assert_eq!(UnitInterval::from_rounded(-1e-15).unwrap(), UnitInterval::ZERO);
    assert!(UnitInterval::from_rounded(1.1).is_err());
    assert!(UnitInterval::from_rounded(f64::NAN).is_err());
}

#[test]
fn test_fuzzy_point() {
    let point = FuzzyPoint::new(2., 0.5).unwrap();

    assert_eq!(point.x(), 2.);
    assert_eq!(point.y(), 0.5);
    assert_eq!(FuzzyPoint::new(-1., 0.5), Err(FuzzyError::NegativePoint(-1.)));
    assert!(FuzzyPoint::new(f64::NAN, 0.5).is_err());
    assert!(FuzzyPoint::new(1., 1.5).is_err());

    let ordered = [FuzzyPoint::new(1., 0.).unwrap(), FuzzyPoint::new(1., 1.).unwrap()];
    let unordered = [FuzzyPoint::new(2., 0.).unwrap(), FuzzyPoint::new(1., 1.).unwrap()];

    assert!(check_ordered(&ordered).is_ok());
    assert_eq!(
        check_ordered(&unordered),
        Err(FuzzyError::PointsOutOfOrder { prev: 2., next: 1. })
    );
}
