//! Membership functions map a crisp input onto a degree of truth.
//!
//! Everything except [`Singleton`] is a piecewise-linear curve through an
//! ordered list of [`FuzzyPoint`]s. Outside of its points a curve keeps the
//! height of the nearest end point.

use crate::error::{FuzzyError, FuzzyResult};
use crate::math::{center_of_gravity, interp_at};
use crate::unit_interval::{check_ordered, FuzzyPoint, UnitInterval};

/// The capability every membership function shares
pub trait Membership {
    /// Smallest x at which the function is defined by a point
    fn lower_bound(&self) -> f64;

    /// Largest x at which the function is defined by a point
    fn upper_bound(&self) -> f64;

    fn min_y(&self) -> UnitInterval;

    fn max_y(&self) -> UnitInterval;

    /// Degree to which `x` belongs to the function, always within `[min_y, max_y]`
    fn membership(&self, x: f64) -> UnitInterval;
}

#[derive(Clone, Debug, PartialEq)]
pub struct PiecewiseLinear {
    points: Vec<FuzzyPoint>,
    coords: Vec<(f64, f64)>,
    min_y: UnitInterval,
    max_y: UnitInterval,
}

impl PiecewiseLinear {
    /// Fails if `points` is empty or not ordered by x.
    pub fn new(points: Vec<FuzzyPoint>) -> FuzzyResult<Self> {
        if points.is_empty() {
            return Err(FuzzyError::EmptyPoints);
        }

        check_ordered(&points)?;

        let min_y = points.iter().map(FuzzyPoint::y).fold(UnitInterval::ONE, UnitInterval::min);
        let max_y = points.iter().map(FuzzyPoint::y).fold(UnitInterval::ZERO, UnitInterval::max);
        let coords = points.iter().map(|p| (p.x(), p.y().value())).collect();

        Ok(PiecewiseLinear {
            points,
            coords,
            min_y,
            max_y,
        })
    }

    /// Shorthand for building from raw `(x, y)` pairs
    pub fn from_coords(coords: &[(f64, f64)]) -> FuzzyResult<Self> {
        let points = coords
            .iter()
            .map(|&(x, y)| FuzzyPoint::new(x, y))
            .collect::<FuzzyResult<Vec<_>>>()?;

        Self::new(points)
    }

    pub fn points(&self) -> &[FuzzyPoint] {
        &self.points
    }

    /// True if the heights never go down, or never go up, along the points
    pub fn is_monotonic(&self) -> bool {
        let non_decreasing = self.points.windows(2).all(|p| p[0].y() <= p[1].y());
        let non_increasing = self.points.windows(2).all(|p| p[0].y() >= p[1].y());

        non_decreasing || non_increasing
    }

    /// Center of the area below the curve between its first and last point.
    ///
    /// A curve without area (a single point, a vertical line, all zero) falls
    /// back to the mean x of its highest points.
    pub fn centroid(&self) -> f64 {
        let (universe, membership): (Vec<_>, Vec<_>) = self.coords.iter().copied().unzip();

        if let Some(cog) = center_of_gravity(&universe, &membership) {
            return cog;
        }

        let highest: Vec<f64> = self
            .coords
            .iter()
            .filter(|(_, y)| *y == self.max_y.value())
            .map(|(x, _)| *x)
            .collect();

        highest.iter().sum::<f64>() / highest.len() as f64
    }
}

impl Membership for PiecewiseLinear {
    fn lower_bound(&self) -> f64 {
        self.coords[0].0
    }

    fn upper_bound(&self) -> f64 {
        self.coords[self.coords.len() - 1].0
    }

    fn min_y(&self) -> UnitInterval {
        self.min_y
    }

    fn max_y(&self) -> UnitInterval {
        self.max_y
    }

    fn membership(&self, x: f64) -> UnitInterval {
        let y = interp_at(x, &self.coords).unwrap_or(self.min_y.value());

        UnitInterval::clamped(y, self.min_y, self.max_y)
    }
}

fn check_heights(min_y: UnitInterval, max_y: UnitInterval) -> FuzzyResult<()> {
    if min_y > max_y {
        return Err(FuzzyError::InvalidBounds {
            min_y: min_y.value(),
            max_y: max_y.value(),
        });
    }

    Ok(())
}

/// `(x1, min_y) (x2, max_y) (x3, min_y)`
#[derive(Clone, Debug, PartialEq)]
pub struct Triangular(PiecewiseLinear);

impl Triangular {
    pub fn new(x1: f64, x2: f64, x3: f64) -> FuzzyResult<Self> {
        Self::with_heights(x1, x2, x3, UnitInterval::ZERO, UnitInterval::ONE)
    }

    pub fn with_heights(x1: f64, x2: f64, x3: f64, min_y: UnitInterval, max_y: UnitInterval) -> FuzzyResult<Self> {
        check_heights(min_y, max_y)?;

        let points = vec![
            FuzzyPoint::with_degree(x1, min_y)?,
            FuzzyPoint::with_degree(x2, max_y)?,
            FuzzyPoint::with_degree(x3, min_y)?,
        ];

        PiecewiseLinear::new(points).map(Triangular)
    }

    pub fn as_piecewise(&self) -> &PiecewiseLinear {
        &self.0
    }
}

/// The x coordinates of a trapezoid
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TrapezoidEdges {
    /// `(x1, min) (x2, max) (x3, max) (x4, min)`
    Closed(f64, f64, f64, f64),
    /// Left shoulder: `max_y` up to `x1`, falling to `min_y` at `x2`
    LeftEdge(f64, f64),
    /// Right shoulder: `min_y` up to `x1`, rising to `max_y` at `x2` and staying there
    RightEdge(f64, f64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Trapezoidal(PiecewiseLinear);

impl Trapezoidal {
    pub fn new(x1: f64, x2: f64, x3: f64, x4: f64) -> FuzzyResult<Self> {
        Self::with_heights(
            TrapezoidEdges::Closed(x1, x2, x3, x4),
            UnitInterval::ZERO,
            UnitInterval::ONE,
        )
    }

    pub fn left_edge(x1: f64, x2: f64) -> FuzzyResult<Self> {
        Self::with_heights(TrapezoidEdges::LeftEdge(x1, x2), UnitInterval::ZERO, UnitInterval::ONE)
    }

    pub fn right_edge(x1: f64, x2: f64) -> FuzzyResult<Self> {
        Self::with_heights(TrapezoidEdges::RightEdge(x1, x2), UnitInterval::ZERO, UnitInterval::ONE)
    }

    pub fn with_heights(edges: TrapezoidEdges, min_y: UnitInterval, max_y: UnitInterval) -> FuzzyResult<Self> {
        check_heights(min_y, max_y)?;

        let points = match edges {
            TrapezoidEdges::Closed(x1, x2, x3, x4) => vec![
                FuzzyPoint::with_degree(x1, min_y)?,
                FuzzyPoint::with_degree(x2, max_y)?,
                FuzzyPoint::with_degree(x3, max_y)?,
                FuzzyPoint::with_degree(x4, min_y)?,
            ],
            TrapezoidEdges::LeftEdge(x1, x2) => vec![
                FuzzyPoint::with_degree(x1, max_y)?,
                FuzzyPoint::with_degree(x2, min_y)?,
            ],
            TrapezoidEdges::RightEdge(x1, x2) => vec![
                FuzzyPoint::with_degree(x1, min_y)?,
                FuzzyPoint::with_degree(x2, max_y)?,
            ],
        };

        PiecewiseLinear::new(points).map(Trapezoidal)
    }

    pub fn as_piecewise(&self) -> &PiecewiseLinear {
        &self.0
    }
}

/// Full membership at exactly one x, none anywhere else
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Singleton(FuzzyPoint);

impl Singleton {
    pub fn new(support: f64) -> FuzzyResult<Self> {
        FuzzyPoint::with_degree(support, UnitInterval::ONE).map(Singleton)
    }

    pub fn support(&self) -> f64 {
        self.0.x()
    }
}

impl Membership for Singleton {
    fn lower_bound(&self) -> f64 {
        self.support()
    }

    fn upper_bound(&self) -> f64 {
        self.support()
    }

    fn min_y(&self) -> UnitInterval {
        UnitInterval::ZERO
    }

    fn max_y(&self) -> UnitInterval {
        UnitInterval::ONE
    }

    fn membership(&self, x: f64) -> UnitInterval {
        UnitInterval::from(x == self.support())
    }
}

macro_rules! delegate_membership {
    ($($ty:ident),*) => {
        $(
            impl Membership for $ty {
                fn lower_bound(&self) -> f64 {
                    self.0.lower_bound()
                }

                fn upper_bound(&self) -> f64 {
                    self.0.upper_bound()
                }

                fn min_y(&self) -> UnitInterval {
                    self.0.min_y()
                }

                fn max_y(&self) -> UnitInterval {
                    self.0.max_y()
                }

                fn membership(&self, x: f64) -> UnitInterval {
                    self.0.membership(x)
                }
            }
        )*
    };
}

delegate_membership!(Triangular, Trapezoidal);

/// Any of the supported membership functions
#[derive(Clone, Debug, PartialEq)]
pub enum MembershipFunction {
    PiecewiseLinear(PiecewiseLinear),
    Triangular(Triangular),
    Trapezoidal(Trapezoidal),
    Singleton(Singleton),
}

impl MembershipFunction {
    fn as_dyn(&self) -> &dyn Membership {
        match self {
            Self::PiecewiseLinear(f) => f,
            Self::Triangular(f) => f,
            Self::Trapezoidal(f) => f,
            Self::Singleton(f) => f,
        }
    }

    fn as_piecewise(&self) -> Option<&PiecewiseLinear> {
        match self {
            Self::PiecewiseLinear(f) => Some(f),
            Self::Triangular(f) => Some(f.as_piecewise()),
            Self::Trapezoidal(f) => Some(f.as_piecewise()),
            Self::Singleton(_) => None,
        }
    }

    pub fn is_singleton(&self) -> bool {
        matches!(self, Self::Singleton(_))
    }

    /// Every x at which the curve changes direction
    pub fn characteristic_points(&self) -> Vec<f64> {
        match self {
            Self::Singleton(s) => vec![s.support()],
            _ => self
                .as_piecewise()
                .map(|f| f.points().iter().map(FuzzyPoint::x).collect())
                .unwrap_or_default(),
        }
    }

    pub fn is_monotonic(&self) -> bool {
        self.as_piecewise().map_or(true, PiecewiseLinear::is_monotonic)
    }

    /// A single representative x, the support for a singleton
    pub fn centroid(&self) -> f64 {
        match self {
            Self::Singleton(s) => s.support(),
            _ => self.as_piecewise().map_or(0., PiecewiseLinear::centroid),
        }
    }
}

impl Membership for MembershipFunction {
    fn lower_bound(&self) -> f64 {
        self.as_dyn().lower_bound()
    }

    fn upper_bound(&self) -> f64 {
        self.as_dyn().upper_bound()
    }

    fn min_y(&self) -> UnitInterval {
        self.as_dyn().min_y()
    }

    fn max_y(&self) -> UnitInterval {
        self.as_dyn().max_y()
    }

    fn membership(&self, x: f64) -> UnitInterval {
        self.as_dyn().membership(x)
    }
}

impl From<PiecewiseLinear> for MembershipFunction {
    fn from(f: PiecewiseLinear) -> Self {
        Self::PiecewiseLinear(f)
    }
}

impl From<Triangular> for MembershipFunction {
    fn from(f: Triangular) -> Self {
        Self::Triangular(f)
    }
}

impl From<Trapezoidal> for MembershipFunction {
    fn from(f: Trapezoidal) -> Self {
        Self::Trapezoidal(f)
    }
}

impl From<Singleton> for MembershipFunction {
    fn from(f: Singleton) -> Self {
        Self::Singleton(f)
    }
}

#[test]
fn test_triangular() {
    let tri = Triangular::new(2., 3., 4.).unwrap();

    assert_eq!(tri.membership(3.), 1.);
    assert_eq!(tri.membership(0.), 0.);
    assert_eq!(tri.membership(2.5), 0.5);
    assert_eq!(tri.membership(3.5), 0.5);
    assert_eq!(tri.membership(10.), 0.);
    assert_eq!(tri.lower_bound(), 2.);
    assert_eq!(tri.upper_bound(), 4.);
    assert_eq!(tri.min_y(), 0.);
    assert_eq!(tri.max_y(), 1.);
}

#[test]
fn test_triangular_heights() {
    let low = UnitInterval::new(0.2).unwrap();
    let high = UnitInterval::new(0.6).unwrap();
    let tri = Triangular::with_heights(0., 1., 2., low, high).unwrap();

    assert_eq!(tri.membership(1.), high);
    assert_eq!(tri.membership(5.), low);
    assert_eq!(
        Triangular::with_heights(0., 1., 2., high, low),
        Err(FuzzyError::InvalidBounds { min_y: 0.6, max_y: 0.2 })
    );
    assert_eq!(
        Triangular::new(3., 2., 4.),
        Err(FuzzyError::PointsOutOfOrder { prev: 3., next: 2. })
    );
    assert_eq!(Triangular::new(-1., 2., 4.), Err(FuzzyError::NegativePoint(-1.)));
}

#[test]
fn test_trapezoidal() {
    let trap = Trapezoidal::new(2., 3., 4., 5.).unwrap();

    assert_eq!(trap.membership(3.), 1.);
    assert_eq!(trap.membership(4.), 1.);
    assert_eq!(trap.membership(3.5), 1.);
    assert_eq!(trap.membership(2.5), 0.5);
    assert_eq!(trap.membership(4.5), 0.5);
    assert_eq!(trap.membership(1.), 0.);
    assert_eq!(trap.membership(6.), 0.);
}

#[test]
fn test_shoulders() {
    let left = Trapezoidal::left_edge(2., 4.).unwrap();

    assert_eq!(left.membership(0.), 1.);
    assert_eq!(left.membership(2.), 1.);
    assert_eq!(left.membership(3.), 0.5);
    assert_eq!(left.membership(4.), 0.);
    assert_eq!(left.membership(9.), 0.);

    let right = Trapezoidal::right_edge(2., 4.).unwrap();

    assert_eq!(right.membership(0.), 0.);
    assert_eq!(right.membership(3.), 0.5);
    assert_eq!(right.membership(4.), 1.);
    assert_eq!(right.membership(100.), 1.);
}

#[test]
fn test_singleton() {
    let single = Singleton::new(13.).unwrap();

    assert_eq!(single.membership(13.), 1.);
    assert_eq!(single.membership(12.999), 0.);
    assert_eq!(single.lower_bound(), 13.);
    assert_eq!(single.upper_bound(), 13.);
    assert!(Singleton::new(f64::INFINITY).is_err());

    let function = MembershipFunction::from(single);

    assert!(function.is_singleton());
    assert!(function.is_monotonic());
    assert_eq!(function.centroid(), 13.);
    assert_eq!(function.characteristic_points(), vec![13.]);
}

#[test]
fn test_piecewise_linear() {
    let curve = PiecewiseLinear::from_coords(&[(1., 0.25), (2., 0.75), (4., 0.5)]).unwrap();

    assert_eq!(curve.membership(0.), 0.25);
    assert_eq!(curve.membership(1.5), 0.5);
    assert_eq!(curve.membership(5.), 0.5);
    assert_eq!(curve.min_y(), 0.25);
    assert_eq!(curve.max_y(), 0.75);
    assert!(!curve.is_monotonic());

    assert_eq!(PiecewiseLinear::new(Vec::new()), Err(FuzzyError::EmptyPoints));
    assert!(PiecewiseLinear::from_coords(&[(1., 0.), (0.5, 1.)]).is_err());
    assert!(PiecewiseLinear::from_coords(&[(1., 0.), (2., 1.)]).unwrap().is_monotonic());
}

#[test]
fn test_crisp_threshold() {
    let threshold = PiecewiseLinear::from_coords(&[(0., 0.), (2., 0.), (2., 1.), (4., 1.)]).unwrap();

    assert_eq!(threshold.membership(1.99), 0.);
    assert_eq!(threshold.membership(2.), 1.);
    assert_eq!(threshold.membership(3.), 1.);
}

#[test]
fn test_centroids() {
    use approx::assert_relative_eq;

    let tri = MembershipFunction::from(Triangular::new(0., 13., 25.).unwrap());
    assert_relative_eq!(tri.centroid(), 38. / 3., epsilon = 1e-12);

    let trap = MembershipFunction::from(Trapezoidal::new(2., 3., 4., 5.).unwrap());
    assert_relative_eq!(trap.centroid(), 3.5, epsilon = 1e-12);

    let spike = PiecewiseLinear::from_coords(&[(3., 1.)]).unwrap();
    assert_eq!(spike.centroid(), 3.);
    assert_eq!(trap.characteristic_points(), vec![2., 3., 4., 5.]);
}
