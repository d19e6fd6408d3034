use num::Float;

/// Similar to numpy.interp for a single x: clamps to the end points outside
/// of `coords` and interpolates linearly between them.
///
/// `coords` must be sorted by x. On a vertical step (two points sharing an x)
/// the higher y wins. Returns `None` when `coords` is empty.
pub(crate) fn interp_at<F: Float>(x: F, coords: &[(F, F)]) -> Option<F> {
    let (first_x, first_y) = *coords.first()?;
    let (last_x, last_y) = *coords.last()?;

    // Base cases
    if x < first_x {
        return Some(first_y);
    }
    if x > last_x {
        return Some(last_y);
    }

    // x can sit on several windows at once: a shared corner or a vertical
    // step, so every window holding it is considered
    let mut y: Option<F> = None;

    for pair in coords.windows(2) {
        let (x1, y1) = pair[0];
        let (x2, y2) = pair[1];

        if x < x1 {
            break;
        }
        if x > x2 {
            continue;
        }

        let candidate = if x == x1 && x == x2 {
            F::max(y1, y2)
        } else if x == x1 {
            y1
        } else if x == x2 {
            y2
        } else {
            // Actual interpolation
            y1 + (x - x1) * (y2 - y1) / (x2 - x1)
        };

        y = Some(y.map_or(candidate, |y| F::max(y, candidate)));
    }

    // Single point, or x landed exactly on it
    y.or(Some(first_y))
}

/// Center of gravity of the area under a piecewise-linear curve sampled at
/// `universe`. Each segment is split into a rectangle and a triangle, so the
/// result is exact for curves whose corners are all part of `universe`.
///
/// Returns `None` when the curve encloses no area.
pub(crate) fn center_of_gravity<F: Float>(universe: &[F], membership: &[F]) -> Option<F> {
    let n_areas = universe.len().min(membership.len()).saturating_sub(1);
    let two = F::one() + F::one();
    let three = two + F::one();
    let mut total_area = F::zero();
    let mut moment = F::zero();

    for i in 0..n_areas {
        let base = universe[i + 1] - universe[i];
        let area_rect = F::min(membership[i], membership[i + 1]) * base;
        let center_rect = universe[i] + base / two;
        let (area_tri, center_tri) = if membership[i + 1] == membership[i] {
            (F::zero(), F::zero())
        } else if membership[i + 1] > membership[i] {
            (
                base * F::abs(membership[i + 1] - membership[i]) / two,
                universe[i] + two / three * base,
            )
        } else {
            (
                base * F::abs(membership[i + 1] - membership[i]) / two,
                universe[i] + F::one() / three * base,
            )
        };

        total_area = total_area + area_rect + area_tri;
        moment = moment + area_rect * center_rect + area_tri * center_tri;
    }

    if total_area > F::zero() {
        Some(moment / total_area)
    } else {
        None
    }
}

/// Trapezoidal area of every segment of a sampled curve
pub(crate) fn segment_areas<F: Float>(universe: &[F], membership: &[F]) -> Vec<F> {
    let two = F::one() + F::one();

    universe
        .windows(2)
        .zip(membership.windows(2))
        .map(|(u, m)| (m[0] + m[1]) * (u[1] - u[0]) / two)
        .collect()
}

#[cfg(test)]
fn interp(x_input: &[f64], coords: &[(f64, f64)]) -> Vec<f64> {
    x_input.iter().filter_map(|x| interp_at(*x, coords)).collect()
}

#[test]
fn test_interp() {
    let x = [0., 1., 1.5, 2.72, 3.24];
    let coords = [(1., 3.), (2., 2.), (3., 0.)];

    assert_eq!(interp(&x, &coords), vec![3., 3., 2.5, 0.5599999999999996, 0.]);

    let x = [2.5, -1., 7.5];
    let coords = [(0., 0.), (1., 2.), (2., 5.), (3., 3.), (4.5, 2.)];

    assert_eq!(interp(&x, &coords), vec![4., 0., 2.]);
}

#[test]
fn test_interp_edge_cases() {
    assert_eq!(interp_at::<f64>(1., &[]), None);
    assert_eq!(interp_at(5., &[(3., 0.7)]), Some(0.7));
    assert_eq!(interp_at(3., &[(3., 0.7)]), Some(0.7));
    // Vertical step
    assert_eq!(interp_at(2., &[(2., 0.), (2., 1.), (4., 1.)]), Some(1.));
    assert_eq!(interp_at(2.0f32, &[(1., 0.), (3., 1.)]), Some(0.5));
}

#[test]
fn test_interp_step_after_segment() {
    // The flat segment ends at 0 where the step starts
    let rising = [(0., 0.), (2., 0.), (2., 1.), (4., 1.)];

    assert_eq!(interp_at(2., &rising), Some(1.));
    assert_eq!(interp_at(1., &rising), Some(0.));
    assert_eq!(interp_at(3., &rising), Some(1.));

    let falling = [(0., 1.), (2., 1.), (2., 0.), (4., 0.)];

    assert_eq!(interp_at(2., &falling), Some(1.));
    assert_eq!(interp_at(2.5, &falling), Some(0.));
}

#[test]
fn test_center_of_gravity() {
    use approx::assert_relative_eq;

    // Symmetric triangle
    let cog = center_of_gravity(&[0., 1., 2.], &[0., 1., 0.]).unwrap();
    assert_relative_eq!(cog, 1., epsilon = 1e-12);

    // Right triangle rising towards 3
    let cog = center_of_gravity(&[0., 3.], &[0., 1.]).unwrap();
    assert_relative_eq!(cog, 2., epsilon = 1e-12);

    assert_eq!(center_of_gravity(&[0., 1., 2.], &[0., 0., 0.]), None);
    assert_eq!(center_of_gravity::<f64>(&[4.], &[1.]), None);
    assert_eq!(segment_areas(&[0., 1., 3.], &[0., 1., 1.]), vec![0.5, 2.]);
}
