use crate::error::{Error, Result};
use crate::float::Float;

/// How the integer lag picked from the distance table is refined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PeakCorrection {
    /// Measure the distance between two rising zero crossings of the
    /// original signal, one period apart.
    #[default]
    ZeroCrossing,
    /// Fit a parabola through the distance table around the minimum.
    Quadratic,
    None,
}

struct Point<T: Float> {
    x: T,
    y: T,
}

/// Refine the position of the extremum of `data` at `idx` by fitting a
/// parabola through its two neighbours. Works for minima and maxima alike.
pub fn correct_extremum<T: Float>(idx: usize, data: &[T]) -> Result<(T, T)> {
    if idx == 0 || idx + 1 >= data.len() {
        return Err(Error::DegenerateInterpolation { index: idx });
    }
    let point = |i: usize| Point {
        x: T::from_usize(i).unwrap(),
        y: data[i],
    };
    quadratic_interpolation(point(idx - 1), point(idx), point(idx + 1))
        .map(|p| (p.x, p.y))
        .ok_or(Error::DegenerateInterpolation { index: idx })
}

fn quadratic_interpolation<T: Float>(
    left: Point<T>,
    center: Point<T>,
    right: Point<T>,
) -> Option<Point<T>> {
    let curvature = T::from_f64(2.0).unwrap() * center.y - left.y - right.y;
    if curvature == T::zero() {
        return None;
    }
    let shift = T::from_f64(0.5).unwrap() * (right.y - left.y) / curvature;
    let x = center.x + shift;
    let y = center.y + T::from_f64(0.25).unwrap() * (right.y - left.y) * shift;
    Some(Point { x, y })
}
