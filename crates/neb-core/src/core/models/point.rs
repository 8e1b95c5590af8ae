use itertools::Itertools;
use nalgebra::DVector;

/// A configuration on the potential-energy surface with an arbitrary number of coordinates.
pub type Point = DVector<f64>;

pub fn point_from(coords: &[f64]) -> Point {
    DVector::from_column_slice(coords)
}

/// Linear interpolation `a + t·(b − a)`.
#[inline]
pub fn lerp(a: &Point, b: &Point, t: f64) -> Point {
    a + (b - a) * t
}

#[inline]
pub fn distance(a: &Point, b: &Point) -> f64 {
    (b - a).norm()
}

pub fn is_finite(point: &Point) -> bool {
    point.iter().all(|c| c.is_finite())
}

/// Cumulative arc length along an ordered sequence of points, starting at zero.
pub fn reaction_coordinates(points: &[Point]) -> Vec<f64> {
    let mut coordinates = Vec::with_capacity(points.len());
    if points.is_empty() {
        return coordinates;
    }
    coordinates.push(0.0);
    let mut travelled = 0.0;
    for (a, b) in points.iter().tuple_windows() {
        travelled += distance(a, b);
        coordinates.push(travelled);
    }
    coordinates
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn lerp_hits_both_ends_and_midpoint() {
        let a = point_from(&[0.0, 2.0]);
        let b = point_from(&[4.0, -2.0]);
        assert_eq!(lerp(&a, &b, 0.0), a);
        assert_eq!(lerp(&a, &b, 1.0), b);
        assert_eq!(lerp(&a, &b, 0.5), point_from(&[2.0, 0.0]));
    }

    #[test]
    fn distance_is_euclidean() {
        let a = point_from(&[0.0, 0.0, 0.0]);
        let b = point_from(&[1.0, 2.0, 2.0]);
        assert!((distance(&a, &b) - 3.0).abs() < TOLERANCE);
    }

    #[test]
    fn is_finite_rejects_nan_and_infinity() {
        assert!(is_finite(&point_from(&[1.0, -3.0])));
        assert!(!is_finite(&point_from(&[f64::NAN, 0.0])));
        assert!(!is_finite(&point_from(&[0.0, f64::INFINITY])));
    }

    #[test]
    fn reaction_coordinates_accumulate_segment_lengths() {
        let points = vec![
            point_from(&[0.0, 0.0]),
            point_from(&[3.0, 4.0]),
            point_from(&[3.0, 5.0]),
        ];
        let coords = reaction_coordinates(&points);
        assert_eq!(coords.len(), 3);
        assert!((coords[0]).abs() < TOLERANCE);
        assert!((coords[1] - 5.0).abs() < TOLERANCE);
        assert!((coords[2] - 6.0).abs() < TOLERANCE);
    }

    #[test]
    fn reaction_coordinates_of_empty_sequence_is_empty() {
        assert!(reaction_coordinates(&[]).is_empty());
    }
}
