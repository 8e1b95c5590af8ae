use super::PotentialSurface;
use crate::core::models::point::Point;

/// Separable harmonic bowl `V(x) = ½ Σ c_j (x_j − m_j)²`.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadraticBowl {
    curvatures: Vec<f64>,
    center: Point,
}

impl QuadraticBowl {
    /// A bowl centered at the origin with one curvature per coordinate.
    pub fn new(curvatures: Vec<f64>) -> Self {
        let center = Point::zeros(curvatures.len());
        Self { curvatures, center }
    }

    pub fn isotropic(dimension: usize, curvature: f64) -> Self {
        Self::new(vec![curvature; dimension])
    }

    pub fn centered_at(mut self, center: Point) -> Self {
        self.center = center;
        self
    }

    pub fn curvatures(&self) -> &[f64] {
        &self.curvatures
    }
}

impl PotentialSurface for QuadraticBowl {
    fn name(&self) -> &str {
        "quadratic bowl"
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.curvatures.len())
    }

    fn energy(&self, point: &Point) -> f64 {
        point
            .iter()
            .zip(self.center.iter())
            .zip(&self.curvatures)
            .map(|((x, m), c)| 0.5 * c * (x - m).powi(2))
            .sum()
    }

    fn gradient(&self, point: &Point) -> Point {
        Point::from_iterator(
            point.len(),
            point
                .iter()
                .zip(self.center.iter())
                .zip(&self.curvatures)
                .map(|((x, m), c)| c * (x - m)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::point::point_from;
    use crate::core::surface::{FINITE_DIFFERENCE_STEP, central_difference};

    #[test]
    fn energy_vanishes_at_center() {
        let bowl =
            QuadraticBowl::new(vec![1.0, 4.0, 9.0]).centered_at(point_from(&[1.0, 2.0, 3.0]));
        assert_eq!(bowl.energy(&point_from(&[1.0, 2.0, 3.0])), 0.0);
        assert_eq!(bowl.dimension(), Some(3));
    }

    #[test]
    fn gradient_matches_finite_differences_in_three_dimensions() {
        let bowl = QuadraticBowl::new(vec![1.0, 4.0, 0.5]);
        let p = point_from(&[0.3, -1.2, 2.0]);
        let numeric = central_difference(&bowl, &p, FINITE_DIFFERENCE_STEP);
        assert!((bowl.gradient(&p) - numeric).norm() < 1e-8);
    }

    #[test]
    fn isotropic_bowl_is_radially_symmetric() {
        let bowl = QuadraticBowl::isotropic(2, 2.0);
        let a = bowl.energy(&point_from(&[1.0, 0.0]));
        let b = bowl.energy(&point_from(&[0.0, -1.0]));
        assert_eq!(a, b);
        assert_eq!(a, 1.0);
    }
}
