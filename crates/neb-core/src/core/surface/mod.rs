//! # Surface Module
//!
//! The boundary between the NEB engine and the potential-energy function it explores.
//!
//! Any scalar field that can be evaluated at a point and differentiated there can drive a band.
//! Implementors provide [`PotentialSurface::energy`]; gradients default to central finite
//! differences and should be overridden whenever an analytic expression is available.
//!
//! ## Shipped Surfaces
//!
//! - [`leps::Leps`] - London–Eyring–Polanyi–Sato potential for a collinear A + BC reaction
//! - [`muller_brown::MullerBrown`] - the four-Gaussian Müller–Brown surface
//! - [`quadratic::QuadraticBowl`] - a separable harmonic bowl in any dimension

pub mod leps;
pub mod muller_brown;
pub mod quadratic;

use crate::core::models::point::Point;

/// Step used by the default finite-difference gradient.
pub const FINITE_DIFFERENCE_STEP: f64 = 1e-6;

/// A deterministic, side-effect free scalar field over D-dimensional points.
pub trait PotentialSurface: Sync {
    fn name(&self) -> &str;

    /// Number of coordinates the surface accepts, or `None` if it works in any dimension.
    fn dimension(&self) -> Option<usize> {
        None
    }

    fn energy(&self, point: &Point) -> f64;

    /// Energies of a batch of points, in input order.
    fn batched_energy(&self, points: &[Point]) -> Vec<f64> {
        points.iter().map(|p| self.energy(p)).collect()
    }

    fn gradient(&self, point: &Point) -> Point {
        central_difference(self, point, FINITE_DIFFERENCE_STEP)
    }
}

/// Splits a point of a two-dimensional surface into `(x, y)`.
#[inline]
pub(crate) fn plane_coordinates(point: &Point) -> (f64, f64) {
    debug_assert_eq!(
        point.len(),
        2,
        "planar surfaces take two coordinates, got {}",
        point.len()
    );
    (point[0], point[1])
}

/// Second-order central-difference gradient of `surface` at `point`.
pub fn central_difference<S: PotentialSurface + ?Sized>(
    surface: &S,
    point: &Point,
    step: f64,
) -> Point {
    let mut gradient = Point::zeros(point.len());
    let mut probe = point.clone();
    for i in 0..point.len() {
        let original = probe[i];
        probe[i] = original + step;
        let forward = surface.energy(&probe);
        probe[i] = original - step;
        let backward = surface.energy(&probe);
        probe[i] = original;
        gradient[i] = (forward - backward) / (2.0 * step);
    }
    gradient
}

impl<S: PotentialSurface + ?Sized> PotentialSurface for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn dimension(&self) -> Option<usize> {
        (**self).dimension()
    }

    fn energy(&self, point: &Point) -> f64 {
        (**self).energy(point)
    }

    fn batched_energy(&self, points: &[Point]) -> Vec<f64> {
        (**self).batched_energy(points)
    }

    fn gradient(&self, point: &Point) -> Point {
        (**self).gradient(point)
    }
}
