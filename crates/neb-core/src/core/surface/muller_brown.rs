use super::{PotentialSurface, plane_coordinates};
use crate::core::models::point::Point;

/// One anisotropic Gaussian of the Müller–Brown surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianTerm {
    pub amplitude: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub x0: f64,
    pub y0: f64,
}

impl GaussianTerm {
    /// Returns the term value together with its exponent's partial derivatives.
    #[inline]
    fn evaluate(&self, x: f64, y: f64) -> (f64, f64, f64) {
        let dx = x - self.x0;
        let dy = y - self.y0;
        let value = self.amplitude * (self.a * dx * dx + self.b * dx * dy + self.c * dy * dy).exp();
        (
            value,
            2.0 * self.a * dx + self.b * dy,
            self.b * dx + 2.0 * self.c * dy,
        )
    }
}

pub const MULLER_BROWN_TERMS: [GaussianTerm; 4] = [
    GaussianTerm {
        amplitude: -200.0,
        a: -1.0,
        b: 0.0,
        c: -10.0,
        x0: 1.0,
        y0: 0.0,
    },
    GaussianTerm {
        amplitude: -100.0,
        a: -1.0,
        b: 0.0,
        c: -10.0,
        x0: 0.0,
        y0: 0.5,
    },
    GaussianTerm {
        amplitude: -170.0,
        a: -6.5,
        b: 11.0,
        c: -6.5,
        x0: -0.5,
        y0: 1.5,
    },
    GaussianTerm {
        amplitude: 15.0,
        a: 0.7,
        b: 0.6,
        c: 0.7,
        x0: -1.0,
        y0: 1.0,
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct MullerBrown {
    terms: Vec<GaussianTerm>,
}

impl Default for MullerBrown {
    fn default() -> Self {
        Self {
            terms: MULLER_BROWN_TERMS.to_vec(),
        }
    }
}

impl MullerBrown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_terms(terms: Vec<GaussianTerm>) -> Self {
        Self { terms }
    }

    pub fn terms(&self) -> &[GaussianTerm] {
        &self.terms
    }
}

impl PotentialSurface for MullerBrown {
    fn name(&self) -> &str {
        "Brown-Müller"
    }

    fn dimension(&self) -> Option<usize> {
        Some(2)
    }

    fn energy(&self, point: &Point) -> f64 {
        let (x, y) = plane_coordinates(point);
        self.terms
            .iter()
            .map(|term| term.evaluate(x, y).0)
            .sum()
    }

    fn gradient(&self, point: &Point) -> Point {
        let (x, y) = plane_coordinates(point);
        let (gx, gy) = self
            .terms
            .iter()
            .map(|term| term.evaluate(x, y))
            .fold((0.0, 0.0), |(gx, gy), (value, dx, dy)| {
                (gx + value * dx, gy + value * dy)
            });
        Point::from_column_slice(&[gx, gy])
    }
}
