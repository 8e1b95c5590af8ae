use super::{PotentialSurface, plane_coordinates};
use crate::core::models::point::Point;

/// Parameters of the LEPS surface for a collinear A–B–C system.
///
/// Coordinates are the two bond lengths `r_AB` and `r_BC`; `r_AC` is their sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LepsParams {
    pub alpha: f64,
    pub r0: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d_ab: f64,
    pub d_bc: f64,
    pub d_ac: f64,
}

impl Default for LepsParams {
    fn default() -> Self {
        Self {
            alpha: 1.942,
            r0: 0.742,
            a: 0.05,
            b: 0.3,
            c: 0.05,
            d_ab: 4.746,
            d_bc: 4.746,
            d_ac: 3.445,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Leps {
    params: LepsParams,
}

/// Value and first derivative of a pair term.
#[derive(Debug, Clone, Copy)]
struct PairTerm {
    value: f64,
    slope: f64,
}

impl Leps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: LepsParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &LepsParams {
        &self.params
    }

    /// Coulomb integral Q(r).
    fn coulomb(&self, d: f64, r: f64) -> PairTerm {
        let LepsParams { alpha, r0, .. } = self.params;
        let e1 = (-alpha * (r - r0)).exp();
        let e2 = e1 * e1;
        PairTerm {
            value: d * (1.5 * e2 - e1) / 2.0,
            slope: d * (-3.0 * alpha * e2 + alpha * e1) / 2.0,
        }
    }

    /// Exchange integral J(r).
    fn exchange(&self, d: f64, r: f64) -> PairTerm {
        let LepsParams { alpha, r0, .. } = self.params;
        let e1 = (-alpha * (r - r0)).exp();
        let e2 = e1 * e1;
        PairTerm {
            value: d * (e2 - 6.0 * e1) / 4.0,
            slope: d * (-2.0 * alpha * e2 + 6.0 * alpha * e1) / 4.0,
        }
    }

    fn terms(&self, r_ab: f64, r_bc: f64) -> ([PairTerm; 3], [PairTerm; 3]) {
        let p = &self.params;
        let r_ac = r_ab + r_bc;
        let scales = [1.0 + p.a, 1.0 + p.b, 1.0 + p.c];
        let raw_q = [
            self.coulomb(p.d_ab, r_ab),
            self.coulomb(p.d_bc, r_bc),
            self.coulomb(p.d_ac, r_ac),
        ];
        let raw_j = [
            self.exchange(p.d_ab, r_ab),
            self.exchange(p.d_bc, r_bc),
            self.exchange(p.d_ac, r_ac),
        ];
        let scale = |t: PairTerm, s: f64| PairTerm {
            value: t.value / s,
            slope: t.slope / s,
        };
        (
            [0, 1, 2].map(|i| scale(raw_q[i], scales[i])),
            [0, 1, 2].map(|i| scale(raw_j[i], scales[i])),
        )
    }

    fn exchange_discriminant(j: &[PairTerm; 3]) -> f64 {
        let [ja, jb, jc] = [j[0].value, j[1].value, j[2].value];
        (ja * ja + jb * jb + jc * jc - ja * jb - jb * jc - ja * jc).max(0.0)
    }
}

impl PotentialSurface for Leps {
    fn name(&self) -> &str {
        "LEPS"
    }

    fn dimension(&self) -> Option<usize> {
        Some(2)
    }

    fn energy(&self, point: &Point) -> f64 {
        let (x, y) = plane_coordinates(point);
        let (q, j) = self.terms(x, y);
        q[0].value + q[1].value + q[2].value - Self::exchange_discriminant(&j).sqrt()
    }

    fn gradient(&self, point: &Point) -> Point {
        let (x, y) = plane_coordinates(point);
        let (q, j) = self.terms(x, y);
        let root = Self::exchange_discriminant(&j).sqrt();
        let [ja, jb, jc] = [j[0].value, j[1].value, j[2].value];

        // Partial derivatives of sqrt(S) with respect to each reduced exchange integral.
        let (ds_a, ds_b, ds_c) = if root > f64::MIN_POSITIVE {
            (
                (2.0 * ja - jb - jc) / (2.0 * root),
                (2.0 * jb - ja - jc) / (2.0 * root),
                (2.0 * jc - ja - jb) / (2.0 * root),
            )
        } else {
            (0.0, 0.0, 0.0)
        };

        let d_x = q[0].slope + q[2].slope - (ds_a * j[0].slope + ds_c * j[2].slope);
        let d_y = q[1].slope + q[2].slope - (ds_b * j[1].slope + ds_c * j[2].slope);
        Point::from_column_slice(&[d_x, d_y])
    }
}
