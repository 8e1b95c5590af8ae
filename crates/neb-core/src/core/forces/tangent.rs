use super::{ForceError, MIN_SEGMENT_LENGTH};
use crate::core::models::point::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy for estimating the local path direction at an interior image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TangentScheme {
    /// Upwind tangent toward the higher-energy neighbor, energy-weighted at extrema.
    #[default]
    EnergyWeighted,
    /// Normalized sum of the two normalized segment vectors, blind to energies.
    Bisector,
}

impl TangentScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            TangentScheme::EnergyWeighted => "energy-weighted",
            TangentScheme::Bisector => "bisector",
        }
    }
}

impl fmt::Display for TangentScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TangentScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "energy-weighted" | "improved" => Ok(TangentScheme::EnergyWeighted),
            "bisector" | "basic" => Ok(TangentScheme::Bisector),
            other => Err(format!(
                "unknown tangent scheme '{}', expected 'energy-weighted' or 'bisector'",
                other
            )),
        }
    }
}

/// An interior image together with its two neighbors and their energies.
#[derive(Debug, Clone, Copy)]
pub struct Neighborhood<'a> {
    pub index: usize,
    pub prev: &'a Point,
    pub current: &'a Point,
    pub next: &'a Point,
    /// Energies of `prev`, `current`, and `next`, in that order.
    pub energies: [f64; 3],
}

impl<'a> Neighborhood<'a> {
    /// Segment pointing from this image to the next one.
    #[inline]
    pub fn forward(&self) -> Point {
        self.next - self.current
    }

    /// Segment pointing from the previous image to this one.
    #[inline]
    pub fn backward(&self) -> Point {
        self.current - self.prev
    }
}

/// Unit tangent at `hood.current`.
///
/// Fails with [`ForceError::DegenerateGeometry`] when either adjacent segment is shorter than
/// [`MIN_SEGMENT_LENGTH`] or the combined direction vanishes.
pub fn estimate(
    scheme: TangentScheme,
    hood: &Neighborhood<'_>,
    energy_tolerance: f64,
) -> Result<Point, ForceError> {
    let forward = hood.forward();
    let backward = hood.backward();
    let forward_len = forward.norm();
    let backward_len = backward.norm();

    if forward_len < MIN_SEGMENT_LENGTH || backward_len < MIN_SEGMENT_LENGTH {
        return Err(ForceError::DegenerateGeometry { image: hood.index });
    }

    let raw = match scheme {
        TangentScheme::EnergyWeighted => {
            energy_weighted(forward, backward, hood.energies, energy_tolerance)
        }
        TangentScheme::Bisector => forward / forward_len + backward / backward_len,
    };

    let norm = raw.norm();
    if !norm.is_finite() || norm < MIN_SEGMENT_LENGTH {
        return Err(ForceError::DegenerateGeometry { image: hood.index });
    }
    Ok(raw / norm)
}

fn energy_weighted(forward: Point, backward: Point, energies: [f64; 3], tolerance: f64) -> Point {
    let [e_prev, e_current, e_next] = energies;
    let rise_next = e_next - e_current;
    let rise_prev = e_prev - e_current;

    if rise_next.abs() <= tolerance && rise_prev.abs() <= tolerance {
        return forward + backward;
    }
    if e_next > e_current && e_current > e_prev {
        return forward;
    }
    if e_next < e_current && e_current < e_prev {
        return backward;
    }

    let delta_max = rise_next.abs().max(rise_prev.abs());
    let delta_min = rise_next.abs().min(rise_prev.abs());
    if e_next > e_prev {
        forward * delta_max + backward * delta_min
    } else {
        forward * delta_min + backward * delta_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::point::point_from;

    const TOLERANCE: f64 = 1e-12;

    fn hood<'a>(
        prev: &'a Point,
        current: &'a Point,
        next: &'a Point,
        energies: [f64; 3],
    ) -> Neighborhood<'a> {
        Neighborhood {
            index: 1,
            prev,
            current,
            next,
            energies,
        }
    }

    fn assert_parallel(a: &Point, b: &Point) {
        let cos = a.dot(b) / (a.norm() * b.norm());
        assert!((cos - 1.0).abs() < 1e-12, "vectors not parallel: {} vs {}", a, b);
    }

    #[test]
    fn tangents_have_unit_norm_for_both_schemes() {
        let prev = point_from(&[0.0, 0.0, 0.0]);
        let current = point_from(&[1.0, 0.3, -0.2]);
        let next = point_from(&[1.7, 1.9, 0.4]);
        for energies in [[0.0, 1.0, 2.0], [2.0, 1.0, 0.0], [0.0, 3.0, 1.0], [1.0, 0.0, 2.0]] {
            for scheme in [TangentScheme::EnergyWeighted, TangentScheme::Bisector] {
                let t = estimate(scheme, &hood(&prev, &current, &next, energies), 1e-10).unwrap();
                assert!((t.norm() - 1.0).abs() < TOLERANCE);
            }
        }
    }

    #[test]
    fn uphill_toward_next_uses_forward_segment() {
        let prev = point_from(&[0.0, 0.0]);
        let current = point_from(&[1.0, 0.0]);
        let next = point_from(&[1.0, 2.0]);
        let t = estimate(
            TangentScheme::EnergyWeighted,
            &hood(&prev, &current, &next, [0.0, 1.0, 2.0]),
            0.0,
        )
        .unwrap();
        assert_parallel(&t, &point_from(&[0.0, 1.0]));
    }

    #[test]
    fn uphill_toward_prev_uses_backward_segment() {
        let prev = point_from(&[0.0, 0.0]);
        let current = point_from(&[1.0, 0.0]);
        let next = point_from(&[1.0, 2.0]);
        let t = estimate(
            TangentScheme::EnergyWeighted,
            &hood(&prev, &current, &next, [2.0, 1.0, 0.0]),
            0.0,
        )
        .unwrap();
        assert_parallel(&t, &point_from(&[1.0, 0.0]));
    }

    #[test]
    fn extremum_weights_segments_by_energy_differences() {
        let prev = point_from(&[0.0, 0.0]);
        let current = point_from(&[1.0, 0.0]);
        let next = point_from(&[1.0, 1.0]);
        let t = estimate(
            TangentScheme::EnergyWeighted,
            &hood(&prev, &current, &next, [3.0, 4.0, 1.0]),
            0.0,
        )
        .unwrap();
        // e_next = 1 < e_prev = 3: backward (1,0) weighted by 3, forward (0,1) weighted by 1.
        assert_parallel(&t, &point_from(&[3.0, 1.0]));
    }

    #[test]
    fn flat_neighborhood_falls_back_to_symmetric_difference() {
        let prev = point_from(&[0.0, 0.0]);
        let current = point_from(&[1.0, 0.0]);
        let next = point_from(&[1.0, 3.0]);
        let t = estimate(
            TangentScheme::EnergyWeighted,
            &hood(&prev, &current, &next, [1.0, 1.0 + 1e-12, 1.0]),
            1e-9,
        )
        .unwrap();
        assert_parallel(&t, &point_from(&[1.0, 3.0]));
    }

    #[test]
    fn bisector_ignores_energies() {
        let prev = point_from(&[0.0, 0.0]);
        let current = point_from(&[1.0, 0.0]);
        let next = point_from(&[1.0, 5.0]);
        let a = estimate(
            TangentScheme::Bisector,
            &hood(&prev, &current, &next, [0.0, 1.0, 2.0]),
            0.0,
        )
        .unwrap();
        let b = estimate(
            TangentScheme::Bisector,
            &hood(&prev, &current, &next, [5.0, -1.0, 0.0]),
            0.0,
        )
        .unwrap();
        assert_eq!(a, b);
        assert_parallel(&a, &point_from(&[1.0, 1.0]));
    }

    #[test]
    fn coincident_neighbor_is_degenerate() {
        let prev = point_from(&[0.0, 0.0]);
        let current = point_from(&[1.0, 1.0]);
        let next = point_from(&[1.0, 1.0]);
        for scheme in [TangentScheme::EnergyWeighted, TangentScheme::Bisector] {
            let result = estimate(scheme, &hood(&prev, &current, &next, [0.0, 1.0, 2.0]), 0.0);
            assert_eq!(result, Err(ForceError::DegenerateGeometry { image: 1 }));
        }
    }

    #[test]
    fn folded_band_with_opposite_segments_is_degenerate_for_bisector() {
        let prev = point_from(&[0.0, 0.0]);
        let current = point_from(&[1.0, 0.0]);
        let next = point_from(&[0.0, 0.0]);
        let result = estimate(
            TangentScheme::Bisector,
            &hood(&prev, &current, &next, [0.0, 1.0, 0.0]),
            0.0,
        );
        assert_eq!(result, Err(ForceError::DegenerateGeometry { image: 1 }));
    }

    #[test]
    fn scheme_parses_from_string_aliases() {
        assert_eq!(
            "energy-weighted".parse::<TangentScheme>(),
            Ok(TangentScheme::EnergyWeighted)
        );
        assert_eq!("Basic".parse::<TangentScheme>(), Ok(TangentScheme::Bisector));
        assert!("spline".parse::<TangentScheme>().is_err());
    }
}
