use super::ForceError;
use super::snapshot::{ForceSnapshot, ImageForces};
use super::tangent::{self, Neighborhood, TangentScheme};
use crate::core::models::image::{Image, ImageKind};
use crate::core::models::point::Point;

/// Combines tangent estimation with the NEB force projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceProjector {
    scheme: TangentScheme,
    energy_tolerance: f64,
}

impl Default for ForceProjector {
    fn default() -> Self {
        Self::new(TangentScheme::default(), 1e-10)
    }
}

impl ForceProjector {
    pub fn new(scheme: TangentScheme, energy_tolerance: f64) -> Self {
        Self {
            scheme,
            energy_tolerance,
        }
    }

    pub fn scheme(&self) -> TangentScheme {
        self.scheme
    }

    pub fn energy_tolerance(&self) -> f64 {
        self.energy_tolerance
    }

    pub fn tangent(&self, hood: &Neighborhood<'_>) -> Result<Point, ForceError> {
        tangent::estimate(self.scheme, hood, self.energy_tolerance)
    }

    /// `F⊥ = −g + (g·τ)τ`
    #[inline]
    pub fn perpendicular_force(gradient: &Point, tangent: &Point) -> Point {
        -gradient + tangent * gradient.dot(tangent)
    }

    /// `F_ci = −g + 2(g·τ)τ`: the parallel component is inverted so the image climbs.
    #[inline]
    pub fn climbing_force(gradient: &Point, tangent: &Point) -> Point {
        -gradient + tangent * (2.0 * gradient.dot(tangent))
    }

    /// `F∥ = k(|R₊ − R| − |R − R₋|)τ`
    #[inline]
    pub fn spring_force(spring_constant: f64, hood: &Neighborhood<'_>, tangent: &Point) -> Point {
        let stretch = hood.forward().norm() - hood.backward().norm();
        tangent * (spring_constant * stretch)
    }

    /// Projected forces of a single interior image.
    ///
    /// A climbing image feels no spring force.
    pub fn project_image(
        &self,
        hood: &Neighborhood<'_>,
        kind: ImageKind,
        gradient: &Point,
        spring_constant: f64,
    ) -> Result<ImageForces, ForceError> {
        let tangent = self.tangent(hood)?;
        let (true_force, spring_force) = match kind {
            ImageKind::Climbing => (
                Self::climbing_force(gradient, &tangent),
                Point::zeros(gradient.len()),
            ),
            _ => (
                Self::perpendicular_force(gradient, &tangent),
                Self::spring_force(spring_constant, hood, &tangent),
            ),
        };
        Ok(ImageForces {
            index: hood.index,
            kind,
            energy: hood.energies[1],
            gradient: gradient.clone(),
            tangent: Some(tangent),
            effective_force: &true_force + &spring_force,
            true_force,
            spring_force,
        })
    }

    /// Projects every interior image of a band.
    ///
    /// `energies` and `gradients` are indexed like `images`, endpoints included. An image whose
    /// tangent is undefined gets the unprojected true force and is flagged in the snapshot.
    pub fn project(
        &self,
        images: &[Image],
        energies: &[f64],
        gradients: &[Point],
        spring_constant: f64,
    ) -> Result<ForceSnapshot, ForceError> {
        let n = images.len();
        if n < 3 {
            return Err(ForceError::LengthMismatch {
                expected: 3,
                found: n,
            });
        }
        for found in [energies.len(), gradients.len()] {
            if found != n {
                return Err(ForceError::LengthMismatch { expected: n, found });
            }
        }

        let mut forces = Vec::with_capacity(n - 2);
        for i in 1..n - 1 {
            let hood = Neighborhood {
                index: i,
                prev: &images[i - 1].position,
                current: &images[i].position,
                next: &images[i + 1].position,
                energies: [energies[i - 1], energies[i], energies[i + 1]],
            };
            match self.project_image(&hood, images[i].kind, &gradients[i], spring_constant) {
                Ok(image_forces) => forces.push(image_forces),
                Err(ForceError::DegenerateGeometry { .. }) => forces.push(ImageForces::unprojected(
                    i,
                    images[i].kind,
                    energies[i],
                    gradients[i].clone(),
                )),
                Err(e) => return Err(e),
            }
        }

        Ok(ForceSnapshot {
            images: forces,
            endpoint_energies: [energies[0], energies[n - 1]],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::point::point_from;

    const TOLERANCE: f64 = 1e-12;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn straight_hood<'a>(prev: &'a Point, current: &'a Point, next: &'a Point) -> Neighborhood<'a> {
        Neighborhood {
            index: 1,
            prev,
            current,
            next,
            energies: [0.0, 1.0, 2.0],
        }
    }

    #[test]
    fn perpendicular_force_is_orthogonal_to_tangent() {
        let tangent = point_from(&[0.6, 0.8]);
        let gradient = point_from(&[2.0, -1.5]);
        let force = ForceProjector::perpendicular_force(&gradient, &tangent);
        assert!(f64_approx_equal(force.dot(&tangent), 0.0));
    }

    #[test]
    fn climbing_force_inverts_parallel_component() {
        let tangent = point_from(&[1.0, 0.0]);
        let gradient = point_from(&[2.0, 3.0]);
        let force = ForceProjector::climbing_force(&gradient, &tangent);
        assert_eq!(force, point_from(&[2.0, -3.0]));
    }

    #[test]
    fn spring_force_points_toward_the_longer_segment() {
        let prev = point_from(&[0.0, 0.0]);
        let current = point_from(&[1.0, 0.0]);
        let next = point_from(&[4.0, 0.0]);
        let hood = straight_hood(&prev, &current, &next);
        let tangent = point_from(&[1.0, 0.0]);
        let force = ForceProjector::spring_force(2.0, &hood, &tangent);
        assert_eq!(force, point_from(&[4.0, 0.0]));
    }

    #[test]
    fn effective_force_is_sum_of_projected_parts() {
        let prev = point_from(&[0.0, 0.0]);
        let current = point_from(&[1.0, 0.2]);
        let next = point_from(&[3.0, 0.0]);
        let hood = straight_hood(&prev, &current, &next);
        let gradient = point_from(&[0.5, -2.0]);
        let projector = ForceProjector::default();
        let forces = projector
            .project_image(&hood, ImageKind::Mobile, &gradient, 1.0)
            .unwrap();
        let tangent = forces.tangent.clone().unwrap();

        assert!(f64_approx_equal(forces.true_force.dot(&tangent), 0.0));
        let cross = forces.spring_force[0] * tangent[1] - forces.spring_force[1] * tangent[0];
        assert!(f64_approx_equal(cross, 0.0));
        assert_eq!(forces.effective_force, &forces.true_force + &forces.spring_force);
    }

    #[test]
    fn climbing_image_has_no_spring_force() {
        let prev = point_from(&[0.0, 0.0]);
        let current = point_from(&[1.0, 0.0]);
        let next = point_from(&[5.0, 0.0]);
        let hood = straight_hood(&prev, &current, &next);
        let forces = ForceProjector::default()
            .project_image(&hood, ImageKind::Climbing, &point_from(&[1.0, 1.0]), 10.0)
            .unwrap();
        assert_eq!(forces.spring_force, point_from(&[0.0, 0.0]));
        assert_eq!(forces.effective_force, point_from(&[1.0, -1.0]));
    }

    #[test]
    fn project_image_reports_degenerate_geometry() {
        let p = point_from(&[1.0, 1.0]);
        let next = point_from(&[2.0, 1.0]);
        let hood = straight_hood(&p, &p, &next);
        let result = ForceProjector::default().project_image(
            &hood,
            ImageKind::Mobile,
            &point_from(&[0.0, 1.0]),
            1.0,
        );
        assert_eq!(result, Err(ForceError::DegenerateGeometry { image: 1 }));
    }

    #[test]
    fn project_falls_back_to_raw_force_for_coincident_images() {
        let images = vec![
            Image::endpoint(point_from(&[0.0, 0.0])),
            Image::mobile(point_from(&[1.0, 0.0])),
            Image::mobile(point_from(&[1.0, 0.0])),
            Image::endpoint(point_from(&[2.0, 0.0])),
        ];
        let energies = vec![0.0, 1.0, 1.0, 0.0];
        let gradients = vec![
            point_from(&[0.0, 0.0]),
            point_from(&[0.5, 0.5]),
            point_from(&[-0.5, 0.5]),
            point_from(&[0.0, 0.0]),
        ];
        let snapshot = ForceProjector::default()
            .project(&images, &energies, &gradients, 1.0)
            .unwrap();

        assert_eq!(snapshot.degenerate_images(), vec![1, 2]);
        assert_eq!(snapshot.images[0].effective_force, point_from(&[-0.5, -0.5]));
        assert_eq!(snapshot.images[1].effective_force, point_from(&[0.5, -0.5]));
    }

    #[test]
    fn project_rejects_mismatched_inputs() {
        let images = vec![
            Image::endpoint(point_from(&[0.0])),
            Image::mobile(point_from(&[0.5])),
            Image::endpoint(point_from(&[1.0])),
        ];
        let gradients = vec![point_from(&[0.0]); 3];
        let result = ForceProjector::default().project(&images, &[0.0, 0.0], &gradients, 1.0);
        assert_eq!(
            result,
            Err(ForceError::LengthMismatch {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn endpoints_are_excluded_from_snapshot() {
        let images = vec![
            Image::endpoint(point_from(&[0.0, 0.0])),
            Image::mobile(point_from(&[0.5, 0.1])),
            Image::endpoint(point_from(&[1.0, 0.0])),
        ];
        let gradients = vec![point_from(&[9.0, 9.0]); 3];
        let snapshot = ForceProjector::default()
            .project(&images, &[-1.0, 0.0, -2.0], &gradients, 1.0)
            .unwrap();
        assert_eq!(snapshot.images.len(), 1);
        assert_eq!(snapshot.images[0].index, 1);
        assert_eq!(snapshot.endpoint_energies, [-1.0, -2.0]);
    }
}
