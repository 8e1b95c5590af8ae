use crate::core::models::image::ImageKind;
use crate::core::models::point::Point;

/// Force decomposition of one interior image for one iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageForces {
    /// Position of the image in the band, endpoints included in the numbering.
    pub index: usize,
    pub kind: ImageKind,
    pub energy: f64,
    pub gradient: Point,
    /// `None` when the neighborhood was degenerate and no tangent could be formed.
    pub tangent: Option<Point>,
    /// Projected true force (perpendicular part, or the inverted form for a climbing image).
    pub true_force: Point,
    pub spring_force: Point,
    pub effective_force: Point,
}

impl ImageForces {
    /// Fallback used when the tangent is undefined: the raw true force, no spring.
    pub fn unprojected(index: usize, kind: ImageKind, energy: f64, gradient: Point) -> Self {
        let true_force = -&gradient;
        let spring_force = Point::zeros(gradient.len());
        Self {
            index,
            kind,
            energy,
            effective_force: true_force.clone(),
            gradient,
            tangent: None,
            true_force,
            spring_force,
        }
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.tangent.is_none()
    }

    #[inline]
    pub fn force_norm(&self) -> f64 {
        self.effective_force.norm()
    }
}

/// Per-image force decomposition of the whole band for one iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceSnapshot {
    pub images: Vec<ImageForces>,
    pub endpoint_energies: [f64; 2],
}

impl ForceSnapshot {
    pub fn effective_forces(&self) -> Vec<Point> {
        self.images
            .iter()
            .map(|image| image.effective_force.clone())
            .collect()
    }

    /// Largest effective-force norm over the interior images.
    pub fn max_force(&self) -> f64 {
        self.images
            .iter()
            .map(ImageForces::force_norm)
            .fold(0.0, f64::max)
    }

    pub fn rms_force(&self) -> f64 {
        if self.images.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = self
            .images
            .iter()
            .map(|image| image.effective_force.norm_squared())
            .sum();
        (sum_sq / self.images.len() as f64).sqrt()
    }

    /// Band index and energy of the highest interior image.
    pub fn highest_image(&self) -> Option<(usize, f64)> {
        self.images
            .iter()
            .max_by(|a, b| {
                a.energy
                    .partial_cmp(&b.energy)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|image| (image.index, image.energy))
    }

    pub fn degenerate_images(&self) -> Vec<usize> {
        self.images
            .iter()
            .filter(|image| image.is_degenerate())
            .map(|image| image.index)
            .collect()
    }

    /// Energies of every image, endpoints included, in band order.
    pub fn energies(&self) -> Vec<f64> {
        let mut energies = Vec::with_capacity(self.images.len() + 2);
        energies.push(self.endpoint_energies[0]);
        energies.extend(self.images.iter().map(|image| image.energy));
        energies.push(self.endpoint_energies[1]);
        energies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::point::point_from;

    fn image(index: usize, energy: f64, force: &[f64]) -> ImageForces {
        ImageForces {
            index,
            kind: ImageKind::Mobile,
            energy,
            gradient: point_from(force).map(|c| -c),
            tangent: Some(point_from(&[1.0, 0.0])),
            true_force: point_from(force),
            spring_force: point_from(&[0.0, 0.0]),
            effective_force: point_from(force),
        }
    }

    fn snapshot() -> ForceSnapshot {
        ForceSnapshot {
            images: vec![image(1, -1.0, &[3.0, 4.0]), image(2, 2.5, &[0.0, 1.0])],
            endpoint_energies: [-5.0, -4.0],
        }
    }

    #[test]
    fn max_and_rms_force_summarize_effective_forces() {
        let s = snapshot();
        assert_eq!(s.max_force(), 5.0);
        assert!((s.rms_force() - 13.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn highest_image_reports_band_index() {
        assert_eq!(snapshot().highest_image(), Some((2, 2.5)));
    }

    #[test]
    fn energies_include_endpoints_in_order() {
        assert_eq!(snapshot().energies(), vec![-5.0, -1.0, 2.5, -4.0]);
    }

    #[test]
    fn unprojected_fallback_is_raw_true_force_without_spring() {
        let forces = ImageForces::unprojected(3, ImageKind::Mobile, 0.0, point_from(&[1.0, -2.0]));
        assert!(forces.is_degenerate());
        assert_eq!(forces.effective_force, point_from(&[-1.0, 2.0]));
        assert_eq!(forces.spring_force, point_from(&[0.0, 0.0]));
    }

    #[test]
    fn degenerate_images_lists_missing_tangents() {
        let mut s = snapshot();
        s.images.push(ImageForces::unprojected(
            3,
            ImageKind::Mobile,
            0.0,
            point_from(&[0.0, 0.0]),
        ));
        assert_eq!(s.degenerate_images(), vec![3]);
    }

    #[test]
    fn empty_snapshot_has_zero_forces() {
        let s = ForceSnapshot {
            images: vec![],
            endpoint_energies: [0.0, 0.0],
        };
        assert_eq!(s.max_force(), 0.0);
        assert_eq!(s.rms_force(), 0.0);
        assert_eq!(s.highest_image(), None);
    }
}
