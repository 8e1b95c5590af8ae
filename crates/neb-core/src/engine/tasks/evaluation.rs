use crate::core::models::point::{self, Point};
use crate::core::surface::PotentialSurface;
use crate::engine::error::EngineError;
use tracing::{instrument, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Energies and gradients of a set of images, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub energies: Vec<f64>,
    pub gradients: Vec<Point>,
}

#[instrument(skip_all, name = "evaluation_task", fields(images = positions.len()))]
pub fn run<S>(surface: &S, positions: &[Point]) -> Result<Evaluation, EngineError>
where
    S: PotentialSurface + ?Sized,
{
    let energies = surface.batched_energy(positions);
    if energies.len() != positions.len() {
        return Err(EngineError::Internal(format!(
            "surface '{}' returned {} energies for {} points",
            surface.name(),
            energies.len(),
            positions.len()
        )));
    }

    #[cfg(not(feature = "parallel"))]
    let iterator = positions.iter();

    #[cfg(feature = "parallel")]
    let iterator = positions.par_iter();

    let gradients: Vec<Point> = iterator.map(|p| surface.gradient(p)).collect();

    if let Some((image, energy)) = energies.iter().enumerate().find(|(_, e)| !e.is_finite()) {
        return Err(EngineError::Evaluation {
            image,
            reason: format!("energy is {}", energy),
        });
    }
    if let Some(image) = gradients.iter().position(|g| !point::is_finite(g)) {
        return Err(EngineError::Evaluation {
            image,
            reason: "gradient has non-finite components".to_string(),
        });
    }

    trace!("Evaluated {} images.", positions.len());
    Ok(Evaluation {
        energies,
        gradients,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::point::point_from;
    use crate::core::surface::quadratic::QuadraticBowl;

    struct Singular;

    impl PotentialSurface for Singular {
        fn name(&self) -> &str {
            "singular"
        }

        fn energy(&self, point: &Point) -> f64 {
            1.0 / point[0]
        }
    }

    #[test]
    fn results_follow_input_order() {
        let bowl = QuadraticBowl::new(vec![2.0]);
        let positions: Vec<Point> = (0..32).map(|i| point_from(&[i as f64])).collect();
        let evaluation = run(&bowl, &positions).unwrap();
        for (i, (e, g)) in evaluation
            .energies
            .iter()
            .zip(&evaluation.gradients)
            .enumerate()
        {
            let x = i as f64;
            assert_eq!(*e, x * x);
            assert_eq!(g[0], 2.0 * x);
        }
    }

    #[test]
    fn non_finite_energy_reports_the_image() {
        let positions = vec![point_from(&[1.0]), point_from(&[0.0]), point_from(&[2.0])];
        let result = run(&Singular, &positions);
        assert!(matches!(
            result,
            Err(EngineError::Evaluation { image: 1, .. })
        ));
    }

    #[test]
    fn works_through_trait_objects() {
        let surface: Box<dyn PotentialSurface> = Box::new(QuadraticBowl::isotropic(2, 1.0));
        let evaluation = run(surface.as_ref(), &[point_from(&[1.0, 1.0])]).unwrap();
        assert_eq!(evaluation.energies, vec![1.0]);
    }
}
