use super::error::EngineError;
use crate::core::models::point::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Advances the interior images of a band from their effective forces.
pub trait Integrator: Send {
    fn name(&self) -> &'static str;

    /// Returns the new interior positions; `forces[i]` acts on `positions[i]`.
    fn step(
        &mut self,
        positions: &[Point],
        forces: &[Point],
        mass: f64,
        dt: f64,
    ) -> Result<Vec<Point>, EngineError>;

    /// Forgets any internal dynamical state.
    fn reset(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntegratorKind {
    SteepestDescent,
    #[default]
    QuickMin,
}

impl IntegratorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegratorKind::SteepestDescent => "steepest-descent",
            IntegratorKind::QuickMin => "quick-min",
        }
    }

    pub fn build(&self) -> Box<dyn Integrator> {
        match self {
            IntegratorKind::SteepestDescent => Box::new(SteepestDescent),
            IntegratorKind::QuickMin => Box::new(QuickMin::new()),
        }
    }
}

impl fmt::Display for IntegratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntegratorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "steepest-descent" | "sd" => Ok(IntegratorKind::SteepestDescent),
            "quick-min" | "quickmin" | "qm" => Ok(IntegratorKind::QuickMin),
            other => Err(format!(
                "unknown integrator '{}', expected 'steepest-descent' or 'quick-min'",
                other
            )),
        }
    }
}

fn check_shapes(positions: &[Point], forces: &[Point]) -> Result<(), EngineError> {
    if positions.len() != forces.len() {
        return Err(EngineError::DimensionMismatch {
            context: "integrator forces",
            expected: positions.len(),
            found: forces.len(),
        });
    }
    for (x, f) in positions.iter().zip(forces) {
        if x.len() != f.len() {
            return Err(EngineError::DimensionMismatch {
                context: "force coordinates",
                expected: x.len(),
                found: f.len(),
            });
        }
    }
    Ok(())
}

/// `x ← x + (F/m)·dt²`
#[derive(Debug, Clone, Copy, Default)]
pub struct SteepestDescent;

impl Integrator for SteepestDescent {
    fn name(&self) -> &'static str {
        "steepest descent"
    }

    fn step(
        &mut self,
        positions: &[Point],
        forces: &[Point],
        mass: f64,
        dt: f64,
    ) -> Result<Vec<Point>, EngineError> {
        check_shapes(positions, forces)?;
        let scale = dt * dt / mass;
        Ok(positions
            .iter()
            .zip(forces)
            .map(|(x, f)| x + f * scale)
            .collect())
    }
}

/// Damped semi-implicit Euler dynamics on the whole band.
///
/// Each step first projects the velocity of the concatenated band vector onto the current force
/// direction, zeroing it when it points against the force. The velocity is then advanced with the
/// force and the positions move with the updated velocity.
#[derive(Debug, Clone, Default)]
pub struct QuickMin {
    velocity: Vec<Point>,
}

impl QuickMin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn velocity(&self) -> &[Point] {
        &self.velocity
    }

    fn matches(&self, forces: &[Point]) -> bool {
        self.velocity.len() == forces.len()
            && self
                .velocity
                .iter()
                .zip(forces)
                .all(|(v, f)| v.len() == f.len())
    }
}

impl Integrator for QuickMin {
    fn name(&self) -> &'static str {
        "quick-min"
    }

    fn step(
        &mut self,
        positions: &[Point],
        forces: &[Point],
        mass: f64,
        dt: f64,
    ) -> Result<Vec<Point>, EngineError> {
        check_shapes(positions, forces)?;
        if !self.matches(forces) {
            self.velocity = forces.iter().map(|f| Point::zeros(f.len())).collect();
        }

        let force_norm = forces.iter().map(Point::norm_squared).sum::<f64>().sqrt();
        if force_norm > 0.0 {
            let along: f64 = self
                .velocity
                .iter()
                .zip(forces)
                .map(|(v, f)| v.dot(f))
                .sum::<f64>()
                / force_norm;
            let scale = along.max(0.0) / force_norm;
            for (v, f) in self.velocity.iter_mut().zip(forces) {
                *v = f * scale;
            }
        } else {
            for v in self.velocity.iter_mut() {
                v.fill(0.0);
            }
        }

        let kick = dt / mass;
        Ok(self
            .velocity
            .iter_mut()
            .zip(forces)
            .zip(positions)
            .map(|((v, f), x)| {
                *v += f * kick;
                x + &*v * dt
            })
            .collect())
    }

    fn reset(&mut self) {
        self.velocity.clear();
    }
}

/// Largest per-image force norm.
pub fn max_force_norm(forces: &[Point]) -> f64 {
    forces.iter().map(Point::norm).fold(0.0, f64::max)
}

pub fn rms_force_norm(forces: &[Point]) -> f64 {
    if forces.is_empty() {
        return 0.0;
    }
    (forces.iter().map(Point::norm_squared).sum::<f64>() / forces.len() as f64).sqrt()
}

#[inline]
pub fn has_converged(forces: &[Point], threshold: f64) -> bool {
    max_force_norm(forces) < threshold
}
