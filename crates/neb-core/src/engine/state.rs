use super::history::RunHistory;
use crate::core::forces::snapshot::ForceSnapshot;
use crate::core::models::image::Image;
use crate::core::models::point::Point;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    Running,
    Converged,
    MaxIterationsReached,
    Stopped,
}

impl RunPhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunPhase::Init | RunPhase::Running)
    }
}

/// Why a run ended. None of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Converged,
    MaxIterationsReached,
    Stopped,
}

impl Termination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Termination::Converged => "converged",
            Termination::MaxIterationsReached => "maximum iterations reached",
            Termination::Stopped => "stopped",
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Termination> for RunPhase {
    fn from(termination: Termination) -> Self {
        match termination {
            Termination::Converged => RunPhase::Converged,
            Termination::MaxIterationsReached => RunPhase::MaxIterationsReached,
            Termination::Stopped => RunPhase::Stopped,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub termination: Termination,
    /// Number of integrator steps taken.
    pub iterations: usize,
    pub history: RunHistory,
    /// Every image of the final band, endpoints included.
    pub final_images: Vec<Image>,
    pub final_energies: Vec<f64>,
    pub final_forces: ForceSnapshot,
}

impl RunOutcome {
    #[inline]
    pub fn is_converged(&self) -> bool {
        self.termination == Termination::Converged
    }

    pub fn final_positions(&self) -> Vec<Point> {
        self.final_images
            .iter()
            .map(|image| image.position.clone())
            .collect()
    }

    /// Index and position of the highest-energy interior image of the final band.
    pub fn transition_image(&self) -> Option<(usize, &Point)> {
        self.final_forces
            .highest_image()
            .and_then(|(index, _)| {
                self.final_images
                    .get(index)
                    .map(|image| (index, &image.position))
            })
    }

    pub fn max_force(&self) -> f64 {
        self.final_forces.max_force()
    }
}
