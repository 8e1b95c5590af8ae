pub mod hooks;
pub mod plots;

use nebpp::core::models::point::{self, Point};
use nebpp::core::scenario::Scenario;
use nebpp::engine::state::{RunOutcome, Termination};
use std::fmt;
use tracing::{info, warn};

/// The highest-energy interior image of the final band.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionEstimate {
    pub index: usize,
    pub position: Point,
    pub energy: f64,
    /// Distance to the scenario's reference saddle point.
    pub saddle_distance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub scenario: &'static str,
    pub termination: Termination,
    pub iterations: usize,
    pub max_force: f64,
    pub transition: Option<TransitionEstimate>,
    pub degenerate_images: Vec<usize>,
}

impl RunSummary {
    pub fn new(scenario: &Scenario, outcome: &RunOutcome) -> Self {
        let transition = outcome.transition_image().map(|(index, position)| {
            TransitionEstimate {
                index,
                position: position.clone(),
                energy: outcome.final_energies.get(index).copied().unwrap_or(f64::NAN),
                saddle_distance: point::distance(position, &scenario.saddle),
            }
        });

        Self {
            scenario: scenario.name,
            termination: outcome.termination,
            iterations: outcome.iterations,
            max_force: outcome.max_force(),
            transition,
            degenerate_images: outcome.history.degenerate_images(),
        }
    }

    pub fn log(&self) {
        match &self.transition {
            Some(t) => info!(
                scenario = self.scenario,
                image = t.index,
                energy = t.energy,
                saddle_distance = t.saddle_distance,
                "Transition image located."
            ),
            None => warn!(scenario = self.scenario, "Band has no interior image to report."),
        }
        if !self.degenerate_images.is_empty() {
            warn!(
                images = ?self.degenerate_images,
                "Some images had an undefined tangent during the run."
            );
        }
    }
}

fn format_point(p: &Point) -> String {
    let coords: Vec<String> = p.iter().map(|c| format!("{:.4}", c)).collect();
    format!("({})", coords.join(", "))
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scenario:        {}", self.scenario)?;
        writeln!(f, "Termination:     {}", self.termination)?;
        writeln!(f, "Iterations:      {}", self.iterations)?;
        writeln!(f, "Max force:       {:.6e}", self.max_force)?;
        if let Some(t) = &self.transition {
            writeln!(
                f,
                "Transition:      image {} at {} (E = {:.6})",
                t.index,
                format_point(&t.position),
                t.energy
            )?;
            write!(f, "Saddle distance: {:.6}", t.saddle_distance)?;
        } else {
            write!(f, "Transition:      none")?;
        }
        if !self.degenerate_images.is_empty() {
            write!(f, "\nDegenerate:      {:?}", self.degenerate_images)?;
        }
        Ok(())
    }
}
