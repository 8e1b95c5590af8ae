use crate::core::forces::projection::ForceProjector;
use crate::core::forces::snapshot::ForceSnapshot;
use crate::core::models::band::Band;
use crate::core::models::point::Point;
use crate::core::surface::PotentialSurface;
use crate::engine::config::{ClimbingImage, RunConfig};
use crate::engine::error::EngineError;
use crate::engine::history::{IterationRecord, RunHistory};
use crate::engine::hooks::{BandFrame, ReportHook};
use crate::engine::integrator::{Integrator, has_converged};
use crate::engine::progress::{Progress, ProgressReporter, StatusUpdate};
use crate::engine::state::{RunOutcome, RunPhase, Termination};
use crate::engine::tasks::evaluation::{self, Evaluation};
use tracing::{debug, info, instrument, warn};

pub type StopPredicate<'h> = Box<dyn FnMut(&IterationRecord) -> bool + 'h>;

/// Relaxes a band toward the minimum-energy path.
///
/// Each iteration evaluates the surface at every image, projects the NEB forces, records the
/// iteration, notifies the hooks, and then either stops (converged) or lets the integrator move
/// the interior images.
pub struct RunDriver<'h> {
    config: RunConfig,
    projector: ForceProjector,
    integrator: Box<dyn Integrator>,
    hooks: Vec<Box<dyn ReportHook + 'h>>,
    stop: Option<StopPredicate<'h>>,
    phase: RunPhase,
}

impl<'h> RunDriver<'h> {
    pub fn new(config: RunConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            projector: ForceProjector::new(config.tangent, config.energy_tolerance),
            integrator: config.integrator.build(),
            config,
            hooks: Vec::new(),
            stop: None,
            phase: RunPhase::Init,
        })
    }

    pub fn with_hook(mut self, hook: impl ReportHook + 'h) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Checked after every step; returning `true` ends the run as [`Termination::Stopped`].
    pub fn with_stop_predicate(
        mut self,
        predicate: impl FnMut(&IterationRecord) -> bool + 'h,
    ) -> Self {
        self.stop = Some(Box::new(predicate));
        self
    }

    pub fn with_integrator(mut self, integrator: Box<dyn Integrator>) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    #[instrument(skip_all, name = "neb_relaxation")]
    pub fn run<S>(
        &mut self,
        band: &mut Band<'_, S>,
        reporter: &ProgressReporter,
    ) -> Result<RunOutcome, EngineError>
    where
        S: PotentialSurface + ?Sized,
    {
        // === Phase 0: Validation and setup ===
        self.phase = RunPhase::Init;
        reporter.report(Progress::PhaseStart {
            name: "Initialization",
        });
        self.prepare(band)?;
        let mut evaluated = evaluation::run(band.surface(), &band.all_positions())?;
        let initial_forces = self.project(band, &evaluated)?;
        let frame = BandFrame {
            iteration: 0,
            images: band.images(),
            energies: &evaluated.energies,
            forces: &initial_forces,
        };
        for hook in self.hooks.iter_mut() {
            if let Err(e) = hook.on_start(&frame) {
                warn!(hook = hook.name(), "Report hook failed at run start: {}", e);
            }
        }
        reporter.report(Progress::PhaseFinish);

        // === Phase 1: Relaxation loop ===
        let mut history = RunHistory::new();
        let mut steps = 0;
        let termination = if self.config.max_iterations == 0 {
            info!("Iteration budget is zero; returning the initial band unchanged.");
            Termination::MaxIterationsReached
        } else {
            self.phase = RunPhase::Running;
            reporter.report(Progress::PhaseStart { name: "Relaxation" });
            reporter.report(Progress::TaskStart {
                total_steps: self.config.max_iterations as u64,
            });
            let termination = self.relax(band, &mut evaluated, &mut history, &mut steps, reporter)?;
            reporter.report(Progress::TaskFinish);
            reporter.report(Progress::PhaseFinish);
            termination
        };

        // === Phase 2: Final state ===
        let final_forces = self.project(band, &evaluated)?;
        let termination = if termination == Termination::MaxIterationsReached
            && self.config.max_iterations > 0
            && has_converged(&final_forces.effective_forces(), self.config.force_threshold)
        {
            info!("Band converged below the force threshold on the final step.");
            Termination::Converged
        } else {
            termination
        };
        let outcome = RunOutcome {
            termination,
            iterations: steps,
            history,
            final_images: band.images().to_vec(),
            final_energies: evaluated.energies,
            final_forces,
        };
        self.phase = RunPhase::from(termination);

        for hook in self.hooks.iter_mut() {
            if let Err(e) = hook.on_finish(&outcome) {
                warn!(hook = hook.name(), "Report hook failed at run finish: {}", e);
            }
        }

        info!(
            termination = %outcome.termination,
            iterations = outcome.iterations,
            max_force = outcome.max_force(),
            "Relaxation finished."
        );
        Ok(outcome)
    }

    fn prepare<S>(&mut self, band: &mut Band<'_, S>) -> Result<(), EngineError>
    where
        S: PotentialSurface + ?Sized,
    {
        if band.interior_count() != self.config.image_count {
            return Err(EngineError::ImageCountMismatch {
                expected: self.config.image_count,
                found: band.interior_count(),
            });
        }
        if band.spring_constant() != self.config.spring_constant {
            warn!(
                band = band.spring_constant(),
                config = self.config.spring_constant,
                "Band spring constant differs from the run configuration; using the band's."
            );
        }

        self.integrator.reset();
        // A zero budget hands the band back untouched.
        if self.config.max_iterations > 0 {
            match self.config.climbing {
                ClimbingImage::Fixed { index } => band.set_climbing(index)?,
                ClimbingImage::Disabled | ClimbingImage::Automatic { .. } => band.clear_climbing(),
            }
        }

        info!(
            surface = band.surface().name(),
            images = band.interior_count(),
            spring_constant = band.spring_constant(),
            integrator = self.integrator.name(),
            tangent = %self.config.tangent,
            "Starting NEB relaxation."
        );
        Ok(())
    }

    fn relax<S>(
        &mut self,
        band: &mut Band<'_, S>,
        evaluated: &mut Evaluation,
        history: &mut RunHistory,
        steps: &mut usize,
        reporter: &ProgressReporter,
    ) -> Result<Termination, EngineError>
    where
        S: PotentialSurface + ?Sized,
    {
        let RunConfig {
            mass,
            time_step,
            max_iterations,
            force_threshold,
            ..
        } = self.config;

        for iteration in 0..max_iterations {
            self.update_climbing(band, iteration, &evaluated.energies)?;

            let forces = self.project(band, evaluated)?;
            for image in forces.images.iter().filter(|f| f.is_degenerate()) {
                warn!(
                    iteration,
                    image = image.index,
                    "Degenerate geometry: tangent undefined, using the unprojected force."
                );
            }

            let record = IterationRecord::from_snapshot(iteration, &forces, band.climbing_image());
            debug!(
                iteration,
                max_force = record.max_force,
                rms_force = record.rms_force,
                max_energy = record.max_energy,
                "Iteration complete."
            );

            let frame = BandFrame {
                iteration,
                images: band.images(),
                energies: &evaluated.energies,
                forces: &forces,
            };
            for hook in self.hooks.iter_mut() {
                if let Err(e) = hook.on_iteration(&record, &frame) {
                    warn!(hook = hook.name(), iteration, "Report hook failed: {}", e);
                }
            }
            reporter.report(Progress::Status(StatusUpdate {
                iteration,
                max_force: record.max_force,
                max_energy: record.max_energy,
            }));
            history.push(record);

            let effective: Vec<Point> = forces.effective_forces();
            if has_converged(&effective, force_threshold) {
                info!(iteration, "Band converged below the force threshold.");
                return Ok(Termination::Converged);
            }

            let next = self
                .integrator
                .step(&band.positions(), &effective, mass, time_step)?;
            band.update(next)?;
            *steps += 1;
            reporter.report(Progress::TaskIncrement);

            *evaluated = evaluation::run(band.surface(), &band.all_positions())?;

            if let (Some(stop), Some(last)) = (self.stop.as_deref_mut(), history.last()) {
                if stop(last) {
                    info!(iteration, "Stop requested; ending the run early.");
                    return Ok(Termination::Stopped);
                }
            }
        }
        Ok(Termination::MaxIterationsReached)
    }

    fn update_climbing<S>(
        &self,
        band: &mut Band<'_, S>,
        iteration: usize,
        energies: &[f64],
    ) -> Result<(), EngineError>
    where
        S: PotentialSurface + ?Sized,
    {
        let ClimbingImage::Automatic { after_iterations } = self.config.climbing else {
            return Ok(());
        };
        if iteration < after_iterations {
            return Ok(());
        }
        if let Some(highest) = band.highest_interior_image(energies) {
            if band.climbing_image() != Some(highest) {
                debug!(iteration, image = highest, "Climbing image selected.");
                band.set_climbing(highest)?;
            }
        }
        Ok(())
    }

    fn project<S>(
        &self,
        band: &Band<'_, S>,
        evaluated: &Evaluation,
    ) -> Result<ForceSnapshot, EngineError>
    where
        S: PotentialSurface + ?Sized,
    {
        Ok(self.projector.project(
            band.images(),
            &evaluated.energies,
            &evaluated.gradients,
            band.spring_constant(),
        )?)
    }
}

/// Builds the linearly interpolated starting band described by `config`.
pub fn build_band<'a, S>(
    config: &RunConfig,
    initial: Point,
    terminal: Point,
    surface: &'a S,
) -> Result<Band<'a, S>, EngineError>
where
    S: PotentialSurface + ?Sized,
{
    Ok(Band::new(
        initial,
        terminal,
        surface,
        config.image_count,
        config.spring_constant,
    )?)
}

/// Runs a full relaxation without hooks.
pub fn run<S>(
    band: &mut Band<'_, S>,
    config: &RunConfig,
    reporter: &ProgressReporter,
) -> Result<RunOutcome, EngineError>
where
    S: PotentialSurface + ?Sized,
{
    RunDriver::new(config.clone())?.run(band, reporter)
}
