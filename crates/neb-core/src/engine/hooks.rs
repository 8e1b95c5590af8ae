use super::history::IterationRecord;
use super::state::RunOutcome;
use crate::core::forces::snapshot::ForceSnapshot;
use crate::core::io::ExportError;
use crate::core::models::image::Image;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Rendering failed: {0}")]
    Render(String),
}

/// Read-only view of the band at one iteration, before the integrator moves it.
#[derive(Debug, Clone, Copy)]
pub struct BandFrame<'b> {
    pub iteration: usize,
    pub images: &'b [Image],
    /// Energies of every image, endpoints included.
    pub energies: &'b [f64],
    pub forces: &'b ForceSnapshot,
}

/// Observer of a run. Failures are logged by the driver and never change the optimization.
pub trait ReportHook {
    fn name(&self) -> &str;

    fn on_start(&mut self, _frame: &BandFrame<'_>) -> Result<(), ReportError> {
        Ok(())
    }

    fn on_iteration(
        &mut self,
        _record: &IterationRecord,
        _frame: &BandFrame<'_>,
    ) -> Result<(), ReportError> {
        Ok(())
    }

    fn on_finish(&mut self, _outcome: &RunOutcome) -> Result<(), ReportError> {
        Ok(())
    }
}
