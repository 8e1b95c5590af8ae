use super::plots::{self, MapContext};
use nebpp::core::io::csv;
use nebpp::core::models::point;
use nebpp::engine::history::IterationRecord;
use nebpp::engine::hooks::{BandFrame, ReportError, ReportHook};
use nebpp::engine::state::RunOutcome;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const BAND_CSV: &str = "band.csv";
pub const HISTORY_CSV: &str = "history.csv";
pub const PATH_MAP_SVG: &str = "path.svg";
pub const LOSS_SVG: &str = "loss.svg";
pub const PROFILE_SVG: &str = "profile.svg";
pub const FRAMES_DIR: &str = "frames";

fn ensure_parent(path: &Path) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Writes the final band and the per-iteration history as CSV.
pub struct CsvExportHook {
    directory: PathBuf,
}

impl CsvExportHook {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl ReportHook for CsvExportHook {
    fn name(&self) -> &str {
        "csv-export"
    }

    fn on_finish(&mut self, outcome: &RunOutcome) -> Result<(), ReportError> {
        fs::create_dir_all(&self.directory)?;
        let band_path = self.directory.join(BAND_CSV);
        csv::write_band_to_path(&band_path, &outcome.final_images, &outcome.final_energies)?;
        let history_path = self.directory.join(HISTORY_CSV);
        outcome.history.write_csv_to_path(&history_path)?;
        info!(band = ?band_path, history = ?history_path, "CSV results written.");
        Ok(())
    }
}

/// Snapshots the band over the energy map every `every` iterations.
pub struct LivePlotHook<'a> {
    context: &'a MapContext,
    directory: PathBuf,
    every: usize,
    written: usize,
}

impl<'a> LivePlotHook<'a> {
    pub fn new(context: &'a MapContext, directory: impl Into<PathBuf>, every: usize) -> Self {
        Self {
            context,
            directory: directory.into(),
            every: every.max(1),
            written: 0,
        }
    }

    pub fn frame_path(&self, iteration: usize) -> PathBuf {
        self.directory.join(format!("band-{:05}.svg", iteration))
    }

    fn draw(&mut self, frame: &BandFrame<'_>) -> Result<(), ReportError> {
        let path = self.frame_path(frame.iteration);
        ensure_parent(&path)?;
        let positions: Vec<_> = frame.images.iter().map(|i| i.position.clone()).collect();
        let caption = format!("{} - iteration {}", self.context.title, frame.iteration);
        plots::draw_path_map(&path, self.context, &positions, &caption)?;
        self.written += 1;
        debug!(path = ?path, "Band snapshot written.");
        Ok(())
    }
}

impl ReportHook for LivePlotHook<'_> {
    fn name(&self) -> &str {
        "live-plot"
    }

    fn on_iteration(
        &mut self,
        record: &IterationRecord,
        frame: &BandFrame<'_>,
    ) -> Result<(), ReportError> {
        if record.iteration % self.every != 0 {
            return Ok(());
        }
        self.draw(frame)
    }

    fn on_finish(&mut self, _outcome: &RunOutcome) -> Result<(), ReportError> {
        info!(frames = self.written, directory = ?self.directory, "Band snapshots written.");
        Ok(())
    }
}

/// Draws the final band over the energy map.
pub struct PathMapHook<'a> {
    context: &'a MapContext,
    path: PathBuf,
}

impl<'a> PathMapHook<'a> {
    pub fn new(context: &'a MapContext, path: impl Into<PathBuf>) -> Self {
        Self {
            context,
            path: path.into(),
        }
    }
}

impl ReportHook for PathMapHook<'_> {
    fn name(&self) -> &str {
        "path-map"
    }

    fn on_finish(&mut self, outcome: &RunOutcome) -> Result<(), ReportError> {
        ensure_parent(&self.path)?;
        let caption = format!(
            "{} - final band ({} iterations)",
            self.context.title, outcome.iterations
        );
        plots::draw_path_map(
            &self.path,
            self.context,
            &outcome.final_positions(),
            &caption,
        )?;
        info!(path = ?self.path, "Path map written.");
        Ok(())
    }
}

/// Plots the largest force norm of every recorded iteration.
pub struct LossCurveHook {
    title: String,
    path: PathBuf,
}

impl LossCurveHook {
    pub fn new(title: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
        }
    }
}

impl ReportHook for LossCurveHook {
    fn name(&self) -> &str {
        "loss-curve"
    }

    fn on_finish(&mut self, outcome: &RunOutcome) -> Result<(), ReportError> {
        ensure_parent(&self.path)?;
        plots::draw_loss_curve(&self.path, &self.title, &outcome.history.max_forces())?;
        info!(path = ?self.path, "Convergence curve written.");
        Ok(())
    }
}

/// Plots the final energies against the reaction coordinate.
pub struct ProfileHook {
    title: String,
    path: PathBuf,
}

impl ProfileHook {
    pub fn new(title: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
        }
    }
}

impl ReportHook for ProfileHook {
    fn name(&self) -> &str {
        "energy-profile"
    }

    fn on_finish(&mut self, outcome: &RunOutcome) -> Result<(), ReportError> {
        ensure_parent(&self.path)?;
        let coordinates = point::reaction_coordinates(&outcome.final_positions());
        plots::draw_energy_profile(
            &self.path,
            &self.title,
            &coordinates,
            &outcome.final_energies,
        )?;
        info!(path = ?self.path, "Energy profile written.");
        Ok(())
    }
}
