use crate::core::forces::snapshot::ForceSnapshot;
use crate::core::io::{ExportError, csv};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Summary of one iteration, taken from the forces the integrator was about to act on.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    pub iteration: usize,
    pub max_force: f64,
    pub rms_force: f64,
    /// Energy of the highest interior image.
    pub max_energy: f64,
    pub highest_image: Option<usize>,
    pub climbing_image: Option<usize>,
    pub degenerate_images: Vec<usize>,
}

impl IterationRecord {
    pub fn from_snapshot(
        iteration: usize,
        snapshot: &ForceSnapshot,
        climbing_image: Option<usize>,
    ) -> Self {
        let highest = snapshot.highest_image();
        Self {
            iteration,
            max_force: snapshot.max_force(),
            rms_force: snapshot.rms_force(),
            max_energy: highest.map_or(f64::NAN, |(_, energy)| energy),
            highest_image: highest.map(|(index, _)| index),
            climbing_image,
            degenerate_images: snapshot.degenerate_images(),
        }
    }
}

#[derive(Serialize)]
struct HistoryRow {
    iteration: usize,
    max_force: f64,
    rms_force: f64,
    max_energy: f64,
    highest_image: Option<usize>,
    climbing_image: Option<usize>,
    degenerate_images: String,
}

/// Append-only log of every iteration of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunHistory {
    records: Vec<IterationRecord>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: IterationRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[IterationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&IterationRecord> {
        self.records.last()
    }

    pub fn max_forces(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.max_force).collect()
    }

    /// Every image index that was degenerate in at least one iteration, ascending.
    pub fn degenerate_images(&self) -> Vec<usize> {
        let mut images: Vec<usize> = self
            .records
            .iter()
            .flat_map(|r| r.degenerate_images.iter().copied())
            .collect();
        images.sort_unstable();
        images.dedup();
        images
    }

    fn rows(&self) -> Vec<HistoryRow> {
        self.records
            .iter()
            .map(|r| HistoryRow {
                iteration: r.iteration,
                max_force: r.max_force,
                rms_force: r.rms_force,
                max_energy: r.max_energy,
                highest_image: r.highest_image,
                climbing_image: r.climbing_image,
                degenerate_images: r
                    .degenerate_images
                    .iter()
                    .map(usize::to_string)
                    .collect::<Vec<_>>()
                    .join(";"),
            })
            .collect()
    }

    /// One CSV row per iteration; degenerate image indices are joined with `;`.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        csv::write_records(writer, &self.rows())
    }

    pub fn write_csv_to_path(&self, path: &Path) -> Result<(), ExportError> {
        csv::write_records_to_path(path, &self.rows())
    }
}
