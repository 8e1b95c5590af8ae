//! Export of band snapshots and per-iteration records.
//!
//! Everything is written as CSV with a header row so results can be loaded directly into
//! spreadsheets or dataframe libraries.

pub mod csv;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("Band export needs one energy per image: {images} images, {energies} energies")]
    LengthMismatch { images: usize, energies: usize },
}
