//! # Forces Module
//!
//! Decomposition of true and spring forces into the nudged elastic band force.
//!
//! For every interior image the local path direction is estimated from its two neighbors
//! ([`tangent`]). The true force `−∇V` keeps only its component perpendicular to that tangent
//! while the spring force keeps only its parallel component ([`projection`]). The per-image
//! results of one iteration are collected in a [`snapshot::ForceSnapshot`].
//!
//! ```ignore
//! use nebpp::core::forces::projection::ForceProjector;
//! use nebpp::core::forces::tangent::TangentScheme;
//!
//! let projector = ForceProjector::new(TangentScheme::EnergyWeighted, 1e-10);
//! let snapshot = projector.project(band.images(), &energies, &gradients, band.spring_constant())?;
//! ```

pub mod projection;
pub mod snapshot;
pub mod tangent;

use thiserror::Error;

/// Shortest segment between adjacent images that still defines a direction.
pub const MIN_SEGMENT_LENGTH: f64 = 1e-12;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForceError {
    #[error("Degenerate geometry at image {image}: tangent is undefined for coincident images")]
    DegenerateGeometry { image: usize },

    #[error("Force inputs cover {found} images, expected {expected}")]
    LengthMismatch { expected: usize, found: usize },
}
