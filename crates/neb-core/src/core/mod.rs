//! # Core Module
//!
//! The stateless building blocks of the NEB engine.
//!
//! ## Architecture
//!
//! - **Band Representation** ([`models`]) - Points, images, and the elastic band itself
//! - **Energy Surfaces** ([`surface`]) - The `PotentialSurface` trait and shipped potentials
//! - **Force Decomposition** ([`forces`]) - Tangent estimation and NEB force projection
//! - **Scenarios** ([`scenario`]) - Per-potential endpoints, saddle references, and plot frames
//! - **Export** ([`io`]) - CSV writers for band snapshots and run history
//!
//! ## Scientific Foundation
//!
//! - **Nudged elastic band**: only the perpendicular component of the true force and the
//!   parallel component of the spring force act on each image
//! - **Improved tangent estimate**: upwind tangents with energy weighting at extrema keep the
//!   band free of kinks
//! - **Climbing image**: the highest image is driven uphill along the path onto the saddle

pub mod forces;
pub mod io;
pub mod models;
pub mod scenario;
pub mod surface;
