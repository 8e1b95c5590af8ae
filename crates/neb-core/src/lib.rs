//! # NEB++ Core Library
//!
//! A nudged elastic band (NEB) engine for locating minimum-energy paths (MEPs) between two
//! known minima of a potential-energy surface.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture so that the numerical pieces can be
//! tested in isolation and recombined freely.
//!
//! - **[`core`]: The Foundation.** Stateless models (`Point`, `Image`, `Band`), the
//!   [`PotentialSurface`](core::surface::PotentialSurface) boundary with the shipped surfaces,
//!   tangent estimation and force projection, scenario definitions, and CSV export.
//!
//! - **[`engine`]: The Logic Core.** Run configuration and validation, the error taxonomy,
//!   integrators, run history, report hooks, progress reporting, and batched evaluation.
//!
//! - **[`workflows`]: The Public API.** The [`RunDriver`](workflows::relax::RunDriver) ties the
//!   `engine` and `core` together and relaxes a band until it converges or runs out of
//!   iterations.

pub mod core;
pub mod engine;
pub mod workflows;
