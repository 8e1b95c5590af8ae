//! # Engine Module
//!
//! The stateful machinery that drives a band toward the minimum-energy path.
//!
//! ## Overview
//!
//! Where [`crate::core`] describes a band and the forces acting on it, the engine decides how
//! those forces move it: how a run is configured and validated, which integrator advances the
//! images, what is recorded after every iteration, and how observers are told about progress.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - `RunConfig`, its builder, and validation rules
//! - **Integrators** ([`integrator`]) - Steepest descent and QuickMin, plus convergence checks
//! - **History** ([`history`]) - Per-iteration records and CSV export
//! - **Run State** ([`state`]) - Run phases, termination reasons, and the final outcome
//! - **Report Hooks** ([`hooks`]) - Observers invoked at run start, every iteration, and finish
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Engine-level error taxonomy
//! - **Tasks** ([`tasks`]) - Batched energy and gradient evaluation

pub mod config;
pub mod error;
pub mod history;
pub mod hooks;
pub mod integrator;
pub mod progress;
pub mod state;
pub mod tasks;
