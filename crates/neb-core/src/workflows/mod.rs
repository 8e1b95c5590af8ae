//! # Workflows Module
//!
//! High-level entry points that run a complete NEB calculation.
//!
//! ## Overview
//!
//! A workflow validates its configuration, evaluates the band, and iterates the engine until a
//! termination condition is met, reporting progress and notifying report hooks along the way.
//!
//! ## Architecture
//!
//! - **Relaxation Workflow** ([`relax`]) - The [`RunDriver`](relax::RunDriver) state machine
//!   that relaxes a band to the minimum-energy path, optionally with a climbing image.
//!
//! ```ignore
//! use nebpp::core::scenario;
//! use nebpp::engine::config::RunConfigBuilder;
//! use nebpp::engine::progress::ProgressReporter;
//! use nebpp::workflows::relax;
//!
//! let leps = scenario::lookup("leps")?;
//! let config = RunConfigBuilder::from(&leps.defaults).build()?;
//! let (initial, terminal) = (leps.initial.clone(), leps.terminal.clone());
//! let mut band = relax::build_band(&config, initial, terminal, &leps.surface)?;
//! let outcome = relax::run(&mut band, &config, &ProgressReporter::new())?;
//! ```

pub mod relax;
