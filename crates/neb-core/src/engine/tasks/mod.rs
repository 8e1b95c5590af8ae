//! Computational units the relaxation workflow is built from.
//!
//! Per-image work is embarrassingly parallel; with the `parallel` feature it is fanned out with
//! `rayon` and reassembled in band order.

pub mod evaluation;
