//! # Models Module
//!
//! Data structures describing the elastic band: the coordinate type shared by every
//! component ([`point`]), a single discretized configuration ([`image`]), and the ordered
//! chain of images bound to a potential surface ([`band`]).

pub mod band;
pub mod image;
pub mod point;
