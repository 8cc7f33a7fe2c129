//! # paperkit Core Library
//!
//! Post-processing, parameter sweeps and figure generation for the square-well
//! fluid, soft-sphere crystal and pair/triplet correlation studies that drive
//! an external compiled simulator.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three-layer split throughout:
//!
//! - **[`core`]: The Foundation.** Stateless numerics and file formats: numeric
//!   tables, density-of-states inputs, canonical thermodynamics, convergence
//!   error metrics, the triplet-correlation field, parameter grids and batch
//!   scripts.
//!
//! - **[`engine`]: The Plumbing.** Configuration and builders, error types,
//!   progress reporting, and the [`engine::runner::CommandRunner`] seam through
//!   which every external program (simulator, build tool, batch scheduler) is
//!   invoked.
//!
//! - **[`workflows`]: The Public API.** One end-to-end procedure per study
//!   script, tying `core` and `engine` together.
//!
//! Figures are produced by [`render`], which only consumes workflow reports.

pub mod core;
pub mod engine;
pub mod render;
pub mod workflows;
