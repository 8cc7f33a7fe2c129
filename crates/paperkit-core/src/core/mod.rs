//! # Core Module
//!
//! Stateless building blocks shared by every workflow.
//!
//! - **File I/O** ([`io`]) - Whitespace-delimited numeric tables and printf-style
//!   column formatting
//! - **Run Identification** ([`naming`]) - File stems for simulation runs, figures and jobs
//! - **Presentation** ([`styles`]) - Per-method colors, line styles and titles
//! - **Density of States** ([`dos`]) - Histogram runs and movie frames
//! - **Thermodynamics** ([`thermo`]) - Canonical averages over a density of states
//! - **Convergence Metrics** ([`comparison`]) - Entropy errors against a reference
//! - **Correlation Fields** ([`triplet`]) - Triplet-correlation paths, field and colormap
//! - **Parameter Grids** ([`sweep`]) - Inclusive ranges and value lists
//! - **Batch Scripts** ([`batch`]) - Scheduler scripts for simulator jobs

pub mod batch;
pub mod comparison;
pub mod dos;
pub mod io;
pub mod naming;
pub mod styles;
pub mod sweep;
pub mod thermo;
pub mod triplet;
