//! # Workflows Module
//!
//! End-to-end procedures, one per study task. Each workflow takes a validated
//! configuration from [`crate::engine::config`], reports progress, and returns
//! a report that the caller can render or summarize.
//!
//! - **Thermodynamics** ([`thermo`]) - U, C_V and S of every method against a reference run
//! - **Convergence** ([`comparison`]) - Entropy-error histories from ln DOS movie frames
//! - **Triplet Correlation** ([`triplet`]) - Path panels and the reconstructed 2-D field
//! - **Parameter Sweeps** ([`sweeps`]) - Melting and renormalization-group drivers
//! - **Job Submission** ([`submit`]) - Simulator build, batch script and submission

pub mod comparison;
pub mod submit;
pub mod sweeps;
pub mod thermo;
pub mod triplet;
