//! # Engine Module
//!
//! Plumbing shared by the workflows: validated configuration, the error type
//! every workflow returns, progress reporting, and the seam through which
//! external programs are launched.
//!
//! - **Configuration** ([`config`]) - Per-workflow settings and their builders
//! - **Error Handling** ([`error`]) - [`error::EngineError`] wrapping the `core` errors
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Process Execution** ([`runner`]) - [`runner::CommandRunner`] with a real and a dry-run backend

pub mod config;
pub mod error;
pub mod progress;
pub mod runner;
