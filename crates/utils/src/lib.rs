//! Shared error types for the bytescope workspace.

pub mod errors;
