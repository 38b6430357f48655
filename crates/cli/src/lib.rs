//! Subcommands of the `bytescope` binary.

pub mod commands;
