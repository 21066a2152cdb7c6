//! Command-line interface
//!
//! Argument definitions and command handlers for the `suit-ingress` binary.

pub mod args;
pub mod commands;
