//! `suit-ingress` - Gated suit ingress procedure guidance
//!
//! Walks an operator through a fixed multi-phase ingress procedure, revealing
//! each instruction only once live suit telemetry confirms the previous
//! steps, and ships a scripted telemetry simulator for demonstration and
//! testing.

pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod procedure;
pub mod simulator;
pub mod telemetry;
