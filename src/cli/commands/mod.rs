//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod run;
pub mod steps;
pub mod version;

use crate::cli::args::{Cli, Commands};
use crate::error::IngressError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), IngressError> {
    match cli.command {
        Commands::Run(args) => run::run(&args).await,
        Commands::Steps(args) => steps::run(&args),
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}
