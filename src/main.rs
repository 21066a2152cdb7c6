//! `suit-ingress` - Gated suit ingress procedure guidance

use clap::Parser;

use suit_ingress::cli::args::Cli;
use suit_ingress::cli::commands;
use suit_ingress::error::ExitCode;
use suit_ingress::observability::init_logging;

// The engine and telemetry store are single-threaded.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(cli.log_format.into(), cli.verbose, cli.color);
    }

    match commands::dispatch(cli).await {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
