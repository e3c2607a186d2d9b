// optijpeg-cli/src/main.rs
//
// Entry point for the optijpeg binary: parses arguments, sets up logging,
// dispatches to the selected command and maps the outcome to an exit code.
//
// Exit codes:
// - 0: every file was processed without an error entry
// - 1: the command failed (tool missing, unreadable input, ...)
// - 2: optimize ran jpegoptim and it reported at least one error

use clap::Parser;
use optijpeg_cli::{Cli, Commands, run_check, run_classify, run_optimize};
use std::process;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = optijpeg_cli::logging::init_logging(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("Warning: {}", e);
    }

    let outcome = match &cli.command {
        Commands::Optimize(args) => run_optimize(args).map(|result| result.has_errors()),
        Commands::Check(args) => run_check(args).map(|()| false),
        Commands::Classify(args) => run_classify(args).map(|_| false),
    };

    match outcome {
        Ok(false) => {}
        Ok(true) => process::exit(2),
        Err(e) => {
            log::debug!("Command failed: {:?}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
