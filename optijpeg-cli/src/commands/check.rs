//! Implementation of the 'check' subcommand.

use crate::cli::CheckArgs;
use crate::error::CliResult;

use console::style;
use log::debug;

/// Reports where jpegoptim was found, or fails with `DependencyNotFound`.
pub fn run_check(args: &CheckArgs) -> CliResult<()> {
    debug!("Looking for {}", args.tool.program);
    let path = optijpeg_core::check_dependency(&args.tool.program)?;
    println!(
        "{} {} found at {}",
        style("✓").green().bold(),
        args.tool.program,
        path.display()
    );
    Ok(())
}
