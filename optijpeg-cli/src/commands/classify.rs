//! Implementation of the 'classify' subcommand.
//!
//! Reads output captured from an earlier jpegoptim run and reports it the
//! same way `optimize` would.

use crate::cli::ClassifyArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::output;

use optijpeg_core::{OptimizationResult, classify_output};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

fn read_input(input: &Path) -> CliResult<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .cli_context("Failed to read standard input")?;
        Ok(text)
    } else {
        fs::read_to_string(input)
            .cli_with_context(|| format!("Failed to read '{}'", input.display()))
    }
}

pub fn run_classify(args: &ClassifyArgs) -> CliResult<OptimizationResult> {
    let text = read_input(&args.input)?;
    let result = classify_output(&text);
    log::debug!(
        "Classified {} line(s) from {}",
        text.lines().count(),
        args.input.display()
    );
    output::print_result(&result, args.json)?;
    Ok(result)
}
