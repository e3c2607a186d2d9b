// optijpeg-cli/src/output.rs
//
// Rendering of optimization results for the terminal (coloured summary via
// `console`) and for scripts (JSON via `serde_json`).

use crate::error::{CliErrorContext, CliResult};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use optijpeg_core::{COMMAND, OptimizationResult};
use std::fmt::Write;
use std::time::Duration;

fn section_header(title: &str) -> String {
    style(format!("----- {} -----", title.to_uppercase()))
        .cyan()
        .bold()
        .to_string()
}

/// Human-readable summary of a result, one line per file and error.
pub fn render_summary(result: &OptimizationResult) -> String {
    let mut out = String::new();
    writeln!(out, "{}\n", section_header("Optimization summary")).ok();

    let width = result.succeeded.keys().map(|name| name.len()).max().unwrap_or(0);

    for (name, ratio) in &result.succeeded {
        if *ratio < 0.0 {
            writeln!(
                out,
                "  {} {:<width$}  {}",
                style("✓").green().bold(),
                name,
                style(format!("{:.2}% smaller", -ratio)).green(),
            )
            .ok();
        } else {
            writeln!(
                out,
                "  {} {:<width$}  {}",
                style("-").dim(),
                name,
                style("skipped").dim(),
            )
            .ok();
        }
    }

    for error in &result.errors {
        let subject = error.filename.as_deref().unwrap_or(COMMAND);
        writeln!(
            out,
            "  {} {}: {}",
            style("✗").red().bold(),
            subject,
            style(&error.message).red(),
        )
        .ok();
    }

    if !result.is_empty() {
        out.push('\n');
    }

    let optimized = result.optimized().count();
    let skipped = result.skipped().count();
    let errors = result.errors.len();
    let errors_text = format!("{} error(s)", errors);
    writeln!(
        out,
        "  {} optimized, {} skipped, {}",
        style(optimized).green().bold(),
        skipped,
        if errors > 0 {
            style(errors_text).red().bold().to_string()
        } else {
            errors_text
        },
    )
    .ok();

    out
}

/// Pretty-printed JSON form of a result.
pub fn render_json(result: &OptimizationResult) -> CliResult<String> {
    serde_json::to_string_pretty(result).cli_context("Failed to serialize result")
}

/// Prints a result to stdout in the requested format.
pub fn print_result(result: &OptimizationResult, json: bool) -> CliResult<()> {
    if json {
        println!("{}", render_json(result)?);
    } else {
        print!("{}", render_summary(result));
    }
    Ok(())
}

/// Spinner shown on stderr while jpegoptim runs. Hidden when stderr is not
/// a terminal.
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
