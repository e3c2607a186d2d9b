//! Implementation of the 'optimize' subcommand.
//!
//! This module handles JPEG discovery, option resolution from the config file
//! and flags, and delegation to the optijpeg-core orchestrator. With
//! `--jobs N` the files are split into N batches, each run as its own
//! jpegoptim process, and the results merged.

use crate::cli::OptimizeArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::output;

use optijpeg_core::{
    CoreError, OptimizationOptions, OptimizationOptionsBuilder, OptimizationResult, Optimizer,
    ProcessRunner,
};

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info, warn};

const JPEG_EXTENSIONS: [&str; 2] = ["jpg", "jpeg"];

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| JPEG_EXTENSIONS.iter().any(|j| ext.eq_ignore_ascii_case(j)))
}

/// Expands directories to their top-level `.jpg`/`.jpeg` files, sorted by
/// name. Other paths, including missing ones, are passed through so
/// jpegoptim can report on them.
pub fn discover_jpeg_files(paths: &[PathBuf]) -> CliResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            if !path.exists() {
                warn!("Input path '{}' does not exist", path.display());
            }
            files.push(path.clone());
            continue;
        }

        let mut found: Vec<PathBuf> = fs::read_dir(path)
            .cli_with_context(|| format!("Failed to read directory '{}'", path.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_jpeg(p))
            .collect();
        found.sort();

        debug!("Found {} JPEG file(s) in {}", found.len(), path.display());
        files.extend(found);
    }

    Ok(files)
}

/// Resolves the options: the `--config` file (or defaults), then flags.
pub fn resolve_options(args: &OptimizeArgs) -> CliResult<OptimizationOptions> {
    let base = match &args.config {
        Some(path) => OptimizationOptions::from_json_file(path)
            .cli_with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => OptimizationOptions::default(),
    };

    let mut builder = OptimizationOptionsBuilder::from_options(base);
    if args.no_strip {
        builder = builder.no_strip();
    } else if let Some(mode) = &args.strip {
        builder = builder.strip_mode(mode.clone());
    }
    if args.preserve {
        builder = builder.preserve_timestamps(true);
    }
    if let Some(quality) = args.max_quality {
        builder = builder.max_quality(quality);
    }
    if args.debug {
        builder = builder.debug(true);
    }

    Ok(builder.build())
}

/// Runs `files` through `optimizer` in up to `jobs` parallel batches.
pub fn optimize_files<R>(
    optimizer: &Optimizer<R>,
    files: &[PathBuf],
    options: &OptimizationOptions,
    jobs: usize,
) -> CliResult<OptimizationResult>
where
    R: ProcessRunner + Sync,
{
    if files.is_empty() {
        return Ok(OptimizationResult::default());
    }

    let jobs = jobs.clamp(1, files.len());
    if jobs == 1 {
        return optimizer.optimize(files, options);
    }

    let batch_size = files.len().div_ceil(jobs);
    debug!("Running {} batch(es) of up to {} file(s)", jobs, batch_size);

    files
        .par_chunks(batch_size)
        .map(|batch| optimizer.optimize(batch, options))
        .collect::<CliResult<Vec<_>>>()
        .map(|results| {
            results.into_iter().fold(OptimizationResult::default(), |mut merged, batch| {
                merged.merge(batch);
                merged
            })
        })
}

/// Runs the optimize command and prints the outcome.
pub fn run_optimize(args: &OptimizeArgs) -> CliResult<OptimizationResult> {
    let start = Instant::now();
    let options = resolve_options(args)?;
    let optimizer = Optimizer::new().with_program(args.tool.program.as_str());

    if !optimizer.is_available() {
        return Err(CoreError::DependencyNotFound(args.tool.program.clone()));
    }

    let files = discover_jpeg_files(&args.paths)?;
    if files.is_empty() {
        warn!("No JPEG files found in the given paths");
    } else {
        info!("Optimizing {} file(s)", files.len());
    }

    let spinner = (!args.json && !files.is_empty())
        .then(|| output::create_spinner(&format!("Optimizing {} file(s)", files.len())));
    let result = optimize_files(&optimizer, &files, &options, usize::from(args.jobs));
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let result = result?;

    info!(
        "Finished in {:.1}s: {} optimized, {} skipped, {} error(s)",
        start.elapsed().as_secs_f64(),
        result.optimized().count(),
        result.skipped().count(),
        result.errors.len()
    );

    output::print_result(&result, args.json)?;
    Ok(result)
}
