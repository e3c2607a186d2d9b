// ============================================================================
// optijpeg-core/src/external/process_runner.rs
// ============================================================================
//
// PROCESS RUNNER: jpegoptim Process Management and Abstraction
//
// This module defines how a CommandInvocation is executed. The library never
// spawns processes directly; it goes through a ProcessRunner so tests can
// substitute canned output.
//
// KEY COMPONENTS:
// - ProcessRunner: blocking and callback-driven execution
// - SystemProcessRunner: implementation on top of std::process
//
// Exit codes are logged but never turned into errors: jpegoptim exits non-zero
// when any file fails, and those failures are already in its output.

use crate::command::CommandInvocation;
use crate::error::{CoreError, CoreResult, command_start_error, command_wait_error};

use std::io;
use std::process::{Child, Output, Stdio};
use std::sync::mpsc;
use std::thread;

/// Something that can execute a [`CommandInvocation`] and capture its output.
pub trait ProcessRunner {
    /// Runs the command to completion and returns its captured text output.
    ///
    /// Fails only if the command cannot be started or waited on.
    fn run_blocking(&self, invocation: &CommandInvocation) -> CoreResult<String>;

    /// Starts the command and returns immediately.
    ///
    /// `on_complete` is called exactly once, from another thread, when the
    /// process finishes. If the command cannot be started the error is
    /// returned here and `on_complete` is never called.
    fn run_async<F>(&self, invocation: CommandInvocation, on_complete: F) -> CoreResult<()>
    where
        F: FnOnce(CoreResult<String>) + Send + 'static;
}

/// [`ProcessRunner`] backed by `std::process::Command`.
///
/// The captured text is stdout followed by stderr, decoded lossily as UTF-8.
/// The two streams are not interleaved: every stderr line (jpegoptim's own
/// `jpegoptim:` messages included) comes after all of stdout, whatever order
/// the tool wrote them in.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

/// Joins stdout and stderr into one text block, stdout first.
pub(crate) fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut text = String::from_utf8_lossy(stdout).into_owned();
    if !stderr.is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&String::from_utf8_lossy(stderr));
    }
    text
}

/// Kills and reaps a child that will never be handed to a wait thread, and
/// reports the failure as a launch error.
fn abandon_child(program: &str, child: &mut Child, err: io::Error) -> CoreError {
    log::error!("Failed to start wait thread for {}: {}", program, err);
    if let Err(kill_err) = child.kill() {
        log::debug!("Could not kill {}: {}", program, kill_err);
    }
    if let Err(wait_err) = child.wait() {
        log::warn!("Could not reap {}: {}", program, wait_err);
    }
    command_start_error(program, err)
}

fn collect_output(program: &str, output: Output) -> String {
    match output.status.code() {
        Some(0) => log::debug!("{} exited successfully", program),
        Some(code) => log::debug!("{} exited with status {}", program, code),
        None => log::warn!("{} was terminated by a signal", program),
    }
    combine_output(&output.stdout, &output.stderr)
}

impl ProcessRunner for SystemProcessRunner {
    fn run_blocking(&self, invocation: &CommandInvocation) -> CoreResult<String> {
        log::debug!("Running: {}", invocation);

        let output = invocation
            .to_command()
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                log::error!("Failed to execute {}: {}", invocation.program(), e);
                command_start_error(invocation.program(), e)
            })?;

        Ok(collect_output(invocation.program(), output))
    }

    fn run_async<F>(&self, invocation: CommandInvocation, on_complete: F) -> CoreResult<()>
    where
        F: FnOnce(CoreResult<String>) + Send + 'static,
    {
        log::debug!("Spawning: {}", invocation);

        let mut child = invocation
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                log::error!("Failed to spawn {}: {}", invocation.program(), e);
                command_start_error(invocation.program(), e)
            })?;

        let program = invocation.program().to_string();
        let (child_tx, child_rx) = mpsc::channel::<Child>();
        let thread_program = program.clone();
        let spawned = thread::Builder::new()
            .name(format!("{program}-wait"))
            .spawn(move || {
                // Sender dropped without a child: startup was abandoned.
                let Ok(child) = child_rx.recv() else {
                    return;
                };
                let result = child
                    .wait_with_output()
                    .map(|output| collect_output(&thread_program, output))
                    .map_err(|e| {
                        log::error!("Failed waiting for {}: {}", thread_program, e);
                        command_wait_error(thread_program.as_str(), e)
                    });
                on_complete(result);
            });

        if let Err(e) = spawned {
            return Err(abandon_child(&program, &mut child, e));
        }
        if let Err(mpsc::SendError(mut child)) = child_tx.send(child) {
            let err = io::Error::other("wait thread exited before receiving the child");
            return Err(abandon_child(&program, &mut child, err));
        }

        Ok(())
    }
}
