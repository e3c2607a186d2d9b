// optijpeg-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for this crate's unit tests and, in dependent crates, when the
// "test-mocks" feature is enabled.

use super::ProcessRunner;
use crate::command::CommandInvocation;
use crate::error::{CoreResult, command_start_error, command_wait_error};
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

/// Canned behaviour for one mocked invocation.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// The process runs and prints this text.
    Output(String),
    /// The process cannot be started.
    LaunchError(io::ErrorKind),
    /// The process starts but waiting for it fails.
    WaitError(io::ErrorKind),
}

#[derive(Default)]
struct MockState {
    responses: VecDeque<MockResponse>,
    received_calls: Vec<CommandInvocation>,
}

/// [`ProcessRunner`] returning queued responses and recording every invocation.
///
/// Responses are consumed in the order they were added. Running out of
/// responses is a test bug and panics.
#[derive(Clone, Default)]
pub struct MockProcessRunner {
    state: Arc<Mutex<MockState>>,
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Default::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_response(&self, response: MockResponse) {
        self.state().responses.push_back(response);
    }

    /// Queues a run that prints the given lines.
    pub fn add_output_lines(&self, lines: &[&str]) {
        let mut text = lines.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        self.add_response(MockResponse::Output(text));
    }

    pub fn add_launch_error(&self, kind: io::ErrorKind) {
        self.add_response(MockResponse::LaunchError(kind));
    }

    pub fn add_wait_error(&self, kind: io::ErrorKind) {
        self.add_response(MockResponse::WaitError(kind));
    }

    /// Every invocation received so far, in order.
    pub fn get_received_calls(&self) -> Vec<CommandInvocation> {
        self.state().received_calls.clone()
    }

    fn next_response(&self, invocation: &CommandInvocation) -> MockResponse {
        let mut state = self.state();
        state.received_calls.push(invocation.clone());
        match state.responses.pop_front() {
            Some(response) => {
                log::info!("MockProcessRunner: responding to {} with {:?}", invocation, response);
                response
            }
            None => {
                log::error!("MockProcessRunner: No response queued for: {}", invocation);
                panic!("MockProcessRunner: No response queued for: {}", invocation);
            }
        }
    }
}

impl ProcessRunner for MockProcessRunner {
    fn run_blocking(&self, invocation: &CommandInvocation) -> CoreResult<String> {
        match self.next_response(invocation) {
            MockResponse::Output(text) => Ok(text),
            MockResponse::LaunchError(kind) => Err(command_start_error(
                invocation.program(),
                io::Error::new(kind, "mock launch failure"),
            )),
            MockResponse::WaitError(kind) => Err(command_wait_error(
                invocation.program(),
                io::Error::new(kind, "mock wait failure"),
            )),
        }
    }

    fn run_async<F>(&self, invocation: CommandInvocation, on_complete: F) -> CoreResult<()>
    where
        F: FnOnce(CoreResult<String>) + Send + 'static,
    {
        let result = match self.next_response(&invocation) {
            MockResponse::LaunchError(kind) => {
                return Err(command_start_error(
                    invocation.program(),
                    io::Error::new(kind, "mock launch failure"),
                ));
            }
            MockResponse::Output(text) => Ok(text),
            MockResponse::WaitError(kind) => Err(command_wait_error(
                invocation.program(),
                io::Error::new(kind, "mock wait failure"),
            )),
        };

        thread::spawn(move || on_complete(result));
        Ok(())
    }
}
