//! Running jpegoptim and classifying what it printed.
//!
//! [`Optimizer`] ties the pieces together: it encodes the options into a
//! [`CommandInvocation`], hands it to a [`ProcessRunner`] and classifies the
//! captured output. It has two entry points sharing that pipeline, a
//! blocking one and a callback-driven one. It never retries and never looks
//! at jpegoptim's exit code; success and failure are read from the output.

use crate::classify::{OptimizationResult, classify_output};
use crate::command::{COMMAND, CommandInvocation, InputPaths, encode_with_program};
use crate::config::OptimizationOptions;
use crate::error::CoreResult;
use crate::external::{self, ProcessRunner, SystemProcessRunner};

use std::io::Write;
use std::sync::Arc;

/// Sink receiving the composed command line when `debug` is enabled.
pub type DiagnosticSink = Arc<dyn Fn(&str) + Send + Sync>;

fn stderr_sink(line: &str) {
    let mut stderr = std::io::stderr().lock();
    writeln!(stderr, "{line}").ok();
}

/// Drives jpegoptim through a [`ProcessRunner`].
///
/// # Examples
///
/// ```rust,no_run
/// use optijpeg_core::{OptimizationOptions, Optimizer};
///
/// let optimizer = Optimizer::new();
/// let options = OptimizationOptions::builder().max_quality(85).build();
///
/// let result = optimizer.optimize(vec!["a.jpg", "b.jpg"], &options).unwrap();
/// for (file, ratio) in &result.succeeded {
///     println!("{file}: {ratio:.2}%");
/// }
/// ```
pub struct Optimizer<R: ProcessRunner = SystemProcessRunner> {
    runner: R,
    program: String,
    diagnostics: DiagnosticSink,
}

impl Optimizer<SystemProcessRunner> {
    /// Creates an optimizer running the `jpegoptim` found on `PATH`.
    pub fn new() -> Self {
        Self::with_runner(SystemProcessRunner::new())
    }
}

impl Default for Optimizer<SystemProcessRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ProcessRunner> Optimizer<R> {
    /// Creates an optimizer using a custom runner.
    pub fn with_runner(runner: R) -> Self {
        Self {
            runner,
            program: COMMAND.to_string(),
            diagnostics: Arc::new(stderr_sink),
        }
    }

    /// Runs a jpegoptim binary with a different name or at an explicit path.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Replaces the debug diagnostic channel (stderr by default).
    #[must_use]
    pub fn with_diagnostics<F>(mut self, sink: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.diagnostics = Arc::new(sink);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Whether the configured jpegoptim binary can be found.
    pub fn is_available(&self) -> bool {
        external::is_available(&self.program)
    }

    /// Builds the invocation for `paths` without running it.
    pub fn invocation(
        &self,
        paths: impl Into<InputPaths>,
        options: &OptimizationOptions,
    ) -> CommandInvocation {
        encode_with_program(&self.program, paths, options)
    }

    fn prepare(
        &self,
        paths: impl Into<InputPaths>,
        options: &OptimizationOptions,
    ) -> CommandInvocation {
        let invocation = self.invocation(paths, options);
        log::debug!("Composed command: {}", invocation);
        if options.debug {
            (self.diagnostics)(&invocation.to_string());
        }
        invocation
    }

    /// Runs jpegoptim on `paths` and waits for it to finish.
    ///
    /// Fails only if jpegoptim could not be launched or waited on; problems
    /// with individual files end up in [`OptimizationResult::errors`].
    pub fn optimize(
        &self,
        paths: impl Into<InputPaths>,
        options: &OptimizationOptions,
    ) -> CoreResult<OptimizationResult> {
        let invocation = self.prepare(paths, options);
        let output = self.runner.run_blocking(&invocation)?;
        let result = classify_output(&output);
        log::debug!(
            "Classified {} success(es) and {} error(s)",
            result.succeeded.len(),
            result.errors.len()
        );
        Ok(result)
    }

    /// Starts jpegoptim on `paths` and returns immediately.
    ///
    /// `callback` runs exactly once, on a background thread, with the
    /// classified result once jpegoptim exits (or the error raised while
    /// waiting for it). A launch failure is returned from this call instead,
    /// and `callback` is dropped without being called.
    pub fn optimize_with_callback<F>(
        &self,
        paths: impl Into<InputPaths>,
        options: &OptimizationOptions,
        callback: F,
    ) -> CoreResult<()>
    where
        F: FnOnce(CoreResult<OptimizationResult>) + Send + 'static,
    {
        let invocation = self.prepare(paths, options);
        self.runner.run_async(invocation, move |output| {
            callback(output.map(|text| classify_output(&text)));
        })
    }
}

/// Runs the `jpegoptim` on `PATH` and waits for the classified result.
pub fn optimize(
    paths: impl Into<InputPaths>,
    options: &OptimizationOptions,
) -> CoreResult<OptimizationResult> {
    Optimizer::new().optimize(paths, options)
}

/// Runs the `jpegoptim` on `PATH` in the background; see
/// [`Optimizer::optimize_with_callback`].
pub fn optimize_with_callback<F>(
    paths: impl Into<InputPaths>,
    options: &OptimizationOptions,
    callback: F,
) -> CoreResult<()>
where
    F: FnOnce(CoreResult<OptimizationResult>) + Send + 'static,
{
    Optimizer::new().optimize_with_callback(paths, options, callback)
}

/// Whether `jpegoptim` is on `PATH`.
pub fn is_available() -> bool {
    external::is_available(COMMAND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ErrorEntry;
    use crate::error::CoreError;
    use crate::external::MockProcessRunner;
    use std::io;
    use std::sync::Mutex;
    use std::sync::mpsc;
    use std::time::Duration;

    const SUCCESS: &str =
        "a.jpg 640x480 24bit N JFIF  [OK] 20000 --> 15000 bytes (25.00%), optimized.";

    fn captured_sink() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) + Send + Sync + 'static) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink_lines = Arc::clone(&lines);
        (lines, move |line: &str| {
            sink_lines.lock().unwrap().push(line.to_string());
        })
    }

    #[test]
    fn test_optimize_blocking_classifies_output() {
        let runner = MockProcessRunner::new();
        runner.add_output_lines(&[SUCCESS, "b.jpg [ERROR]", "some chatter"]);
        let optimizer = Optimizer::with_runner(runner.clone());

        let result = optimizer
            .optimize(vec!["a.jpg", "b.jpg"], &OptimizationOptions::default())
            .unwrap();

        assert_eq!(result.succeeded["a.jpg"], -25.0);
        assert_eq!(
            result.errors,
            vec![ErrorEntry::new(Some("b.jpg".to_string()), "ERROR")]
        );

        let calls = runner.get_received_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program(), "jpegoptim");
        assert_eq!(calls[0].args(), ["--strip-all", "a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_optimize_launch_failure_propagates() {
        let runner = MockProcessRunner::new();
        runner.add_launch_error(io::ErrorKind::NotFound);
        let optimizer = Optimizer::with_runner(runner);

        let result = optimizer.optimize("a.jpg", &OptimizationOptions::default());
        assert!(matches!(result, Err(CoreError::CommandStart(..))));
    }

    #[test]
    fn test_debug_writes_command_line() {
        let (lines, sink) = captured_sink();
        let runner = MockProcessRunner::new();
        runner.add_output_lines(&[]);
        let optimizer = Optimizer::with_runner(runner).with_diagnostics(sink);

        let options = OptimizationOptions::builder()
            .debug(true)
            .preserve_timestamps(true)
            .build();
        let result = optimizer.optimize("my photo.jpg", &options).unwrap();

        assert!(result.is_empty());
        assert_eq!(
            *lines.lock().unwrap(),
            vec!["jpegoptim --strip-all --preserve 'my photo.jpg'".to_string()]
        );
    }

    #[test]
    fn test_no_diagnostics_without_debug() {
        let (lines, sink) = captured_sink();
        let runner = MockProcessRunner::new();
        runner.add_output_lines(&[SUCCESS]);
        let optimizer = Optimizer::with_runner(runner).with_diagnostics(sink);

        optimizer
            .optimize("a.jpg", &OptimizationOptions::default())
            .unwrap();
        assert!(lines.lock().unwrap().is_empty());
    }

    #[test]
    fn test_custom_program() {
        let runner = MockProcessRunner::new();
        runner.add_output_lines(&[]);
        let optimizer = Optimizer::with_runner(runner.clone()).with_program("/opt/jpegoptim");

        optimizer
            .optimize("a.jpg", &OptimizationOptions::default())
            .unwrap();
        assert_eq!(runner.get_received_calls()[0].program(), "/opt/jpegoptim");
    }

    #[test]
    fn test_callback_fires_once_with_result() {
        let runner = MockProcessRunner::new();
        runner.add_output_lines(&[SUCCESS, "jpegoptim: can't open c.jpg"]);
        let optimizer = Optimizer::with_runner(runner);

        let (tx, rx) = mpsc::channel();
        optimizer
            .optimize_with_callback("a.jpg", &OptimizationOptions::default(), move |result| {
                tx.send(result).unwrap();
            })
            .unwrap();

        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap();
        assert_eq!(result.succeeded["a.jpg"], -25.0);
        assert_eq!(
            result.errors,
            vec![ErrorEntry::new(None, "can't open c.jpg")]
        );
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn test_callback_launch_failure_returned_synchronously() {
        let runner = MockProcessRunner::new();
        runner.add_launch_error(io::ErrorKind::PermissionDenied);
        let optimizer = Optimizer::with_runner(runner);

        let (tx, rx) = mpsc::channel::<()>();
        let result = optimizer.optimize_with_callback(
            "a.jpg",
            &OptimizationOptions::default(),
            move |_| {
                tx.send(()).ok();
            },
        );

        assert!(matches!(result, Err(CoreError::CommandStart(..))));
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn test_callback_receives_wait_error() {
        let runner = MockProcessRunner::new();
        runner.add_wait_error(io::ErrorKind::BrokenPipe);
        let optimizer = Optimizer::with_runner(runner);

        let (tx, rx) = mpsc::channel();
        optimizer
            .optimize_with_callback("a.jpg", &OptimizationOptions::default(), move |result| {
                tx.send(result).unwrap();
            })
            .unwrap();

        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(result, Err(CoreError::CommandWait(..))));
    }

    #[test]
    fn test_concurrent_callbacks_are_independent() {
        let runner = MockProcessRunner::new();
        runner.add_output_lines(&["one.jpg 1x1 [OK] (1.00%)"]);
        runner.add_output_lines(&["two.jpg 1x1 [OK] (2.00%)"]);
        let optimizer = Optimizer::with_runner(runner);

        let (tx, rx) = mpsc::channel();
        for path in ["one.jpg", "two.jpg"] {
            let tx = tx.clone();
            optimizer
                .optimize_with_callback(path, &OptimizationOptions::default(), move |result| {
                    tx.send(result.unwrap()).unwrap();
                })
                .unwrap();
        }
        drop(tx);

        let mut results: Vec<OptimizationResult> = rx.iter().collect();
        results.sort_by(|a, b| a.succeeded.keys().cmp(b.succeeded.keys()));
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].succeeded.len(), 1);
        assert_eq!(results[0].succeeded["one.jpg"], -1.0);
        assert_eq!(results[1].succeeded.len(), 1);
        assert_eq!(results[1].succeeded["two.jpg"], -2.0);
    }
}
