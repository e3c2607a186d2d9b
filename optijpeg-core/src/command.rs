//! jpegoptim command construction.
//!
//! This module turns [`OptimizationOptions`] and a list of input files into a
//! [`CommandInvocation`]: the program name followed by flags followed by the
//! file paths, each as its own token. Nothing here touches the file system or
//! validates values; jpegoptim is the judge of what it accepts.

use crate::config::{OptimizationOptions, StripMode};

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Name of the external tool, both as the executable and as the prefix of its
/// own diagnostic lines.
pub const COMMAND: &str = "jpegoptim";

/// Flag asking jpegoptim to keep file modification times.
pub const PRESERVE_FLAG: &str = "--preserve";

/// Prefix of the maximum quality flag; the value is appended after `=`.
pub const MAX_QUALITY_FLAG: &str = "--max";

/// Input files for one invocation.
///
/// Exists so callers can pass a single path or any sequence of paths to
/// [`encode`] and friends; a single path becomes a one-element list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputPaths(Vec<String>);

impl InputPaths {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

fn path_token(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl From<&str> for InputPaths {
    fn from(path: &str) -> Self {
        Self(vec![path.to_string()])
    }
}

impl From<String> for InputPaths {
    fn from(path: String) -> Self {
        Self(vec![path])
    }
}

impl From<&String> for InputPaths {
    fn from(path: &String) -> Self {
        Self(vec![path.clone()])
    }
}

impl From<&Path> for InputPaths {
    fn from(path: &Path) -> Self {
        Self(vec![path_token(path)])
    }
}

impl From<PathBuf> for InputPaths {
    fn from(path: PathBuf) -> Self {
        Self(vec![path_token(&path)])
    }
}

impl From<&PathBuf> for InputPaths {
    fn from(path: &PathBuf) -> Self {
        Self(vec![path_token(path)])
    }
}

impl<T: AsRef<OsStr>> From<Vec<T>> for InputPaths {
    fn from(paths: Vec<T>) -> Self {
        paths.iter().collect()
    }
}

impl<T: AsRef<OsStr>> From<&[T]> for InputPaths {
    fn from(paths: &[T]) -> Self {
        paths.iter().collect()
    }
}

impl<T: AsRef<OsStr>, const N: usize> From<[T; N]> for InputPaths {
    fn from(paths: [T; N]) -> Self {
        paths.iter().collect()
    }
}

impl<T: AsRef<OsStr>> FromIterator<T> for InputPaths {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|p| path_token(Path::new(p.as_ref())))
                .collect(),
        )
    }
}

/// A fully composed jpegoptim command: program plus argument tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    program: String,
    args: Vec<String>,
}

impl CommandInvocation {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Argument tokens, without the program name.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Program name followed by every argument token.
    pub fn tokens(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }

    /// Builds a `std::process::Command` carrying exactly these tokens.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

/// Quotes a token for display when it would otherwise be ambiguous.
fn quote_token(token: &str) -> String {
    let needs_quotes = token.is_empty()
        || token
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '\\' | '$' | '`' | ';' | '&' | '|'));
    if needs_quotes {
        format!("'{}'", token.replace('\'', r"'\''"))
    } else {
        token.to_string()
    }
}

impl fmt::Display for CommandInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = self
            .tokens()
            .into_iter()
            .map(quote_token)
            .collect::<Vec<_>>()
            .join(" ");
        f.write_str(&line)
    }
}

/// Builder for jpegoptim invocations.
///
/// Flags are always emitted in the same order (strip, preserve, max quality)
/// and inputs always come last, regardless of the order the builder methods
/// were called in.
#[derive(Debug, Clone)]
pub struct JpegoptimCommandBuilder {
    program: String,
    strip: Option<StripMode>,
    preserve: bool,
    max_quality: Option<u64>,
    inputs: Vec<String>,
}

impl Default for JpegoptimCommandBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl JpegoptimCommandBuilder {
    /// Creates a builder for the default `jpegoptim` program with no flags.
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: COMMAND.to_string(),
            strip: None,
            preserve: false,
            max_quality: None,
            inputs: Vec::new(),
        }
    }

    /// Uses a different executable name or path.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Sets the strip mode; `None` omits the strip flag.
    #[must_use]
    pub fn with_strip(mut self, mode: Option<StripMode>) -> Self {
        self.strip = mode;
        self
    }

    #[must_use]
    pub fn with_preserve(mut self, preserve: bool) -> Self {
        self.preserve = preserve;
        self
    }

    #[must_use]
    pub fn with_max_quality(mut self, quality: Option<u64>) -> Self {
        self.max_quality = quality;
        self
    }

    /// Appends one input path.
    #[must_use]
    pub fn input(mut self, path: impl AsRef<OsStr>) -> Self {
        self.inputs.push(path_token(Path::new(path.as_ref())));
        self
    }

    /// Appends every input path, keeping their order.
    #[must_use]
    pub fn inputs(mut self, paths: impl Into<InputPaths>) -> Self {
        self.inputs.extend(paths.into().into_vec());
        self
    }

    /// Builds the invocation.
    #[must_use]
    pub fn build(self) -> CommandInvocation {
        let mut args = Vec::with_capacity(self.inputs.len() + 3);

        if let Some(mode) = &self.strip {
            args.push(mode.flag());
        }

        if self.preserve {
            args.push(PRESERVE_FLAG.to_string());
        }

        if let Some(quality) = self.max_quality {
            args.push(format!("{MAX_QUALITY_FLAG}={quality}"));
        }

        args.extend(self.inputs);

        CommandInvocation::new(self.program, args)
    }
}

/// Encodes options and input paths into a jpegoptim invocation.
///
/// # Examples
///
/// ```rust
/// use optijpeg_core::command::encode;
/// use optijpeg_core::config::OptimizationOptions;
///
/// let options = OptimizationOptions::builder().preserve_timestamps(true).max_quality(80).build();
/// let invocation = encode(vec!["a.jpg", "b c.jpg"], &options);
///
/// assert_eq!(
///     invocation.args(),
///     ["--strip-all", "--preserve", "--max=80", "a.jpg", "b c.jpg"]
/// );
/// assert_eq!(
///     invocation.to_string(),
///     "jpegoptim --strip-all --preserve --max=80 a.jpg 'b c.jpg'"
/// );
/// ```
pub fn encode(paths: impl Into<InputPaths>, options: &OptimizationOptions) -> CommandInvocation {
    encode_with_program(COMMAND, paths, options)
}

/// Same as [`encode`], but for a jpegoptim binary at a different name or path.
pub fn encode_with_program(
    program: &str,
    paths: impl Into<InputPaths>,
    options: &OptimizationOptions,
) -> CommandInvocation {
    JpegoptimCommandBuilder::new()
        .with_program(program)
        .with_strip(options.strip.mode().cloned())
        .with_preserve(options.preserve_timestamps)
        .with_max_quality(options.max_quality)
        .inputs(paths)
        .build()
}
