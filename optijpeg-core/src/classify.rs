//! Classification of jpegoptim output.
//!
//! jpegoptim reports one line per file plus occasional lines of its own. Each
//! line is tested against an ordered matcher table and classified by the
//! first matcher that accepts it:
//!
//! 1. tagged errors: `<file> ... [ERROR]`
//! 2. unassociated tool messages: `jpegoptim: <message>`
//! 3. success/skip lines: `<file> <w>x<h> ... (<percent>%)`
//!
//! Lines no matcher accepts are dropped. Order matters: a tagged-error line
//! that starts with `jpegoptim:` is still a tagged error.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;

use std::collections::BTreeMap;

/// One error reported by jpegoptim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEntry {
    /// File the error refers to; `None` for unassociated tool messages.
    pub filename: Option<String>,
    pub message: String,
}

impl ErrorEntry {
    pub fn new(filename: Option<String>, message: impl Into<String>) -> Self {
        Self {
            filename,
            message: message.into(),
        }
    }
}

/// Classification of a single output line.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedEntry {
    /// A processed file and its ratio (negative means smaller).
    Success { filename: String, ratio: f64 },
    Error(ErrorEntry),
}

/// Structured outcome of one jpegoptim run.
///
/// `succeeded` maps file names to their ratio: the percentage jpegoptim
/// reported, negated. A ratio of `-25.0` means the file shrank by 25%; zero or
/// positive means it was skipped. A file may show up both here and in
/// `errors`, since jpegoptim's output is not guaranteed to be consistent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OptimizationResult {
    pub succeeded: BTreeMap<String, f64>,
    pub errors: Vec<ErrorEntry>,
}

impl OptimizationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one classified entry. A repeated success overwrites the earlier ratio.
    pub fn push(&mut self, entry: ClassifiedEntry) {
        match entry {
            ClassifiedEntry::Success { filename, ratio } => {
                self.succeeded.insert(filename, ratio);
            }
            ClassifiedEntry::Error(error) => self.errors.push(error),
        }
    }

    /// Files whose size was actually reduced.
    pub fn optimized(&self) -> impl Iterator<Item = (&str, f64)> {
        self.succeeded
            .iter()
            .filter(|(_, ratio)| **ratio < 0.0)
            .map(|(name, ratio)| (name.as_str(), *ratio))
    }

    /// Files reported without a reduction.
    pub fn skipped(&self) -> impl Iterator<Item = (&str, f64)> {
        self.succeeded
            .iter()
            .filter(|(_, ratio)| **ratio >= 0.0)
            .map(|(name, ratio)| (name.as_str(), *ratio))
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.succeeded.is_empty() && self.errors.is_empty()
    }

    /// Folds the result of another, independent run into this one.
    ///
    /// Successes from `other` overwrite ratios for the same file; its errors
    /// are appended after the existing ones.
    pub fn merge(&mut self, other: OptimizationResult) {
        self.succeeded.extend(other.succeeded);
        self.errors.extend(other.errors);
    }
}

impl Extend<ClassifiedEntry> for OptimizationResult {
    fn extend<T: IntoIterator<Item = ClassifiedEntry>>(&mut self, iter: T) {
        for entry in iter {
            self.push(entry);
        }
    }
}

impl FromIterator<ClassifiedEntry> for OptimizationResult {
    fn from_iter<T: IntoIterator<Item = ClassifiedEntry>>(iter: T) -> Self {
        let mut result = Self::new();
        result.extend(iter);
        result
    }
}

/// Marker jpegoptim appends to lines describing a failed file.
pub const ERROR_TAG: &str = "ERROR";

struct Matcher {
    name: &'static str,
    pattern: Regex,
    handler: fn(&Captures<'_>) -> Option<ClassifiedEntry>,
}

fn tagged_error(caps: &Captures<'_>) -> Option<ClassifiedEntry> {
    Some(ClassifiedEntry::Error(ErrorEntry::new(
        Some(caps[1].trim().to_string()),
        &caps[2],
    )))
}

fn tool_message(caps: &Captures<'_>) -> Option<ClassifiedEntry> {
    Some(ClassifiedEntry::Error(ErrorEntry::new(None, &caps[1])))
}

fn success(caps: &Captures<'_>) -> Option<ClassifiedEntry> {
    // The pattern only admits `-?\d+\.\d+`, but an absurdly long digit run
    // still parses (to infinity), so a failure here means a broken pattern.
    let percent: f64 = caps[2].parse().ok()?;
    Some(ClassifiedEntry::Success {
        filename: caps[1].to_string(),
        ratio: -percent,
    })
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in matcher {pattern:?}: {e}"))
}

/// Ordered matcher table; the first matcher accepting a line classifies it.
static MATCHERS: Lazy<[Matcher; 3]> = Lazy::new(|| {
    [
        Matcher {
            name: "tagged-error",
            pattern: compile(r"^(.*)\[(ERROR)\]"),
            handler: tagged_error,
        },
        Matcher {
            name: "tool-message",
            pattern: compile(&format!(r"^{}:\s*(.*)$", regex::escape(crate::command::COMMAND))),
            handler: tool_message,
        },
        Matcher {
            name: "success",
            pattern: compile(r"^(.*)\s+\d+x\d+.*\((-?\d+\.\d+)%\)"),
            handler: success,
        },
    ]
});

/// Classifies a single output line, or returns `None` if no matcher accepts it.
///
/// Trailing `\r`/`\n` characters are ignored.
pub fn classify_line(line: &str) -> Option<ClassifiedEntry> {
    let line = line.trim_end_matches(['\r', '\n']);
    for matcher in MATCHERS.iter() {
        if let Some(caps) = matcher.pattern.captures(line) {
            log::trace!("Line matched '{}': {}", matcher.name, line);
            return (matcher.handler)(&caps);
        }
    }
    log::trace!("Dropping unrecognised line: {}", line);
    None
}

/// Classifies a sequence of output lines into an [`OptimizationResult`].
///
/// # Examples
///
/// ```rust
/// use optijpeg_core::classify::classify;
///
/// let result = classify([
///     "photo.jpg 800x600 24bit N JFIF  [OK] 20000 --> 15000 bytes (25.00%), optimized.",
///     "broken.jpg [ERROR]",
///     "jpegoptim: cannot open file",
/// ]);
///
/// assert_eq!(result.succeeded["photo.jpg"], -25.0);
/// assert_eq!(result.errors.len(), 2);
/// assert_eq!(result.errors[1].filename, None);
/// ```
pub fn classify<I, S>(lines: I) -> OptimizationResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| classify_line(line.as_ref()))
        .collect()
}

/// Splits captured output into lines and classifies them.
pub fn classify_output(output: &str) -> OptimizationResult {
    classify(output.lines())
}
