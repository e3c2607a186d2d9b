// ============================================================================
// optijpeg-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Locating and Running jpegoptim
//
// This module encapsulates everything that touches the host system: finding
// the jpegoptim binary on PATH and spawning it. Both sit behind small
// interfaces; the rest of the library never touches the host directly.
//
// KEY COMPONENTS:
// - Binary discovery (is_available, check_dependency, find_executable)
// - ProcessRunner trait for blocking and callback-driven execution
// - SystemProcessRunner, the std::process implementation
// - MockProcessRunner for tests (test-mocks feature)

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::env;
use std::path::{Path, PathBuf};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Traits and implementations for executing jpegoptim
pub mod process_runner;

#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use process_runner::{ProcessRunner, SystemProcessRunner};

#[cfg(any(test, feature = "test-mocks"))]
pub use mocks::{MockProcessRunner, MockResponse};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks whether `cmd_name` resolves to an executable file on `PATH`.
///
/// # Examples
///
/// ```rust,no_run
/// use optijpeg_core::external::is_available;
///
/// if !is_available("jpegoptim") {
///     eprintln!("jpegoptim is not installed");
/// }
/// ```
pub fn is_available(cmd_name: &str) -> bool {
    find_executable(cmd_name).is_some()
}

/// Resolves `cmd_name` on `PATH`, failing with
/// [`CoreError::DependencyNotFound`] when it cannot be found.
pub fn check_dependency(cmd_name: &str) -> CoreResult<PathBuf> {
    match find_executable(cmd_name) {
        Some(path) => {
            log::debug!("Found dependency '{}' at {}", cmd_name, path.display());
            Ok(path)
        }
        None => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
    }
}

/// Locates an executable by name on `PATH`.
///
/// A name containing a path separator is checked directly instead.
pub fn find_executable(cmd_name: &str) -> Option<PathBuf> {
    let direct = Path::new(cmd_name);
    if direct.components().count() > 1 {
        return is_executable(direct).then(|| direct.to_path_buf());
    }

    let path_var = env::var_os("PATH")?;
    find_executable_in(cmd_name, env::split_paths(&path_var))
}

/// Locates an executable by name in an explicit list of directories.
pub fn find_executable_in<I>(cmd_name: &str, dirs: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    if cmd_name.is_empty() {
        return None;
    }

    dirs.into_iter()
        .filter(|dir| !dir.as_os_str().is_empty())
        .flat_map(|dir| candidate_names(cmd_name).map(move |name| dir.join(name)))
        .find(|candidate| is_executable(candidate))
}

#[cfg(windows)]
fn candidate_names(cmd_name: &str) -> impl Iterator<Item = String> {
    [cmd_name.to_string(), format!("{cmd_name}.exe")].into_iter()
}

#[cfg(not(windows))]
fn candidate_names(cmd_name: &str) -> impl Iterator<Item = String> {
    std::iter::once(cmd_name.to_string())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
