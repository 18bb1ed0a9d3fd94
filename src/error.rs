//! Unified error type for the panbbh library.
//!
//! Library code returns [`BbhError`]; the CLI wraps it with `anyhow` for
//! context. There are no recoverable per-task errors: configuration, input,
//! and sink failures are all fatal to the run.

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Debug)]
pub enum BbhError {
    /// I/O failure with path context (gene list or output sink).
    Io {
        path: PathBuf,
        operation: &'static str,
        source: std::io::Error,
    },

    /// Invalid driver configuration (k, thread count).
    Config(String),

    /// Malformed gene list line.
    Input {
        path: PathBuf,
        line: u64,
        detail: String,
    },
}

impl fmt::Display for BbhError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BbhError::Io {
                path,
                operation,
                source,
            } => {
                write!(f, "{} failed for '{}': {}", operation, path.display(), source)
            }
            BbhError::Config(msg) => write!(f, "configuration error: {}", msg),
            BbhError::Input { path, line, detail } => {
                write!(f, "invalid gene list '{}' line {}: {}", path.display(), line, detail)
            }
        }
    }
}

impl std::error::Error for BbhError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BbhError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BbhError>;

impl BbhError {
    pub fn io(path: impl Into<PathBuf>, operation: &'static str, source: std::io::Error) -> Self {
        BbhError::Io {
            path: path.into(),
            operation,
            source,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        BbhError::Config(msg.into())
    }

    pub fn input(path: impl Into<PathBuf>, line: u64, detail: impl Into<String>) -> Self {
        BbhError::Input {
            path: path.into(),
            line,
            detail: detail.into(),
        }
    }
}

// ============================================================================
// First-error latch
// ============================================================================

/// Keeps the first error raised by any worker task.
///
/// Column tasks write to the output sink from pool threads; the driver can
/// only surface a failure after the phase barrier. Tasks race to store here
/// and the driver collects once the pool is idle.
pub struct FirstError {
    hit: AtomicBool,
    error: Mutex<Option<BbhError>>,
}

impl FirstError {
    pub fn new() -> Self {
        Self {
            hit: AtomicBool::new(false),
            error: Mutex::new(None),
        }
    }

    /// Store `err` unless an earlier error already won the race.
    /// Returns whether this error was kept.
    pub fn store(&self, err: BbhError) -> bool {
        if self
            .hit
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            if let Ok(mut slot) = self.error.lock() {
                *slot = Some(err);
            }
            true
        } else {
            false
        }
    }

    pub fn get(&self) -> Option<BbhError> {
        if self.hit.load(Ordering::SeqCst) {
            self.error.lock().ok().and_then(|mut slot| slot.take())
        } else {
            None
        }
    }

    pub fn has_error(&self) -> bool {
        self.hit.load(Ordering::SeqCst)
    }
}

impl Default for FirstError {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = BbhError::io(
            "/data/genes.tsv",
            "open",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/data/genes.tsv"));
        assert!(msg.contains("open"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_config_error_display() {
        let err = BbhError::config("k must be positive");
        assert!(err.to_string().contains("k must be positive"));
    }

    #[test]
    fn test_input_error_display() {
        let err = BbhError::input("/data/genes.tsv", 42, "expected `<genome>\\t<sequence>`");
        let msg = err.to_string();
        assert!(msg.contains("line 42"));
        assert!(msg.contains("genes.tsv"));
    }

    #[test]
    fn test_error_source_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = BbhError::io("/out.net", "write", io_err);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_first_error_keeps_first() {
        let latch = FirstError::new();
        assert!(latch.store(BbhError::config("first")));
        assert!(!latch.store(BbhError::config("second")));

        let err = latch.get().expect("error stored");
        assert!(err.to_string().contains("first"));
    }

    #[test]
    fn test_first_error_empty() {
        let latch = FirstError::new();
        assert!(!latch.has_error());
        assert!(latch.get().is_none());
    }
}
