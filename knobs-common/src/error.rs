//! Error classification shared by every Knobs crate
//!
//! Each crate defines its own `thiserror` enum; this module provides the
//! severity vocabulary those enums report through [`Severity`] and a
//! formatter for printing an error together with its sources.

use std::fmt;

/// Severity levels for error classification
///
/// - **Warning**: something looked wrong but the operation completed.
/// - **Error**: the operation failed, the process can carry on.
/// - **Critical**: the definitions or configuration are unusable and the
///   process cannot start its work.
///
/// ```rust
/// use knobs_common::ErrorSeverity;
///
/// let bad_input = ErrorSeverity::Error;
/// let bad_manifest = ErrorSeverity::Critical;
/// assert_ne!(bad_input, bad_manifest);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Potential issue but operation can proceed
    Warning,

    /// Operation failed but the process can continue
    Error,

    /// Process cannot continue
    Critical,
}

/// Trait for error types that have severity levels
///
/// ```rust
/// use knobs_common::{ErrorSeverity, Severity};
///
/// #[derive(Debug)]
/// enum LoadError {
///     Corrupted,
///     Missing,
/// }
///
/// impl Severity for LoadError {
///     fn severity(&self) -> ErrorSeverity {
///         match self {
///             LoadError::Corrupted => ErrorSeverity::Critical,
///             LoadError::Missing => ErrorSeverity::Error,
///         }
///     }
/// }
///
/// assert_eq!(LoadError::Corrupted.severity(), ErrorSeverity::Critical);
/// ```
pub trait Severity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;
}

/// Error chain formatter for detailed error reporting
pub struct ErrorChain<'a>(&'a dyn std::error::Error);

impl<'a> ErrorChain<'a> {
    /// Format any error, including boxed and `anyhow` ones via `as_ref()`
    pub fn new(error: &'a dyn std::error::Error) -> Self {
        Self(error)
    }
}

impl fmt::Display for ErrorChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Error: {}", self.0)?;

        let mut current = self.0.source();
        let mut level = 1;

        while let Some(err) = current {
            writeln!(f, "{:indent$}Caused by: {}", "", err, indent = level * 2)?;
            current = err.source();
            level += 1;
        }

        Ok(())
    }
}

/// Extension trait for error types to format the full error chain
pub trait ErrorChainExt {
    /// Format the full error chain
    fn error_chain(&self) -> ErrorChain<'_>;
}

impl<E: std::error::Error> ErrorChainExt for E {
    fn error_chain(&self) -> ErrorChain<'_> {
        ErrorChain(self)
    }
}
