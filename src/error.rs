//! The error taxonomy.
//!
//! [`CompileError`] is recoverable and carries the backend's diagnostic
//! message; callers may retry with a different program. [`BindingError`]
//! covers the one meaningful construction failure — a scene document
//! without a texture aggregate ([`BindingError::MissingTexture`]) — and
//! transparently wraps a [`CompileError`] surfaced while building bindings.

use thiserror::Error;

/// A recoverable failure to compile a synthesized shader program.
///
/// Carries the backend's diagnostic message verbatim.
#[derive(Debug, Clone, Error)]
#[error("shader compilation failed: {message}")]
pub struct CompileError {
    /// The backend diagnostic describing why compilation failed.
    pub message: String,
}

impl CompileError {
    /// Wrap a backend diagnostic message as a recoverable compile error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A failure to build the per-element GPU bindings for a scene document.
#[derive(Debug, Error)]
pub enum BindingError {
    /// The scene document had no texture aggregate to bind.
    #[error("scene document has no texture aggregate")]
    MissingTexture,

    /// A texture element's generated program failed to compile.
    #[error(transparent)]
    Compile(#[from] CompileError),
}
