//! Top-level error type for the `basic` CLI.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can terminate the CLI before or after an interpreter run.
///
/// Runtime errors raised while a program is executing are not wrapped
/// here: the interpreter already halts and the diagnostic line (§7) is
/// written straight to the terminal collaborator by [`crate::run`]. This
/// enum only covers the things that stop the CLI before that point, or
/// the read failure underneath a load error.
#[derive(Debug, Error)]
pub enum BasicError {
    #[error("couldn't read program file {path}: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },

    #[error("{0}")]
    Load(#[from] basic_program::LoadError),
}
