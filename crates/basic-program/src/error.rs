use thiserror::Error;

/// Errors raised while parsing source text into the line store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("line {0} has no line number")]
    MissingLineNumber(usize),

    #[error("line number {0} out of range")]
    LineNumberOutOfRange(u32),

    #[error("line {0} is too long")]
    LineTooLong(usize),

    #[error("program capacity exceeded")]
    CapacityExceeded,
}
