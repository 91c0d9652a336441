use thiserror::Error;

/// Errors raised by [`crate::Value`] coercion and [`crate::VarStore`] access.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValueError {
    #[error("Numeric value required")]
    NumericRequired,

    #[error("String value required")]
    StringRequired,
}
