use basic_value::ValueError;
use thiserror::Error;

/// Errors raised while evaluating an expression.
///
/// Statement-level errors (`FOR`/`NEXT` frame mismatches, `GOTO` targets,
/// `DIM` sizes) live in `basic-interp`'s `RuntimeError`, which wraps this
/// type for the expression sub-evaluations every statement performs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("Missing ')'")]
    MissingCloseParen,

    #[error("Unterminated string")]
    UnterminatedString,

    #[error("Syntax error in expression")]
    SyntaxError,

    #[error("Function requires '('")]
    FunctionRequiresParen,

    #[error("Negative array index")]
    NegativeArrayIndex,

    #[error("Type mismatch in comparison")]
    ComparisonTypeMismatch,

    #[error(transparent)]
    Value(#[from] ValueError),
}
