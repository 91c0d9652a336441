use basic_eval::EvalError;
use thiserror::Error;

/// Everything that can halt a run, beyond expression-level failures
/// (which arrive wrapped from `basic-eval`).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("Missing THEN")]
    MissingThen,
    #[error("Expected '='")]
    ExpectedEquals,
    #[error("Expected TO in FOR")]
    ExpectedToInFor,
    #[error("Expected variable")]
    ExpectedVariable,
    #[error("Unknown statement")]
    UnknownStatement,
    #[error("FOR variable must be scalar")]
    ForVariableMustBeScalar,
    #[error("FOR variable must be numeric")]
    ForVariableMustBeNumeric,
    #[error("Invalid array size")]
    InvalidArraySize,
    #[error("Target line not found")]
    TargetLineNotFound,
    #[error("GOSUB stack overflow")]
    GosubStackOverflow,
    #[error("FOR stack overflow")]
    ForStackOverflow,
    #[error("RETURN without GOSUB")]
    ReturnWithoutGosub,
    #[error("NEXT without FOR")]
    NextWithoutFor,
    #[error("Loop variable missing")]
    LoopVariableMissing,
    #[error("Unexpected end of input")]
    UnexpectedEndOfInput,
}
