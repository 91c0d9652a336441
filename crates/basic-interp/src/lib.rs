//! basic-interp - The statement-level execution driver.
//!
//! Built around one [`Interpreter`] struct that owns the program, the
//! variable store, and the control-flow stacks, and a [`Interpreter::step`]
//! method that runs one line at a time (see `statement.rs`). `basic-eval`
//! handles everything inside an expression; this crate handles everything
//! between them — `GOTO`/`GOSUB`/`IF`/`FOR`/`NEXT` and the line-to-line
//! driver loop.

mod error;
mod frame;
mod interpreter;
mod statement;

pub use error::RuntimeError;
pub use interpreter::Interpreter;
