//! basic-eval - The recursive-descent expression evaluator and intrinsic
//! function table.
//!
//! Grammar: `or_expr -> and_expr -> comparison -> addsub -> muldiv ->
//! power -> factor`, each a named function rather than a Pratt/
//! binding-power table — the grammar is already given as stratified
//! precedence levels, so a generic operator-precedence parser would be
//! solving a problem that isn't there.
//!
//! There is no token stream: `factor` drives a [`basic_lex::LineCursor`]
//! directly, character by character, the way the interpreter this
//! replaces did, rather than lexing a program into tokens up front.

mod context;
mod error;
mod evaluator;
mod format;
mod intrinsics;
mod rng;

pub use context::EvalContext;
pub use error::EvalError;
pub use evaluator::{evaluate, parse_subscript, parse_var_key};
pub use format::{format_number, print_item_text};
pub use rng::RngState;
