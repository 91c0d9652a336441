use basic_util::{PrintColumn, TerminalOut};
use basic_value::VarStore;

use crate::rng::RngState;

/// Everything an expression evaluation needs beyond the cursor: the
/// variable table, the `RND` generator, and the output column/sink the
/// `TAB`/`POS` intrinsics touch as a side effect of being evaluated.
///
/// Bundled into one struct so the recursive-descent functions in
/// [`crate::evaluator`] take a single `&mut` parameter instead of four.
pub struct EvalContext<'a> {
    pub vars: &'a mut VarStore,
    pub rng: &'a mut RngState,
    pub column: &'a mut PrintColumn,
    pub out: &'a mut dyn TerminalOut,
}
