use basic_value::VarKey;

/// `(return_line_index, return_text_cursor)`, pushed by `GOSUB` and
/// popped by `RETURN`. Plain indices, never a pointer into line text
/// (see the re-architecture notes on cursor lifetime hazards).
#[derive(Debug, Clone, Copy)]
pub(crate) struct GosubFrame {
    pub(crate) return_line: usize,
    pub(crate) return_cursor: usize,
}

/// `(variable_key, target, step, loop_line_index, resume_cursor)`. The
/// loop variable is stored as a *key*, not a cached slot reference —
/// `NEXT` re-resolves it through the variable store on every iteration,
/// the robust option over the hazardous cached-reference design the
/// source used (see the re-architecture notes on slot reference
/// stability).
#[derive(Debug, Clone, Copy)]
pub(crate) struct ForFrame {
    pub(crate) key: VarKey,
    pub(crate) target: f64,
    pub(crate) step: f64,
    pub(crate) loop_line: usize,
    pub(crate) resume_cursor: usize,
}
