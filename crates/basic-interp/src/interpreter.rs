use basic_eval::RngState;
use basic_program::Program;
use basic_util::{PrintColumn, SleepClock, TerminalIn, TerminalOut};
use basic_value::VarStore;

use crate::error::RuntimeError;
use crate::frame::{ForFrame, GosubFrame};

/// The single owned container for all interpreter state (spec §9: "the
/// re-architected design should encapsulate all interpreter state in one
/// owned container"). No process-global arrays, unlike the source.
pub struct Interpreter {
    pub(crate) program: Program,
    pub(crate) vars: VarStore,
    pub(crate) rng: RngState,
    pub(crate) column: PrintColumn,
    pub(crate) gosub_stack: Vec<GosubFrame>,
    pub(crate) for_stack: Vec<ForFrame>,
    pub(crate) current_line: usize,
    /// `None` means "ready at line start"; `Some(offset)` is the resume
    /// position of a control-flow jump or a `:`-continued statement.
    pub(crate) cursor_pos: Option<usize>,
    pub(crate) halted: bool,
}

impl Interpreter {
    pub fn new(program: Program) -> Self {
        Interpreter {
            program,
            vars: VarStore::new(),
            rng: RngState::new(),
            column: PrintColumn::new(),
            gosub_stack: Vec::new(),
            for_stack: Vec::new(),
            current_line: 0,
            cursor_pos: None,
            halted: false,
        }
    }

    /// True once the halted flag is set or `current_line` has left the
    /// valid range — the driver's loop-exit condition (spec §4.6).
    pub fn is_finished(&self) -> bool {
        self.halted || self.current_line >= self.program.len()
    }

    /// The BASIC line number currently executing, when one applies —
    /// used by the binary crate to format the `Error at line N: ...`
    /// diagnostic.
    pub fn current_basic_line_number(&self) -> Option<u32> {
        if self.current_line < self.program.len() {
            Some(self.program.line_number_at(self.current_line))
        } else {
            None
        }
    }

    /// Runs to completion (normal `END`/`STOP`/falling off the last
    /// line, or an error), driving one statement at a time via [`step`].
    ///
    /// [`step`]: Interpreter::step
    pub fn run(
        &mut self,
        term_in: &mut dyn TerminalIn,
        term_out: &mut dyn TerminalOut,
        sleep: &mut dyn SleepClock,
    ) -> Result<(), RuntimeError> {
        while !self.is_finished() {
            self.step(term_in, term_out, sleep)?;
        }
        Ok(())
    }
}
