//! Host collaborator traits for terminal I/O and the `SLEEP` timer.
//!
//! These sit in `basic-util`, beneath both `basic-eval` (whose `TAB`/`POS`
//! intrinsics write through the output collaborator and read the print
//! column as a side effect of evaluation) and `basic-interp` (whose
//! `PRINT`/`INPUT`/`SLEEP` handlers use all three). Putting them here
//! avoids a dependency cycle between those two crates.

use crate::{PRINT_WIDTH, TAB_ZONE};

/// A character sink the interpreter writes `PRINT`/`INPUT`-prompt output
/// through. Implementations are expected to be unbuffered past each call.
pub trait TerminalOut {
    fn write_str(&mut self, text: &str);
}

/// A line-oriented source the interpreter reads `INPUT` responses from.
/// Returns `None` on end-of-file.
pub trait TerminalIn {
    fn read_line(&mut self) -> Option<String>;
}

/// The host pause primitive `SLEEP` calls into, given a duration in ticks
/// of 1/60 s.
pub trait SleepClock {
    fn sleep_ticks(&mut self, ticks: f64);
}

/// Tracks the 0-based output column, wrapping at [`PRINT_WIDTH`] and
/// advancing through [`TAB_ZONE`]-wide stops for `PRINT ,`. Every write
/// that reaches the terminal goes through here so the column stays
/// consistent regardless of whether it came from `PRINT` or from the
/// `TAB`/`POS` intrinsics.
pub struct PrintColumn(usize);

impl PrintColumn {
    pub fn new() -> Self {
        PrintColumn(0)
    }

    pub fn value(&self) -> usize {
        self.0
    }

    /// Writes `text` through `out`, advancing the column and emitting an
    /// automatic newline whenever it reaches [`PRINT_WIDTH`]. `text` must
    /// not itself contain `'\n'` (callers use [`PrintColumn::newline`]
    /// for that).
    pub fn write(&mut self, out: &mut dyn TerminalOut, text: &str) {
        debug_assert!(!text.contains('\n'));
        for ch in text.chars() {
            let mut buf = [0u8; 4];
            out.write_str(ch.encode_utf8(&mut buf));
            self.0 += 1;
            if self.0 >= PRINT_WIDTH {
                out.write_str("\n");
                self.0 = 0;
            }
        }
    }

    pub fn newline(&mut self, out: &mut dyn TerminalOut) {
        out.write_str("\n");
        self.0 = 0;
    }

    /// Advances to the next multiple of [`TAB_ZONE`], used by `PRINT ,`.
    pub fn advance_to_tab_zone(&mut self, out: &mut dyn TerminalOut) {
        let next = ((self.0 / TAB_ZONE) + 1) * TAB_ZONE;
        self.pad_to_column(out, next);
    }

    /// Advances to `target mod PRINT_WIDTH`, used by the `TAB(n)`
    /// intrinsic; emits a newline first if the column has already passed
    /// the target.
    pub fn pad_to_column(&mut self, out: &mut dyn TerminalOut, target: usize) {
        let target = target % PRINT_WIDTH;
        if self.0 > target {
            self.newline(out);
        }
        while self.0 < target {
            out.write_str(" ");
            self.0 += 1;
        }
    }
}

impl Default for PrintColumn {
    fn default() -> Self {
        Self::new()
    }
}
