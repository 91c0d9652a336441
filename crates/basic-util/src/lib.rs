//! basic-util - Shared constants and diagnostic formatting.
//!
//! Every other crate in the workspace depends on this one for the handful
//! of fixed limits the language specifies (print width, tab zone, string
//! and buffer caps) and for rendering a fatal runtime error the way the
//! driver is required to: one line, naming the BASIC line number when one
//! applies.

mod diagnostic;
mod io;

pub use diagnostic::format_diagnostic;
pub use io::{PrintColumn, SleepClock, TerminalIn, TerminalOut};

/// Terminal width in columns. `PRINT` wraps and `TAB$`/`POS` wrap at this value.
pub const PRINT_WIDTH: usize = 80;

/// Width of a `PRINT ,` tab zone.
pub const TAB_ZONE: usize = 10;

/// Maximum length of a string value, including the implicit terminator
/// budget classic CBM BASIC reserved. Concatenation truncates silently
/// past `MAX_STR_LEN - 1` characters.
pub const MAX_STR_LEN: usize = 255;

/// Maximum length of one source line's statement text, matching the
/// "optimised profile" buffer size from the source-file format contract.
pub const MAX_LINE_LEN: usize = 128;

/// Maximum number of program lines the line store will hold.
pub const MAX_PROGRAM_LINES: usize = 1024;

/// Maximum line number accepted when loading a program.
pub const MAX_LINE_NUMBER: u32 = 65535;

/// Maximum depth of the `GOSUB` return-address stack.
pub const GOSUB_STACK_CAPACITY: usize = 32;

/// Maximum depth of the `FOR`/`NEXT` loop-frame stack.
pub const FOR_STACK_CAPACITY: usize = 32;

/// A minimum array size: the first subscript use of an array allocates at
/// least this many elements.
pub const MIN_ARRAY_SIZE: usize = 11;
