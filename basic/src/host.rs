//! Real terminal and clock collaborators, wired to stdin/stdout and the
//! OS sleep primitive. The interpreter core never sees these directly —
//! it only knows the `basic-util` traits (§6 of the design notes), which
//! is what lets `basic-interp`'s tests and these impls stay independent.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use basic_util::{SleepClock, TerminalIn, TerminalOut};

/// Line-oriented stdin reader. `INPUT` contracts require `\n`-terminated
/// reads and an error on EOF, which a `None` return signals to the
/// caller (spec §6's terminal contract).
pub struct StdinReader {
    lines: io::Lines<io::StdinLock<'static>>,
}

impl StdinReader {
    pub fn new() -> Self {
        StdinReader { lines: io::stdin().lock().lines() }
    }
}

impl TerminalIn for StdinReader {
    fn read_line(&mut self) -> Option<String> {
        match self.lines.next()? {
            Ok(line) => Some(line),
            Err(_) => None,
        }
    }
}

/// Locked stdout, flushed after every write so `PRINT`/`INPUT` prompts
/// appear immediately (the "unbuffered after each write" contract).
pub struct StdoutWriter {
    out: io::StdoutLock<'static>,
}

impl StdoutWriter {
    pub fn new() -> Self {
        StdoutWriter { out: io::stdout().lock() }
    }
}

impl TerminalOut for StdoutWriter {
    fn write_str(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }
}

/// `SLEEP`'s host clock: ticks of 1/60 s mapped onto `std::thread::sleep`.
pub struct RealClock;

impl SleepClock for RealClock {
    fn sleep_ticks(&mut self, ticks: f64) {
        let seconds = (ticks.max(0.0)) / 60.0;
        std::thread::sleep(Duration::from_secs_f64(seconds));
    }
}
