//! `basic` - A CBM BASIC v2 compatible interpreter.
//!
//! Loads a source file, then runs it to completion or to a fatal error,
//! writing program output (and any diagnostic line) to stdout.

mod error;
mod host;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use basic_interp::Interpreter;
use basic_program::Program;
use basic_util::format_diagnostic;
use error::BasicError;
use host::{RealClock, StdinReader, StdoutWriter};

/// A CBM BASIC v2 compatible interpreter.
#[derive(Parser, Debug)]
#[command(name = "basic")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run a BASIC program", long_about = None)]
struct Cli {
    /// Path to the BASIC source file to run.
    program: PathBuf,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match load(&cli.program) {
        Ok(program) => {
            let mut interp = Interpreter::new(program);
            let mut term_in = StdinReader::new();
            let mut term_out = StdoutWriter::new();
            let mut clock = RealClock;
            if let Err(e) = interp.run(&mut term_in, &mut term_out, &mut clock) {
                use basic_util::TerminalOut as _;
                term_out.write_str(&format_diagnostic(interp.current_basic_line_number(), &e.to_string()));
                std::process::exit(2);
            }
        }
        Err(e) => {
            eprint!("{}", format_diagnostic(None, &e.to_string()));
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose { EnvFilter::new("debug") } else { EnvFilter::new("info") };
    let subscriber = fmt::layer().with_target(false).with_thread_ids(false).with_thread_names(false);
    let _ = tracing_subscriber::registry().with(filter).with(subscriber).try_init();
}

fn load(path: &Path) -> Result<Program, BasicError> {
    tracing::debug!(path = %path.display(), "loading program");
    let text = std::fs::read_to_string(path)
        .map_err(|source| BasicError::ReadFile { path: path.to_path_buf(), source })?;
    Ok(Program::load_source(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_program_path_and_verbose_flag() {
        let cli = Cli::parse_from(["basic", "-v", "program.bas"]);
        assert!(cli.verbose);
        assert_eq!(cli.program, PathBuf::from("program.bas"));
    }

    #[test]
    fn cli_defaults_verbose_to_false() {
        let cli = Cli::parse_from(["basic", "program.bas"]);
        assert!(!cli.verbose);
    }
}
