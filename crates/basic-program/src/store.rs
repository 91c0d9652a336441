use basic_util::{MAX_LINE_LEN, MAX_LINE_NUMBER, MAX_PROGRAM_LINES};

use crate::error::LoadError;

/// The program's line store: an array of `(line number, text)` kept
/// sorted by number, plus a one-slot lookup cache.
pub struct Program {
    lines: Vec<(u32, String)>,
    cache: Option<(u32, usize)>,
}

impl Program {
    pub fn new() -> Self {
        Program { lines: Vec::new(), cache: None }
    }

    /// Parses already-read source text into a line store: strips a
    /// leading BOM, skips blank/whitespace-only lines, and requires every
    /// remaining line to start with a line number. Later occurrences of a
    /// duplicate number replace earlier ones.
    pub fn load_source(text: &str) -> Result<Self, LoadError> {
        let mut program = Program::new();
        let text = strip_bom(text);
        for (i, raw_line) in text.split('\n').enumerate() {
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
            if line.trim().is_empty() {
                continue;
            }
            let (number, rest) = parse_line_number(line, i + 1)?;
            let stmt_text = rest.trim_start();
            if stmt_text.len() > MAX_LINE_LEN {
                return Err(LoadError::LineTooLong(i + 1));
            }
            program.add_or_replace_line(number, stmt_text.to_string())?;
        }
        Ok(program)
    }

    /// Inserts a line, keeping the store sorted by number; a line with an
    /// existing number replaces its text in place.
    pub fn add_or_replace_line(&mut self, number: u32, text: String) -> Result<(), LoadError> {
        self.cache = None;
        match self.lines.binary_search_by_key(&number, |(n, _)| *n) {
            Ok(idx) => self.lines[idx].1 = text,
            Err(idx) => {
                if self.lines.len() >= MAX_PROGRAM_LINES {
                    return Err(LoadError::CapacityExceeded);
                }
                self.lines.insert(idx, (number, text));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_number_at(&self, index: usize) -> u32 {
        self.lines[index].0
    }

    pub fn line_text_at(&self, index: usize) -> &str {
        &self.lines[index].1
    }

    /// Finds the store index of `number`, consulting the one-slot cache
    /// before falling back to binary search.
    pub fn find_line_index(&mut self, number: u32) -> Option<usize> {
        if let Some((cached_number, cached_index)) = self.cache {
            if cached_number == number {
                return Some(cached_index);
            }
        }
        let idx = self.lines.binary_search_by_key(&number, |(n, _)| *n).ok()?;
        self.cache = Some((number, idx));
        Some(idx)
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

fn parse_line_number(line: &str, line_no: usize) -> Result<(u32, &str), LoadError> {
    let digits_end = line.find(|c: char| !c.is_ascii_digit()).unwrap_or(line.len());
    if digits_end == 0 {
        return Err(LoadError::MissingLineNumber(line_no));
    }
    let number: u64 = line[..digits_end]
        .parse()
        .map_err(|_| LoadError::LineNumberOutOfRange(MAX_LINE_NUMBER))?;
    if number > MAX_LINE_NUMBER as u64 {
        return Err(LoadError::LineNumberOutOfRange(number.min(u32::MAX as u64) as u32));
    }
    Ok((number as u32, &line[digits_end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_sorted_after_load() {
        let program = Program::load_source("20 PRINT \"B\"\n10 PRINT \"A\"\n").unwrap();
        assert_eq!(program.line_number_at(0), 10);
        assert_eq!(program.line_number_at(1), 20);
    }

    #[test]
    fn duplicate_line_number_replaces_text() {
        let program = Program::load_source("10 PRINT \"A\"\n10 PRINT \"B\"\n").unwrap();
        assert_eq!(program.len(), 1);
        assert_eq!(program.line_text_at(0), "PRINT \"B\"");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let program = Program::load_source("10 PRINT \"A\"\n\n   \n20 PRINT \"B\"\n").unwrap();
        assert_eq!(program.len(), 2);
    }

    #[test]
    fn bom_is_ignored() {
        let program = Program::load_source("\u{feff}10 PRINT \"A\"\n").unwrap();
        assert_eq!(program.line_number_at(0), 10);
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let program = Program::load_source("10 PRINT \"A\"\r\n20 PRINT \"B\"\r\n").unwrap();
        assert_eq!(program.len(), 2);
    }

    #[test]
    fn missing_line_number_is_an_error() {
        assert_eq!(Program::load_source("PRINT \"A\"\n"), Err(LoadError::MissingLineNumber(1)));
    }

    #[test]
    fn line_number_out_of_range_is_an_error() {
        assert!(matches!(Program::load_source("99999 PRINT\n"), Err(LoadError::LineNumberOutOfRange(_))));
    }

    #[test]
    fn line_too_long_is_an_error() {
        let stmt = "PRINT \"".to_string() + &"X".repeat(MAX_LINE_LEN) + "\"";
        let source = format!("10 {}\n", stmt);
        assert!(matches!(Program::load_source(&source), Err(LoadError::LineTooLong(1))));
    }

    #[test]
    fn capacity_exceeded_is_an_error() {
        let mut program = Program::new();
        for n in 0..MAX_PROGRAM_LINES as u32 {
            program.add_or_replace_line(n, "REM".to_string()).unwrap();
        }
        assert_eq!(
            program.add_or_replace_line(MAX_PROGRAM_LINES as u32, "REM".to_string()),
            Err(LoadError::CapacityExceeded)
        );
    }

    #[test]
    fn find_line_index_uses_binary_search_and_cache() {
        let mut program = Program::load_source("10 A=1\n20 A=2\n30 A=3\n").unwrap();
        assert_eq!(program.find_line_index(20), Some(1));
        assert_eq!(program.find_line_index(20), Some(1));
        assert_eq!(program.find_line_index(99), None);
    }
}
