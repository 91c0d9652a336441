/// A cursor over one BASIC program line's statement text.
///
/// This is the "intra-line cursor" the driver and control-flow statements
/// save and restore as a plain byte offset — never a raw pointer — so a
/// [`LineCursor`] can be reconstructed from `(line_index, offset)` without
/// any lifetime entanglement with the line store (see the design notes on
/// pointer-into-mutable-text cursors).
///
/// Lines are pre-split by the program store, so only spaces and tabs are
/// skipped as whitespace here; newlines never appear in `text`.
pub struct LineCursor<'a> {
    text: &'a str,
    pos: usize,
}

const DELIMITERS: [u8; 3] = [b' ', b'\t', b':'];

impl<'a> LineCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        LineCursor { text, pos: 0 }
    }

    pub fn at(text: &'a str, pos: usize) -> Self {
        let pos = pos.min(text.len());
        LineCursor { text, pos }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.text.len());
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Current byte as a char, or `'\0'` at end of line.
    pub fn current(&self) -> char {
        self.peek(0)
    }

    pub fn peek(&self, offset: usize) -> char {
        self.text[self.pos..].chars().nth(offset).unwrap_or('\0')
    }

    pub fn advance(&mut self) {
        if let Some(c) = self.text[self.pos..].chars().next() {
            self.pos += c.len_utf8();
        }
    }

    pub fn remaining(&self) -> &'a str {
        &self.text[self.pos..]
    }

    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.text[start..self.pos]
    }

    /// Advances past spaces and tabs. Does not touch comments or newlines.
    pub fn skip_whitespace(&mut self) {
        while matches!(self.current(), ' ' | '\t') {
            self.advance();
        }
    }

    /// Case-insensitive keyword match, consuming it only if the character
    /// that follows is one of `{end-of-line, space, tab, ':', '('}` - the
    /// delimiter check that keeps `FORM` from matching `FOR`.
    pub fn match_keyword(&mut self, keyword: &str) -> bool {
        let rest = self.remaining();
        if rest.len() < keyword.len() || !rest.is_char_boundary(keyword.len()) {
            return false;
        }
        if !rest[..keyword.len()].eq_ignore_ascii_case(keyword) {
            return false;
        }
        let next = rest[keyword.len()..].chars().next();
        let delimited = match next {
            None => true,
            Some(c) => c == '(' || (c.is_ascii() && DELIMITERS.contains(&(c as u8))),
        };
        if delimited {
            self.pos += keyword.len();
        }
        delimited
    }

    /// Reads an identifier: letters and digits with an optional single
    /// trailing `$`. The caller derives a two-letter [`VarKey`]-style key
    /// from the first two letters; remaining characters are accepted but
    /// not significant for keying (CBM BASIC v2 compatibility).
    ///
    /// [`VarKey`]: https://docs.rs/basic-value
    pub fn read_identifier(&mut self) -> &'a str {
        let start = self.pos;
        while self.current().is_ascii_alphanumeric() {
            self.advance();
        }
        if self.current() == '$' {
            self.advance();
        }
        self.slice_from(start)
    }

    /// Reads an unsigned numeric literal starting at the cursor (digit or
    /// `.`). Sign is never consumed here — the expression grammar handles
    /// unary sign itself, one level up, so it can bind tighter than `^`.
    pub fn read_number_literal(&mut self) -> f64 {
        let start = self.pos;
        while self.current().is_ascii_digit() {
            self.advance();
        }
        if self.current() == '.' {
            self.advance();
            while self.current().is_ascii_digit() {
                self.advance();
            }
        }
        if matches!(self.current(), 'e' | 'E') {
            let snapshot = self.pos;
            self.advance();
            if matches!(self.current(), '+' | '-') {
                self.advance();
            }
            let exp_digits_start = self.pos;
            while self.current().is_ascii_digit() {
                self.advance();
            }
            if self.pos == exp_digits_start {
                self.pos = snapshot;
            }
        }
        self.slice_from(start).parse().unwrap_or(0.0)
    }

    /// Reads a double-quoted string literal; the opening quote must be at
    /// the cursor. Returns `None` if the line ends before a closing quote
    /// is found (an unterminated string). There is no escape syntax.
    pub fn read_quoted_string(&mut self) -> Option<String> {
        debug_assert_eq!(self.current(), '"');
        self.advance();
        let start = self.pos;
        while !self.is_at_end() && self.current() != '"' {
            self.advance();
        }
        if self.is_at_end() {
            return None;
        }
        let content = self.slice_from(start).to_string();
        self.advance();
        Some(content)
    }
}
