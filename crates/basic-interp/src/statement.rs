use basic_eval::{evaluate, parse_subscript, parse_var_key, print_item_text, EvalContext, EvalError};
use basic_lex::{atof_prefix, LineCursor};
use basic_util::{SleepClock, TerminalIn, TerminalOut, FOR_STACK_CAPACITY, GOSUB_STACK_CAPACITY};
use basic_value::Value;

use crate::error::RuntimeError;
use crate::frame::{ForFrame, GosubFrame};
use crate::interpreter::Interpreter;

/// What a statement handler did to the driver's position.
pub(crate) enum Flow {
    /// Fall through to the next `:`-separated statement, or end of line.
    NextStatement,
    /// `IF <true> THEN <statement>`: re-enter `execute_statement` at the
    /// cursor's current position without consuming a `:` first.
    ContinueInline,
    /// A control-flow handler already set `current_line`/`cursor_pos`.
    Jumped,
    /// `IF` was false: abandon the rest of the line.
    LineConsumedSkipRest,
    /// `END`/`STOP`.
    Halted,
}

impl Interpreter {
    /// Executes statements on the current line starting at `cursor_pos`
    /// until a line transition happens, per the state machine in spec
    /// §4.6. The line's text is cloned out of the program store so the
    /// cursor never borrows across a call that also needs `&mut
    /// self.program` (e.g. `GOTO`'s line lookup) — the index-based
    /// cursor design from the re-architecture notes, at the cost of one
    /// cheap clone of a short line per step.
    pub fn step(
        &mut self,
        term_in: &mut dyn TerminalIn,
        term_out: &mut dyn TerminalOut,
        sleep: &mut dyn SleepClock,
    ) -> Result<(), RuntimeError> {
        if self.is_finished() {
            return Ok(());
        }
        let line_text = self.program.line_text_at(self.current_line).to_string();
        let start = self.cursor_pos.unwrap_or(0);
        let mut cursor = LineCursor::at(&line_text, start);

        loop {
            cursor.skip_whitespace();
            if cursor.is_at_end() {
                self.current_line += 1;
                self.cursor_pos = None;
                return Ok(());
            }
            match self.execute_statement(&mut cursor, term_in, term_out, sleep)? {
                Flow::NextStatement => {
                    cursor.skip_whitespace();
                    if cursor.current() == ':' {
                        cursor.advance();
                        continue;
                    }
                    self.current_line += 1;
                    self.cursor_pos = None;
                    return Ok(());
                }
                Flow::ContinueInline => continue,
                Flow::Jumped => return Ok(()),
                Flow::LineConsumedSkipRest => {
                    self.current_line += 1;
                    self.cursor_pos = None;
                    return Ok(());
                }
                Flow::Halted => {
                    self.halted = true;
                    return Ok(());
                }
            }
        }
    }

    fn execute_statement(
        &mut self,
        cursor: &mut LineCursor<'_>,
        term_in: &mut dyn TerminalIn,
        term_out: &mut dyn TerminalOut,
        sleep: &mut dyn SleepClock,
    ) -> Result<Flow, RuntimeError> {
        cursor.skip_whitespace();

        if cursor.current() == '\'' || cursor.match_keyword("REM") {
            cursor.set_position(cursor.text().len());
            return Ok(Flow::NextStatement);
        }
        if cursor.current() == '?' {
            cursor.advance();
            return self.stmt_print(cursor, term_out);
        }
        if cursor.match_keyword("PRINT") {
            return self.stmt_print(cursor, term_out);
        }
        if cursor.match_keyword("INPUT") {
            return self.stmt_input(cursor, term_in, term_out);
        }
        if cursor.match_keyword("GOTO") {
            return self.stmt_goto(cursor);
        }
        if cursor.match_keyword("GOSUB") {
            return self.stmt_gosub(cursor);
        }
        if cursor.match_keyword("RETURN") {
            return self.stmt_return();
        }
        if cursor.match_keyword("IF") {
            return self.stmt_if(cursor, term_out);
        }
        if cursor.match_keyword("FOR") {
            return self.stmt_for(cursor, term_out);
        }
        if cursor.match_keyword("NEXT") {
            return self.stmt_next(cursor);
        }
        if cursor.match_keyword("DIM") {
            return self.stmt_dim(cursor, term_out);
        }
        if cursor.match_keyword("END") || cursor.match_keyword("STOP") {
            return Ok(Flow::Halted);
        }
        if cursor.match_keyword("SLEEP") {
            return self.stmt_sleep(cursor, term_out, sleep);
        }
        if cursor.match_keyword("LET") {
            return self.stmt_let(cursor, term_out);
        }
        if cursor.current().is_ascii_alphabetic() {
            // An identifier that isn't a keyword defaults to LET.
            return self.stmt_let(cursor, term_out);
        }
        Err(RuntimeError::UnknownStatement)
    }

    fn stmt_print(&mut self, cursor: &mut LineCursor<'_>, term_out: &mut dyn TerminalOut) -> Result<Flow, RuntimeError> {
        let mut trailing_separator = false;
        loop {
            cursor.skip_whitespace();
            if cursor.is_at_end() || cursor.current() == ':' {
                break;
            }
            trailing_separator = false;
            let mut ctx = EvalContext { vars: &mut self.vars, rng: &mut self.rng, column: &mut self.column, out: &mut *term_out };
            let value = evaluate(cursor, &mut ctx)?;
            self.column.write(term_out, &print_item_text(&value));
            cursor.skip_whitespace();
            match cursor.current() {
                ';' => {
                    cursor.advance();
                    trailing_separator = true;
                }
                ',' => {
                    cursor.advance();
                    self.column.advance_to_tab_zone(term_out);
                    trailing_separator = true;
                }
                _ => break,
            }
        }
        if !trailing_separator {
            self.column.newline(term_out);
        }
        Ok(Flow::NextStatement)
    }

    fn stmt_input(
        &mut self,
        cursor: &mut LineCursor<'_>,
        term_in: &mut dyn TerminalIn,
        term_out: &mut dyn TerminalOut,
    ) -> Result<Flow, RuntimeError> {
        cursor.skip_whitespace();
        if cursor.current() == '"' {
            let prompt = cursor.read_quoted_string().ok_or(RuntimeError::Eval(EvalError::UnterminatedString))?;
            self.column.write(term_out, &prompt);
            cursor.skip_whitespace();
            if matches!(cursor.current(), ';' | ',') {
                cursor.advance();
            }
        }
        loop {
            cursor.skip_whitespace();
            if !cursor.current().is_ascii_alphabetic() {
                return Err(RuntimeError::ExpectedVariable);
            }
            let ident = cursor.read_identifier();
            let key = parse_var_key(ident);
            let index = {
                let mut ctx = EvalContext { vars: &mut self.vars, rng: &mut self.rng, column: &mut self.column, out: &mut *term_out };
                parse_subscript(cursor, &mut ctx)?
            };
            self.column.write(term_out, "? ");
            let line = term_in.read_line().ok_or(RuntimeError::UnexpectedEndOfInput)?;
            let value =
                if key.is_string { Value::string_truncated(line) } else { Value::Number(atof_prefix(&line)) };
            match index {
                Some(idx) => *self.vars.array_element(key, idx) = value,
                None => self.vars.set_scalar(key, value).map_err(EvalError::from)?,
            }
            cursor.skip_whitespace();
            if cursor.current() == ',' {
                cursor.advance();
                continue;
            }
            break;
        }
        Ok(Flow::NextStatement)
    }

    fn stmt_let(&mut self, cursor: &mut LineCursor<'_>, term_out: &mut dyn TerminalOut) -> Result<Flow, RuntimeError> {
        cursor.skip_whitespace();
        if !cursor.current().is_ascii_alphabetic() {
            return Err(RuntimeError::Eval(EvalError::SyntaxError));
        }
        let ident = cursor.read_identifier();
        let key = parse_var_key(ident);
        let mut ctx = EvalContext { vars: &mut self.vars, rng: &mut self.rng, column: &mut self.column, out: &mut *term_out };
        let index = parse_subscript(cursor, &mut ctx)?;
        cursor.skip_whitespace();
        if cursor.current() != '=' {
            return Err(RuntimeError::ExpectedEquals);
        }
        cursor.advance();
        cursor.skip_whitespace();
        let value = evaluate(cursor, &mut ctx)?;
        match index {
            Some(idx) => {
                let slot = ctx.vars.array_element(key, idx);
                if slot.is_string() != value.is_string() {
                    let mismatch =
                        if key.is_string { basic_value::ValueError::StringRequired } else { basic_value::ValueError::NumericRequired };
                    return Err(EvalError::from(mismatch).into());
                }
                *slot = value;
            }
            None => ctx.vars.set_scalar(key, value).map_err(EvalError::from)?,
        }
        Ok(Flow::NextStatement)
    }

    fn stmt_goto(&mut self, cursor: &mut LineCursor<'_>) -> Result<Flow, RuntimeError> {
        cursor.skip_whitespace();
        let target = cursor.read_number_literal() as u32;
        let idx = self.program.find_line_index(target).ok_or(RuntimeError::TargetLineNotFound)?;
        self.current_line = idx;
        self.cursor_pos = None;
        Ok(Flow::Jumped)
    }

    fn stmt_gosub(&mut self, cursor: &mut LineCursor<'_>) -> Result<Flow, RuntimeError> {
        cursor.skip_whitespace();
        let target = cursor.read_number_literal() as u32;
        let idx = self.program.find_line_index(target).ok_or(RuntimeError::TargetLineNotFound)?;
        if self.gosub_stack.len() >= GOSUB_STACK_CAPACITY {
            return Err(RuntimeError::GosubStackOverflow);
        }
        self.gosub_stack.push(GosubFrame { return_line: self.current_line, return_cursor: cursor.position() });
        self.current_line = idx;
        self.cursor_pos = None;
        Ok(Flow::Jumped)
    }

    fn stmt_return(&mut self) -> Result<Flow, RuntimeError> {
        let frame = self.gosub_stack.pop().ok_or(RuntimeError::ReturnWithoutGosub)?;
        self.current_line = frame.return_line;
        self.cursor_pos = Some(frame.return_cursor);
        Ok(Flow::Jumped)
    }

    fn stmt_if(&mut self, cursor: &mut LineCursor<'_>, term_out: &mut dyn TerminalOut) -> Result<Flow, RuntimeError> {
        let mut ctx = EvalContext { vars: &mut self.vars, rng: &mut self.rng, column: &mut self.column, out: &mut *term_out };
        let condition = evaluate(cursor, &mut ctx)?;
        cursor.skip_whitespace();
        if !cursor.match_keyword("THEN") {
            return Err(RuntimeError::MissingThen);
        }
        if !condition.is_truthy() {
            return Ok(Flow::LineConsumedSkipRest);
        }
        cursor.skip_whitespace();
        if cursor.current().is_ascii_digit() {
            let target = cursor.read_number_literal() as u32;
            let idx = self.program.find_line_index(target).ok_or(RuntimeError::TargetLineNotFound)?;
            self.current_line = idx;
            self.cursor_pos = None;
            return Ok(Flow::Jumped);
        }
        Ok(Flow::ContinueInline)
    }

    fn stmt_for(&mut self, cursor: &mut LineCursor<'_>, term_out: &mut dyn TerminalOut) -> Result<Flow, RuntimeError> {
        cursor.skip_whitespace();
        if !cursor.current().is_ascii_alphabetic() {
            return Err(RuntimeError::ExpectedVariable);
        }
        let ident = cursor.read_identifier();
        let key = parse_var_key(ident);
        if key.is_string {
            return Err(RuntimeError::ForVariableMustBeNumeric);
        }
        cursor.skip_whitespace();
        if cursor.current() == '(' {
            return Err(RuntimeError::ForVariableMustBeScalar);
        }
        if cursor.current() != '=' {
            return Err(RuntimeError::ExpectedEquals);
        }
        cursor.advance();
        cursor.skip_whitespace();

        let mut ctx = EvalContext { vars: &mut self.vars, rng: &mut self.rng, column: &mut self.column, out: &mut *term_out };
        let start = evaluate(cursor, &mut ctx)?.as_number().map_err(EvalError::from)?;
        ctx.vars.set_scalar(key, Value::Number(start)).map_err(EvalError::from)?;

        cursor.skip_whitespace();
        if !cursor.match_keyword("TO") {
            return Err(RuntimeError::ExpectedToInFor);
        }
        cursor.skip_whitespace();
        let target = evaluate(cursor, &mut ctx)?.as_number().map_err(EvalError::from)?;

        cursor.skip_whitespace();
        let step = if cursor.match_keyword("STEP") {
            cursor.skip_whitespace();
            evaluate(cursor, &mut ctx)?.as_number().map_err(EvalError::from)?
        } else {
            1.0
        };

        if self.for_stack.len() >= FOR_STACK_CAPACITY {
            return Err(RuntimeError::ForStackOverflow);
        }
        self.for_stack.push(ForFrame {
            key,
            target,
            step,
            loop_line: self.current_line,
            resume_cursor: cursor.position(),
        });
        Ok(Flow::NextStatement)
    }

    fn stmt_next(&mut self, cursor: &mut LineCursor<'_>) -> Result<Flow, RuntimeError> {
        cursor.skip_whitespace();
        let name_key = if cursor.current().is_ascii_alphabetic() {
            Some(parse_var_key(cursor.read_identifier()))
        } else {
            None
        };

        let pos = match name_key {
            None => self.for_stack.len().checked_sub(1).ok_or(RuntimeError::NextWithoutFor)?,
            Some(key) => {
                self.for_stack.iter().rposition(|f| f.key == key).ok_or(RuntimeError::LoopVariableMissing)?
            }
        };
        self.for_stack.truncate(pos + 1);
        let frame = *self.for_stack.last().expect("just checked non-empty");

        let current = self.vars.scalar(frame.key).as_number().map_err(EvalError::from)?;
        let next_value = current + frame.step;
        self.vars.set_scalar(frame.key, Value::Number(next_value)).map_err(EvalError::from)?;

        let continues = if frame.step >= 0.0 { next_value <= frame.target } else { next_value >= frame.target };
        if continues {
            self.current_line = frame.loop_line;
            self.cursor_pos = Some(frame.resume_cursor);
            Ok(Flow::Jumped)
        } else {
            self.for_stack.pop();
            Ok(Flow::NextStatement)
        }
    }

    fn stmt_dim(&mut self, cursor: &mut LineCursor<'_>, term_out: &mut dyn TerminalOut) -> Result<Flow, RuntimeError> {
        loop {
            cursor.skip_whitespace();
            if !cursor.current().is_ascii_alphabetic() {
                return Err(RuntimeError::ExpectedVariable);
            }
            let key = parse_var_key(cursor.read_identifier());
            cursor.skip_whitespace();
            if cursor.current() != '(' {
                return Err(RuntimeError::Eval(EvalError::SyntaxError));
            }
            cursor.advance();
            let mut ctx = EvalContext { vars: &mut self.vars, rng: &mut self.rng, column: &mut self.column, out: &mut *term_out };
            let size_value = evaluate(cursor, &mut ctx)?;
            cursor.skip_whitespace();
            if cursor.current() != ')' {
                return Err(RuntimeError::Eval(EvalError::MissingCloseParen));
            }
            cursor.advance();
            let size = size_value.as_number().map_err(EvalError::from)?;
            if size < 0.0 {
                return Err(RuntimeError::InvalidArraySize);
            }
            self.vars.dim(key, size as usize);
            cursor.skip_whitespace();
            if cursor.current() == ',' {
                cursor.advance();
                continue;
            }
            break;
        }
        Ok(Flow::NextStatement)
    }

    fn stmt_sleep(
        &mut self,
        cursor: &mut LineCursor<'_>,
        term_out: &mut dyn TerminalOut,
        sleep: &mut dyn SleepClock,
    ) -> Result<Flow, RuntimeError> {
        let mut ctx = EvalContext { vars: &mut self.vars, rng: &mut self.rng, column: &mut self.column, out: &mut *term_out };
        let ticks = evaluate(cursor, &mut ctx)?.as_number().map_err(EvalError::from)?;
        sleep.sleep_ticks(ticks);
        Ok(Flow::NextStatement)
    }
}
