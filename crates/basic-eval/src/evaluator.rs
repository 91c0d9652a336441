use basic_lex::LineCursor;
use basic_value::{Value, VarKey};

use crate::context::EvalContext;
use crate::error::EvalError;
use crate::intrinsics;

/// Evaluates one expression starting at the cursor, per the grammar in
/// `or_expr -> and_expr -> comparison -> addsub -> muldiv -> power ->
/// factor`. Leaves the cursor positioned just past the expression.
pub fn evaluate(cursor: &mut LineCursor<'_>, ctx: &mut EvalContext<'_>) -> Result<Value, EvalError> {
    or_expr(cursor, ctx)
}

pub(crate) fn or_expr(cursor: &mut LineCursor<'_>, ctx: &mut EvalContext<'_>) -> Result<Value, EvalError> {
    let mut left = and_expr(cursor, ctx)?;
    loop {
        cursor.skip_whitespace();
        if cursor.match_keyword("OR") {
            cursor.skip_whitespace();
            let right = and_expr(cursor, ctx)?;
            left = bitwise_op(&left, &right, |a, b| a | b)?;
        } else {
            break;
        }
    }
    Ok(left)
}

fn and_expr(cursor: &mut LineCursor<'_>, ctx: &mut EvalContext<'_>) -> Result<Value, EvalError> {
    let mut left = comparison(cursor, ctx)?;
    loop {
        cursor.skip_whitespace();
        if cursor.match_keyword("AND") {
            cursor.skip_whitespace();
            let right = comparison(cursor, ctx)?;
            left = bitwise_op(&left, &right, |a, b| a & b)?;
        } else {
            break;
        }
    }
    Ok(left)
}

#[derive(Clone, Copy)]
enum CmpOp {
    Eq,
    Ne,
    Le,
    Ge,
    Lt,
    Gt,
}

fn match_comparison_op(cursor: &mut LineCursor<'_>) -> Option<CmpOp> {
    match cursor.current() {
        '=' => {
            cursor.advance();
            Some(CmpOp::Eq)
        }
        '<' => {
            cursor.advance();
            match cursor.current() {
                '>' => {
                    cursor.advance();
                    Some(CmpOp::Ne)
                }
                '=' => {
                    cursor.advance();
                    Some(CmpOp::Le)
                }
                _ => Some(CmpOp::Lt),
            }
        }
        '>' => {
            cursor.advance();
            if cursor.current() == '=' {
                cursor.advance();
                Some(CmpOp::Ge)
            } else {
                Some(CmpOp::Gt)
            }
        }
        _ => None,
    }
}

fn apply_comparison(op: CmpOp, left: &Value, right: &Value) -> Result<bool, EvalError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(match op {
            CmpOp::Eq => a == b,
            CmpOp::Ne => a != b,
            CmpOp::Le => a <= b,
            CmpOp::Ge => a >= b,
            CmpOp::Lt => a < b,
            CmpOp::Gt => a > b,
        }),
        (Value::String(a), Value::String(b)) => Ok(match op {
            CmpOp::Eq => a == b,
            CmpOp::Ne => a != b,
            CmpOp::Le => a <= b,
            CmpOp::Ge => a >= b,
            CmpOp::Lt => a < b,
            CmpOp::Gt => a > b,
        }),
        _ => Err(EvalError::ComparisonTypeMismatch),
    }
}

fn comparison(cursor: &mut LineCursor<'_>, ctx: &mut EvalContext<'_>) -> Result<Value, EvalError> {
    let left = addsub(cursor, ctx)?;
    cursor.skip_whitespace();
    if let Some(op) = match_comparison_op(cursor) {
        cursor.skip_whitespace();
        let right = addsub(cursor, ctx)?;
        Ok(Value::cbm_bool(apply_comparison(op, &left, &right)?))
    } else {
        Ok(left)
    }
}

fn add_values(left: Value, right: Value) -> Result<Value, EvalError> {
    if left.is_string() || right.is_string() {
        let a = left.as_str()?;
        let b = right.as_str()?;
        Ok(Value::string_truncated(format!("{}{}", a, b)))
    } else {
        Ok(Value::Number(left.as_number()? + right.as_number()?))
    }
}

fn addsub(cursor: &mut LineCursor<'_>, ctx: &mut EvalContext<'_>) -> Result<Value, EvalError> {
    let mut left = muldiv(cursor, ctx)?;
    loop {
        cursor.skip_whitespace();
        match cursor.current() {
            '+' => {
                cursor.advance();
                cursor.skip_whitespace();
                let right = muldiv(cursor, ctx)?;
                left = add_values(left, right)?;
            }
            '-' => {
                cursor.advance();
                cursor.skip_whitespace();
                let right = muldiv(cursor, ctx)?;
                left = Value::Number(left.as_number()? - right.as_number()?);
            }
            _ => break,
        }
    }
    Ok(left)
}

fn muldiv(cursor: &mut LineCursor<'_>, ctx: &mut EvalContext<'_>) -> Result<Value, EvalError> {
    let mut left = power(cursor, ctx)?;
    loop {
        cursor.skip_whitespace();
        match cursor.current() {
            '*' => {
                cursor.advance();
                cursor.skip_whitespace();
                let right = power(cursor, ctx)?;
                left = Value::Number(left.as_number()? * right.as_number()?);
            }
            '/' => {
                cursor.advance();
                cursor.skip_whitespace();
                let right = power(cursor, ctx)?;
                left = Value::Number(left.as_number()? / right.as_number()?);
            }
            _ => break,
        }
    }
    Ok(left)
}

/// Right-associative: `2^3^2` parses as `2^(3^2)` via recursion into
/// `power` (not `factor`) on the right-hand side.
fn power(cursor: &mut LineCursor<'_>, ctx: &mut EvalContext<'_>) -> Result<Value, EvalError> {
    let base = factor(cursor, ctx)?;
    cursor.skip_whitespace();
    if cursor.current() == '^' {
        cursor.advance();
        cursor.skip_whitespace();
        let exponent = power(cursor, ctx)?;
        Ok(Value::Number(base.as_number()?.powf(exponent.as_number()?)))
    } else {
        Ok(base)
    }
}

/// Unary sign lives here, one level below `power`, so `-2^2` parses as
/// `(-2)^2 = 4` rather than `-(2^2)` — CBM BASIC's authentic precedence,
/// the reverse of conventional math notation.
fn factor(cursor: &mut LineCursor<'_>, ctx: &mut EvalContext<'_>) -> Result<Value, EvalError> {
    cursor.skip_whitespace();
    match cursor.current() {
        '"' => {
            let s = cursor.read_quoted_string().ok_or(EvalError::UnterminatedString)?;
            Ok(Value::string_truncated(s))
        }
        '(' => {
            cursor.advance();
            let value = or_expr(cursor, ctx)?;
            cursor.skip_whitespace();
            if cursor.current() != ')' {
                return Err(EvalError::MissingCloseParen);
            }
            cursor.advance();
            Ok(value)
        }
        '+' => {
            cursor.advance();
            Ok(Value::Number(factor(cursor, ctx)?.as_number()?))
        }
        '-' => {
            cursor.advance();
            Ok(Value::Number(-factor(cursor, ctx)?.as_number()?))
        }
        c if c.is_ascii_digit() || c == '.' => Ok(Value::Number(cursor.read_number_literal())),
        c if c.is_ascii_alphabetic() => identifier_factor(cursor, ctx),
        _ => Err(EvalError::SyntaxError),
    }
}

/// A function name is distinguished from a variable name by looking it up
/// in the intrinsic table *before* variable resolution (spec §4.3): an
/// identifier that isn't a known function is a variable, and a following
/// `(` means array subscript rather than a call.
fn identifier_factor(cursor: &mut LineCursor<'_>, ctx: &mut EvalContext<'_>) -> Result<Value, EvalError> {
    let ident = cursor.read_identifier();
    let upper = ident.to_ascii_uppercase();
    if let Some(intrinsic) = intrinsics::lookup(&upper) {
        intrinsics::call(intrinsic, cursor, ctx)
    } else {
        let key = parse_var_key(ident);
        match parse_subscript(cursor, ctx)? {
            Some(idx) => Ok(ctx.vars.array_element(key, idx).clone()),
            None => Ok(ctx.vars.scalar(key).clone()),
        }
    }
}

/// Derives a variable key from an identifier's leading run of letters
/// (up to two) and whether it ends in `$`; digits and further letters
/// are accepted in the source but don't affect the key (CBM BASIC v2
/// compatibility, spec §4.1).
pub fn parse_var_key(ident: &str) -> VarKey {
    let is_string = ident.ends_with('$');
    let mut leading_letters = ident.chars().take_while(|c| c.is_ascii_alphabetic());
    let l1 = leading_letters.next().map(|c| c.to_ascii_uppercase() as u8).unwrap_or(b'A');
    let l2 = leading_letters.next().map(|c| c.to_ascii_uppercase() as u8).unwrap_or(b' ');
    VarKey::new(l1, l2, is_string)
}

/// Parses an optional `(subscript)` following a variable name. Returns
/// `Ok(None)` when there is no `(` at all (a scalar reference).
pub fn parse_subscript(cursor: &mut LineCursor<'_>, ctx: &mut EvalContext<'_>) -> Result<Option<usize>, EvalError> {
    cursor.skip_whitespace();
    if cursor.current() != '(' {
        return Ok(None);
    }
    cursor.advance();
    let value = or_expr(cursor, ctx)?;
    cursor.skip_whitespace();
    if cursor.current() != ')' {
        return Err(EvalError::MissingCloseParen);
    }
    cursor.advance();
    let n = value.as_number()?;
    let index = (n + 0.00001).floor();
    if index < 0.0 {
        return Err(EvalError::NegativeArrayIndex);
    }
    Ok(Some(index as usize))
}

fn bitwise_op(left: &Value, right: &Value, f: impl Fn(i32, i32) -> i32) -> Result<Value, EvalError> {
    let a = trunc_to_i32(left.as_number()?);
    let b = trunc_to_i32(right.as_number()?);
    Ok(Value::Number(f(a, b) as f64))
}

/// Integer truncation used by `AND`/`OR`/`NOT` — truncates toward zero,
/// saturating at `i32` bounds (Rust's `as` cast does this since 1.45,
/// unlike C's undefined behaviour on overflow).
pub(crate) fn trunc_to_i32(x: f64) -> i32 {
    x.trunc() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use basic_util::PrintColumn;
    use basic_value::VarStore;
    use crate::rng::RngState;

    struct NullOut;
    impl basic_util::TerminalOut for NullOut {
        fn write_str(&mut self, _text: &str) {}
    }

    fn eval_str(src: &str) -> Value {
        let mut vars = VarStore::new();
        let mut rng = RngState::new();
        let mut column = PrintColumn::new();
        let mut out = NullOut;
        let mut ctx = EvalContext { vars: &mut vars, rng: &mut rng, column: &mut column, out: &mut out };
        let mut cursor = LineCursor::new(src);
        evaluate(&mut cursor, &mut ctx).unwrap()
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(eval_str("2+3*4"), Value::Number(14.0));
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(eval_str("2^3^2"), Value::Number(2f64.powf(9.0)));
    }

    #[test]
    fn unary_minus_binds_tighter_than_power() {
        assert_eq!(eval_str("-2^2"), Value::Number(4.0));
    }

    #[test]
    fn comparisons_yield_cbm_booleans() {
        assert_eq!(eval_str("3>2"), Value::Number(-1.0));
        assert_eq!(eval_str("3<2"), Value::Number(0.0));
    }

    #[test]
    fn and_or_are_bitwise_on_truncated_integers() {
        assert_eq!(eval_str("5>3 AND 2<4"), Value::Number(-1.0));
        assert_eq!(eval_str("6 AND 3"), Value::Number(2.0));
    }

    #[test]
    fn string_comparison_is_lexicographic() {
        assert_eq!(eval_str("\"AA\"<\"AB\""), Value::Number(-1.0));
    }

    #[test]
    fn cross_type_comparison_is_an_error() {
        let mut vars = VarStore::new();
        let mut rng = RngState::new();
        let mut column = PrintColumn::new();
        let mut out = NullOut;
        let mut ctx = EvalContext { vars: &mut vars, rng: &mut rng, column: &mut column, out: &mut out };
        let mut cursor = LineCursor::new("1=\"A\"");
        assert_eq!(evaluate(&mut cursor, &mut ctx), Err(EvalError::ComparisonTypeMismatch));
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(eval_str("\"AB\"+\"CD\""), Value::String("ABCD".into()));
    }

    #[test]
    fn parenthesized_expression() {
        assert_eq!(eval_str("(2+3)*4"), Value::Number(20.0));
    }

    #[test]
    fn missing_close_paren_is_an_error() {
        let mut vars = VarStore::new();
        let mut rng = RngState::new();
        let mut column = PrintColumn::new();
        let mut out = NullOut;
        let mut ctx = EvalContext { vars: &mut vars, rng: &mut rng, column: &mut column, out: &mut out };
        let mut cursor = LineCursor::new("(2+3");
        assert_eq!(evaluate(&mut cursor, &mut ctx), Err(EvalError::MissingCloseParen));
    }

    #[test]
    fn variable_defaults_to_zero_and_array_grows() {
        let mut vars = VarStore::new();
        let mut rng = RngState::new();
        let mut column = PrintColumn::new();
        let mut out = NullOut;
        let mut ctx = EvalContext { vars: &mut vars, rng: &mut rng, column: &mut column, out: &mut out };
        let mut cursor = LineCursor::new("A");
        assert_eq!(evaluate(&mut cursor, &mut ctx).unwrap(), Value::Number(0.0));
        let mut cursor = LineCursor::new("A(10)");
        assert_eq!(evaluate(&mut cursor, &mut ctx).unwrap(), Value::Number(0.0));
    }

    #[test]
    fn negative_subscript_is_an_error() {
        let mut vars = VarStore::new();
        let mut rng = RngState::new();
        let mut column = PrintColumn::new();
        let mut out = NullOut;
        let mut ctx = EvalContext { vars: &mut vars, rng: &mut rng, column: &mut column, out: &mut out };
        let mut cursor = LineCursor::new("A(-1)");
        assert_eq!(evaluate(&mut cursor, &mut ctx), Err(EvalError::NegativeArrayIndex));
    }

    #[test]
    fn var_key_takes_only_the_leading_run_of_letters() {
        assert_eq!(parse_var_key("A1B$"), VarKey::new(b'A', b' ', true));
        assert_eq!(parse_var_key("AB12"), VarKey::new(b'A', b'B', false));
    }
}
